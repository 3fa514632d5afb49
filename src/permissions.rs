//! Permission predicates
//!
//! Pure functions of request method, requester and (for object checks) the
//! resource author. Handlers turn the [`Decision`] into an error with `?`.

use axum::http::Method;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::Capabilities,
};

/// Result of a permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Denied because nobody is logged in (401)
    NotAuthenticated,
    /// Denied for the logged-in user (403)
    Forbidden,
}

impl Decision {
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Self::Allow => Ok(()),
            Self::NotAuthenticated => Err(AppError::Unauthorized),
            Self::Forbidden => Err(AppError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            )),
        }
    }
}

/// GET, HEAD and OPTIONS never modify state
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn deny(user: Option<&AuthenticatedUser>) -> Decision {
    match user {
        Some(_) => Decision::Forbidden,
        None => Decision::NotAuthenticated,
    }
}

/// Any logged-in user
pub fn authenticated(user: Option<&AuthenticatedUser>) -> Decision {
    if user.is_some() {
        Decision::Allow
    } else {
        Decision::NotAuthenticated
    }
}

/// Reads for everyone, writes for logged-in users
pub fn authenticated_or_read_only(method: &Method, user: Option<&AuthenticatedUser>) -> Decision {
    if is_safe_method(method) {
        Decision::Allow
    } else {
        authenticated(user)
    }
}

/// Admin capability required, whatever the method
pub fn admin_only(user: Option<&AuthenticatedUser>) -> Decision {
    match user {
        Some(u) if u.is_admin() => Decision::Allow,
        other => deny(other),
    }
}

/// Reads for everyone, writes for admins
pub fn admin_or_read_only(method: &Method, user: Option<&AuthenticatedUser>) -> Decision {
    if is_safe_method(method) {
        Decision::Allow
    } else {
        admin_only(user)
    }
}

/// Object-level: reads for everyone, writes for the author, moderators and admins
pub fn owner_or_moderator_or_read_only(
    method: &Method,
    user: Option<&AuthenticatedUser>,
    author_id: &Uuid,
) -> Decision {
    if is_safe_method(method) {
        return Decision::Allow;
    }
    match user {
        Some(u) if u.id == *author_id || u.is_moder() || u.is_admin() => Decision::Allow,
        other => deny(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn principal(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            username: format!("{}-user", role),
            role,
            is_superuser: false,
        }
    }

    #[test]
    fn test_safe_methods() {
        assert!(is_safe_method(&Method::GET));
        assert!(is_safe_method(&Method::HEAD));
        assert!(is_safe_method(&Method::OPTIONS));
        assert!(!is_safe_method(&Method::POST));
        assert!(!is_safe_method(&Method::PATCH));
        assert!(!is_safe_method(&Method::DELETE));
    }

    #[test]
    fn test_anonymous_can_read_but_not_write_catalogue() {
        assert_eq!(admin_or_read_only(&Method::GET, None), Decision::Allow);
        for method in [Method::POST, Method::PATCH, Method::DELETE] {
            assert_eq!(
                admin_or_read_only(&method, None),
                Decision::NotAuthenticated
            );
        }
    }

    #[test]
    fn test_catalogue_writes_need_admin() {
        let user = principal(Role::User);
        let moderator = principal(Role::Moderator);
        let admin = principal(Role::Admin);
        let mut superuser = principal(Role::User);
        superuser.is_superuser = true;

        assert_eq!(admin_or_read_only(&Method::POST, Some(&user)), Decision::Forbidden);
        assert_eq!(
            admin_or_read_only(&Method::POST, Some(&moderator)),
            Decision::Forbidden
        );
        assert_eq!(admin_or_read_only(&Method::POST, Some(&admin)), Decision::Allow);
        assert_eq!(
            admin_or_read_only(&Method::DELETE, Some(&superuser)),
            Decision::Allow
        );
    }

    #[test]
    fn test_admin_only_denies_reads_too() {
        let user = principal(Role::User);
        assert_eq!(admin_only(None), Decision::NotAuthenticated);
        assert_eq!(admin_only(Some(&user)), Decision::Forbidden);
        assert_eq!(admin_only(Some(&principal(Role::Admin))), Decision::Allow);
    }

    #[test]
    fn test_review_creation_needs_login() {
        let user = principal(Role::User);
        assert_eq!(
            authenticated_or_read_only(&Method::POST, None),
            Decision::NotAuthenticated
        );
        assert_eq!(
            authenticated_or_read_only(&Method::POST, Some(&user)),
            Decision::Allow
        );
        assert_eq!(authenticated_or_read_only(&Method::GET, None), Decision::Allow);
    }

    #[test]
    fn test_object_writes_for_owner_and_staff_only() {
        let owner = principal(Role::User);
        let stranger = principal(Role::User);
        let moderator = principal(Role::Moderator);
        let admin = principal(Role::Admin);

        for method in [Method::PATCH, Method::DELETE] {
            assert_eq!(
                owner_or_moderator_or_read_only(&method, Some(&owner), &owner.id),
                Decision::Allow
            );
            assert_eq!(
                owner_or_moderator_or_read_only(&method, Some(&stranger), &owner.id),
                Decision::Forbidden
            );
            assert_eq!(
                owner_or_moderator_or_read_only(&method, Some(&moderator), &owner.id),
                Decision::Allow
            );
            assert_eq!(
                owner_or_moderator_or_read_only(&method, Some(&admin), &owner.id),
                Decision::Allow
            );
            assert_eq!(
                owner_or_moderator_or_read_only(&method, None, &owner.id),
                Decision::NotAuthenticated
            );
        }

        assert_eq!(
            owner_or_moderator_or_read_only(&Method::GET, Some(&stranger), &owner.id),
            Decision::Allow
        );
    }

    #[test]
    fn test_decision_into_result() {
        assert!(Decision::Allow.into_result().is_ok());
        assert!(matches!(
            Decision::NotAuthenticated.into_result(),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            Decision::Forbidden.into_result(),
            Err(AppError::Forbidden(_))
        ));
    }
}
