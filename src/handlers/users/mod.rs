//! User management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{routing::get, Router};

use crate::state::AppState;

/// User routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_users).post(handler::create_user))
        .route("/me", get(handler::get_me).patch(handler::update_me))
        .route(
            "/{username}",
            get(handler::get_user)
                .patch(handler::update_user)
                .delete(handler::delete_user),
        )
}
