//! Request bodies parsed only after the permission check
//!
//! `DeferredJson<T>` buffers the body without parsing it, so a denied write
//! gets 401/403 whatever it carries.

use std::marker::PhantomData;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// Buffered JSON body, parsed on demand
pub struct DeferredJson<T> {
    bytes: Bytes,
    _body: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> DeferredJson<T> {
    pub fn parse(&self) -> AppResult<T> {
        let Json(value) = Json::<T>::from_bytes(&self.bytes)?;
        Ok(value)
    }
}

impl<S, T> FromRequest<S> for DeferredJson<T>
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidBody(e.body_text()))?;

        Ok(Self {
            bytes,
            _body: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        text: String,
    }

    async fn buffered(body: &'static str) -> DeferredJson<Payload> {
        DeferredJson::from_request(Request::new(Body::from(body)), &())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_malformed_body_is_accepted_until_parsed() {
        let body = buffered("{not json").await;

        let err = body.parse().unwrap_err();
        assert!(matches!(err, AppError::InvalidBody(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_rejected_on_parse() {
        let body = buffered(r#"{"text": 5}"#).await;
        assert!(matches!(body.parse(), Err(AppError::InvalidBody(_))));
    }

    #[tokio::test]
    async fn test_well_formed_body() {
        let body = buffered(r#"{"text": "Great film"}"#).await;
        assert_eq!(body.parse().unwrap().text, "Great film");
    }
}
