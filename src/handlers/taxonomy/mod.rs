//! Category and genre handlers
//!
//! One set of handlers serves both collections; the router attaches the
//! [`Taxonomy`] they operate on as a request extension.

mod handler;
pub mod request;

pub use handler::*;
pub use request::*;

use axum::{
    routing::{delete, get},
    Extension, Router,
};

use crate::{models::Taxonomy, state::AppState};

/// Routes for one taxonomy (`/categories` or `/genres`)
pub fn routes(kind: Taxonomy) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{slug}", delete(handler::destroy))
        .layer(Extension(kind))
}
