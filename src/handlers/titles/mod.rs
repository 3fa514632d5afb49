//! Title handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Title routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_titles).post(handler::create_title))
        .route(
            "/{title_id}",
            get(handler::get_title)
                .patch(handler::update_title)
                .delete(handler::delete_title),
        )
}
