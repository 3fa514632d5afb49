//! Review handlers, nested under `/titles/{title_id}/reviews`

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Review routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_reviews).post(handler::create_review))
        .route(
            "/{review_id}",
            get(handler::get_review)
                .patch(handler::update_review)
                .delete(handler::delete_review),
        )
}
