//! Comment handlers, nested under `/titles/{title_id}/reviews/{review_id}/comments`

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Comment routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_comments).post(handler::create_comment))
        .route(
            "/{comment_id}",
            get(handler::get_comment)
                .patch(handler::update_comment)
                .delete(handler::delete_comment),
        )
}
