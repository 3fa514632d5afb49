//! Business logic services

pub mod auth_service;
pub mod code_store;
pub mod comment_service;
pub mod confirmation_service;
pub mod email_service;
pub mod rating_service;
pub mod review_service;
pub mod taxonomy_service;
pub mod title_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use comment_service::CommentService;
pub use confirmation_service::ConfirmationService;
pub use email_service::EmailService;
pub use rating_service::RatingService;
pub use review_service::ReviewService;
pub use taxonomy_service::TaxonomyService;
pub use title_service::TitleService;
pub use user_service::UserService;
