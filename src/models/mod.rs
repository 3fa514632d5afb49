//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod review;
pub mod taxonomy;
pub mod title;
pub mod user;
pub mod verify_code;

pub use review::*;
pub use taxonomy::*;
pub use title::*;
pub use user::*;
pub use verify_code::*;
