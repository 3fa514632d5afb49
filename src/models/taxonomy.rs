//! Category and genre models
//!
//! Both are flat `name` + `slug` lookups and share one row type.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A category or genre row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Taxon {
    #[serde(skip_serializing)]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Which lookup table a [`Taxon`] lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Category,
    Genre,
}

impl Taxonomy {
    /// Backing table name
    pub fn table(&self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Genre => "genres",
        }
    }

    /// Human-readable label used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Genre => "Genre",
        }
    }
}
