//! Error types for catalog access.

use mzgrant_core::ObjectError;
use mzgrant_privilege::{ParseError, PrivilegeError};
use thiserror::Error;

/// Errors raised while resolving ids, scanning ACLs or applying grants.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No catalog row matched the name.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The catalog returned an ACL the codec could not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Privilege(#[from] PrivilegeError),

    #[error(transparent)]
    Object(#[from] ObjectError),

    /// A catalog value had an unexpected shape.
    #[error("unexpected catalog value: {0}")]
    Unexpected(String),
}

impl CatalogError {
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
