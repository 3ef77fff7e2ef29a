//! Catalog error model.

use thiserror::Error;

/// Result type used across the catalog layer.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-level error.
///
/// Deterministic client-fault failures (validation, malformed ids, policy
/// violations) plus the single fatal-to-the-request store fault. The HTTP
/// layer maps each variant to a status code; nothing is swallowed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Input failed validation; the message names the failing field(s).
    #[error("{0}")]
    Validation(String),

    /// An identifier was malformed (rejected before any store call).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// No entity with the requested identity exists.
    #[error("not found")]
    NotFound,

    /// The caller has already reviewed this product.
    #[error("product already reviewed")]
    DuplicateReview,

    /// The backing store could not be queried or written.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CatalogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
