//! Document-store port for the catalog.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use storefront_core::{CatalogError, ProductId};

use crate::product::Product;

/// Filter for catalog queries.
///
/// The keyword matches as a case-insensitive substring against the product
/// name only (not brand, category or description).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub keyword: Option<String>,
}

impl SearchFilter {
    /// No filter: the full collection.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
        }
    }

    /// Reference matching semantics; backends without native case-insensitive
    /// search use this directly.
    pub fn matches(&self, name: &str) -> bool {
        match &self.keyword {
            None => true,
            Some(keyword) => name.to_lowercase().contains(&keyword.to_lowercase()),
        }
    }
}

/// Store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The version-checked write lost a race; reload and retry.
    #[error("stale version: document was modified concurrently")]
    VersionConflict,

    /// The backing store could not be reached or the operation failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        match value {
            // Only surfaces when a retry loop gives up; callers handle
            // VersionConflict explicitly inside the loop.
            StoreError::VersionConflict => {
                CatalogError::store_unavailable("write contention was not resolved")
            }
            StoreError::Unavailable(msg) => CatalogError::StoreUnavailable(msg),
        }
    }
}

/// Identity-keyed document store for products.
///
/// One product is one document; reviews live inside it, so a write commits
/// the review list and the derived aggregate together or not at all.
/// `replace` is an atomic single-document compare-and-swap keyed on the
/// version token returned by `fetch`. Listing order is store-native
/// (insertion/creation order); callers must not assume any field ordering.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a new document under its identity key.
    async fn insert(&self, product: Product) -> Result<(), StoreError>;

    /// Load a document and its current version token.
    async fn fetch(&self, id: ProductId) -> Result<Option<(Product, u64)>, StoreError>;

    /// Atomically overwrite the document iff its stored version still equals
    /// `expected_version`.
    async fn replace(&self, product: &Product, expected_version: u64) -> Result<(), StoreError>;

    /// Remove a document (and its nested reviews). Returns whether it existed.
    async fn remove(&self, id: ProductId) -> Result<bool, StoreError>;

    /// Number of documents matching the filter.
    async fn count(&self, filter: &SearchFilter) -> Result<u64, StoreError>;

    /// The `[skip, skip + limit)` slice of the matching collection in
    /// store-native order.
    async fn page(
        &self,
        filter: &SearchFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn insert(&self, product: Product) -> Result<(), StoreError> {
        (**self).insert(product).await
    }

    async fn fetch(&self, id: ProductId) -> Result<Option<(Product, u64)>, StoreError> {
        (**self).fetch(id).await
    }

    async fn replace(&self, product: &Product, expected_version: u64) -> Result<(), StoreError> {
        (**self).replace(product, expected_version).await
    }

    async fn remove(&self, id: ProductId) -> Result<bool, StoreError> {
        (**self).remove(id).await
    }

    async fn count(&self, filter: &SearchFilter) -> Result<u64, StoreError> {
        (**self).count(filter).await
    }

    async fn page(
        &self,
        filter: &SearchFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        (**self).page(filter, skip, limit).await
    }
}
