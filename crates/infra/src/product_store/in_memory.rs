//! In-memory product store for tests/dev.

use std::sync::RwLock;

use async_trait::async_trait;

use storefront_catalog::store::{ProductStore, SearchFilter, StoreError};
use storefront_catalog::Product;
use storefront_core::ProductId;

#[derive(Debug, Clone)]
struct Record {
    version: u64,
    product: Product,
}

/// Insertion-ordered document store behind an `RwLock`.
///
/// `replace` performs the compare-and-swap under the write lock, so the
/// version check and the overwrite are a single atomic step, same as the
/// conditional UPDATE in the Postgres backend.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    records: RwLock<Vec<Record>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: Product) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        records.push(Record {
            version: 1,
            product,
        });
        Ok(())
    }

    async fn fetch(&self, id: ProductId) -> Result<Option<(Product, u64)>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        Ok(records
            .iter()
            .find(|r| r.product.id == id)
            .map(|r| (r.product.clone(), r.version)))
    }

    async fn replace(&self, product: &Product, expected_version: u64) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        match records.iter_mut().find(|r| r.product.id == product.id) {
            Some(record) if record.version == expected_version => {
                record.product = product.clone();
                record.version += 1;
                Ok(())
            }
            // A missing record here means a concurrent delete; the caller's
            // retry loop re-fetches and reports NotFound.
            _ => Err(StoreError::VersionConflict),
        }
    }

    async fn remove(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        let before = records.len();
        records.retain(|r| r.product.id != id);
        Ok(records.len() < before)
    }

    async fn count(&self, filter: &SearchFilter) -> Result<u64, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        Ok(records
            .iter()
            .filter(|r| filter.matches(&r.product.name))
            .count() as u64)
    }

    async fn page(
        &self,
        filter: &SearchFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        Ok(records
            .iter()
            .filter(|r| filter.matches(&r.product.name))
            .skip(skip as usize)
            .take(limit as usize)
            .map(|r| r.product.clone())
            .collect())
    }
}
