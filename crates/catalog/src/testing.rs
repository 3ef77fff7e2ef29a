//! Test doubles and fixtures shared by the service tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use storefront_core::{ProductId, UserId};

use crate::product::{Product, ProductDraft, Review};
use crate::store::{ProductStore, SearchFilter, StoreError};

pub(crate) fn sample_product(name: &str) -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::new(),
        owner: UserId::new(),
        name: name.to_string(),
        image: "/uploads/sample.png".to_string(),
        brand: "Acme".to_string(),
        category: "electronics".to_string(),
        description: "A sample product".to_string(),
        price: 19.99,
        count_in_stock: 5,
        sizes: Vec::new(),
        reviews: Vec::new(),
        num_reviews: 0,
        rating: 0.0,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn draft(name: &str, category: &str) -> ProductDraft {
    ProductDraft {
        name: Some(name.to_string()),
        brand: Some("Acme".to_string()),
        category: Some(category.to_string()),
        description: Some("A sample product".to_string()),
        price: Some("19.99".to_string()),
        count_in_stock: Some("5".to_string()),
        sizes: None,
    }
}

pub(crate) fn review(reviewer: UserId, rating: u8) -> Review {
    Review {
        reviewer,
        reviewer_name: "Sam".to_string(),
        rating,
        comment: String::new(),
        created_at: Utc::now(),
    }
}

#[derive(Debug, Clone)]
struct Record {
    version: u64,
    product: Product,
}

/// Insertion-ordered in-memory store that counts every trait call, so tests
/// can assert that a rejected input produced zero store traffic. `replace`
/// is a real compare-and-swap under one lock.
#[derive(Debug, Default, Clone)]
pub(crate) struct CountingStore {
    records: Arc<Mutex<Vec<Record>>>,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    /// Seed a product directly, bypassing the call counter.
    pub(crate) fn seed(&self, product: Product) {
        self.records.lock().unwrap().push(Record {
            version: 1,
            product,
        });
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductStore for CountingStore {
    async fn insert(&self, product: Product) -> Result<(), StoreError> {
        self.tick();
        self.records.lock().unwrap().push(Record {
            version: 1,
            product,
        });
        Ok(())
    }

    async fn fetch(&self, id: ProductId) -> Result<Option<(Product, u64)>, StoreError> {
        self.tick();
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .find(|r| r.product.id == id)
            .map(|r| (r.product.clone(), r.version)))
    }

    async fn replace(&self, product: &Product, expected_version: u64) -> Result<(), StoreError> {
        self.tick();
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.product.id == product.id) {
            Some(record) if record.version == expected_version => {
                record.product = product.clone();
                record.version += 1;
                Ok(())
            }
            Some(_) => Err(StoreError::VersionConflict),
            None => Err(StoreError::VersionConflict),
        }
    }

    async fn remove(&self, id: ProductId) -> Result<bool, StoreError> {
        self.tick();
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.product.id != id);
        Ok(records.len() < before)
    }

    async fn count(&self, filter: &SearchFilter) -> Result<u64, StoreError> {
        self.tick();
        let records = self.records.lock().unwrap();
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
        self.tick();
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| filter.matches(&r.product.name))
            .skip(skip as usize)
            .take(limit as usize)
            .map(|r| r.product.clone())
            .collect())
    }
}
