//! Write side: create, partial update, and delete.

use chrono::Utc;

use storefront_core::{CatalogError, CatalogResult, ProductId, UserId};

use crate::product::{Product, ProductDraft, ProductUpdate};
use crate::store::{ProductStore, StoreError};

/// Upper bound on optimistic write retries before giving up.
pub(crate) const MAX_WRITE_ATTEMPTS: u32 = 5;

/// Validates and applies catalog mutations.
#[derive(Debug, Clone)]
pub struct ProductMutator<S> {
    store: S,
}

impl<S> ProductMutator<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate a draft and persist it as a new product.
    ///
    /// All validation happens before the store is touched; a rejected draft
    /// leaves no partial state. The returned product carries its assigned
    /// identity and zeroed derived fields.
    pub async fn create(
        &self,
        draft: ProductDraft,
        image: Option<String>,
        owner: UserId,
    ) -> CatalogResult<Product> {
        let product = draft.validate(image, owner, ProductId::new(), Utc::now())?;
        self.store.insert(product.clone()).await?;
        Ok(product)
    }

    /// Merge partial fields into the stored product (truthy values only, see
    /// [`Product::apply_update`]) under a version-checked write.
    ///
    /// Field constraints are not re-validated here; the merge policy already
    /// discards the values (empty, zero) that would need it.
    pub async fn update(&self, id: &str, fields: ProductUpdate) -> CatalogResult<Product> {
        let id: ProductId = id.parse()?;

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let (mut product, version) = self
                .store
                .fetch(id)
                .await?
                .ok_or(CatalogError::NotFound)?;

            product.apply_update(fields.clone(), Utc::now());

            match self.store.replace(&product, version).await {
                Ok(()) => return Ok(product),
                Err(StoreError::VersionConflict) => {
                    tracing::debug!(%id, attempt, "product update lost a version race, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(CatalogError::store_unavailable(
            "update contention was not resolved",
        ))
    }

    /// Remove the product and every nested review in one operation.
    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        let id: ProductId = id.parse()?;
        if self.store.remove(id).await? {
            Ok(())
        } else {
            Err(CatalogError::NotFound)
        }
    }
}
