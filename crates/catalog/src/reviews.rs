//! Review submission with derived-rating maintenance.

use chrono::Utc;

use storefront_core::{CatalogError, CatalogResult, ProductId, UserId};

use crate::mutate::MAX_WRITE_ATTEMPTS;
use crate::product::Review;
use crate::store::{ProductStore, StoreError};

/// Appends reviews and keeps `num_reviews`/`rating` consistent.
///
/// The fetch–validate–recompute–replace sequence runs inside an optimistic
/// retry loop keyed on the document version, so two concurrent reviewers
/// cannot drop each other's contribution to the aggregate and the
/// one-review-per-user check is re-evaluated against the state actually
/// being overwritten.
#[derive(Debug, Clone)]
pub struct ReviewAggregator<S> {
    store: S,
}

impl<S> ReviewAggregator<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn add_review(
        &self,
        id: &str,
        reviewer: UserId,
        reviewer_name: &str,
        rating: i64,
        comment: &str,
    ) -> CatalogResult<()> {
        let id: ProductId = id.parse()?;
        let rating = validate_rating(rating)?;

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let (mut product, version) = self
                .store
                .fetch(id)
                .await?
                .ok_or(CatalogError::NotFound)?;

            product.push_review(Review {
                reviewer,
                reviewer_name: reviewer_name.to_string(),
                rating,
                comment: comment.to_string(),
                created_at: Utc::now(),
            })?;

            match self.store.replace(&product, version).await {
                Ok(()) => return Ok(()),
                Err(StoreError::VersionConflict) => {
                    tracing::debug!(%id, attempt, "review append lost a version race, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(CatalogError::store_unavailable(
            "review contention was not resolved",
        ))
    }
}

fn validate_rating(rating: i64) -> CatalogResult<u8> {
    if (1..=5).contains(&rating) {
        Ok(rating as u8)
    } else {
        Err(CatalogError::validation(
            "Rating must be an integer between 1 and 5.",
        ))
    }
}
