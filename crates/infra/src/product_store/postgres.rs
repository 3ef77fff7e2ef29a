//! Postgres-backed product store.
//!
//! Products are stored one row per document: a JSONB `doc` column next to a
//! `version` column for optimistic concurrency and a duplicated `name`
//! column for keyword filtering. The compare-and-swap in `replace` is a
//! conditional `UPDATE ... WHERE id = $1 AND version = $n`; zero affected
//! rows means the version moved (or the row was deleted) and surfaces as
//! `VersionConflict`. Every other SQLx failure maps to
//! `StoreError::Unavailable` with the underlying cause in the message.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use storefront_catalog::store::{ProductStore, SearchFilter, StoreError};
use storefront_catalog::Product;
use storefront_core::ProductId;

/// Postgres document store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the products table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id         UUID PRIMARY KEY,
                name       TEXT NOT NULL,
                version    BIGINT NOT NULL,
                doc        JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(unavailable)?;
        tracing::debug!("products schema is in place");
        Ok(())
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn encode(product: &Product) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(product)
        .map_err(|e| StoreError::Unavailable(format!("document serialization failed: {e}")))
}

fn decode(doc: serde_json::Value) -> Result<Product, StoreError> {
    serde_json::from_value(doc)
        .map_err(|e| StoreError::Unavailable(format!("document deserialization failed: {e}")))
}

/// Escape LIKE metacharacters so a keyword is matched literally.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn insert(&self, product: Product) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO products (id, name, version, doc, created_at) VALUES ($1, $2, 1, $3, $4)",
        )
        .bind(*product.id.as_uuid())
        .bind(&product.name)
        .bind(encode(&product)?)
        .bind(product.created_at)
        .execute(&*self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }

    async fn fetch(&self, id: ProductId) -> Result<Option<(Product, u64)>, StoreError> {
        let row = sqlx::query("SELECT doc, version FROM products WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(unavailable)?;

        match row {
            Some(row) => {
                let doc: serde_json::Value = row.try_get("doc").map_err(unavailable)?;
                let version: i64 = row.try_get("version").map_err(unavailable)?;
                Ok(Some((decode(doc)?, version as u64)))
            }
            None => Ok(None),
        }
    }

    async fn replace(&self, product: &Product, expected_version: u64) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE products SET doc = $2, name = $3, version = version + 1 \
             WHERE id = $1 AND version = $4",
        )
        .bind(*product.id.as_uuid())
        .bind(encode(product)?)
        .bind(&product.name)
        .bind(expected_version as i64)
        .execute(&*self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict);
        }
        Ok(())
    }

    async fn remove(&self, id: ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(unavailable)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, filter: &SearchFilter) -> Result<u64, StoreError> {
        let total: i64 = match &filter.keyword {
            Some(keyword) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE name ILIKE $1")
                    .bind(like_pattern(keyword))
                    .fetch_one(&*self.pool)
                    .await
                    .map_err(unavailable)?
            }
            None => sqlx::query_scalar("SELECT COUNT(*) FROM products")
                .fetch_one(&*self.pool)
                .await
                .map_err(unavailable)?,
        };
        Ok(total as u64)
    }

    async fn page(
        &self,
        filter: &SearchFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Product>, StoreError> {
        let rows = match &filter.keyword {
            Some(keyword) => {
                sqlx::query(
                    "SELECT doc FROM products WHERE name ILIKE $1 \
                     ORDER BY created_at, id LIMIT $2 OFFSET $3",
                )
                .bind(like_pattern(keyword))
                .bind(limit as i64)
                .bind(skip as i64)
                .fetch_all(&*self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT doc FROM products ORDER BY created_at, id LIMIT $1 OFFSET $2")
                    .bind(limit as i64)
                    .bind(skip as i64)
                    .fetch_all(&*self.pool)
                    .await
            }
        }
        .map_err(unavailable)?;

        rows.into_iter()
            .map(|row| {
                let doc: serde_json::Value = row.try_get("doc").map_err(unavailable)?;
                decode(doc)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(like_pattern("50% off_deal"), "%50\\% off\\_deal%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
