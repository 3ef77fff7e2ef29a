//! Upload asset collaborator: turns a raw file into a stable reference
//! string; the catalog stores only the reference.

pub mod disk;

use async_trait::async_trait;
use thiserror::Error;

pub use disk::DiskAssetStore;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset storage failed: {0}")]
    Io(String),
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist the raw bytes and return the reference to record on the
    /// product.
    async fn save(&self, original_name: &str, bytes: Vec<u8>) -> Result<String, AssetError>;
}
