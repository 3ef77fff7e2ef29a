//! Infrastructure implementations of the catalog's collaborator ports:
//! product stores (in-memory and Postgres) and the upload asset store.

pub mod assets;
pub mod product_store;

pub use assets::{AssetError, AssetStore, DiskAssetStore};
pub use product_store::{InMemoryProductStore, PostgresProductStore};
