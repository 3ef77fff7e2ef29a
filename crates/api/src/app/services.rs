use std::sync::Arc;

use storefront_catalog::store::ProductStore;
use storefront_catalog::{CatalogQuery, ProductMutator, ReviewAggregator};
use storefront_infra::{AssetStore, DiskAssetStore, InMemoryProductStore, PostgresProductStore};

type DynStore = Arc<dyn ProductStore>;

/// Catalog services over the selected store, shared across requests.
/// Everything here is stateless besides the store/asset handles.
pub struct AppServices {
    pub query: CatalogQuery<DynStore>,
    pub mutator: ProductMutator<DynStore>,
    pub reviews: ReviewAggregator<DynStore>,
    pub assets: Arc<dyn AssetStore>,
}

/// Wire the services from the environment: Postgres when
/// `USE_PERSISTENT_STORE=true` (requires `DATABASE_URL`), otherwise the
/// in-memory store for dev/test.
pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORE")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let store: DynStore = if use_persistent {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set when USE_PERSISTENT_STORE=true");
        let pool = sqlx::PgPool::connect(&database_url)
            .await
            .expect("failed to connect to Postgres");
        let store = PostgresProductStore::new(pool);
        store
            .ensure_schema()
            .await
            .expect("failed to prepare products schema");
        Arc::new(store)
    } else {
        tracing::info!("using in-memory product store (dev/test)");
        Arc::new(InMemoryProductStore::new())
    };

    let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

    AppServices {
        query: CatalogQuery::new(store.clone()),
        mutator: ProductMutator::new(store.clone()),
        reviews: ReviewAggregator::new(store),
        assets: Arc::new(DiskAssetStore::new(upload_dir)),
    }
}
