//! Read side: paginated keyword search and single-item lookup.

use storefront_core::{CatalogError, CatalogResult, ProductId};

use crate::product::Product;
use crate::store::{ProductStore, SearchFilter};

/// Items per page unless the service is wired with another size.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// One page of search results plus page-count metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub products: Vec<Product>,
    pub page: u64,
    pub pages: u64,
}

/// Read-only view over the catalog. Holds no state besides the store handle.
#[derive(Debug, Clone)]
pub struct CatalogQuery<S> {
    store: S,
    page_size: u64,
}

impl<S> CatalogQuery<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self::with_page_size(store, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(store: S, page_size: u64) -> Self {
        Self { store, page_size }
    }

    /// Filtered, paginated view of the catalog.
    ///
    /// Pages below 1 are clamped to 1 rather than turning into a negative
    /// skip. A blank keyword means no filter. `pages` is
    /// `ceil(matching / page_size)`, so zero matches yields zero pages.
    pub async fn search(
        &self,
        page: Option<u64>,
        keyword: Option<&str>,
    ) -> CatalogResult<SearchPage> {
        let page = page.unwrap_or(1).max(1);
        let filter = match keyword.map(str::trim).filter(|k| !k.is_empty()) {
            Some(keyword) => SearchFilter::keyword(keyword),
            None => SearchFilter::all(),
        };

        let matching = self.store.count(&filter).await?;
        let products = self
            .store
            .page(&filter, self.page_size * (page - 1), self.page_size)
            .await?;

        Ok(SearchPage {
            products,
            page,
            pages: matching.div_ceil(self.page_size),
        })
    }

    /// Single-item lookup. The identifier is checked against the identity
    /// format before any store call, so malformed input never reaches the
    /// backend.
    pub async fn get(&self, id: &str) -> CatalogResult<Product> {
        let id: ProductId = id.parse()?;
        match self.store.fetch(id).await? {
            Some((product, _version)) => Ok(product),
            None => Err(CatalogError::NotFound),
        }
    }
}
