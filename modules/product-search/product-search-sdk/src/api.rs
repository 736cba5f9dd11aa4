//! Product search API trait.

use async_trait::async_trait;

use crate::error::ProductSearchError;
use crate::models::{CatalogProduct, CatalogSearchResponse, SearchQuery};

/// Public API trait for the product-search module.
///
/// Every call validates the query, signs an outbound request and performs
/// exactly one upstream catalog call.
#[async_trait]
pub trait ProductSearchApi: Send + Sync {
    /// Run a search and return the full upstream envelope.
    async fn search(&self, query: &SearchQuery)
    -> Result<CatalogSearchResponse, ProductSearchError>;

    /// Run a search and return only the product records, in upstream order.
    async fn products(&self, query: &SearchQuery)
    -> Result<Vec<CatalogProduct>, ProductSearchError>;

    /// Run a search and return `"<name> - <salePrice>"` for each product.
    async fn product_summaries(&self, query: &SearchQuery)
    -> Result<Vec<String>, ProductSearchError>;
}
