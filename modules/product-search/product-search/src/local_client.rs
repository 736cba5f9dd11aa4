//! Local client adapter implementing the SDK API trait.
//!
//! Bridges the domain service to the public ProductSearchApi trait so other
//! Rust code can search without going through HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use product_search_sdk::{
    CatalogProduct, CatalogSearchResponse, ProductSearchApi, ProductSearchError, SearchQuery,
};

use crate::domain::service::Service;

pub struct ProductSearchLocalClient {
    service: Arc<Service>,
}

impl ProductSearchLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ProductSearchApi for ProductSearchLocalClient {
    async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<CatalogSearchResponse, ProductSearchError> {
        self.service.search(query).await.map_err(Into::into)
    }

    async fn products(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<CatalogProduct>, ProductSearchError> {
        self.service.products(query).await.map_err(Into::into)
    }

    async fn product_summaries(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<String>, ProductSearchError> {
        self.service.product_summaries(query).await.map_err(Into::into)
    }
}
