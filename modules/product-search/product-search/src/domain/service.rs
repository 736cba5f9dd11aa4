//! Signed query forwarder.

use std::sync::Arc;

use product_search_sdk::{CatalogProduct, CatalogSearchResponse, SearchQuery};
use tracing::{info, instrument, warn};

use super::error::DomainError;
use super::ports::CatalogGateway;
use super::signer::RequestSigner;

/// Validates a query, signs a fresh request and forwards it upstream.
pub struct Service {
    signer: RequestSigner,
    gateway: Arc<dyn CatalogGateway>,
}

impl Service {
    pub fn new(signer: RequestSigner, gateway: Arc<dyn CatalogGateway>) -> Self {
        Self { signer, gateway }
    }

    /// Full upstream envelope for `query`.
    ///
    /// # Errors
    /// `Validation` before any outbound work, then signing or upstream failures.
    #[instrument(skip(self, query), fields(
        query = %query.query,
        num_items = ?query.num_items,
        start = ?query.start
    ))]
    pub async fn search(&self, query: &SearchQuery) -> Result<CatalogSearchResponse, DomainError> {
        query.validate().map_err(DomainError::validation)?;

        let headers = self.signer.sign().await?;
        let response = self.gateway.search(query, &headers).await?;

        info!(
            total_results = response.total_results,
            items = response.items.len(),
            "catalog search completed"
        );
        Ok(response)
    }

    /// Product records in upstream order.
    ///
    /// # Errors
    /// Same as [`Self::search`].
    pub async fn products(&self, query: &SearchQuery) -> Result<Vec<CatalogProduct>, DomainError> {
        Ok(self.search(query).await?.items)
    }

    /// `"<name> - <salePrice>"` for each product, in upstream order.
    ///
    /// # Errors
    /// Same as [`Self::search`], plus `Upstream` when a product lacks `name`
    /// or `salePrice`.
    pub async fn product_summaries(&self, query: &SearchQuery) -> Result<Vec<String>, DomainError> {
        let items = self.products(query).await?;
        items
            .iter()
            .map(|item| {
                item.summary().ok_or_else(|| {
                    warn!(item_id = item.item_id, "upstream product lacks name or salePrice");
                    DomainError::upstream(
                        None,
                        format!("product {} is missing name or salePrice", item.item_id),
                    )
                })
            })
            .collect()
    }
}
