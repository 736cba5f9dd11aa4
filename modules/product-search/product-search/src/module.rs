//! Product search module definition.

use std::sync::Arc;

use axum::Router;
use product_search_sdk::ProductSearchApi;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::rest::routes;
use crate::config::{ConfigError, ProductSearchConfig};
use crate::domain::ports::PrivateKeySource;
use crate::domain::service::Service;
use crate::domain::signer::RequestSigner;
use crate::infra::keys::FilePrivateKeySource;
use crate::infra::upstream::HttpCatalogClient;
use crate::local_client::ProductSearchLocalClient;

/// Errors raised while assembling the module.
#[derive(Debug, Error)]
pub enum ModuleInitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build upstream HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Product search module.
///
/// Owns the key source, the upstream client and the domain service, and
/// exposes them as an axum router and as a [`ProductSearchApi`] client.
pub struct ProductSearchModule {
    service: Arc<Service>,
    keys: Arc<FilePrivateKeySource>,
}

impl ProductSearchModule {
    /// Validate `cfg` and wire the module.
    ///
    /// # Errors
    /// [`ModuleInitError::Config`] for missing or invalid settings.
    pub fn from_config(cfg: &ProductSearchConfig) -> Result<Self, ModuleInitError> {
        let resolved = cfg.validate()?;

        let keys = Arc::new(FilePrivateKeySource::new(resolved.private_key_path));
        let gateway = HttpCatalogClient::new(
            resolved.upstream_url,
            resolved.request_timeout,
            resolved.connect_timeout,
            &resolved.user_agent,
        )?;

        info!(
            upstream = %gateway.base_url(),
            consumer_id = %resolved.consumer_id,
            key_version = %resolved.key_version,
            "product search module configured"
        );

        let key_source: Arc<dyn PrivateKeySource> = keys.clone();
        let signer = RequestSigner::new(resolved.consumer_id, resolved.key_version, key_source);
        let service = Arc::new(Service::new(signer, Arc::new(gateway)));

        Ok(Self { service, keys })
    }

    /// Load the private key ahead of the first request. A failure is logged
    /// and surfaces again on each request until the key becomes readable.
    pub async fn preload_key(&self) -> bool {
        match self.keys.signing_key().await {
            Ok(_) => {
                info!(path = %self.keys.path().display(), "private key ready");
                true
            }
            Err(e) => {
                warn!(error = %e, "private key not loaded; search requests will fail until it is readable");
                false
            }
        }
    }

    pub fn router(&self, enable_docs: bool) -> Router {
        routes::register_routes(Arc::clone(&self.service), enable_docs)
    }

    pub fn client(&self) -> Arc<dyn ProductSearchApi> {
        Arc::new(ProductSearchLocalClient::new(Arc::clone(&self.service)))
    }
}
