//! Outbound ports of the product search domain.

use std::sync::Arc;

use async_trait::async_trait;
use product_search_sdk::{CatalogSearchResponse, SearchQuery};
use rsa::pkcs1v15::SigningKey;
use rsa::sha2::Sha256;

use super::error::DomainError;
use super::signer::SignedHeaders;

/// Supplies the RSA key used to sign outbound calls.
#[async_trait]
pub trait PrivateKeySource: Send + Sync {
    /// # Errors
    /// [`DomainError::KeyUnavailable`] when the key cannot be read,
    /// [`DomainError::Signing`] when it cannot be parsed.
    async fn signing_key(&self) -> Result<Arc<SigningKey<Sha256>>, DomainError>;
}

/// Performs one authenticated search against the upstream catalog.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// # Errors
    /// [`DomainError::Upstream`] for transport failures, non-2xx statuses and
    /// payloads that do not decode.
    async fn search(
        &self,
        query: &SearchQuery,
        headers: &SignedHeaders,
    ) -> Result<CatalogSearchResponse, DomainError>;
}
