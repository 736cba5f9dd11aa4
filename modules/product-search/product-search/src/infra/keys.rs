//! PEM private key loading.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::sha2::Sha256;
use tokio::sync::OnceCell;

use crate::domain::error::DomainError;
use crate::domain::ports::PrivateKeySource;

/// Parse an RSA private key from PKCS#8 (`BEGIN PRIVATE KEY`) or
/// PKCS#1 (`BEGIN RSA PRIVATE KEY`) PEM.
///
/// # Errors
/// [`DomainError::Signing`] when neither encoding parses.
pub fn parse_private_key_pem(pem: &str) -> Result<RsaPrivateKey, DomainError> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| DomainError::signing(format!("unsupported or malformed private key: {e}")))
}

/// Reads the key file on first use and keeps the parsed key for the
/// lifetime of the process. Failed loads are not remembered.
pub struct FilePrivateKeySource {
    path: PathBuf,
    key: OnceCell<Arc<SigningKey<Sha256>>>,
}

impl FilePrivateKeySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    fn is_loaded(&self) -> bool {
        self.key.initialized()
    }

    async fn load(&self) -> Result<Arc<SigningKey<Sha256>>, DomainError> {
        let pem = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DomainError::key_unavailable(&self.path, e.to_string()))?;
        let key = parse_private_key_pem(&pem)?;
        tracing::debug!(path = %self.path.display(), "private key loaded");
        Ok(Arc::new(SigningKey::<Sha256>::new(key)))
    }
}

impl fmt::Debug for FilePrivateKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePrivateKeySource")
            .field("path", &self.path)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl PrivateKeySource for FilePrivateKeySource {
    async fn signing_key(&self) -> Result<Arc<SigningKey<Sha256>>, DomainError> {
        self.key
            .get_or_try_init(|| self.load())
            .await
            .map(Arc::clone)
    }
}
