//! Request signing for the upstream catalog.
//!
//! Every outbound call carries four headers: the consumer id, the current
//! epoch-millisecond timestamp, the key version and an RSA-SHA256
//! (PKCS#1 v1.5) signature over
//! `"{consumer_id}\n{timestamp_ms}\n{key_version}\n"`, base64-encoded.
//! A new timestamp and signature are produced for every call.

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rsa::signature::{SignatureEncoding, Signer as _};

use super::error::DomainError;
use super::ports::PrivateKeySource;

pub const HEADER_CONSUMER_ID: &str = "WM_CONSUMER.ID";
pub const HEADER_TIMESTAMP: &str = "WM_CONSUMER.INTIMESTAMP";
pub const HEADER_KEY_VERSION: &str = "WM_SEC.KEY_VERSION";
pub const HEADER_SIGNATURE: &str = "WM_SEC.AUTH_SIGNATURE";

/// Build the exact byte string that gets signed.
#[must_use]
pub fn canonical_message(consumer_id: &str, timestamp_ms: i64, key_version: &str) -> String {
    format!("{consumer_id}\n{timestamp_ms}\n{key_version}\n")
}

/// Authentication headers for a single outbound call.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub consumer_id: String,
    /// The exact timestamp embedded in the signed message.
    pub timestamp_ms: i64,
    pub key_version: String,
    pub signature: String,
}

impl SignedHeaders {
    /// Header name/value pairs in wire form.
    #[must_use]
    pub fn header_pairs(&self) -> [(&'static str, String); 4] {
        [
            (HEADER_CONSUMER_ID, self.consumer_id.clone()),
            (HEADER_TIMESTAMP, self.timestamp_ms.to_string()),
            (HEADER_KEY_VERSION, self.key_version.clone()),
            (HEADER_SIGNATURE, self.signature.clone()),
        ]
    }
}

impl fmt::Debug for SignedHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedHeaders")
            .field("consumer_id", &self.consumer_id)
            .field("timestamp_ms", &self.timestamp_ms)
            .field("key_version", &self.key_version)
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

/// Produces [`SignedHeaders`] from process-held credentials.
pub struct RequestSigner {
    consumer_id: String,
    key_version: String,
    keys: Arc<dyn PrivateKeySource>,
}

impl RequestSigner {
    pub fn new(
        consumer_id: impl Into<String>,
        key_version: impl Into<String>,
        keys: Arc<dyn PrivateKeySource>,
    ) -> Self {
        Self {
            consumer_id: consumer_id.into(),
            key_version: key_version.into(),
            keys,
        }
    }

    /// Sign with the current wall-clock time.
    ///
    /// # Errors
    /// Propagates key loading failures and signing failures.
    pub async fn sign(&self) -> Result<SignedHeaders, DomainError> {
        self.sign_at(chrono::Utc::now().timestamp_millis()).await
    }

    /// Sign with an explicit timestamp.
    ///
    /// # Errors
    /// Propagates key loading failures and signing failures.
    pub async fn sign_at(&self, timestamp_ms: i64) -> Result<SignedHeaders, DomainError> {
        let key = self.keys.signing_key().await?;
        let message = canonical_message(&self.consumer_id, timestamp_ms, &self.key_version);

        let signature = key
            .try_sign(message.as_bytes())
            .map_err(|e| DomainError::signing(e.to_string()))?;

        Ok(SignedHeaders {
            consumer_id: self.consumer_id.clone(),
            timestamp_ms,
            key_version: self.key_version.clone(),
            signature: STANDARD.encode(signature.to_bytes()),
        })
    }
}
