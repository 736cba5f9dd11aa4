//! Product search module configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors raised while validating the module configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting '{key}'")]
    Missing { key: &'static str },

    #[error("invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Upstream catalog access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductSearchConfig {
    /// Base URL of the upstream catalog search endpoint.
    #[serde(deserialize_with = "scalar_string::option")]
    pub upstream_url: Option<String>,
    /// Consumer identifier sent in `WM_CONSUMER.ID` and signed.
    #[serde(deserialize_with = "scalar_string::option")]
    pub consumer_id: Option<String>,
    /// Filesystem path of the PEM-encoded RSA private key.
    pub private_key_path: Option<PathBuf>,
    /// Key version sent in `WM_SEC.KEY_VERSION` and signed.
    #[serde(deserialize_with = "scalar_string::required")]
    pub key_version: String,
    /// Total timeout for one upstream call in milliseconds.
    pub request_timeout_ms: u64,
    /// TCP/TLS connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// `User-Agent` header for outbound calls.
    #[serde(deserialize_with = "scalar_string::required")]
    pub user_agent: String,
}

/// Accept numbers and booleans where a string is expected.
///
/// Environment providers type `KEY_VERSION=2` or a numeric consumer id as
/// integers; these settings are opaque strings, so the scalar is rendered
/// back to text.
mod scalar_string {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        UInt(u64),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    impl From<Scalar> for String {
        fn from(s: Scalar) -> Self {
            match s {
                Scalar::Str(v) => v,
                Scalar::UInt(v) => v.to_string(),
                Scalar::Int(v) => v.to_string(),
                Scalar::Float(v) => v.to_string(),
                Scalar::Bool(v) => v.to_string(),
            }
        }
    }

    pub fn required<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Scalar::deserialize(deserializer).map(String::from)
    }

    pub fn option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
    }
}

impl Default for ProductSearchConfig {
    fn default() -> Self {
        Self {
            upstream_url: None,
            consumer_id: None,
            private_key_path: None,
            key_version: "1".to_owned(),
            request_timeout_ms: 30_000,
            connect_timeout_ms: 5_000,
            user_agent: concat!("catalog-proxy/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Configuration after validation: every required setting is present.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub upstream_url: Url,
    pub consumer_id: String,
    pub private_key_path: PathBuf,
    pub key_version: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl ProductSearchConfig {
    /// Check required settings and resolve them into a [`ResolvedConfig`].
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a required setting is missing or empty,
    /// the upstream URL is not an absolute http(s) URL, or a timeout is zero.
    pub fn validate(&self) -> Result<ResolvedConfig, ConfigError> {
        let raw_url = required_str(self.upstream_url.as_deref(), "product_search.upstream_url")?;
        let upstream_url = Url::parse(raw_url).map_err(|e| ConfigError::Invalid {
            key: "product_search.upstream_url",
            reason: e.to_string(),
        })?;
        if !matches!(upstream_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "product_search.upstream_url",
                reason: format!("unsupported scheme '{}'", upstream_url.scheme()),
            });
        }

        let consumer_id = required_str(self.consumer_id.as_deref(), "product_search.consumer_id")?;

        let private_key_path = match &self.private_key_path {
            Some(p) if !p.as_os_str().is_empty() => p.clone(),
            _ => {
                return Err(ConfigError::Missing {
                    key: "product_search.private_key_path",
                });
            }
        };

        let key_version = required_str(Some(&self.key_version), "product_search.key_version")?;
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "product_search.request_timeout_ms",
                reason: "must be greater than zero".to_owned(),
            });
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "product_search.connect_timeout_ms",
                reason: "must be greater than zero".to_owned(),
            });
        }

        Ok(ResolvedConfig {
            upstream_url,
            consumer_id: consumer_id.to_owned(),
            private_key_path,
            key_version: key_version.to_owned(),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            user_agent: self.user_agent.clone(),
        })
    }
}

/// Present, non-blank, and used verbatim: signed values must match the
/// configuration byte for byte, so surrounding whitespace is an error rather
/// than something to strip.
fn required_str<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str, ConfigError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ConfigError::Missing { key }),
        Some(v) if v.trim() != v => Err(ConfigError::Invalid {
            key,
            reason: "must not have leading or trailing whitespace".to_owned(),
        }),
        Some(v) => Ok(v),
        None => Err(ConfigError::Missing { key }),
    }
}
