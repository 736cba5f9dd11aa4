//! Domain errors for product search.

use std::path::{Path, PathBuf};

use product_search_sdk::{FieldViolation, ProductSearchError};
use thiserror::Error;

/// Domain-level errors for product search operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// The search query violates one or more constraints.
    #[error("validation failed: {} issue(s)", violations.len())]
    Validation { violations: Vec<FieldViolation> },

    /// The private key could not be located or read.
    #[error("private key unavailable at {}: {message}", path.display())]
    KeyUnavailable { path: PathBuf, message: String },

    /// The key was read but signing failed (malformed or unsupported key).
    #[error("signature generation failed: {message}")]
    Signing { message: String },

    /// Transport failure, non-2xx status or undecodable upstream payload.
    #[error("upstream call failed: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
}

impl DomainError {
    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    #[must_use]
    pub fn key_unavailable(path: &Path, message: impl Into<String>) -> Self {
        Self::KeyUnavailable {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Short description safe to show to API callers.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Validation { violations } => {
                format!("{} invalid parameter(s)", violations.len())
            }
            Self::KeyUnavailable { message, .. } => {
                format!("private key could not be read: {message}")
            }
            Self::Signing { message } | Self::Upstream { message, .. } => message.clone(),
        }
    }
}

/// Convert DomainError to SDK ProductSearchError.
impl From<DomainError> for ProductSearchError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation { violations } => Self::validation(violations),
            e @ DomainError::KeyUnavailable { .. } => Self::signing(e.summary()),
            DomainError::Signing { message } => Self::signing(message),
            DomainError::Upstream { status, message } => Self::upstream(status, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_unavailable_maps_to_signing_family() {
        let err = DomainError::key_unavailable(Path::new("/missing.pem"), "No such file");
        let sdk: ProductSearchError = err.into();
        assert!(matches!(sdk, ProductSearchError::Signing { .. }));
        assert_eq!(sdk.status_code(), 500);
    }

    #[test]
    fn upstream_keeps_status() {
        let sdk: ProductSearchError = DomainError::upstream(Some(503), "HTTP 503").into();
        assert!(matches!(
            sdk,
            ProductSearchError::Upstream {
                status: Some(503),
                ..
            }
        ));
    }

    #[test]
    fn summary_omits_key_path() {
        let err = DomainError::key_unavailable(Path::new("/secret/dir/key.pem"), "not found");
        assert!(!err.summary().contains("/secret/dir"));
    }
}
