//! Product search error types.
//!
//! Transport-agnostic error definitions for the product-search module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single violated constraint on an inbound search parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct FieldViolation {
    /// Parameter path as it appears on the wire, e.g. `numItems` or `facet.filter`.
    pub field: String,
    /// Human-readable description of the violated constraint.
    pub message: String,
    /// Machine-readable issue code (`required`, `too_small`, `too_big`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl FieldViolation {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: &str) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: Some(code.to_owned()),
        }
    }
}

/// Error type for product search operations.
#[derive(Error, Debug, Clone)]
pub enum ProductSearchError {
    /// The search query violates one or more constraints.
    #[error("validation failed: {} issue(s)", violations.len())]
    Validation { violations: Vec<FieldViolation> },

    /// The request signature could not be produced.
    #[error("signature generation failed: {message}")]
    Signing { message: String },

    /// The upstream catalog call failed (transport, non-2xx or undecodable body).
    #[error("upstream call failed: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
}

impl ProductSearchError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    /// Create a signing error.
    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Create an upstream error.
    #[must_use]
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Signing { .. } | Self::Upstream { .. } => 500,
        }
    }
}
