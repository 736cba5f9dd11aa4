//! REST error mapping for product search.

use http::StatusCode;

use super::problem::Problem;
use crate::domain::error::DomainError;

const PROBLEM_TYPE_BASE: &str = "https://errors.catalog-proxy.dev/product-search";

pub const CODE_VALIDATION: &str = "PRODUCT_SEARCH_VALIDATION";
pub const CODE_SIGNING: &str = "PRODUCT_SEARCH_SIGNING";
pub const CODE_UPSTREAM: &str = "PRODUCT_SEARCH_UPSTREAM";

/// Convert DomainError to Problem for REST responses.
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        let (status, code, title, detail) = match &e {
            DomainError::Validation { .. } => (
                StatusCode::BAD_REQUEST,
                CODE_VALIDATION,
                "Invalid search parameters",
                "Validation failed".to_owned(),
            ),
            DomainError::KeyUnavailable { .. } | DomainError::Signing { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                CODE_SIGNING,
                "Request signing failed",
                format!(
                    "Failed to fetch products: signature generation failed: {}",
                    e.summary()
                ),
            ),
            DomainError::Upstream { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                CODE_UPSTREAM,
                "Upstream catalog error",
                format!("Failed to fetch products: {}", e.summary()),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %e, code, "product search failed");
        } else {
            tracing::debug!(error = %e, code, "product search rejected");
        }

        let mut problem = Problem::new(status, title, detail)
            .with_type(format!("{PROBLEM_TYPE_BASE}/{code}"))
            .with_code(code);

        if let DomainError::Validation { violations } = e {
            problem = problem.with_errors(violations);
        }
        problem
    }
}
