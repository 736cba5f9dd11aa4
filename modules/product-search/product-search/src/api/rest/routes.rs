//! REST route registration for product search.

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Json, Router};
use utoipa::OpenApi;

use super::handlers;
use super::openapi::ApiDoc;
use crate::domain::service::Service;

pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Build the search router. The OpenAPI document is mounted only when
/// `enable_docs` is set.
pub fn register_routes(service: Arc<Service>, enable_docs: bool) -> Router {
    let mut router = Router::new()
        .route("/search", get(handlers::search_summaries))
        .route("/search/full", get(handlers::search_products))
        .route("/search/dev", get(handlers::search_raw))
        .route("/search/simple", get(handlers::search_simple))
        .route("/health", get(handlers::health));

    if enable_docs {
        let doc = ApiDoc::openapi();
        router = router.route(OPENAPI_PATH, get(move || async move { Json(doc) }));
    }

    router.layer(Extension(service))
}
