use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, RawQuery};
use axum::http::{HeaderMap, Uri};
use product_search_sdk::{CatalogProduct, CatalogSearchResponse, FieldViolation, SearchQuery};

use super::dto::{self, HealthResponse, SearchParams, SimpleSearchParams};
use super::problem::Problem;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

type ApiResult<T> = Result<Json<T>, Problem>;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Where a failure happened, for the problem body.
struct RequestContext {
    path: String,
    request_id: Option<String>,
}

impl RequestContext {
    fn new(uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            path: uri.path().to_owned(),
            request_id: headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
        }
    }

    fn problem(&self, e: DomainError) -> Problem {
        Problem::from(e)
            .with_instance(self.path.clone())
            .with_request_id(self.request_id.clone())
    }

    fn parsed(
        &self,
        result: Result<SearchQuery, Vec<FieldViolation>>,
    ) -> Result<SearchQuery, Problem> {
        result.map_err(|violations| self.problem(DomainError::validation(violations)))
    }
}

/// Search and return `"<name> - <salePrice>"` per product.
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    params(SearchParams),
    responses(
        (status = 200, description = "One summary line per product", body = Vec<String>),
        (status = 400, description = "Invalid parameters", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Signing or upstream failure", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn search_summaries(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> ApiResult<Vec<String>> {
    let ctx = RequestContext::new(&uri, &headers);
    let query = ctx.parsed(dto::parse_search_query(raw.as_deref()))?;
    let summaries = svc
        .product_summaries(&query)
        .await
        .map_err(|e| ctx.problem(e))?;
    Ok(Json(summaries))
}

/// Search and return the full product records.
#[utoipa::path(
    get,
    path = "/search/full",
    tag = "search",
    params(SearchParams),
    responses(
        (status = 200, description = "Product records in upstream order", body = Vec<CatalogProduct>),
        (status = 400, description = "Invalid parameters", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Signing or upstream failure", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn search_products(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> ApiResult<Vec<CatalogProduct>> {
    let ctx = RequestContext::new(&uri, &headers);
    let query = ctx.parsed(dto::parse_search_query(raw.as_deref()))?;
    let products = svc
        .products(&query)
        .await
        .map_err(|e| ctx.problem(e))?;
    Ok(Json(products))
}

/// Search and return the upstream envelope including pagination metadata.
#[utoipa::path(
    get,
    path = "/search/dev",
    tag = "search",
    params(SearchParams),
    responses(
        (status = 200, description = "Upstream search response", body = CatalogSearchResponse),
        (status = 400, description = "Invalid parameters", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Signing or upstream failure", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn search_raw(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> ApiResult<CatalogSearchResponse> {
    let ctx = RequestContext::new(&uri, &headers);
    let query = ctx.parsed(dto::parse_search_query(raw.as_deref()))?;
    let response = svc.search(&query).await.map_err(|e| ctx.problem(e))?;
    Ok(Json(response))
}

/// Simplified search by product text with default paging (24 items from 1).
#[utoipa::path(
    get,
    path = "/search/simple",
    tag = "search",
    params(SimpleSearchParams),
    responses(
        (status = 200, description = "One summary line per product", body = Vec<String>),
        (status = 400, description = "Invalid parameters", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Signing or upstream failure", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn search_simple(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> ApiResult<Vec<String>> {
    let ctx = RequestContext::new(&uri, &headers);
    let query = ctx.parsed(dto::parse_simple_query(raw.as_deref()))?;
    let summaries = svc
        .product_summaries(&query)
        .await
        .map_err(|e| ctx.problem(e))?;
    Ok(Json(summaries))
}

/// Liveness probe; never calls the upstream.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[allow(clippy::unused_async)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
    })
}
