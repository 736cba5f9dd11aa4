//! HTTP stack wrapped around the product search router.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderName, Request, StatusCode};
use product_search::{ProductSearchModule, REQUEST_ID_HEADER};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Layers, outermost first: `SetRequestId` → `PropagateRequestId` → Trace → Timeout.
pub fn build_router(module: &ProductSearchModule, server: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    module
        .router(server.enable_docs)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            Duration::from_millis(server.request_timeout_ms),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                let rid = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    request_id = %rid,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::body::to_bytes;
    use product_search::ProductSearchConfig;
    use serde_json::Value;
    use tower::ServiceExt as _;

    use super::*;

    fn router() -> Router {
        let cfg = ProductSearchConfig {
            upstream_url: Some("http://127.0.0.1:9/v2/search".to_owned()),
            consumer_id: Some("consumer-123".to_owned()),
            private_key_path: Some("/nonexistent/key.pem".into()),
            ..ProductSearchConfig::default()
        };
        let module = ProductSearchModule::from_config(&cfg).unwrap();
        build_router(&module, &ServerConfig::default())
    }

    async fn rejected(request: Request<Body>) -> (String, Value) {
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let header = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .expect("request id header")
            .to_str()
            .unwrap()
            .to_owned();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (header, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn generated_request_id_reaches_problem_body() {
        let request = Request::builder()
            .uri("/search?query=")
            .body(Body::empty())
            .unwrap();

        let (header, body) = rejected(request).await;

        assert!(!header.is_empty());
        assert_eq!(body["request_id"], header.as_str());
    }

    #[tokio::test]
    async fn caller_request_id_is_preserved() {
        let request = Request::builder()
            .uri("/search/full?query=x&numItems=99")
            .header(REQUEST_ID_HEADER, "caller-7")
            .body(Body::empty())
            .unwrap();

        let (header, body) = rejected(request).await;

        assert_eq!(header, "caller-7");
        assert_eq!(body["request_id"], "caller-7");
    }
}
