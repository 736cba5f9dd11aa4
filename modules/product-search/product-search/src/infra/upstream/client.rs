//! reqwest-backed catalog gateway.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use product_search_sdk::{CatalogSearchResponse, SearchQuery};
use tracing::{Instrument, info_span, instrument};
use url::Url;

use crate::domain::error::DomainError;
use crate::domain::ports::CatalogGateway;
use crate::domain::signer::SignedHeaders;

/// Issues signed GET requests to the upstream search endpoint.
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCatalogClient {
    /// Build a client with bounded connect and total timeouts.
    ///
    /// # Errors
    /// Fails when the TLS backend cannot be initialised.
    pub fn new(
        base_url: Url,
        request_timeout: Duration,
        connect_timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn transport_error(e: &reqwest::Error) -> DomainError {
        if e.is_timeout() {
            DomainError::upstream(None, "upstream request timed out")
        } else if e.is_connect() {
            DomainError::upstream(None, format!("could not connect to upstream: {e}"))
        } else {
            DomainError::upstream(None, format!("upstream request failed: {e}"))
        }
    }
}

#[async_trait]
impl CatalogGateway for HttpCatalogClient {
    #[instrument(skip_all, fields(upstream = %self.base_url.host_str().unwrap_or_default()))]
    async fn search(
        &self,
        query: &SearchQuery,
        headers: &SignedHeaders,
    ) -> Result<CatalogSearchResponse, DomainError> {
        let start = Instant::now();

        let mut builder = self.client.get(self.base_url.clone()).query(query);
        for (name, value) in headers.header_pairs() {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .instrument(info_span!("http_request"))
            .await
            .map_err(|e| Self::transport_error(&e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            status_code = status.as_u16(),
            duration_ms,
            body_size = body.len(),
            "upstream request completed"
        );

        if !status.is_success() {
            return Err(DomainError::upstream(
                Some(status.as_u16()),
                format!("upstream responded with HTTP {}", status.as_u16()),
            ));
        }

        serde_json::from_slice::<CatalogSearchResponse>(&body).map_err(|e| {
            DomainError::upstream(
                Some(status.as_u16()),
                format!("unexpected upstream payload: {e}"),
            )
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn headers() -> SignedHeaders {
        SignedHeaders {
            consumer_id: "consumer-123".to_owned(),
            timestamp_ms: 1_700_000_000_000,
            key_version: "1".to_owned(),
            signature: "c2lnbmF0dXJl".to_owned(),
        }
    }

    fn client_for(server: &MockServer, timeout: Duration) -> HttpCatalogClient {
        let url = Url::parse(&server.url("/v2/search")).unwrap();
        HttpCatalogClient::new(url, timeout, Duration::from_secs(1), "catalog-proxy/test").unwrap()
    }

    #[tokio::test]
    async fn sends_signed_headers_and_query_string() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/search")
                .query_param("query", "laptop")
                .query_param("numItems", "2")
                .query_param("facet.filter", "brand:Acme")
                .header("wm_consumer.id", "consumer-123")
                .header("wm_consumer.intimestamp", "1700000000000")
                .header("wm_sec.key_version", "1")
                .header("wm_sec.auth_signature", "c2lnbmF0dXJl");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "query": "laptop",
                    "totalResults": 2,
                    "start": 1,
                    "numItems": 2,
                    "items": [
                        {"itemId": 1, "name": "A", "salePrice": 10},
                        {"itemId": 2, "name": "B", "salePrice": 20}
                    ]
                }));
        });

        let mut query = SearchQuery::new("laptop").with_num_items(2);
        query.facet_filter = Some("brand:Acme".to_owned());

        let client = client_for(&server, Duration::from_secs(5));
        let response = client.search(&query, &headers()).await.unwrap();

        assert_eq!(response.total_results, 2);
        assert_eq!(response.items[1].name.as_deref(), Some("B"));
        mock.assert();
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error_without_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v2/search");
            then.status(401).body("invalid signature for consumer consumer-123");
        });

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .search(&SearchQuery::new("laptop"), &headers())
            .await
            .unwrap_err();

        match err {
            DomainError::Upstream { status, message } => {
                assert_eq!(status, Some(401));
                assert!(!message.contains("invalid signature"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn product_without_price_is_passed_through() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/search");
            then.status(200).json_body(json!({
                "query": "laptop",
                "totalResults": 1,
                "start": 1,
                "numItems": 1,
                "items": [{"itemId": 1, "name": "A", "productUrl": "https://x/p/1"}]
            }));
        });

        let client = client_for(&server, Duration::from_secs(5));
        let response = client
            .search(&SearchQuery::new("laptop"), &headers())
            .await
            .unwrap();
        assert!(response.items[0].sale_price.is_none());
        assert_eq!(response.items[0].extra["productUrl"], "https://x/p/1");
    }

    #[tokio::test]
    async fn envelope_without_items_is_a_contract_violation() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/search");
            then.status(200).json_body(json!({"query": "laptop", "totalResults": 1}));
        });

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .search(&SearchQuery::new("laptop"), &headers())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Upstream { status: Some(200), .. }));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/search");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({}));
        });

        let client = client_for(&server, Duration::from_millis(50));
        let err = client
            .search(&SearchQuery::new("laptop"), &headers())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Upstream { status: None, .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_upstream_error() {
        let url = Url::parse("http://127.0.0.1:9/v2/search").unwrap();
        let client =
            HttpCatalogClient::new(url, Duration::from_secs(2), Duration::from_secs(1), "t")
                .unwrap();
        let err = client
            .search(&SearchQuery::new("laptop"), &headers())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Upstream { status: None, .. }));
    }
}
