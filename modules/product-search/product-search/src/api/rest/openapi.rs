//! OpenAPI document for the search surface.

use product_search_sdk::{
    CatalogProduct, CatalogSearchResponse, FieldViolation, ImageEntity, MarketplacePrice,
    ProductWarning, SortOrder,
};
use utoipa::OpenApi;

use super::dto::HealthResponse;
use super::handlers;
use super::problem::Problem;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog Proxy",
        description = "Signed product search against the upstream catalog API"
    ),
    paths(
        handlers::search_summaries,
        handlers::search_products,
        handlers::search_raw,
        handlers::search_simple,
        handlers::health,
    ),
    components(schemas(
        CatalogSearchResponse,
        CatalogProduct,
        ImageEntity,
        ProductWarning,
        MarketplacePrice,
        SortOrder,
        Problem,
        FieldViolation,
        HealthResponse,
    )),
    tags(
        (name = "search", description = "Product search"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use product_search_sdk::{NUM_ITEMS_BOUNDS, START_BOUNDS};

    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for path in ["/search", "/search/full", "/search/dev", "/search/simple", "/health"] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }

    fn parameter(doc: &serde_json::Value, path: &str, name: &str) -> serde_json::Value {
        doc["paths"][path]["get"]["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["name"] == name)
            .cloned()
            .unwrap()
    }

    #[test]
    fn documented_bounds_match_validation() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        for path in ["/search", "/search/simple"] {
            let num_items = parameter(&doc, path, "numItems");
            assert_eq!(
                num_items["schema"]["minimum"].as_i64(),
                Some(NUM_ITEMS_BOUNDS.min),
                "{path}"
            );
            assert_eq!(
                num_items["schema"]["maximum"].as_i64(),
                NUM_ITEMS_BOUNDS.max,
                "{path}"
            );

            let start = parameter(&doc, path, "start");
            assert_eq!(
                start["schema"]["minimum"].as_i64(),
                Some(START_BOUNDS.min),
                "{path}"
            );
        }
    }

    #[test]
    fn search_parameters_keep_wire_names() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let names: Vec<&str> = doc["paths"]["/search"]["get"]["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["name"].as_str())
            .collect();
        assert!(names.contains(&"numItems"));
        assert!(names.contains(&"facet.filter"));
        assert!(names.contains(&"facet.range"));
    }
}
