//! Query-string parsing and OpenAPI parameter descriptions.
//!
//! Parameters arrive as strings. Numeric ones are coerced to integers, empty
//! optional values count as absent, unknown names are ignored and a name
//! given more than once is rejected.

use std::collections::HashMap;

use product_search_sdk::{
    FieldViolation, IntBounds, NUM_ITEMS_BOUNDS, START_BOUNDS, SearchQuery, SortOrder,
};
use serde::Serialize;
use utoipa::{IntoParams, ToSchema};

/// Query parameters of `/search`, `/search/full` and `/search/dev`.
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text search.
    #[param(min_length = 1)]
    pub query: String,
    /// Sort field, e.g. `price` or `relevance`.
    pub sort: Option<String>,
    /// Sort direction.
    #[param(inline)]
    pub order: Option<SortOrder>,
    /// Page size.
    #[param(rename = "numItems", minimum = 1, maximum = 25)]
    pub num_items: Option<u32>,
    /// 1-based offset of the first item.
    #[param(minimum = 1)]
    pub start: Option<u32>,
    /// Level of detail returned per item.
    #[param(rename = "responseGroup")]
    pub response_group: Option<String>,
    /// Enable faceted results (`on`).
    pub facet: Option<String>,
    /// Facet filter, e.g. `brand:Acme`.
    #[param(rename = "facet.filter")]
    pub facet_filter: Option<String>,
    /// Facet range, e.g. `price:[10 TO 20]`.
    #[param(rename = "facet.range")]
    pub facet_range: Option<String>,
}

/// Query parameters of `/search/simple`.
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SimpleSearchParams {
    /// Product text to search for.
    #[param(min_length = 1)]
    pub product: String,
    /// Page size, defaults to 24.
    #[param(rename = "numItems", minimum = 1, maximum = 25)]
    pub num_items: Option<u32>,
    /// 1-based offset, defaults to 1.
    #[param(minimum = 1)]
    pub start: Option<u32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

struct RawParams(HashMap<String, String>);

impl RawParams {
    fn parse(raw: Option<&str>) -> Result<Self, Vec<FieldViolation>> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw.unwrap_or_default())
            .map_err(|e| {
                vec![FieldViolation::new(
                    "querystring",
                    format!("malformed query string: {e}"),
                    "invalid_string",
                )]
            })?;

        let mut map = HashMap::with_capacity(pairs.len());
        let mut violations = Vec::new();
        for (name, value) in pairs {
            if map.contains_key(&name) {
                if !violations.iter().any(|v: &FieldViolation| v.field == name) {
                    violations.push(FieldViolation::new(
                        name.clone(),
                        "must be given at most once",
                        "duplicate",
                    ));
                }
                continue;
            }
            map.insert(name, value);
        }

        if violations.is_empty() {
            Ok(Self(map))
        } else {
            Err(violations)
        }
    }

    /// Present and non-empty value.
    fn text(&self, name: &str) -> Option<String> {
        self.0
            .get(name)
            .filter(|v| !v.is_empty())
            .map(ToOwned::to_owned)
    }

    fn required_text(&self, name: &str, violations: &mut Vec<FieldViolation>) -> String {
        match self.0.get(name) {
            None => {
                violations.push(FieldViolation::new(name, "is required", "required"));
                String::new()
            }
            Some(v) if v.is_empty() => {
                violations.push(FieldViolation::new(
                    name,
                    "must be a non-empty string",
                    "too_small",
                ));
                String::new()
            }
            Some(v) => v.clone(),
        }
    }

    fn bounded_int(
        &self,
        name: &str,
        bounds: IntBounds,
        violations: &mut Vec<FieldViolation>,
    ) -> Option<u32> {
        let raw = self.text(name)?;
        match coerce_int(name, &raw, bounds) {
            Ok(v) => Some(v),
            Err(v) => {
                violations.push(v);
                None
            }
        }
    }

    fn order(&self, violations: &mut Vec<FieldViolation>) -> Option<SortOrder> {
        let raw = self.text("order")?;
        let parsed = SortOrder::parse(&raw);
        if parsed.is_none() {
            violations.push(FieldViolation::new(
                "order",
                "must be one of: asc, desc",
                "invalid_enum_value",
            ));
        }
        parsed
    }
}

fn coerce_int(name: &str, raw: &str, bounds: IntBounds) -> Result<u32, FieldViolation> {
    let value: i64 = raw
        .parse()
        .map_err(|_| FieldViolation::new(name, "expected an integer", "invalid_type"))?;
    bounds.check(name, value)?;
    u32::try_from(value).map_err(|_| FieldViolation::new(name, "is out of range", "too_big"))
}

/// Parse the parameters of the full search routes.
///
/// # Errors
/// Every violated constraint, in parameter order.
pub fn parse_search_query(raw: Option<&str>) -> Result<SearchQuery, Vec<FieldViolation>> {
    let params = RawParams::parse(raw)?;
    let mut violations = Vec::new();

    let query = SearchQuery {
        query: params.required_text("query", &mut violations),
        sort: params.text("sort"),
        order: params.order(&mut violations),
        num_items: params.bounded_int("numItems", NUM_ITEMS_BOUNDS, &mut violations),
        start: params.bounded_int("start", START_BOUNDS, &mut violations),
        response_group: params.text("responseGroup"),
        facet: params.text("facet"),
        facet_filter: params.text("facet.filter"),
        facet_range: params.text("facet.range"),
    };

    if violations.is_empty() {
        Ok(query)
    } else {
        Err(violations)
    }
}

/// Parse `/search/simple` parameters, applying the page defaults.
///
/// # Errors
/// Every violated constraint, in parameter order.
pub fn parse_simple_query(raw: Option<&str>) -> Result<SearchQuery, Vec<FieldViolation>> {
    let params = RawParams::parse(raw)?;
    let mut violations = Vec::new();

    let product = params.required_text("product", &mut violations);
    let num_items = params.bounded_int("numItems", NUM_ITEMS_BOUNDS, &mut violations);
    let start = params.bounded_int("start", START_BOUNDS, &mut violations);

    if violations.is_empty() {
        Ok(SearchQuery::simple(product, num_items, start))
    } else {
        Err(violations)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fields(violations: &[FieldViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn parses_every_known_parameter() {
        let q = parse_search_query(Some(
            "query=tv&sort=price&order=desc&numItems=5&start=11&responseGroup=full&facet=on&facet.filter=brand%3ASony&facet.range=price%3A%5B1+TO+2%5D",
        ))
        .unwrap();

        assert_eq!(q.query, "tv");
        assert_eq!(q.sort.as_deref(), Some("price"));
        assert_eq!(q.order, Some(SortOrder::Desc));
        assert_eq!(q.num_items, Some(5));
        assert_eq!(q.start, Some(11));
        assert_eq!(q.response_group.as_deref(), Some("full"));
        assert_eq!(q.facet.as_deref(), Some("on"));
        assert_eq!(q.facet_filter.as_deref(), Some("brand:Sony"));
        assert_eq!(q.facet_range.as_deref(), Some("price:[1 TO 2]"));
    }

    #[test]
    fn empty_optionals_and_unknown_names_are_dropped() {
        let q = parse_search_query(Some("query=tv&sort=&numItems=&debug=1")).unwrap();
        assert_eq!(q, SearchQuery::new("tv"));
    }

    #[test]
    fn missing_and_empty_query_are_distinct_issues() {
        let missing = parse_search_query(None).unwrap_err();
        assert_eq!(missing[0].code.as_deref(), Some("required"));

        let empty = parse_search_query(Some("query=")).unwrap_err();
        assert_eq!(fields(&empty), vec!["query"]);
        assert_eq!(empty[0].message, "must be a non-empty string");
    }

    #[test]
    fn numeric_bounds_and_coercion() {
        for (raw, code) in [
            ("query=x&numItems=26", "too_big"),
            ("query=x&numItems=0", "too_small"),
            ("query=x&start=-1", "too_small"),
            ("query=x&numItems=abc", "invalid_type"),
            ("query=x&numItems=2.5", "invalid_type"),
        ] {
            let violations = parse_search_query(Some(raw)).unwrap_err();
            assert_eq!(violations.len(), 1, "{raw}");
            assert_eq!(violations[0].code.as_deref(), Some(code), "{raw}");
        }
    }

    #[test]
    fn invalid_order_is_reported() {
        let violations = parse_search_query(Some("query=x&order=up")).unwrap_err();
        assert_eq!(fields(&violations), vec!["order"]);
    }

    #[test]
    fn all_violations_are_collected() {
        let violations =
            parse_search_query(Some("query=&numItems=30&start=0&order=sideways")).unwrap_err();
        assert_eq!(
            fields(&violations),
            vec!["query", "order", "numItems", "start"]
        );
    }

    #[test]
    fn repeated_parameter_is_rejected() {
        let violations = parse_search_query(Some("query=a&query=b")).unwrap_err();
        assert_eq!(fields(&violations), vec!["query"]);
        assert_eq!(violations[0].message, "must be given at most once");
    }

    #[test]
    fn simple_query_applies_defaults() {
        let q = parse_simple_query(Some("product=shoes")).unwrap();
        assert_eq!(q.query, "shoes");
        assert_eq!(q.num_items, Some(24));
        assert_eq!(q.start, Some(1));

        let q = parse_simple_query(Some("product=shoes&numItems=3&start=4")).unwrap();
        assert_eq!(q.num_items, Some(3));
        assert_eq!(q.start, Some(4));
    }

    #[test]
    fn simple_query_requires_product() {
        let violations = parse_simple_query(Some("query=shoes")).unwrap_err();
        assert_eq!(fields(&violations), vec!["product"]);
    }
}
