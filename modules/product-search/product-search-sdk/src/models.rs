//! Search query and catalog payload models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::FieldViolation;

/// Default page size used by the simplified search endpoint.
pub const SIMPLE_DEFAULT_NUM_ITEMS: u32 = 24;
/// Default start offset used by the simplified search endpoint.
pub const SIMPLE_DEFAULT_START: u32 = 1;

/// Inclusive integer range a numeric search parameter must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntBounds {
    pub min: i64,
    pub max: Option<i64>,
}

/// `numItems` accepts 1 through 25.
pub const NUM_ITEMS_BOUNDS: IntBounds = IntBounds {
    min: 1,
    max: Some(25),
};

/// `start` is 1-based.
pub const START_BOUNDS: IntBounds = IntBounds {
    min: 1,
    max: Some(4_294_967_295),
};

impl IntBounds {
    /// Check `value` against the range, naming `field` in the violation.
    ///
    /// # Errors
    /// Returns a [`FieldViolation`] when `value` is outside the range.
    pub fn check(&self, field: &str, value: i64) -> Result<(), FieldViolation> {
        if value < self.min {
            return Err(FieldViolation::new(
                field,
                format!("must be greater than or equal to {}", self.min),
                "too_small",
            ));
        }
        if let Some(max) = self.max
            && value > max
        {
            return Err(FieldViolation::new(
                field,
                format!("must be less than or equal to {max}"),
                "too_big",
            ));
        }
        Ok(())
    }
}

/// Sort direction accepted by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parse the wire form (`asc` / `desc`), case-sensitive.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Validated set of search parameters forwarded to the upstream catalog.
///
/// Serializes to the upstream query-string form: absent parameters are
/// omitted and dotted facet names are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_items: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
    #[serde(rename = "facet.filter", skip_serializing_if = "Option::is_none")]
    pub facet_filter: Option<String>,
    #[serde(rename = "facet.range", skip_serializing_if = "Option::is_none")]
    pub facet_range: Option<String>,
}

impl SearchQuery {
    /// Query with only the search text set.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sort: None,
            order: None,
            num_items: None,
            start: None,
            response_group: None,
            facet: None,
            facet_filter: None,
            facet_range: None,
        }
    }

    /// Query shaped like the simplified endpoint: page size and offset are
    /// always sent, falling back to 24 and 1.
    #[must_use]
    pub fn simple(product: impl Into<String>, num_items: Option<u32>, start: Option<u32>) -> Self {
        Self::new(product)
            .with_num_items(num_items.unwrap_or(SIMPLE_DEFAULT_NUM_ITEMS))
            .with_start(start.unwrap_or(SIMPLE_DEFAULT_START))
    }

    #[must_use]
    pub fn with_num_items(mut self, num_items: u32) -> Self {
        self.num_items = Some(num_items);
        self
    }

    #[must_use]
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>, order: Option<SortOrder>) -> Self {
        self.sort = Some(sort.into());
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_response_group(mut self, group: impl Into<String>) -> Self {
        self.response_group = Some(group.into());
        self
    }

    /// Check every constraint and report all violations at once.
    ///
    /// # Errors
    /// Returns the list of violated constraints when the query is invalid.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        self.validate_as("query")
    }

    /// Same as [`Self::validate`], reporting the search text under `text_field`.
    ///
    /// # Errors
    /// Returns the list of violated constraints when the query is invalid.
    pub fn validate_as(&self, text_field: &str) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        if self.query.is_empty() {
            violations.push(FieldViolation::new(
                text_field,
                "must be a non-empty string",
                "too_small",
            ));
        }
        if let Some(n) = self.num_items
            && let Err(v) = NUM_ITEMS_BOUNDS.check("numItems", i64::from(n))
        {
            violations.push(v);
        }
        if let Some(s) = self.start
            && let Err(v) = START_BOUNDS.check("start", i64::from(s))
        {
            violations.push(v);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Image set attached to a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ImageEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    /// Fields not modeled above, passed through unchanged.
    #[serde(flatten)]
    #[cfg_attr(feature = "utoipa", schema(value_type = Object))]
    pub extra: Map<String, Value>,
}

/// Regulatory or safety notice attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct ProductWarning {
    pub attribute: String,
    pub display_name: String,
    #[serde(default)]
    pub value: Vec<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "utoipa", schema(value_type = Object))]
    pub extra: Map<String, Value>,
}

/// Best offer from a third-party marketplace seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MarketplacePrice {
    #[cfg_attr(feature = "utoipa", schema(value_type = f64))]
    pub price: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<f64>))]
    pub standard_ship_rate: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<f64>))]
    pub two_three_day_shipping_rate: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_online: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearance: Option<bool>,
    #[serde(flatten)]
    #[cfg_attr(feature = "utoipa", schema(value_type = Object))]
    pub extra: Map<String, Value>,
}

/// One product record as returned by the upstream catalog.
///
/// Only `itemId` is required. Numbers keep their upstream form and fields
/// without a typed counterpart land in `extra`, so re-serializing a record
/// reproduces what the upstream sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub item_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_item_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<f64>))]
    pub sale_price: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<f64>))]
    pub msrp: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_entities: Vec<ImageEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_tracking_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_add_to_cart_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ninety_seven_cent_shipping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<f64>))]
    pub standard_ship_rate: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_shipping_over_35_dollars: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_two_day_shipping_eligible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_to_store: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_ship_to_store: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_reviews: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_order: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freight: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_online: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items_in_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<Object>))]
    pub attributes: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<Object>))]
    pub gift_options: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<ProductWarning>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_marketplace_price: Option<MarketplacePrice>,
    /// Fields not modeled above, passed through unchanged.
    #[serde(flatten)]
    #[cfg_attr(feature = "utoipa", schema(value_type = Object))]
    pub extra: Map<String, Value>,
}

impl CatalogProduct {
    /// One-line summary: `"<name> - <salePrice>"`, or `None` when the
    /// upstream omitted either field.
    ///
    /// The price uses the shortest decimal form, so `10.0` renders as `10`
    /// and `12.5` as `12.5`.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        let price = self.sale_price.as_ref()?;
        let rendered = price
            .as_f64()
            .map_or_else(|| price.to_string(), |p| p.to_string());
        Some(format!("{name} - {rendered}"))
    }
}

/// Upstream search result envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CatalogSearchResponse {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_group: Option<String>,
    pub total_results: u64,
    pub start: u32,
    pub num_items: u32,
    pub items: Vec<CatalogProduct>,
    /// Envelope fields such as `facets`, passed through unchanged.
    #[serde(flatten)]
    #[cfg_attr(feature = "utoipa", schema(value_type = Object))]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(name: &str, price: f64) -> CatalogProduct {
        serde_json::from_value(json!({
            "itemId": 1,
            "name": name,
            "salePrice": price
        }))
        .unwrap()
    }

    #[test]
    fn summary_uses_shortest_price_form() {
        assert_eq!(product("A", 10.0).summary().as_deref(), Some("A - 10"));
        assert_eq!(product("B", 12.5).summary().as_deref(), Some("B - 12.5"));
        assert_eq!(
            product("Laptop X", 499.99).summary().as_deref(),
            Some("Laptop X - 499.99")
        );
        let integral: CatalogProduct =
            serde_json::from_value(json!({"itemId": 3, "name": "C", "salePrice": 7})).unwrap();
        assert_eq!(integral.summary().as_deref(), Some("C - 7"));
    }

    #[test]
    fn query_string_omits_absent_parameters() {
        let query = SearchQuery::new("laptop").with_num_items(2);
        let encoded = serde_urlencoded::to_string(&query).unwrap();
        assert_eq!(encoded, "query=laptop&numItems=2");
    }

    #[test]
    fn query_string_keeps_dotted_facet_names() {
        let mut query = SearchQuery::new("tv");
        query.facet = Some("on".to_owned());
        query.facet_filter = Some("brand:Sony".to_owned());
        query.facet_range = Some("price:[100 TO 200]".to_owned());
        let encoded = serde_urlencoded::to_string(&query).unwrap();
        assert!(encoded.contains("facet=on"));
        assert!(encoded.contains("facet.filter=brand%3ASony"));
        assert!(encoded.contains("facet.range=price%3A%5B100+TO+200%5D"));
    }

    #[test]
    fn simple_query_sends_defaults() {
        let query = SearchQuery::simple("shoes", None, None);
        assert_eq!(query.num_items, Some(24));
        assert_eq!(query.start, Some(1));
        let encoded = serde_urlencoded::to_string(&query).unwrap();
        assert_eq!(encoded, "query=shoes&numItems=24&start=1");
    }

    #[test]
    fn validate_collects_every_violation() {
        let query = SearchQuery {
            num_items: Some(26),
            start: Some(0),
            ..SearchQuery::new("")
        };
        let violations = query.validate().unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["query", "numItems", "start"]);
        assert_eq!(violations[1].code.as_deref(), Some("too_big"));
        assert_eq!(violations[2].code.as_deref(), Some("too_small"));
    }

    #[test]
    fn validate_accepts_boundaries() {
        assert!(SearchQuery::new("x").with_num_items(1).validate().is_ok());
        assert!(SearchQuery::new("x").with_num_items(25).validate().is_ok());
        assert!(SearchQuery::new("x").with_start(1).validate().is_ok());
    }

    #[test]
    fn product_without_price_decodes_but_has_no_summary() {
        let missing_price: CatalogProduct = serde_json::from_value(json!({
            "itemId": 1,
            "name": "No price"
        }))
        .unwrap();
        assert!(missing_price.sale_price.is_none());
        assert!(missing_price.summary().is_none());

        let missing_name: CatalogProduct =
            serde_json::from_value(json!({"itemId": 2, "salePrice": 5})).unwrap();
        assert!(missing_name.summary().is_none());
    }

    #[test]
    fn unmodeled_fields_survive_a_round_trip() {
        let raw = json!({
            "query": "laptop",
            "totalResults": 1,
            "start": 1,
            "numItems": 1,
            "facets": [{"name": "brand", "facetValues": []}],
            "items": [{
                "itemId": 1,
                "name": "A",
                "salePrice": 10,
                "productUrl": "https://catalog.example.com/p/1",
                "customerRatingImage": "r.png",
                "imageEntities": [{"thumbnailImage": "t.jpg", "width": 100}],
                "bestMarketplacePrice": {"price": 9, "sellerId": "s-1"}
            }]
        });
        let parsed: CatalogSearchResponse = serde_json::from_value(raw.clone()).unwrap();
        assert!(parsed.extra.contains_key("facets"));
        assert_eq!(
            parsed.items[0].extra["productUrl"],
            "https://catalog.example.com/p/1"
        );
        assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }

    #[test]
    fn product_passes_through_optional_fields() {
        let raw = json!({
            "itemId": 42,
            "name": "Kettle",
            "salePrice": 19.99,
            "brandName": "Acme",
            "freeShippingOver35Dollars": true,
            "imageEntities": [{"thumbnailImage": "t.jpg", "entityType": "PRIMARY"}],
            "warnings": [{"Attribute": "prop65", "DisplayName": "Warning", "Value": ["x"]}],
            "bestMarketplacePrice": {"price": 18.5, "availableOnline": true}
        });
        let parsed: CatalogProduct = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.brand_name.as_deref(), Some("Acme"));
        assert_eq!(parsed.free_shipping_over_35_dollars, Some(true));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }

    #[test]
    fn sort_order_parses_wire_form() {
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("ASC"), None);
    }
}
