//! Product Search SDK
//!
//! This crate provides the public API contract for the product-search module:
//! the validated search query, the catalog payload returned by the upstream
//! product API, and transport-agnostic errors.
//!
//! ## API Trait
//!
//! - `ProductSearchApi` - search operations exposed to other Rust code
//!
//! ## Usage
//!
//! ```ignore
//! use product_search_sdk::{ProductSearchApi, SearchQuery};
//!
//! let query = SearchQuery::new("laptop").with_num_items(2);
//! let summaries = client.product_summaries(&query).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;

// API trait
pub use api::ProductSearchApi;

// Error types
pub use error::{FieldViolation, ProductSearchError};

// Models
pub use models::{
    CatalogProduct, CatalogSearchResponse, ImageEntity, IntBounds, MarketplacePrice,
    NUM_ITEMS_BOUNDS, ProductWarning, SIMPLE_DEFAULT_NUM_ITEMS, SIMPLE_DEFAULT_START,
    START_BOUNDS, SearchQuery, SortOrder,
};
