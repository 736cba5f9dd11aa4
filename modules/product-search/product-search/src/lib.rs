// Clippy allows for the module crate
#![allow(clippy::doc_markdown)] // Header names and vendor terms without backticks
#![allow(clippy::must_use_candidate)]

//! Product Search Module Implementation
//!
//! Accepts product-search requests, signs them for the upstream catalog API
//! and returns either a summarized or a full response.
//!
//! ## Architecture
//!
//! ```text
//!        HTTP caller              Rust caller
//!             │                        │
//!             ▼                        ▼ ProductSearchApi
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │ REST (/search/...)   │  │ ProductSearchLocal-  │
//! │ query parsing        │  │ Client               │
//! └──────────┬───────────┘  └──────────┬───────────┘
//!            └───────────┬─────────────┘
//!                        ▼
//!          ┌──────────────────────────┐
//!          │ Service                  │
//!          │ validate → sign → fetch  │
//!          └──────┬─────────────┬─────┘
//!                 ▼             ▼
//!          RequestSigner   HttpCatalogClient ──► upstream catalog
//!                 │
//!                 ▼
//!       FilePrivateKeySource (PEM, cached)
//! ```
//!
//! ## Usage
//!
//! The public API is defined in `product-search-sdk` and re-exported here.

// === PUBLIC API (from SDK) ===
pub use product_search_sdk::{
    CatalogProduct, CatalogSearchResponse, FieldViolation, ProductSearchApi, ProductSearchError,
    SearchQuery, SortOrder,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::{ModuleInitError, ProductSearchModule};

pub mod config;
pub use config::{ConfigError, ProductSearchConfig};

pub use api::rest::handlers::REQUEST_ID_HEADER;

// === LOCAL CLIENT ===
pub mod local_client;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
