//! Outbound adapter for the upstream catalog API.

mod client;

pub use client::HttpCatalogClient;
