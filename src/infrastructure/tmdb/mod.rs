//! Catalog API adapters: HTTP client, endpoints, and the catalog service.

mod client;
pub mod endpoints;
mod service;

pub use client::{RequestError, TmdbClient};
pub use service::MovieCatalogService;
