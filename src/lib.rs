//! Cinema - a lightweight movie catalog browser.
//!
//! This crate provides the data-access core of a movie catalog client
//! with clean architecture: a remote catalog client, a TTL response
//! cache, a durable bookmark store, a two-tier image cache, and the
//! paginated list controllers driving them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the list controllers.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "cinema";
