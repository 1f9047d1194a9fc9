//! Domain layer with core business entities and port definitions.

/// Deep link parsing and creation.
pub mod deep_link;
/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{ListState, Movie, MovieId, MoviePage, PAGE_SIZE};
pub use errors::CatalogError;
pub use ports::{BookmarkStorePort, CatalogPort, ResponseCachePort};
