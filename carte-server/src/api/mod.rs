//! Client for the SOTRACO stops/routes API.
//!
//! The API serves two collections from a local server:
//! - `GET /api/arrets` → `{ success, data: { arrets: [...] } }`
//! - `GET /api/lignes` → `{ success, data: { lignes: [...] } }`
//!
//! [`ApiClient`] talks HTTP; [`MockApiClient`] serves the same envelopes
//! from JSON files. Both implement [`NetworkSource`], which is all the map
//! widget depends on.

mod client;
mod error;
mod mock;
mod types;

use futures::future::BoxFuture;

pub use client::{ApiClient, ApiConfig, DEFAULT_BASE_URL, ROUTES_PATH, STOPS_PATH};
pub use error::ApiError;
pub use mock::MockApiClient;
pub use types::{Envelope, RoutesData, StopsData};

/// A source of stop and route collections.
pub trait NetworkSource: Send + Sync {
    /// Fetch the stops envelope.
    fn fetch_stops(&self) -> BoxFuture<'_, Result<Envelope<StopsData>, ApiError>>;

    /// Fetch the routes envelope.
    fn fetch_routes(&self) -> BoxFuture<'_, Result<Envelope<RoutesData>, ApiError>>;
}
