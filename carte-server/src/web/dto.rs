//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::map::SceneSnapshot;

/// Query of `GET /carte/filtre`.
#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    /// Route id; absent or empty shows every stop
    pub ligne: Option<String>,
}

/// Result of a route filter.
#[derive(Debug, Serialize)]
pub struct FilterResponse {
    /// Number of stop markers left visible
    pub visible: usize,
    pub scene: SceneSnapshot,
}

/// Result of centering on a stop.
#[derive(Debug, Serialize)]
pub struct CenterResponse {
    /// Whether the stop exists
    pub centered: bool,
    pub scene: SceneSnapshot,
}

/// View reported by the browser after a pan or zoom.
#[derive(Debug, Deserialize)]
pub struct ViewUpdate {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
