//! Backend trait and the value types it exchanges.

use serde::{Deserialize, Serialize};

use crate::domain::Coordinates;

/// OpenStreetMap tile URL template.
pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution required by the OpenStreetMap tile servers.
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// A point on the map, named the way Leaflet names it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for LatLng {
    fn from(c: Coordinates) -> Self {
        Self::new(c.latitude, c.longitude)
    }
}

/// Handle to an overlay layer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LayerId(pub u32);

/// Handle to a marker owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerId(pub u32);

/// Circle marker styling, serialized with Leaflet's option names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: String,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl MarkerStyle {
    /// Stop marker style: white outline around a `fill_color` disc.
    pub fn filled(fill_color: impl Into<String>) -> Self {
        Self {
            radius: 8.0,
            fill_color: fill_color.into(),
            color: "#ffffff".to_string(),
            weight: 2.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

/// Background tile layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

/// Errors raised by a map backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The container to bind the viewport to is unusable
    #[error("invalid map container {0:?}")]
    InvalidContainer(String),

    /// An operation needed a viewport that was never created
    #[error("no viewport has been created")]
    NoViewport,
}

/// Rendering primitives the map widget relies on.
///
/// Operations on unknown layer or marker handles are no-ops; the widget only
/// passes handles it obtained from the same backend.
pub trait MapBackend {
    /// Create the viewport inside `container_id`.
    fn create_viewport(&mut self, container_id: &str, center: LatLng, zoom: u8)
    -> Result<(), MapError>;

    /// Add a background tile layer to the viewport.
    fn add_tile_layer(&mut self, tiles: &TileLayer) -> Result<(), MapError>;

    /// Create an empty layer group attached to the viewport.
    fn create_layer_group(&mut self) -> Result<LayerId, MapError>;

    /// Create a circle marker that is not yet part of any layer.
    fn create_circle_marker(&mut self, at: LatLng, style: &MarkerStyle) -> MarkerId;

    /// Move and restyle an existing marker.
    fn update_marker(&mut self, marker: MarkerId, at: LatLng, style: &MarkerStyle);

    /// Bind popup markup to a marker, replacing any previous popup.
    fn bind_popup(&mut self, marker: MarkerId, html: String);

    /// Destroy a marker, removing it from every layer.
    fn remove_marker(&mut self, marker: MarkerId);

    /// Add a marker to a layer. Adding a member again has no effect.
    fn add_to_layer(&mut self, layer: LayerId, marker: MarkerId);

    /// Remove every marker from a layer without destroying them.
    fn clear_layer(&mut self, layer: LayerId);

    /// Recenter the viewport.
    fn set_view(&mut self, center: LatLng, zoom: u8);

    /// Current viewport center, if a viewport exists.
    fn center(&self) -> Option<LatLng>;

    /// Current zoom level, if a viewport exists.
    fn zoom(&self) -> Option<u8>;

    /// Open a marker's popup. Markers outside every layer cannot show one.
    fn open_popup(&mut self, marker: MarkerId);

    /// Close whichever popup is open.
    fn close_popup(&mut self);
}
