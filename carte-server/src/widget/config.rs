//! Map widget configuration.

use crate::map::{LatLng, TileLayer};

/// Configuration for a [`MapWidget`](super::MapWidget).
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Initial viewport center.
    pub center: LatLng,

    /// Initial zoom level.
    pub zoom: u8,

    /// Zoom level used when centering on a single stop.
    pub focus_zoom: u8,

    /// Background tiles.
    pub tiles: TileLayer,
}

impl WidgetConfig {
    /// Override the initial center.
    pub fn with_center(mut self, center: LatLng) -> Self {
        self.center = center;
        self
    }

    /// Override the initial zoom.
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            // Ouagadougou
            center: LatLng::new(12.3686, -1.5275),
            zoom: 12,
            focus_zoom: 15,
            tiles: TileLayer::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = WidgetConfig::default();

        assert_eq!(config.center, LatLng::new(12.3686, -1.5275));
        assert_eq!(config.zoom, 12);
        assert_eq!(config.focus_zoom, 15);
        assert_eq!(config.tiles, TileLayer::default());
    }

    #[test]
    fn overrides_keep_other_fields() {
        let config = WidgetConfig::default()
            .with_center(LatLng::new(11.18, -4.29))
            .with_zoom(13);

        assert_eq!(config.center, LatLng::new(11.18, -4.29));
        assert_eq!(config.zoom, 13);
        assert_eq!(config.focus_zoom, 15);
    }
}
