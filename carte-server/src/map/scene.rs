//! In-memory map backend.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::backend::{LatLng, LayerId, MapBackend, MapError, MarkerId, MarkerStyle, TileLayer};

#[derive(Debug, Clone)]
struct Viewport {
    container_id: String,
    center: LatLng,
    zoom: u8,
}

#[derive(Debug, Clone)]
struct Marker {
    position: LatLng,
    style: MarkerStyle,
    popup: Option<String>,
}

/// Map backend that records what would be on screen.
///
/// The browser page polls [`SceneBackend::snapshot`] and mirrors it with
/// Leaflet; tests inspect it directly.
#[derive(Debug, Default)]
pub struct SceneBackend {
    viewport: Option<Viewport>,
    viewports_created: usize,
    tiles: Vec<TileLayer>,
    /// Layer members, indexed by `LayerId`.
    layers: Vec<BTreeSet<MarkerId>>,
    markers: BTreeMap<MarkerId, Marker>,
    next_marker: u32,
    open_popup: Option<MarkerId>,
}

impl SceneBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a viewport was created.
    pub fn viewports_created(&self) -> usize {
        self.viewports_created
    }

    /// Number of layer groups.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Members of a layer, in creation order.
    pub fn layer_members(&self, layer: LayerId) -> Vec<MarkerId> {
        self.layers
            .get(layer.0 as usize)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of live markers, visible or not.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Popup markup bound to a marker.
    pub fn popup(&self, marker: MarkerId) -> Option<&str> {
        self.markers.get(&marker)?.popup.as_deref()
    }

    /// Marker whose popup is open.
    pub fn open_popup_marker(&self) -> Option<MarkerId> {
        self.open_popup
    }

    fn is_visible(&self, marker: MarkerId) -> bool {
        self.layers.iter().any(|members| members.contains(&marker))
    }

    /// Everything a client needs to draw the current map.
    pub fn snapshot(&self) -> SceneSnapshot {
        let visible: BTreeSet<MarkerId> = self.layers.iter().flatten().copied().collect();

        let markers = visible
            .into_iter()
            .filter_map(|id| {
                let marker = self.markers.get(&id)?;
                Some(SceneMarker {
                    id,
                    position: marker.position,
                    style: marker.style.clone(),
                    popup: marker.popup.clone(),
                    popup_open: self.open_popup == Some(id),
                })
            })
            .collect();

        SceneSnapshot {
            container_id: self.viewport.as_ref().map(|v| v.container_id.clone()),
            center: self.center(),
            zoom: self.zoom(),
            tiles: self.tiles.clone(),
            markers,
        }
    }
}

impl MapBackend for SceneBackend {
    fn create_viewport(
        &mut self,
        container_id: &str,
        center: LatLng,
        zoom: u8,
    ) -> Result<(), MapError> {
        if container_id.trim().is_empty() {
            return Err(MapError::InvalidContainer(container_id.to_string()));
        }

        self.viewport = Some(Viewport {
            container_id: container_id.to_string(),
            center,
            zoom,
        });
        self.viewports_created += 1;
        Ok(())
    }

    fn add_tile_layer(&mut self, tiles: &TileLayer) -> Result<(), MapError> {
        if self.viewport.is_none() {
            return Err(MapError::NoViewport);
        }
        self.tiles.push(tiles.clone());
        Ok(())
    }

    fn create_layer_group(&mut self) -> Result<LayerId, MapError> {
        if self.viewport.is_none() {
            return Err(MapError::NoViewport);
        }
        self.layers.push(BTreeSet::new());
        Ok(LayerId((self.layers.len() - 1) as u32))
    }

    fn create_circle_marker(&mut self, at: LatLng, style: &MarkerStyle) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(
            id,
            Marker {
                position: at,
                style: style.clone(),
                popup: None,
            },
        );
        id
    }

    fn update_marker(&mut self, marker: MarkerId, at: LatLng, style: &MarkerStyle) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.position = at;
            m.style = style.clone();
        }
    }

    fn bind_popup(&mut self, marker: MarkerId, html: String) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.popup = Some(html);
        }
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        for members in &mut self.layers {
            members.remove(&marker);
        }
        self.markers.remove(&marker);
        if self.open_popup == Some(marker) {
            self.open_popup = None;
        }
    }

    fn add_to_layer(&mut self, layer: LayerId, marker: MarkerId) {
        if !self.markers.contains_key(&marker) {
            return;
        }
        if let Some(members) = self.layers.get_mut(layer.0 as usize) {
            members.insert(marker);
        }
    }

    fn clear_layer(&mut self, layer: LayerId) {
        if let Some(members) = self.layers.get_mut(layer.0 as usize) {
            members.clear();
        }
        if let Some(open) = self.open_popup {
            if !self.is_visible(open) {
                self.open_popup = None;
            }
        }
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        if let Some(viewport) = self.viewport.as_mut() {
            viewport.center = center;
            viewport.zoom = zoom;
        }
    }

    fn center(&self) -> Option<LatLng> {
        self.viewport.as_ref().map(|v| v.center)
    }

    fn zoom(&self) -> Option<u8> {
        self.viewport.as_ref().map(|v| v.zoom)
    }

    fn open_popup(&mut self, marker: MarkerId) {
        let has_popup = self.markers.get(&marker).is_some_and(|m| m.popup.is_some());
        if has_popup && self.is_visible(marker) {
            self.open_popup = Some(marker);
        }
    }

    fn close_popup(&mut self) {
        self.open_popup = None;
    }
}

/// Serializable picture of the map.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub container_id: Option<String>,
    pub center: Option<LatLng>,
    pub zoom: Option<u8>,
    pub tiles: Vec<TileLayer>,
    /// Markers that belong to at least one layer.
    pub markers: Vec<SceneMarker>,
}

/// A visible marker.
#[derive(Debug, Clone, Serialize)]
pub struct SceneMarker {
    pub id: MarkerId,
    pub position: LatLng,
    pub style: MarkerStyle,
    pub popup: Option<String>,
    pub popup_open: bool,
}
