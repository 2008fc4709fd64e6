//! Map rendering capability.
//!
//! The widget never draws anything itself: it asks a [`MapBackend`] for a
//! viewport, a tile layer, overlay layer groups, circle markers and popups,
//! the same primitives Leaflet offers. [`SceneBackend`] keeps that state in
//! memory and snapshots it for the browser page, which draws it with Leaflet.

mod backend;
mod scene;

pub use backend::{LatLng, LayerId, MapBackend, MapError, MarkerId, MarkerStyle, TileLayer};
pub use scene::{SceneBackend, SceneMarker, SceneSnapshot};
