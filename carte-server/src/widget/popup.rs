//! Stop popup content.

use askama::Template;

use crate::domain::{Stop, StopId};

/// Popup shown when a stop marker is clicked.
///
/// Rendered through `templates/popup.html`, which HTML-escapes every field,
/// so stop names and labels from the API are treated as plain text.
#[derive(Debug, Clone, PartialEq, Template)]
#[template(path = "popup.html")]
pub struct PopupContent {
    pub stop_id: StopId,
    pub name: String,
    pub zone: String,
    pub neighborhood: String,
    /// Served routes, comma-separated.
    pub routes: String,
    pub shelter: bool,
    pub lighting: bool,
}

impl PopupContent {
    pub fn for_stop(stop: &Stop) -> Self {
        Self {
            stop_id: stop.id,
            name: stop.name.clone(),
            zone: stop.zone.clone(),
            neighborhood: stop.neighborhood.clone(),
            routes: stop.routes_label(),
            shelter: stop.equipment.shelter,
            lighting: stop.equipment.lighting,
        }
    }
}
