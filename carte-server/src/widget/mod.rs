//! The SOTRACO stop map widget.
//!
//! [`MapWidget`] owns a viewport (through a [`MapBackend`]), an overlay
//! layer for stop markers and one for route lines, the stop and route lists
//! fetched from the API, and one marker handle per stop.
//!
//! Lifecycle: [`MapWidget::initialize`] builds the viewport once,
//! [`MapWidget::load_data`] fetches stops then routes and draws what
//! arrived, and the remaining operations work on that in-memory state.

mod config;
mod export;
mod popup;


use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use askama::Template;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::{ApiError, Envelope, NetworkSource, RoutesData, StopsData};
use crate::domain::{Route, RouteId, Stop, StopId};
use crate::map::{LatLng, LayerId, MapBackend, MapError, MarkerId, MarkerStyle};

pub use config::WidgetConfig;
pub use export::{EXPORT_CONTENT_TYPE, Export, ExportDocument, export_filename};
pub use popup::PopupContent;

/// Called with a stop id when the popup's detail action is used.
pub type DetailHandler = Arc<dyn Fn(StopId) -> String + Send + Sync>;

/// Detail handler used until a detail view is plugged in.
pub fn placeholder_detail_handler() -> DetailHandler {
    Arc::new(|id: StopId| format!("Détails de l'arrêt {id} - Fonctionnalité à implémenter"))
}

/// Errors from widget operations.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// The operation needs the viewport built by `initialize`
    #[error("map widget is not initialized")]
    NotInitialized,

    #[error("map backend error: {0}")]
    Map(#[from] MapError),

    #[error("popup template error: {0}")]
    Template(#[from] askama::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Marker color for a stop, from its equipment.
pub fn color_for_stop(stop: &Stop) -> &'static str {
    stop.equipment.level().color()
}

/// Popup content for a stop.
pub fn build_popup_content(stop: &Stop) -> PopupContent {
    PopupContent::for_stop(stop)
}

/// The live marker of one stop, with the popup bound to it.
#[derive(Debug, Clone)]
pub struct MarkerHandle {
    pub marker: MarkerId,
    pub popup: PopupContent,
}

#[derive(Debug, Clone, Copy)]
struct OverlayLayers {
    stops: LayerId,
    routes: LayerId,
}

/// What a [`MapWidget::load_data`] call applied.
///
/// A `None` count means that resource was not replaced: the request failed
/// or the API flagged its response as unsuccessful.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub stops: Option<usize>,
    pub routes: Option<usize>,
}

impl LoadSummary {
    pub(crate) fn log(&self) {
        tracing::info!(stops = ?self.stops, routes = ?self.routes, "map data loaded");
    }
}

/// Stop map widget.
pub struct MapWidget<B> {
    container_id: String,
    config: WidgetConfig,
    backend: B,
    source: Arc<dyn NetworkSource>,
    detail: DetailHandler,
    layers: Option<OverlayLayers>,
    stops: Vec<Stop>,
    routes: Vec<Route>,
    markers: HashMap<StopId, MarkerHandle>,
}

impl<B: MapBackend> MapWidget<B> {
    /// Create a widget bound to `container_id`. Nothing is drawn until
    /// [`initialize`](Self::initialize).
    pub fn new(
        container_id: impl Into<String>,
        config: WidgetConfig,
        backend: B,
        source: Arc<dyn NetworkSource>,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            config,
            backend,
            source,
            detail: placeholder_detail_handler(),
            layers: None,
            stops: Vec::new(),
            routes: Vec::new(),
            markers: HashMap::new(),
        }
    }

    /// Replace the handler invoked by the popup's detail action.
    pub fn with_detail_handler(mut self, handler: DetailHandler) -> Self {
        self.detail = handler;
        self
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Marker handle of a stop, if it has been drawn.
    pub fn marker(&self, id: StopId) -> Option<&MarkerHandle> {
        self.markers.get(&id)
    }

    /// Number of marker handles.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.layers.is_some()
    }

    fn overlay_layers(&self) -> Result<OverlayLayers, WidgetError> {
        self.layers.ok_or(WidgetError::NotInitialized)
    }

    /// Build the viewport, the tile background and the two overlay layers.
    ///
    /// Calling this again once the viewport exists does nothing.
    pub fn initialize(&mut self) -> Result<(), WidgetError> {
        if self.layers.is_some() {
            return Ok(());
        }

        self.backend
            .create_viewport(&self.container_id, self.config.center, self.config.zoom)?;
        self.backend.add_tile_layer(&self.config.tiles)?;

        let stops = self.backend.create_layer_group()?;
        let routes = self.backend.create_layer_group()?;
        self.layers = Some(OverlayLayers { stops, routes });

        tracing::info!(container = %self.container_id, "SOTRACO map initialized");
        Ok(())
    }

    /// Source the widget loads from.
    pub fn source(&self) -> Arc<dyn NetworkSource> {
        Arc::clone(&self.source)
    }

    /// Fetch stops, then routes, drawing each collection as it arrives.
    ///
    /// Failures are logged and never returned: a failed or rejected fetch
    /// leaves the previous list and its markers untouched. A stops failure
    /// does not prevent the routes request.
    ///
    /// This borrows the widget for the whole load. A widget shared between
    /// tasks should fetch through [`source`](Self::source) without holding
    /// its lock and hand the results to [`apply_stops`](Self::apply_stops)
    /// and [`apply_routes`](Self::apply_routes).
    pub async fn load_data(&mut self) -> LoadSummary {
        let source = self.source();

        let stops = self.apply_stops(source.fetch_stops().await);
        let routes = self.apply_routes(source.fetch_routes().await);

        let summary = LoadSummary { stops, routes };
        summary.log();
        summary
    }

    /// Store and draw the result of a stops fetch.
    ///
    /// Returns the number of stops stored, or `None` when the fetch failed
    /// or was rejected and the previous stops were kept.
    pub fn apply_stops(
        &mut self,
        result: Result<Envelope<StopsData>, ApiError>,
    ) -> Option<usize> {
        let data = match result {
            Ok(envelope) => match envelope.into_data() {
                Some(data) => data,
                None => {
                    tracing::warn!("stops response was not successful");
                    return None;
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to load map stops");
                return None;
            }
        };

        self.stops = data.arrets;
        if let Err(e) = self.render_stops() {
            tracing::error!(error = %e, "failed to draw stops");
        }
        Some(self.stops.len())
    }

    /// Store and draw the result of a routes fetch.
    pub fn apply_routes(
        &mut self,
        result: Result<Envelope<RoutesData>, ApiError>,
    ) -> Option<usize> {
        let data = match result {
            Ok(envelope) => match envelope.into_data() {
                Some(data) => data,
                None => {
                    tracing::warn!("routes response was not successful");
                    return None;
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to load map routes");
                return None;
            }
        };

        self.routes = data.lignes;
        self.render_routes();
        Some(self.routes.len())
    }

    /// Draw every stop in the stops layer.
    ///
    /// Stops that already have a marker reuse it, so drawing twice never
    /// duplicates markers. Markers of stops no longer in the list are
    /// destroyed. Returns the number of marker handles.
    pub fn render_stops(&mut self) -> Result<usize, WidgetError> {
        let layers = self.overlay_layers()?;

        let current: HashSet<StopId> = self.stops.iter().map(|s| s.id).collect();
        let stale: Vec<StopId> = self
            .markers
            .keys()
            .filter(|id| !current.contains(*id))
            .copied()
            .collect();
        for id in stale {
            if let Some(handle) = self.markers.remove(&id) {
                self.backend.remove_marker(handle.marker);
            }
        }

        for stop in &self.stops {
            let at = LatLng::from(stop.position);
            let style = MarkerStyle::filled(color_for_stop(stop));
            let popup = build_popup_content(stop);
            let html = popup.render()?;

            let marker = match self.markers.get(&stop.id) {
                Some(handle) => {
                    self.backend.update_marker(handle.marker, at, &style);
                    handle.marker
                }
                None => self.backend.create_circle_marker(at, &style),
            };

            self.backend.bind_popup(marker, html);
            self.backend.add_to_layer(layers.stops, marker);
            self.markers.insert(stop.id, MarkerHandle { marker, popup });
        }

        Ok(self.markers.len())
    }

    /// Route lines are not drawn yet; the routes layer stays empty.
    pub fn render_routes(&mut self) {
        tracing::info!(
            routes = self.routes.len(),
            "route drawing is not implemented yet"
        );
    }

    /// Show only the stops served by `route`.
    ///
    /// `None` or a blank value shows every stop again. A value that is not
    /// an integer matches no stop. Markers are only moved in and out of the
    /// stops layer, never created or destroyed, except that showing every
    /// stop redraws them. Returns the number of visible markers.
    pub fn filter_by_route(&mut self, route: Option<&str>) -> Result<usize, WidgetError> {
        let layers = self.overlay_layers()?;
        self.backend.clear_layer(layers.stops);

        let Some(route) = route.map(str::trim).filter(|r| !r.is_empty()) else {
            return self.render_stops();
        };

        let route = match RouteId::parse(route) {
            Ok(route) => route,
            Err(e) => {
                tracing::debug!(error = %e, "route filter matches no stop");
                return Ok(0);
            }
        };

        let mut visible = 0;
        for stop in self.stops.iter().filter(|s| s.serves(route)) {
            if let Some(handle) = self.markers.get(&stop.id) {
                self.backend.add_to_layer(layers.stops, handle.marker);
                visible += 1;
            }
        }

        tracing::debug!(%route, visible, "filtered stops by route");
        Ok(visible)
    }

    /// Zoom in on a stop and open its popup.
    ///
    /// Returns `false`, changing nothing, when no stop has this id.
    pub fn center_on_stop(&mut self, id: StopId) -> Result<bool, WidgetError> {
        let Some(stop) = self.stops.iter().find(|s| s.id == id) else {
            tracing::debug!(stop = %id, "no stop to center on");
            return Ok(false);
        };
        self.overlay_layers()?;

        self.backend
            .set_view(stop.position.into(), self.config.focus_zoom);

        if let Some(handle) = self.markers.get(&id) {
            self.backend.open_popup(handle.marker);
        }
        Ok(true)
    }

    /// Forget the open popup after the user closed it in the browser, so
    /// later redraws do not reopen it.
    pub fn close_popup(&mut self) {
        self.backend.close_popup();
    }

    /// Record a view change made in the browser (pan or zoom), so that
    /// exports carry what the user is looking at.
    pub fn record_view(&mut self, center: LatLng, zoom: u8) -> Result<(), WidgetError> {
        self.overlay_layers()?;
        self.backend.set_view(center, zoom);
        Ok(())
    }

    /// Invoke the detail handler for a stop.
    pub fn request_detail(&self, id: StopId) -> String {
        (self.detail)(id)
    }

    /// Serialize stops, routes and the current view as a download.
    pub fn export_data(&self) -> Result<Export, WidgetError> {
        self.export_data_at(Utc::now())
    }

    /// [`export_data`](Self::export_data) with an explicit clock.
    pub fn export_data_at(&self, at: DateTime<Utc>) -> Result<Export, WidgetError> {
        let center = self.backend.center().ok_or(WidgetError::NotInitialized)?;
        let zoom = self.backend.zoom().ok_or(WidgetError::NotInitialized)?;

        let document = ExportDocument {
            arrets: self.stops.clone(),
            lignes: self.routes.clone(),
            centre_carte: center,
            zoom,
            timestamp: export::export_timestamp(at),
        };

        Export::build(&document, at)
    }
}
