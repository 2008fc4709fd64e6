//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::map::SceneBackend;
use crate::widget::{LoadSummary, MapWidget};

/// Shared application state.
///
/// The widget is behind a mutex: requests operate on it one at a time,
/// except that network fetches run without holding it.
#[derive(Clone)]
pub struct AppState {
    pub widget: Arc<Mutex<MapWidget<SceneBackend>>>,
}

impl AppState {
    /// Create a new app state around an (initialized or not) widget.
    pub fn new(widget: MapWidget<SceneBackend>) -> Self {
        Self {
            widget: Arc::new(Mutex::new(widget)),
        }
    }

    /// Fetch stops, then routes, and apply each result to the widget.
    ///
    /// The lock is only taken to apply a result, so the map stays usable
    /// while a request is pending.
    pub async fn load_data(&self) -> LoadSummary {
        let source = self.widget.lock().await.source();

        let stops = source.fetch_stops().await;
        let stops = self.widget.lock().await.apply_stops(stops);

        let routes = source.fetch_routes().await;
        let routes = self.widget.lock().await.apply_routes(routes);

        let summary = LoadSummary { stops, routes };
        summary.log();
        summary
    }
}
