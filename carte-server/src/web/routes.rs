//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::domain::StopId;
use crate::map::LatLng;
use crate::widget::{EXPORT_CONTENT_TYPE, LoadSummary, WidgetError};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/carte/scene", get(scene))
        .route("/carte/charger", post(load_data))
        .route("/carte/filtre", get(filter_by_route))
        .route("/carte/centre/:id", post(center_on_stop))
        .route("/carte/vue", post(record_view))
        .route("/carte/popup/fermer", post(close_popup))
        .route("/carte/export", get(export_data))
        .route("/arrets/:id/detail", get(stop_detail))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Map page.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let container_id = state.widget.lock().await.container_id().to_string();

    let html = IndexTemplate { container_id }
        .render()
        .map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;
    Ok(Html(html))
}

/// Current scene, for the page to draw.
async fn scene(State(state): State<AppState>) -> impl IntoResponse {
    let widget = state.widget.lock().await;
    Json(widget.backend().snapshot())
}

/// Fetch stops and routes again.
///
/// Always succeeds: the summary tells which collections were replaced.
async fn load_data(State(state): State<AppState>) -> Json<LoadSummary> {
    Json(state.load_data().await)
}

/// Show only the stops of one route, or all of them.
async fn filter_by_route(
    State(state): State<AppState>,
    Query(req): Query<FilterRequest>,
) -> Result<Json<FilterResponse>, AppError> {
    let mut widget = state.widget.lock().await;
    let visible = widget.filter_by_route(req.ligne.as_deref())?;

    Ok(Json(FilterResponse {
        visible,
        scene: widget.backend().snapshot(),
    }))
}

/// Zoom in on a stop and open its popup.
async fn center_on_stop(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CenterResponse>, AppError> {
    let mut widget = state.widget.lock().await;
    let centered = widget.center_on_stop(StopId(id))?;

    Ok(Json(CenterResponse {
        centered,
        scene: widget.backend().snapshot(),
    }))
}

/// Keep the widget's view in step with the browser.
async fn record_view(
    State(state): State<AppState>,
    Json(view): Json<ViewUpdate>,
) -> Result<StatusCode, AppError> {
    if !(-90.0..=90.0).contains(&view.lat) || !(-180.0..=180.0).contains(&view.lng) {
        return Err(AppError::BadRequest {
            message: format!("Invalid view center: {}, {}", view.lat, view.lng),
        });
    }

    let mut widget = state.widget.lock().await;
    widget.record_view(LatLng::new(view.lat, view.lng), view.zoom)?;
    Ok(StatusCode::NO_CONTENT)
}

/// The user closed the open popup.
async fn close_popup(State(state): State<AppState>) -> StatusCode {
    state.widget.lock().await.close_popup();
    StatusCode::NO_CONTENT
}

/// Download the current map state.
async fn export_data(State(state): State<AppState>) -> Result<Response, AppError> {
    let export = state.widget.lock().await.export_data()?;
    let disposition = format!("attachment; filename=\"{}\"", export.filename);

    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}

/// Stop detail, produced by the widget's detail handler.
async fn stop_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let stop_id = StopId(id);
    let widget = state.widget.lock().await;

    let stop_name = widget
        .stops()
        .iter()
        .find(|s| s.id == stop_id)
        .map(|s| s.name.clone());
    let notice = widget.request_detail(stop_id);

    let html = DetailTemplate {
        stop_id,
        stop_name,
        notice,
    }
    .render()
    .map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<WidgetError> for AppError {
    fn from(e: WidgetError) -> Self {
        match e {
            WidgetError::NotInitialized => AppError::Unavailable {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Unavailable { message } => {
                (StatusCode::SERVICE_UNAVAILABLE, message.clone())
            }
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        tracing::warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
