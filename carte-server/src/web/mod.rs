//! Web layer hosting the map widget.
//!
//! Serves the map page, the scene the page draws, and the widget's
//! operations (load, filter, center, export, stop detail) as HTTP endpoints.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
