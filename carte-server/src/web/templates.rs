//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::StopId;

/// Map page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub container_id: String,
}

/// Stop detail fragment, shown when a popup's detail action is used.
#[derive(Template)]
#[template(path = "detail.html")]
pub struct DetailTemplate {
    pub stop_id: StopId,
    pub stop_name: Option<String>,
    pub notice: String,
}
