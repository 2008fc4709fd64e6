//! Transit route types.

use serde::{Deserialize, Serialize};

/// A route (ligne) as returned by `/api/lignes`.
///
/// Routes are held and exported but not drawn, so their structure is kept
/// as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(serde_json::Value);

impl Route {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The route as received.
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    /// Numeric `id` field, when the API supplies one.
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(serde_json::Value::as_i64)
    }
}
