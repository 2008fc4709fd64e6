//! Response envelopes returned by the API.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Route, Stop};

/// Common response wrapper: `{ success, data, message? }`.
///
/// `data` is only meaningful when `success` is true; a failed envelope may
/// omit it entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,

    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Failed envelope with an explanatory message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// The payload of a successful envelope.
    ///
    /// Returns `None` for an envelope flagged as failed, or one flagged as
    /// successful but carrying no data.
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

/// Payload of `/api/arrets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopsData {
    /// Stops that fail to parse are logged and left out.
    #[serde(deserialize_with = "deserialize_stops")]
    pub arrets: Vec<Stop>,
}

fn deserialize_stops<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Stop>, D::Error> {
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;

    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Stop>(value) {
            Ok(stop) => Some(stop),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed stop");
                None
            }
        })
        .collect())
}

/// Payload of `/api/lignes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesData {
    pub lignes: Vec<Route>,
}

impl From<Vec<Route>> for RoutesData {
    fn from(lignes: Vec<Route>) -> Self {
        Self { lignes }
    }
}

impl From<Vec<Stop>> for StopsData {
    fn from(arrets: Vec<Stop>) -> Self {
        Self { arrets }
    }
}
