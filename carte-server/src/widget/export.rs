//! Exporting the map state as a downloadable JSON file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Route, Stop};
use crate::map::LatLng;

use super::WidgetError;

/// Content type of an export.
pub const EXPORT_CONTENT_TYPE: &str = "application/json";

/// Document written by an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub arrets: Vec<Stop>,
    pub lignes: Vec<Route>,
    pub centre_carte: LatLng,
    pub zoom: u8,
    /// ISO-8601 UTC time of the export, millisecond precision.
    pub timestamp: String,
}

/// A serialized export, ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct Export {
    pub filename: String,
    pub body: String,
}

impl Export {
    /// Serialize `document` as pretty JSON, named after the day of `at`.
    pub(super) fn build(document: &ExportDocument, at: DateTime<Utc>) -> Result<Self, WidgetError> {
        Ok(Self {
            filename: export_filename(at),
            body: serde_json::to_string_pretty(document)?,
        })
    }

    /// Parse the body back into a document.
    pub fn document(&self) -> Result<ExportDocument, WidgetError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Save the export under its file name in `dir`.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, WidgetError> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.body)?;
        Ok(path)
    }
}

/// `carte_sotraco_<YYYY-MM-DD>.json`, using the UTC date.
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("carte_sotraco_{}.json", at.format("%Y-%m-%d"))
}

/// ISO-8601 timestamp as browsers print it, e.g. `2026-10-19T08:30:00.000Z`.
pub(super) fn export_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, 23, 59, 30).unwrap()
    }

    fn document() -> ExportDocument {
        ExportDocument {
            arrets: Vec::new(),
            lignes: vec![Route::new(serde_json::json!({ "id": 1 }))],
            centre_carte: LatLng::new(12.3686, -1.5275),
            zoom: 12,
            timestamp: export_timestamp(at()),
        }
    }

    #[test]
    fn filename_uses_utc_date() {
        assert_eq!(export_filename(at()), "carte_sotraco_2026-03-09.json");
    }

    #[test]
    fn timestamp_matches_browser_format() {
        assert_eq!(export_timestamp(at()), "2026-03-09T23:59:30.000Z");
    }

    #[test]
    fn body_is_indented_json() {
        let export = Export::build(&document(), at()).unwrap();

        assert!(export.body.starts_with("{\n  \"arrets\""));
        let json: serde_json::Value = serde_json::from_str(&export.body).unwrap();
        assert_eq!(json["centre_carte"]["lat"], 12.3686);
        assert_eq!(json["zoom"], 12);
    }

    #[test]
    fn write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let export = Export::build(&document(), at()).unwrap();

        let path = export.write_to(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("carte_sotraco_2026-03-09.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, export.body);
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let export = Export::build(&document(), at()).unwrap();

        let result = export.write_to(dir.path().join("absent"));
        assert!(matches!(result, Err(WidgetError::Io(_))));
    }
}
