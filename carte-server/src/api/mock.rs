//! Mock API client for running the map without the stops server.
//!
//! Serves envelopes from `arrets.json` and `lignes.json` in a data
//! directory, exactly as the real endpoints would return them.

use std::path::{Path, PathBuf};

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;

use super::NetworkSource;
use super::error::ApiError;
use super::types::{Envelope, RoutesData, StopsData};

const STOPS_FILE: &str = "arrets.json";
const ROUTES_FILE: &str = "lignes.json";

/// Mock client that serves envelopes from JSON files.
///
/// Files are read on every fetch, so editing them takes effect on the next
/// load. A missing file makes that endpoint fail like an unreachable server.
#[derive(Debug, Clone)]
pub struct MockApiClient {
    data_dir: PathBuf,
}

impl MockApiClient {
    /// Create a mock client over `data_dir`.
    ///
    /// Fails if the directory holds neither `arrets.json` nor `lignes.json`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, ApiError> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.join(STOPS_FILE).is_file() && !data_dir.join(ROUTES_FILE).is_file() {
            return Err(ApiError::Mock {
                message: format!("no {STOPS_FILE} or {ROUTES_FILE} in {:?}", data_dir),
            });
        }

        Ok(Self { data_dir })
    }

    async fn read_envelope<T: DeserializeOwned>(&self, file: &str) -> Result<Envelope<T>, ApiError> {
        let path = self.data_dir.join(file);

        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ApiError::Mock {
                message: format!("failed to read {:?}: {}", path, e),
            })?;

        serde_json::from_str(&json).map_err(|e| ApiError::Json {
            message: format!("{:?}: {}", path, e),
            body: None,
        })
    }
}

impl NetworkSource for MockApiClient {
    fn fetch_stops(&self) -> BoxFuture<'_, Result<Envelope<StopsData>, ApiError>> {
        self.read_envelope(STOPS_FILE).boxed()
    }

    fn fetch_routes(&self) -> BoxFuture<'_, Result<Envelope<RoutesData>, ApiError>> {
        self.read_envelope(ROUTES_FILE).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_mock_data() {
        let client = MockApiClient::new("data/mock_api").unwrap();

        let stops = client.fetch_stops().await.unwrap().into_data().unwrap();
        assert!(!stops.arrets.is_empty());

        let routes = client.fetch_routes().await.unwrap().into_data().unwrap();
        assert!(!routes.lignes.is_empty());
    }

    #[test]
    fn empty_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MockApiClient::new(dir.path()).is_err());
    }

    #[tokio::test]
    async fn missing_file_fails_that_endpoint_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(ROUTES_FILE),
            r#"{ "success": true, "data": { "lignes": [] } }"#,
        )
        .unwrap();
        let client = MockApiClient::new(dir.path()).unwrap();

        assert!(matches!(
            client.fetch_stops().await,
            Err(ApiError::Mock { .. })
        ));
        assert!(client.fetch_routes().await.unwrap().success);
    }
}
