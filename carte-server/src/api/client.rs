//! HTTP client for the stops/routes API.

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;

use super::NetworkSource;
use super::error::ApiError;
use super::types::{Envelope, RoutesData, StopsData};

/// Default base URL: the API runs next to the map on the same host.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8081";

/// Path of the stops collection.
pub const STOPS_PATH: &str = "/api/arrets";

/// Path of the routes collection.
pub const ROUTES_PATH: &str = "/api/lignes";

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Client for the stops/routes API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the stops collection.
    pub async fn get_stops(&self) -> Result<Envelope<StopsData>, ApiError> {
        self.get_envelope(STOPS_PATH).await
    }

    /// Fetch the routes collection.
    pub async fn get_routes(&self) -> Result<Envelope<RoutesData>, ApiError> {
        self.get_envelope(ROUTES_PATH).await
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "fetching");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ApiError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl NetworkSource for ApiClient {
    fn fetch_stops(&self) -> BoxFuture<'_, Result<Envelope<StopsData>, ApiError>> {
        self.get_stops().boxed()
    }

    fn fetch_routes(&self) -> BoxFuture<'_, Result<Envelope<RoutesData>, ApiError>> {
        self.get_routes().boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(ApiConfig::default().with_base_url(base_url).with_timeout(5)).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8081");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_strips_trailing_slash() {
        let config = ApiConfig::default().with_base_url("http://localhost:9000/");
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[tokio::test]
    async fn fetches_both_collections() {
        let router = Router::new()
            .route(
                STOPS_PATH,
                get(|| async {
                    r#"{"success":true,"data":{"arrets":[{"id":1,"nom":"Gare","zone":"Centre","quartier":"Bilbalogo","coordonnees":{"latitude":12.37,"longitude":-1.52},"lignes_desservies":[2],"equipements":{"abribus":true,"eclairage":true}}]}}"#
                }),
            )
            .route(
                ROUTES_PATH,
                get(|| async { r#"{"success":true,"data":{"lignes":[{"id":2,"nom":"Ligne 2"}]}}"# }),
            );
        let client = client(&serve(router).await);

        let stops = client.get_stops().await.unwrap().into_data().unwrap();
        assert_eq!(stops.arrets.len(), 1);
        assert_eq!(stops.arrets[0].name, "Gare");

        let routes = client.fetch_routes().await.unwrap().into_data().unwrap();
        assert_eq!(routes.lignes[0].id(), Some(2));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let router = Router::new().route(
            STOPS_PATH,
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = client(&serve(router).await);

        match client.get_stops().await {
            Err(ApiError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let router = Router::new().route(ROUTES_PATH, get(|| async { "<html>oops</html>" }));
        let client = client(&serve(router).await);

        let err = client.get_routes().await.unwrap_err();
        assert!(matches!(err, ApiError::Json { .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_http_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(&format!("http://{addr}"));
        let err = client.get_stops().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
