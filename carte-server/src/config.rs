//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::api::ApiConfig;
use crate::map::LatLng;
use crate::widget::WidgetConfig;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Errors in configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value:?}")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{var} must be \"<latitude>,<longitude>\", got {value:?}")]
    InvalidCenter { var: &'static str, value: String },

    #[error("{var} must be an integer zoom level, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the web server listens on (`CARTE_BIND`).
    pub bind: SocketAddr,

    /// Stops/routes API (`CARTE_API_URL`, `CARTE_API_TIMEOUT`).
    pub api: ApiConfig,

    /// Serve API responses from this directory instead (`CARTE_MOCK_DIR`).
    pub mock_dir: Option<PathBuf>,

    /// Static assets directory (`CARTE_STATIC_DIR`).
    pub static_dir: String,

    /// DOM id of the map container (`CARTE_CONTAINER`).
    pub container_id: String,

    /// Initial view (`CARTE_CENTER`, `CARTE_ZOOM`).
    pub widget: WidgetConfig,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_value = var("CARTE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                var: "CARTE_BIND",
                value: bind_value.clone(),
            })?;

        let mut api = ApiConfig::default();
        if let Some(url) = var("CARTE_API_URL") {
            api = api.with_base_url(url.trim());
        }
        if let Some(timeout) = var("CARTE_API_TIMEOUT") {
            let secs: u64 = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "CARTE_API_TIMEOUT",
                    value: timeout.clone(),
                })?;
            api = api.with_timeout(secs);
        }

        let mut widget = WidgetConfig::default();
        if let Some(center) = var("CARTE_CENTER") {
            widget = widget.with_center(parse_center(&center).ok_or_else(|| {
                ConfigError::InvalidCenter {
                    var: "CARTE_CENTER",
                    value: center.clone(),
                }
            })?);
        }
        if let Some(zoom) = var("CARTE_ZOOM") {
            let zoom: u8 = zoom
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "CARTE_ZOOM",
                    value: zoom.clone(),
                })?;
            widget = widget.with_zoom(zoom);
        }

        Ok(Self {
            bind,
            api,
            mock_dir: var("CARTE_MOCK_DIR").map(PathBuf::from),
            static_dir: var("CARTE_STATIC_DIR").unwrap_or_else(|| "static".to_string()),
            container_id: var("CARTE_CONTAINER").unwrap_or_else(|| "carte".to_string()),
            widget,
        })
    }
}

/// Parse `"<lat>,<lng>"`.
fn parse_center(s: &str) -> Option<LatLng> {
    let (lat, lng) = s.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng))
        .then(|| LatLng::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.bind, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.api.base_url, "http://127.0.0.1:8081");
        assert_eq!(config.mock_dir, None);
        assert_eq!(config.static_dir, "static");
        assert_eq!(config.container_id, "carte");
        assert_eq!(config.widget.zoom, 12);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("CARTE_BIND", "0.0.0.0:8080"),
            ("CARTE_API_URL", "http://api.local:9000/"),
            ("CARTE_API_TIMEOUT", "5"),
            ("CARTE_MOCK_DIR", "data/mock_api"),
            ("CARTE_CENTER", "11.1771, -4.2979"),
            ("CARTE_ZOOM", "13"),
        ])
        .unwrap();

        assert_eq!(config.bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.api.base_url, "http://api.local:9000");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.mock_dir, Some(PathBuf::from("data/mock_api")));
        assert_eq!(config.widget.center, LatLng::new(11.1771, -4.2979));
        assert_eq!(config.widget.zoom, 13);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("CARTE_BIND", ""), ("CARTE_MOCK_DIR", "  ")]).unwrap();
        assert_eq!(config.bind, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.mock_dir, None);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            config(&[("CARTE_BIND", "localhost")]),
            Err(ConfigError::InvalidAddress { .. })
        ));
        assert!(matches!(
            config(&[("CARTE_CENTER", "12.3")]),
            Err(ConfigError::InvalidCenter { .. })
        ));
        assert!(matches!(
            config(&[("CARTE_CENTER", "95,0")]),
            Err(ConfigError::InvalidCenter { .. })
        ));
        assert!(matches!(
            config(&[("CARTE_ZOOM", "douze")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }
}
