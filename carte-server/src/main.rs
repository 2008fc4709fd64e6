use std::sync::Arc;

use carte_server::api::{ApiClient, MockApiClient, NetworkSource};
use carte_server::config::ServerConfig;
use carte_server::map::SceneBackend;
use carte_server::web::{AppState, create_router};
use carte_server::widget::MapWidget;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let source: Arc<dyn NetworkSource> = match &config.mock_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "using mock API data");
            Arc::new(MockApiClient::new(dir)?)
        }
        None => {
            let client = ApiClient::new(config.api.clone())?;
            tracing::info!(base_url = client.base_url(), "using SOTRACO API");
            Arc::new(client)
        }
    };

    let mut widget = MapWidget::new(
        config.container_id.clone(),
        config.widget.clone(),
        SceneBackend::new(),
        source,
    );
    widget.initialize()?;

    // Load failures are logged; the map still starts and can be reloaded.
    widget.load_data().await;

    let app = create_router(AppState::new(widget), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("SOTRACO map listening on http://{}", config.bind);
    tracing::info!("  GET  /               - Map page");
    tracing::info!("  GET  /carte/scene    - Current scene");
    tracing::info!("  POST /carte/charger  - Reload stops and routes");
    tracing::info!("  GET  /carte/filtre   - Filter stops by route (?ligne=)");
    tracing::info!("  GET  /carte/export   - Download map data");

    axum::serve(listener, app).await?;
    Ok(())
}
