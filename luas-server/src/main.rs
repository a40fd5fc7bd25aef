use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use luas_server::cache::CachedLuasClient;
use luas_server::config::ServerConfig;
use luas_server::luas::{ForecastSource, LuasClient, MockLuasClient};
use luas_server::sensor::Poller;
use luas_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let source: ForecastSource = match &config.mock_dir {
        Some(dir) => {
            let mock = MockLuasClient::new(dir).expect("Failed to load mock forecasts");
            info!(dir = %dir.display(), stops = mock.available_stops().len(), "serving recorded forecasts");
            mock.into()
        }
        None => LuasClient::new(config.luas.clone())
            .expect("Failed to create Luas client")
            .into(),
    };

    let client = Arc::new(CachedLuasClient::new(source, &config.cache));
    let poller = Poller::new(client.clone(), config.sensors.clone());
    for sensor in poller.sensors().iter().filter(|s| !s.stop.is_known()) {
        warn!(stop = %sensor.stop, sensor = %sensor.unique_id(), "stop code not in the known-stops table");
    }
    let sensor_count = poller.sensors().len();

    // First refresh before serving so sensors start populated
    let summary = poller.refresh().await;
    if summary.failed > 0 {
        error!(failed = summary.failed, "initial forecast refresh incomplete");
    }
    poller.clone().spawn(config.poll_interval);

    let app = create_router(AppState::new(client.clone(), poller));

    let addr = config.bind_addr;
    info!(
        %addr,
        source = client.source().kind(),
        sensors = sensor_count,
        "Luas forecast server listening"
    );
    info!("  GET  /health              - Health check");
    info!("  GET  /sensors             - All sensors");
    info!("  GET  /sensors/:id         - One sensor");
    info!("  GET  /stops               - Known stops");
    info!("  GET  /forecast/:stop      - Forecast for a stop");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
