use std::sync::Arc;
use std::time::Duration;

use gate_opening_api::config;
use gate_opening_api::handlers::AppState;
use gate_opening_api::is_production;
use gate_opening_api::routes::app;
use gate_opening_api::services::{OpeningService, OpeningSettings};
use gate_opening_api::transport::ReqwestTransport;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up SIGMA_CLOUD_* and BASE_URL
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Gate Opening API in {:?} mode", config.environment);
    tracing::debug!("Sigma Cloud settings: {:?}", config.sigma);

    let missing = config.missing_secrets();
    if !missing.is_empty() {
        if is_production!() {
            tracing::error!("Missing configuration: {}", missing.join(", "));
        } else {
            tracing::warn!("Missing configuration: {}", missing.join(", "));
        }
    }

    let transport = ReqwestTransport::new(Duration::from_secs(config.http.timeout_secs))
        .unwrap_or_else(|e| panic!("failed to build HTTP client: {}", e));
    let service = OpeningService::new(Arc::new(transport), OpeningSettings::from(config));

    let app = app(AppState::new(service));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Gate Opening API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
