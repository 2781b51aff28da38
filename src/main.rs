use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use agent_photo::app_state::AppState;
use agent_photo::config::AppConfig;
use agent_photo::db;
use agent_photo::routes;
use agent_photo::services::{
    auth::SessionVerifier,
    encryption::SecretBox,
    store::{MemoryStore, MetadataStore, SettingsStore},
    vision::VisionClient,
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing agent-photo relay");

    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);
    routes::metrics::describe();

    let (settings_store, metadata_store): (Arc<dyn SettingsStore>, Arc<dyn MetadataStore>) =
        match config.database_url.as_deref() {
            Some(database_url) => {
                tracing::info!("Connecting to PostgreSQL database");
                let store = db::connect(database_url, config.database_max_connections)
                    .await
                    .expect("Failed to prepare the database");
                let store = Arc::new(store);
                (store.clone() as Arc<dyn SettingsStore>, store as Arc<dyn MetadataStore>)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, settings and metadata are kept in memory");
                let store = Arc::new(MemoryStore::new());
                (store.clone() as Arc<dyn SettingsStore>, store as Arc<dyn MetadataStore>)
            }
        };

    let secrets =
        SecretBox::new(&config.encryption_key).expect("Failed to initialize secret encryption");

    let vision = VisionClient::new(
        config.openai_endpoint.clone(),
        Duration::from_secs(config.provider_timeout_secs),
    )
    .expect("Failed to initialize vision client");

    let sessions = SessionVerifier::new(&config.session_secret);

    let state = AppState::new(settings_store, metadata_store, secrets, vision, sessions);

    if let Some(seed) = config.agent_photo_api_key.as_deref() {
        state
            .settings
            .seed_api_key(seed)
            .await
            .expect("Failed to seed provider API key");
    }

    let app = routes::router(state, &config.api_root)
        .merge(
            Router::new()
                .route("/metrics", get(routes::metrics::prometheus_metrics))
                .with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting agent-photo on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!(api_root = %config.api_root, "Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .expect("Server error");
}
