//! Catalog API - product catalog REST server

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use database::postgres::connect_with_retry;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        retries = config.db_connect_retries,
        "Connecting to PostgreSQL"
    );

    let retry = RetryConfig::new().with_max_retries(config.db_connect_retries);
    let db = connect_with_retry(config.database.clone(), retry).await?;

    let state = AppState {
        config: config.clone(),
        db,
    };

    api::init_schema(&state).await?;

    let router = create_router(api::routes(&state), &state.config.server)?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.db.clone()));

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing PostgreSQL pool");
            match state.db.close().await {
                Ok(()) => info!("PostgreSQL pool closed"),
                Err(e) => tracing::error!("Failed to close PostgreSQL pool: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
