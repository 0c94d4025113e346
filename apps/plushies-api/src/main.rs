//! Plushies API - REST server for the plush toy catalog

use axum_helpers::server::{RouterOptions, create_production_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;

    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let state = AppState {
        config: config.clone(),
        mongo_client,
        db,
    };

    api::init_collections(&state).await?;

    let options = RouterOptions::new(&state.config.server, state.config.expose_stack_traces);
    let app = create_router::<openapi::ApiDoc>(
        api::routes(&state),
        api::public_routes(&state),
        &options,
    )?;

    info!(
        "Starting Plushies API on port {} ({} API keys loaded)",
        state.config.server.port,
        state.config.api_keys.keys.len()
    );

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, Duration::from_secs(30), async move {
        info!("Shutting down: closing MongoDB connections");
        state.mongo_client.shutdown().await;
        info!("MongoDB connection closed");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Plushies API shutdown complete");
    Ok(())
}
