use std::sync::Arc;

use outfitter_api::{
    api::{create_router, AppState},
    config::Config,
    db,
    services::providers::{HttpWeatherProvider, PgInventoryStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("outfitter_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Collaborators
    let db_pool = db::create_pool(&config.database_url).await?;
    let inventory = Arc::new(PgInventoryStore::new(db_pool));
    let weather = Arc::new(HttpWeatherProvider::new(
        config.weather_api_key.clone(),
        config.weather_api_url.clone(),
        config.weather_timeout(),
    )?);

    let state = AppState::new(inventory, weather, config.engine_settings());
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
