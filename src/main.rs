use std::sync::Arc;
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use crate::config::Config;
use crate::controller::AppState;
use crate::services::places_client::GooglePlacesClient;

pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chicago_venues=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();
    if config.places_api_key().is_none() {
        warn!("GOOGLE_MAPS_API_KEY is not set, only demo photos will be served");
    }

    let places = Arc::new(GooglePlacesClient::new(&config)?);
    let app_state = AppState::new(config, places);

    match app_state.venue_store.reload().await {
        Ok(loaded) => info!("Serving {} venues", loaded),
        Err(e) => warn!(
            "Could not load venues from {}: {}",
            app_state.venue_store.csv_path().display(),
            e
        ),
    }

    controller::serve(app_state).await
}
