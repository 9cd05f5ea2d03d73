mod config;
mod controller;
mod data;
mod error;
mod model;
mod router;
mod service;
mod startup;
mod state;
mod util;

use std::sync::Arc;

use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    data::{settings::SettingsStore, token::TokenStore},
    error::AppError,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Arc::new(Config::from_env());
    let http_client = startup::setup_http_client()?;

    let settings = Arc::new(SettingsStore::load(config.settings_path.clone()).await);
    let tokens = Arc::new(TokenStore::load(config.token_cache_path.clone()).await);
    tracing::info!("Loaded {} cached member token(s)", tokens.len().await);

    let app = router::router()
        .with_state(AppState::new(
            config.clone(),
            http_client,
            settings,
            tokens,
        ))
        .layer(startup::setup_session_layer())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Listening on http://{}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
