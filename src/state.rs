//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - Process configuration (bind address, Discord endpoint URLs, file paths)
//! - HTTP client for Discord API and token endpoint requests
//! - Runtime bot settings store backed by `config.json`
//! - Token store caching each authenticated member's OAuth2 credentials

use std::sync::Arc;

use crate::{
    config::Config,
    data::{settings::SettingsStore, token::TokenStore},
};

/// Application state containing shared resources and dependencies.
///
/// This struct holds all the shared state that needs to be accessible across
/// request handlers. It is initialized once during server startup and then
/// cloned (cheaply, as it contains reference-counted or cloneable types) for
/// each incoming request via Axum's state extraction.
///
/// All fields use cheap-to-clone types:
/// - `reqwest::Client` uses an `Arc` internally
/// - the config and both stores are behind `Arc`
#[derive(Clone)]
pub struct AppState {
    /// Process configuration read once at startup.
    pub config: Arc<Config>,

    /// HTTP client for making external API requests.
    ///
    /// Configured with security settings (no redirects) to prevent SSRF
    /// vulnerabilities. Used for the Discord token endpoint and REST API.
    pub http_client: reqwest::Client,

    /// Runtime bot settings (OAuth2 credentials, bot token, target guild),
    /// edited through the settings form and persisted to disk.
    pub settings: Arc<SettingsStore>,

    /// Token store holding each authenticated member's OAuth2 credentials.
    pub tokens: Arc<TokenStore>,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// This constructor is called once during server startup after all
    /// dependencies have been initialized. The resulting state is then
    /// provided to the Axum router for use in request handlers.
    pub fn new(
        config: Arc<Config>,
        http_client: reqwest::Client,
        settings: Arc<SettingsStore>,
        tokens: Arc<TokenStore>,
    ) -> Self {
        Self {
            config,
            http_client,
            settings,
            tokens,
        }
    }
}
