use std::path::PathBuf;

const DISCORD_AUTH_URL: &str = "https://discord.com/oauth2/authorize";
const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const DISCORD_API_BASE_URL: &str = "https://discord.com/api/v10";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_SETTINGS_FILE: &str = "config.json";
const DEFAULT_TOKEN_CACHE_FILE: &str = "tokens.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,

    pub settings_path: PathBuf,
    pub token_cache_path: PathBuf,

    pub discord_auth_url: String,
    pub discord_token_url: String,
    pub discord_api_base_url: String,
}

impl Config {
    /// Builds the process configuration from the environment.
    ///
    /// Every variable has a working default; the Discord endpoint URLs are
    /// fixed here and only overridden by tests constructing a `Config`
    /// directly.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_var_or("JOINBOARD_BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            settings_path: env_var_or("JOINBOARD_CONFIG_FILE", DEFAULT_SETTINGS_FILE).into(),
            token_cache_path: env_var_or("JOINBOARD_TOKEN_CACHE_FILE", DEFAULT_TOKEN_CACHE_FILE)
                .into(),
            discord_auth_url: DISCORD_AUTH_URL.to_string(),
            discord_token_url: DISCORD_TOKEN_URL.to_string(),
            discord_api_base_url: DISCORD_API_BASE_URL.to_string(),
        }
    }
}

fn env_var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
