use chrono::{Duration, Utc};
use serde_json::json;

use crate::config::Config;
use crate::data::settings::BotSettings;
use crate::model::token::{MemberIdentity, TokenRecord};

mod join;
mod lifecycle;

/// Path of the mocked Discord token endpoint.
const TOKEN_PATH: &str = "/api/oauth2/token";
/// Base path of the mocked Discord REST API.
const API_BASE_PATH: &str = "/api/v10";

/// Config pointing every Discord endpoint at a wiremock server.
fn test_config(server_uri: &str) -> Config {
    Config {
        bind_address: "127.0.0.1:0".to_string(),
        settings_path: std::env::temp_dir().join("joinboard-test-config.json"),
        token_cache_path: std::env::temp_dir().join("joinboard-test-tokens.json"),
        discord_auth_url: format!("{server_uri}/oauth2/authorize"),
        discord_token_url: format!("{server_uri}{TOKEN_PATH}"),
        discord_api_base_url: format!("{server_uri}{API_BASE_PATH}"),
    }
}

/// Fully filled bot settings targeting guild 99.
fn complete_settings() -> BotSettings {
    BotSettings {
        client_id: "1234".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "https://joinboard.example/callback".to_string(),
        bot_token: "bot-token".to_string(),
        guild_id: "99".to_string(),
    }
}

/// A record expiring `expires_in_secs` from now (negative = already expired).
fn record(access_token: &str, refresh_token: &str, expires_in_secs: i64) -> TokenRecord {
    TokenRecord {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        identity: None,
    }
}

fn identity(id: &str) -> MemberIdentity {
    MemberIdentity {
        id: id.to_string(),
        username: format!("member-{id}"),
        avatar: None,
    }
}

/// Token-endpoint success body in Discord's shape.
fn token_response_body(access_token: &str, refresh_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 604_800,
        "refresh_token": refresh_token,
        "scope": "identify guilds.join"
    })
}

/// `/users/@me` body as Discord returns it for the identify scope.
fn discord_user_body(id: &str, username: &str) -> serde_json::Value {
    json!({
        "id": id,
        "username": username,
        "avatar": "8342729096ea3675442027381ff50dfe",
        "discriminator": "0",
        "public_flags": 64,
        "flags": 64,
        "banner": null,
        "accent_color": null,
        "global_name": username,
        "mfa_enabled": true,
        "locale": "en-US",
        "premium_type": 2
    })
}
