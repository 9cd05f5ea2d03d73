use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::config::ConfigError;

/// Runtime bot settings: everything required before any OAuth2 or guild-join
/// operation may talk to Discord.
///
/// All fields default to empty; a partially filled set of settings is valid
/// state (the operator fills the form incrementally) but operations must call
/// `validated` first and fail fast instead of sending malformed requests
/// upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotSettings {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uri: String,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub guild_id: String,
}

impl BotSettings {
    /// Returns a copy of the settings only if every field is filled in.
    ///
    /// # Returns
    /// - `Ok(BotSettings)` - All fields present
    /// - `Err(ConfigError::IncompleteSettings)` - Names every missing field
    pub fn validated(&self) -> Result<BotSettings, ConfigError> {
        let mut missing = Vec::new();

        if self.client_id.is_empty() {
            missing.push("client_id");
        }
        if self.client_secret.is_empty() {
            missing.push("client_secret");
        }
        if self.redirect_uri.is_empty() {
            missing.push("redirect_uri");
        }
        if self.bot_token.is_empty() {
            missing.push("bot_token");
        }
        if self.guild_id.is_empty() {
            missing.push("guild_id");
        }

        if missing.is_empty() {
            Ok(self.clone())
        } else {
            Err(ConfigError::IncompleteSettings { missing })
        }
    }

    /// Whether the OAuth2 flow and guild joins can currently be attempted.
    pub fn is_complete(&self) -> bool {
        self.validated().is_ok()
    }
}

/// Shared store for the runtime bot settings, persisted to a JSON file.
///
/// Persistence is best-effort: a failed write is logged and the in-memory
/// settings stay authoritative for the rest of the process lifetime.
pub struct SettingsStore {
    settings: RwLock<BotSettings>,
    path: PathBuf,
}

impl SettingsStore {
    /// Loads settings from `path`, falling back to empty defaults when the
    /// file is missing or malformed.
    pub async fn load(path: PathBuf) -> Self {
        let settings = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(
                        "Ignoring malformed settings file {}: {}",
                        path.display(),
                        e
                    );
                    BotSettings::default()
                }
            },
            Err(_) => BotSettings::default(),
        };

        Self {
            settings: RwLock::new(settings),
            path,
        }
    }

    /// Snapshot of the current settings.
    pub async fn current(&self) -> BotSettings {
        self.settings.read().await.clone()
    }

    /// Validated snapshot for operations that must fail fast on missing fields.
    pub async fn validated(&self) -> Result<BotSettings, ConfigError> {
        self.settings.read().await.validated()
    }

    /// Replaces the stored settings and snapshots them to disk (best effort).
    pub async fn replace(&self, new_settings: BotSettings) {
        let snapshot = {
            let mut settings = self.settings.write().await;
            *settings = new_settings;
            settings.clone()
        };

        if let Err(e) = self.write_snapshot(&snapshot).await {
            tracing::warn!(
                "Failed to persist settings to {}: {}",
                self.path.display(),
                e
            );
        }
    }

    async fn write_snapshot(&self, settings: &BotSettings) -> std::io::Result<()> {
        let json = serde_json::to_vec_pretty(settings)?;
        tokio::fs::write(&self.path, json).await
    }
}
