//! Token lifecycle management.
//!
//! Every stored record moves through `valid → expired → valid` (after a
//! successful refresh) or `expired → evicted` (after a failed one). Refresh
//! is lazy and on-demand: the only consumer — the guild-join path — needs a
//! token that is valid at call time, and eagerly refreshing tokens that may
//! never be used again would waste quota.

use crate::{
    config::Config,
    data::{settings::BotSettings, token::TokenStore},
    error::{auth::AuthError, AppError},
    model::token::TokenRecord,
    service::oauth::DiscordAuthService,
};

/// Guarantees a usable access token for one member on demand, refreshing or
/// evicting their record as needed.
pub struct TokenLifecycleService<'a> {
    store: &'a TokenStore,
    http_client: &'a reqwest::Client,
    config: &'a Config,
    settings: BotSettings,
}

impl<'a> TokenLifecycleService<'a> {
    pub fn new(
        store: &'a TokenStore,
        http_client: &'a reqwest::Client,
        config: &'a Config,
        settings: BotSettings,
    ) -> Self {
        Self {
            store,
            http_client,
            config,
            settings,
        }
    }

    /// Returns an access token for `key` that is valid at call time.
    ///
    /// An unexpired record answers from the store without any network call.
    /// An expired record triggers exactly one refresh: on success the record
    /// is overwritten in place (identity preserved) and the new token
    /// returned; on failure the record is evicted and the member must
    /// re-authenticate.
    ///
    /// # Returns
    /// - `Ok(String)` - Access token valid at call time
    /// - `Err(AuthError::NoToken)` - The key is unknown
    /// - `Err(AuthError::TokenRefresh)` - Refresh failed; the record is gone
    pub async fn valid_access_token(&self, key: &str) -> Result<String, AppError> {
        let guard = self.store.lock(key).await;
        let _guard = guard.lock().await;

        let record = self
            .store
            .get(key)
            .await
            .ok_or_else(|| AuthError::NoToken(key.to_string()))?;

        if !record.is_expired() {
            return Ok(record.access_token);
        }

        tracing::debug!("Access token for member {} expired, refreshing", key);
        self.refresh_record(key, record).await
    }

    /// Refreshes `key`'s record regardless of its expiry instant.
    ///
    /// Used when Discord rejects a token the wall clock still considers
    /// valid (a 401-class guild-join failure). Same eviction semantics as
    /// `valid_access_token`.
    pub async fn refreshed_access_token(&self, key: &str) -> Result<String, AppError> {
        let guard = self.store.lock(key).await;
        let _guard = guard.lock().await;

        let record = self
            .store
            .get(key)
            .await
            .ok_or_else(|| AuthError::NoToken(key.to_string()))?;

        self.refresh_record(key, record).await
    }

    /// Runs one refresh attempt for a record whose key guard is already held.
    ///
    /// On success the store entry is replaced, preserving any resolved
    /// identity. On failure the entry is deleted so the member re-enters the
    /// flow through a fresh authorization.
    async fn refresh_record(&self, key: &str, record: TokenRecord) -> Result<String, AppError> {
        let auth_service =
            DiscordAuthService::new(self.http_client, self.config, self.settings.clone())?;

        match auth_service.refresh(&record.refresh_token).await {
            Ok(refreshed) => {
                let refreshed = match record.identity {
                    Some(identity) => refreshed.with_identity(identity),
                    None => refreshed,
                };
                let access_token = refreshed.access_token.clone();

                self.store.put(key, refreshed).await?;
                self.store.persist().await;

                Ok(access_token)
            }
            Err(err) => {
                tracing::warn!("Evicting member {} after failed token refresh: {}", key, err);
                self.store.delete(key).await;
                self.store.persist().await;
                Err(err)
            }
        }
    }
}
