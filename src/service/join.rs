//! Bulk guild-join orchestration.
//!
//! Fans out one unit of work per stored member and waits for every unit to
//! settle. A unit obtains a valid access token, resolves the member's
//! identity if it is not cached yet, and attempts the guild join with a
//! bounded retry loop for rejected tokens. One member's failure never
//! cancels or blocks the others; the run always accounts for every member
//! it started with.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::{sleep, Duration};

use crate::{
    config::Config,
    data::{settings::BotSettings, token::TokenStore},
    error::{join::JoinError, AppError},
    model::{join::JoinReport, token::MemberIdentity},
    service::{member::DiscordMemberService, token::TokenLifecycleService},
};

/// Maximum total guild-join attempts for one member.
const MAX_JOIN_ATTEMPTS: u32 = 3;

/// Base backoff between attempts, multiplied by the attempt number.
const JOIN_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Orchestrates one bulk join run over every stored member.
pub struct JoinAllService {
    http_client: reqwest::Client,
    config: Arc<Config>,
    store: Arc<TokenStore>,
    settings: BotSettings,
}

impl JoinAllService {
    pub fn new(
        http_client: reqwest::Client,
        config: Arc<Config>,
        store: Arc<TokenStore>,
        settings: BotSettings,
    ) -> Self {
        Self {
            http_client,
            config,
            store,
            settings,
        }
    }

    /// Adds every stored member to the configured guild.
    ///
    /// Validates the bot settings and snapshots the stored keys before doing
    /// any network I/O; an empty store is a caller error, not a vacuous
    /// success. Every member is processed concurrently and the run waits for
    /// all of them, so `success_count + failure_count` always equals the
    /// snapshot size.
    ///
    /// # Returns
    /// - `Ok(JoinReport)` - Aggregated per-member outcomes
    /// - `Err(ConfigError::IncompleteSettings)` - Settings not usable yet
    /// - `Err(JoinError::NoAuthenticatedUsers)` - Nothing to join
    pub async fn join_all(&self) -> Result<JoinReport, AppError> {
        let settings = self.settings.validated()?;

        let keys = self.store.keys().await;
        if keys.is_empty() {
            return Err(JoinError::NoAuthenticatedUsers.into());
        }

        tracing::info!(
            "Starting guild join for {} stored members (guild {})",
            keys.len(),
            settings.guild_id
        );

        let mut units = JoinSet::new();
        for key in keys {
            let unit = JoinUnit {
                http_client: self.http_client.clone(),
                config: self.config.clone(),
                store: self.store.clone(),
                settings: settings.clone(),
            };
            units.spawn(async move {
                unit.run(&key)
                    .await
                    .map_err(|err| format!("member {}: {}", key, err))
            });
        }

        let mut report = JoinReport::default();
        while let Some(outcome) = units.join_next().await {
            match outcome {
                Ok(Ok(())) => report.success_count += 1,
                Ok(Err(reason)) => {
                    tracing::warn!("Guild join failed: {}", reason);
                    report.failure_count += 1;
                    report.errors.push(reason);
                }
                Err(join_err) => {
                    tracing::error!("Guild join unit aborted: {}", join_err);
                    report.failure_count += 1;
                    report.errors.push(format!("internal join failure: {}", join_err));
                }
            }
        }

        tracing::info!(
            "Guild join finished: {} succeeded, {} failed",
            report.success_count,
            report.failure_count
        );

        Ok(report)
    }
}

/// One member's unit of work within a bulk join run.
struct JoinUnit {
    http_client: reqwest::Client,
    config: Arc<Config>,
    store: Arc<TokenStore>,
    settings: BotSettings,
}

impl JoinUnit {
    async fn run(&self, key: &str) -> Result<(), AppError> {
        let lifecycle = TokenLifecycleService::new(
            &self.store,
            &self.http_client,
            &self.config,
            self.settings.clone(),
        );
        let members = DiscordMemberService::new(&self.http_client, &self.config);

        let mut access_token = lifecycle.valid_access_token(key).await?;
        let identity = self.resolve_identity(key, &access_token, &members).await?;

        let mut attempt = 1;
        loop {
            match members
                .join_guild(&self.settings, &identity.id, &access_token)
                .await
            {
                Ok(()) => {
                    tracing::debug!(
                        "Added member {} to guild {}",
                        identity.id,
                        self.settings.guild_id
                    );
                    return Ok(());
                }
                Err(err) if attempt < MAX_JOIN_ATTEMPTS && is_rejected_token(&err) => {
                    tracing::debug!(
                        "Join attempt {} for member {} rejected as unauthorized, refreshing",
                        attempt,
                        identity.id
                    );
                    sleep(JOIN_RETRY_BACKOFF * attempt).await;
                    access_token = lifecycle.refreshed_access_token(key).await?;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Returns the member's cached identity, resolving and caching it via
    /// `/users/@me` when the record predates identity resolution.
    async fn resolve_identity(
        &self,
        key: &str,
        access_token: &str,
        members: &DiscordMemberService<'_>,
    ) -> Result<MemberIdentity, AppError> {
        if let Some(record) = self.store.get(key).await {
            if let Some(identity) = record.identity {
                return Ok(identity);
            }
        }

        let user = members.fetch_self(access_token).await?;
        let identity = MemberIdentity::from_user(&user);
        self.store.set_identity(key, identity.clone()).await;

        Ok(identity)
    }
}

/// Whether a join failure means Discord rejected the member's access token.
fn is_rejected_token(err: &AppError) -> bool {
    matches!(err, AppError::JoinErr(join_err) if join_err.is_unauthorized())
}
