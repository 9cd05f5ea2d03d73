use serenity::all::User as DiscordUser;

use crate::{
    config::Config,
    data::settings::BotSettings,
    error::{auth::AuthError, join::JoinError, AppError},
};

/// Discord REST operations performed for individual members: identity
/// resolution with the member's bearer token and guild joins with the bot
/// credentials.
pub struct DiscordMemberService<'a> {
    http_client: &'a reqwest::Client,
    config: &'a Config,
}

impl<'a> DiscordMemberService<'a> {
    pub fn new(http_client: &'a reqwest::Client, config: &'a Config) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Retrieves a Discord user's information using provided access token
    pub async fn fetch_self(&self, access_token: &str) -> Result<DiscordUser, AppError> {
        let response = self
            .http_client
            .get(format!("{}/users/@me", self.config.discord_api_base_url))
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::UserFetch { status, body }.into());
        }

        Ok(response.json::<DiscordUser>().await?)
    }

    /// Adds a member to the configured guild using bot credentials plus the
    /// member's access token.
    ///
    /// Discord answers 201 when the member was added and 204 when they were
    /// already in the guild; both count as success.
    ///
    /// # Arguments
    /// - `settings` - Validated bot settings (bot token and target guild)
    /// - `user_id` - Discord user id of the member to add
    /// - `access_token` - The member's access token, carried in the body
    ///
    /// # Returns
    /// - `Ok(())` - Member is in the guild
    /// - `Err(JoinError::GuildJoin)` - Upstream rejection with status and body
    pub async fn join_guild(
        &self,
        settings: &BotSettings,
        user_id: &str,
        access_token: &str,
    ) -> Result<(), AppError> {
        let url = format!(
            "{}/guilds/{}/members/{}",
            self.config.discord_api_base_url, settings.guild_id, user_id
        );

        let response = self
            .http_client
            .put(url)
            .header("Authorization", format!("Bot {}", settings.bot_token))
            .json(&serde_json::json!({ "access_token": access_token }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(JoinError::GuildJoin { status, body }.into())
    }
}
