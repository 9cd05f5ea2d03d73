use oauth2::RefreshToken;

use crate::{
    error::{auth::AuthError, AppError},
    model::token::TokenRecord,
    service::oauth::{
        callback::{record_from_response, token_error_detail},
        DiscordAuthService,
    },
};

impl<'a> DiscordAuthService<'a> {
    /// Exchanges a refresh token for a fresh token record.
    ///
    /// Never retries internally; retry policy belongs to the token lifecycle
    /// and join orchestration. Discord rotates refresh tokens, so the
    /// returned record carries the rotated token, falling back to the old one
    /// when the response omits it.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenRecord, AppError> {
        let token = self
            .oauth_client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(self.http_client)
            .await
            .map_err(|err| AuthError::TokenRefresh {
                detail: token_error_detail(err),
            })?;

        let mut record = record_from_response(&token);
        if record.refresh_token.is_empty() {
            record.refresh_token = refresh_token.to_string();
        }

        Ok(record)
    }
}
