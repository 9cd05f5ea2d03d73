use chrono::{TimeDelta, Utc};
use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    AuthorizationCode, EmptyExtraTokenFields, RequestTokenError, StandardErrorResponse,
    StandardTokenResponse, TokenResponse,
};

use crate::{
    data::token::TokenStore,
    error::{auth::AuthError, AppError},
    model::token::{MemberIdentity, TokenRecord},
    service::{member::DiscordMemberService, oauth::DiscordAuthService},
};

/// Assumed access-token lifetime when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

impl<'a> DiscordAuthService<'a> {
    /// Completes the authorization-code flow for one member.
    ///
    /// Exchanges the code, resolves the member's identity, and stores the
    /// record keyed by their Discord user id; re-authentication by the same
    /// member overwrites the previous record.
    ///
    /// # Arguments
    /// - `authorization_code` - One-time code from Discord's callback redirect
    /// - `store` - Token store the resulting record is written to
    ///
    /// # Returns
    /// - `Ok(MemberIdentity)` - The authenticated member
    /// - `Err(AppError)` - Exchange, identity fetch, or store failure
    pub async fn callback(
        &self,
        authorization_code: String,
        store: &TokenStore,
    ) -> Result<MemberIdentity, AppError> {
        let record = self.exchange_code(authorization_code).await?;

        let member_service = DiscordMemberService::new(self.http_client, self.config);
        let user = member_service.fetch_self(&record.access_token).await?;
        let identity = MemberIdentity::from_user(&user);

        // Hold the key's guard so the overwrite cannot interleave with a
        // refresh running for the same member.
        let guard = store.lock(&identity.id).await;
        let _guard = guard.lock().await;
        store
            .put(&identity.id, record.with_identity(identity.clone()))
            .await?;
        drop(_guard);

        store.persist().await;

        tracing::info!(
            "Stored OAuth2 tokens for {} ({})",
            identity.username,
            identity.id
        );

        Ok(identity)
    }

    /// Exchanges an authorization code for a fresh token record.
    ///
    /// The returned record carries no identity yet; `callback` resolves it
    /// via `/users/@me`. Failures are never retried here — the member must
    /// restart the authorization flow.
    pub async fn exchange_code(
        &self,
        authorization_code: String,
    ) -> Result<TokenRecord, AppError> {
        let auth_code = AuthorizationCode::new(authorization_code);

        let token = self
            .oauth_client
            .exchange_code(auth_code)
            .request_async(self.http_client)
            .await
            .map_err(|err| AuthError::TokenExchange {
                detail: token_error_detail(err),
            })?;

        Ok(record_from_response(&token))
    }
}

/// Builds a token record from a token-endpoint response, anchoring the
/// expiry as an absolute instant.
pub(super) fn record_from_response(
    token: &StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
) -> TokenRecord {
    let expires_in = token
        .expires_in()
        .and_then(|duration| TimeDelta::from_std(duration).ok())
        .unwrap_or_else(|| TimeDelta::seconds(DEFAULT_EXPIRES_IN_SECS));

    TokenRecord {
        access_token: token.access_token().secret().clone(),
        refresh_token: token
            .refresh_token()
            .map(|token| token.secret().clone())
            .unwrap_or_default(),
        expires_at: Utc::now() + expires_in,
        identity: None,
    }
}

/// Flattens a token-endpoint failure into a displayable detail string,
/// preserving the upstream error response body when there is one.
pub(super) fn token_error_detail<RE>(
    err: RequestTokenError<RE, StandardErrorResponse<BasicErrorResponseType>>,
) -> String
where
    RE: std::error::Error + 'static,
{
    match err {
        RequestTokenError::ServerResponse(response) => {
            serde_json::to_string(&response).unwrap_or_else(|_| response.to_string())
        }
        other => other.to_string(),
    }
}
