//! OAuth2 login with Discord

pub mod callback;
pub mod login;
pub mod refresh;

use oauth2::basic::{BasicClient, BasicErrorResponseType, BasicTokenType};
use oauth2::{
    AuthUrl, Client, ClientId, ClientSecret, EmptyExtraTokenFields, EndpointNotSet, EndpointSet,
    RedirectUrl, RevocationErrorResponseType, StandardErrorResponse, StandardRevocableToken,
    StandardTokenIntrospectionResponse, StandardTokenResponse, TokenUrl,
};

use crate::{config::Config, data::settings::BotSettings, error::AppError};

/// Type alias for the OAuth2 client configured for Discord authentication.
pub(crate) type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Discord OAuth2 service bound to one snapshot of the runtime settings.
///
/// The client credentials live in the editable settings store rather than in
/// process configuration, so the OAuth2 client is built per request from the
/// settings snapshot the caller validated. Construction is cheap.
pub struct DiscordAuthService<'a> {
    pub http_client: &'a reqwest::Client,
    pub config: &'a Config,
    oauth_client: OAuth2Client,
}

impl<'a> DiscordAuthService<'a> {
    pub fn new(
        http_client: &'a reqwest::Client,
        config: &'a Config,
        settings: BotSettings,
    ) -> Result<Self, AppError> {
        let oauth_client = BasicClient::new(ClientId::new(settings.client_id))
            .set_client_secret(ClientSecret::new(settings.client_secret))
            .set_auth_uri(AuthUrl::new(config.discord_auth_url.clone())?)
            .set_token_uri(TokenUrl::new(config.discord_token_url.clone())?)
            .set_redirect_uri(RedirectUrl::new(settings.redirect_uri)?);

        Ok(Self {
            http_client,
            config,
            oauth_client,
        })
    }
}
