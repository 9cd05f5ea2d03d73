use oauth2::{CsrfToken, Scope};
use url::Url;

use crate::service::oauth::DiscordAuthService;

impl<'a> DiscordAuthService<'a> {
    /// Builds the Discord authorization URL with a fresh CSRF state.
    ///
    /// Requests the `identify` scope (for `/users/@me`) and `guilds.join`
    /// (required by the guild-member-add call).
    pub fn login_url(&self) -> (Url, CsrfToken) {
        let (authorize_url, csrf_state) = self
            .oauth_client
            .authorize_url(|| CsrfToken::new_random())
            .add_scope(Scope::new("identify".to_string()))
            .add_scope(Scope::new("guilds.join".to_string()))
            .url();

        (authorize_url, csrf_state)
    }
}
