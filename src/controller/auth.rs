use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;

/// Session key for CSRF token
static SESSION_OAUTH_CSRF_TOKEN: &str = "oauth:csrf_token";

use crate::{
    error::{auth::AuthError, AppError},
    service::oauth::DiscordAuthService,
    state::AppState,
    util::escape::html_escape,
};

/// Query parameters for the OAuth callback endpoint.
///
/// # Fields
/// - `state` - CSRF protection token that must match the value stored in the session
/// - `code` - Authorization code used to exchange for access tokens
#[derive(Deserialize)]
pub struct CallbackParams {
    /// CSRF state token to be validated against the session value.
    pub state: String,
    /// Authorization code from Discord SSO for token exchange.
    pub code: String,
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings.validated().await?;
    let auth_service = DiscordAuthService::new(&state.http_client, &state.config, settings)?;

    let (url, csrf_token) = auth_service.login_url();

    // Store CSRF token in session for verification during callback
    session
        .insert(SESSION_OAUTH_CSRF_TOKEN, csrf_token.secret())
        .await?;

    Ok(Redirect::temporary(url.as_str()))
}

pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    params: Query<CallbackParams>,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings.validated().await?;
    let auth_service = DiscordAuthService::new(&state.http_client, &state.config, settings)?;

    validate_csrf(&session, &params.0.state).await?;

    let identity = auth_service.callback(params.0.code, &state.tokens).await?;

    Ok(Html(format!(
        "<h1>Authorization complete</h1>\
         <p>Welcome, {}! Your tokens are cached and you can be added to the guild.</p>\
         <p><a href=\"/kanri\">Back to settings</a></p>",
        html_escape(&identity.username)
    )))
}

async fn validate_csrf(session: &Session, csrf_state: &str) -> Result<(), AppError> {
    let stored_state: Option<String> = session.remove(SESSION_OAUTH_CSRF_TOKEN).await?;

    if let Some(state) = stored_state {
        if state == csrf_state {
            return Ok(());
        }
    }

    Err(AppError::AuthErr(AuthError::CsrfValidationFailed))
}
