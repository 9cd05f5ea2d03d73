use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;

use crate::{
    data::settings::BotSettings,
    error::AppError,
    state::AppState,
    util::escape::html_escape,
};

/// Form body for saving the bot settings.
#[derive(Deserialize)]
pub struct SettingsForm {
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

/// Renders the settings form with the current values pre-filled.
///
/// Once the settings are complete the page also links to the authorization
/// flow and the member list, mirroring how operators drive the service.
pub async fn settings_page(State(state): State<AppState>) -> Html<String> {
    let settings = state.settings.current().await;
    let member_count = state.tokens.len().await;

    Html(render_settings_page(&settings, member_count))
}

/// Persists the submitted settings and redirects back to the form.
pub async fn save_settings(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Result<impl IntoResponse, AppError> {
    state
        .settings
        .replace(BotSettings {
            client_id: form.client_id,
            client_secret: form.client_secret,
            redirect_uri: form.redirect_uri,
            bot_token: form.bot_token,
            guild_id: form.guild_id,
        })
        .await;

    tracing::info!("Bot settings updated");

    Ok(Redirect::to("/kanri"))
}

fn render_settings_page(settings: &BotSettings, member_count: usize) -> String {
    let field = |label: &str, name: &str, value: &str| {
        format!(
            "<label for=\"{name}\">{label}</label><br>\
             <input type=\"text\" name=\"{name}\" value=\"{}\" size=\"60\"><br>",
            html_escape(value)
        )
    };

    let actions = if settings.is_complete() {
        format!(
            "<p><a href=\"/login\">Start Discord authorization</a></p>\
             <p>{member_count} member token(s) cached \
             (<a href=\"/users\">list members</a>)</p>\
             <form action=\"/join-all\" method=\"POST\">\
             <button type=\"submit\">Add all members to the guild</button>\
             </form>"
        )
    } else {
        "<p>Fill in every field to enable authorization and guild joins.</p>".to_string()
    };

    format!(
        "<h1>Bot settings</h1>\
         <form action=\"/kanri\" method=\"POST\">\
         {}{}{}{}{}\
         <button type=\"submit\">Save settings</button>\
         </form>\
         {actions}",
        field("Discord Client ID", "client_id", &settings.client_id),
        field("Discord Client Secret", "client_secret", &settings.client_secret),
        field("Redirect URI", "redirect_uri", &settings.redirect_uri),
        field("Bot Token", "bot_token", &settings.bot_token),
        field("Guild ID", "guild_id", &settings.guild_id),
    )
}
