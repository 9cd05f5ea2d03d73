use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serenity::all::User as DiscordUser;

/// Resolved Discord identity of an authenticated member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberIdentity {
    /// Discord user id (snowflake, stringified).
    pub id: String,
    /// Discord username at the time the identity was resolved.
    pub username: String,
    /// Avatar hash, if the user has one set.
    pub avatar: Option<String>,
}

impl MemberIdentity {
    pub fn from_user(user: &DiscordUser) -> Self {
        Self {
            id: user.id.get().to_string(),
            username: user.name.clone(),
            avatar: user.avatar.map(|hash| hash.to_string()),
        }
    }
}

/// Cached OAuth2 credentials for one authenticated member.
///
/// `expires_at` is always an absolute instant (exchange/refresh time plus the
/// `expires_in` the authorization server reported), never a duration.
/// `identity` stays `None` until the member's profile has been resolved via
/// `/users/@me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub identity: Option<MemberIdentity>,
}

impl TokenRecord {
    /// Whether the access token has passed its expiry instant.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Attaches a resolved identity, consuming the record.
    pub fn with_identity(mut self, identity: MemberIdentity) -> Self {
        self.identity = Some(identity);
        self
    }
}
