use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::token::TokenRecord;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    pub error: String,
}

/// Outcome of a bulk guild-join run.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JoinReportDto {
    /// Members added to the guild (or already present).
    pub success_count: usize,
    /// Members that could not be added after retries.
    pub failure_count: usize,
    /// One human-readable reason per failed member, in completion order.
    pub errors: Vec<String>,
}

/// A stored member as reported by the `/users` endpoint.
///
/// Tokens themselves are never serialized out; only identity and expiry
/// metadata are exposed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberDto {
    /// Discord user id the token cache is keyed by.
    pub user_id: String,
    /// Username, absent while the identity is still unresolved.
    pub username: Option<String>,
    /// Avatar hash, if any.
    pub avatar: Option<String>,
    /// Instant the cached access token expires.
    pub expires_at: DateTime<Utc>,
    /// Whether the cached access token has already expired.
    pub expired: bool,
}

impl MemberDto {
    pub fn from_record(user_id: String, record: &TokenRecord) -> Self {
        Self {
            user_id,
            username: record.identity.as_ref().map(|i| i.username.clone()),
            avatar: record.identity.as_ref().and_then(|i| i.avatar.clone()),
            expires_at: record.expires_at,
            expired: record.is_expired(),
        }
    }
}
