use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum JoinError {
    /// A join run was requested while the token store is empty.
    ///
    /// Joining with nothing to join is a caller error, not a vacuous success.
    /// Results in 400 Bad Request.
    #[error("No authenticated members to join")]
    NoAuthenticatedUsers,

    /// Discord rejected the guild-member-add call.
    ///
    /// Carries the upstream status and response body. A 401/403 status means
    /// the member's access token was rejected and the join may be retried
    /// after a refresh; any other status is terminal for that member.
    #[error("Guild join rejected with status {status}: {body}")]
    GuildJoin { status: StatusCode, body: String },
}

impl JoinError {
    /// Whether the upstream status indicates a rejected access token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::GuildJoin { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }
}

impl IntoResponse for JoinError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NoAuthenticatedUsers => StatusCode::BAD_REQUEST,
            Self::GuildJoin { .. } => StatusCode::BAD_GATEWAY,
        };

        (
            status,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
