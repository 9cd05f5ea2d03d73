use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// CSRF state validation failed during OAuth callback.
    ///
    /// The CSRF state token in the OAuth callback URL does not match the token stored
    /// in the session, indicating a potential CSRF attack or an invalid callback request.
    /// Results in a 400 Bad Request response.
    #[error("Failed to log in member due to CSRF state mismatch")]
    CsrfValidationFailed,

    /// No token record exists for the given member.
    ///
    /// The member either never completed the authorization flow or was evicted
    /// after an irrecoverable refresh failure. Results in 404 Not Found.
    #[error("No cached tokens for member {0}; re-authorization required")]
    NoToken(String),

    /// The authorization-code grant was rejected by Discord's token endpoint.
    ///
    /// `detail` carries the upstream error response (or the transport error).
    /// Never retried; the member must restart the authorization flow.
    /// Results in 502 Bad Gateway.
    #[error("Token exchange failed: {detail}")]
    TokenExchange { detail: String },

    /// The refresh-token grant was rejected by Discord's token endpoint.
    ///
    /// The member's record is evicted when this occurs during the token
    /// lifecycle; they must re-authenticate. Results in 401 Unauthorized.
    #[error("Token refresh failed: {detail}")]
    TokenRefresh { detail: String },

    /// Fetching `/users/@me` with the member's bearer token failed.
    ///
    /// Results in 502 Bad Gateway.
    #[error("Fetching member identity failed with status {status}: {body}")]
    UserFetch { status: StatusCode, body: String },
}

/// Converts authentication errors into HTTP responses.
///
/// CSRF failures keep the client-facing message generic to avoid information
/// leakage; token-lifecycle failures return the mapped status with the error's
/// display text, which only describes upstream responses the caller triggered.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::CsrfValidationFailed => StatusCode::BAD_REQUEST,
            Self::NoToken(_) => StatusCode::NOT_FOUND,
            Self::TokenExchange { .. } | Self::UserFetch { .. } => StatusCode::BAD_GATEWAY,
            Self::TokenRefresh { .. } => StatusCode::UNAUTHORIZED,
        };

        let message = match self {
            Self::CsrfValidationFailed => {
                "There was an issue logging you in, please try again.".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorDto { error: message })).into_response()
    }
}
