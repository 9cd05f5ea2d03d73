use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Bot settings are missing one or more required fields.
    ///
    /// Every OAuth2 and guild-join operation validates the runtime settings
    /// before any network I/O; partially configured settings are storable but
    /// unusable. Results in 400 Bad Request naming the missing fields.
    #[error("Bot settings incomplete; missing: {}", .missing.join(", "))]
    IncompleteSettings { missing: Vec<&'static str> },
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
