//! Error types and HTTP response handling.
//!
//! This module provides the application's error hierarchy and conversion logic for
//! transforming errors into appropriate HTTP responses. The `AppError` enum serves
//! as the top-level error type that wraps domain-specific errors and implements
//! `IntoResponse` for automatic error handling in API endpoints.

pub mod auth;
pub mod config;
pub mod join;
pub mod store;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    error::{auth::AuthError, config::ConfigError, join::JoinError, store::StoreError},
    model::api::ErrorDto,
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application and provides
/// automatic conversion to HTTP responses. Most variants use `#[from]` for automatic
/// error conversion. Domain-specific errors like `AuthError` and `JoinError` handle
/// their own response mapping, while infrastructure errors fall back to a generic
/// 500 response with details logged server-side.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration or settings-validation error.
    ///
    /// Delegates to `ConfigError::into_response()` (400 for incomplete bot
    /// settings).
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Authentication or token-lifecycle error.
    ///
    /// Delegates to `AuthError::into_response()` for custom status code mapping
    /// (400 CSRF failure, 404 unknown member, 401/502 upstream failures).
    #[error(transparent)]
    AuthErr(#[from] AuthError),

    /// Guild-join error.
    ///
    /// Delegates to `JoinError::into_response()`.
    #[error(transparent)]
    JoinErr(#[from] JoinError),

    /// Token store invariant violation.
    ///
    /// Results in 500 Internal Server Error; never expected during normal
    /// operation.
    #[error(transparent)]
    StoreErr(#[from] StoreError),

    /// Session store operation error.
    ///
    /// Results in 500 Internal Server Error as session failures prevent the
    /// CSRF state round-trip.
    #[error(transparent)]
    SessionErr(#[from] tower_sessions::session::Error),

    /// HTTP client request error from reqwest.
    ///
    /// Results in 500 Internal Server Error when a Discord API call fails at
    /// the transport level.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Endpoint URL construction error.
    ///
    /// Results in 500 Internal Server Error; indicates malformed settings
    /// slipped past validation (e.g. an unparsable redirect URI).
    #[error(transparent)]
    UrlErr(#[from] url::ParseError),

    /// Filesystem or socket error.
    ///
    /// Results in 500 Internal Server Error.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),
}

/// Converts application errors into HTTP responses.
///
/// Maps each error variant to an appropriate HTTP status code and response body.
/// Domain errors delegate to their own response handling, while infrastructure
/// errors are logged with full details but return generic messages to avoid
/// information leakage.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigErr(err) => err.into_response(),
            Self::AuthErr(err) => err.into_response(),
            Self::JoinErr(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// This struct logs the error message and returns a generic "Internal server error" message
/// to the client to avoid leaking implementation details. Used as a fallback for errors that
/// don't have specific HTTP response mappings.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
