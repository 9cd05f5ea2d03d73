use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    error::AppError,
    model::api::{ErrorDto, JoinReportDto},
    service::join::JoinAllService,
    state::AppState,
};

pub static JOIN_TAG: &str = "join";

/// Add every authenticated member to the configured guild.
///
/// Runs one concurrent join unit per cached member and waits for all of them
/// to settle. Individual failures are aggregated into the report instead of
/// aborting the run, so the counts always cover every member the run started
/// with.
///
/// # Arguments
/// - `state` - Application state containing the stores and HTTP client
///
/// # Returns
/// - `200 OK` - Batch finished; per-member outcomes aggregated
/// - `400 Bad Request` - Bot settings incomplete or no members cached
#[utoipa::path(
    post,
    path = "/join-all",
    tag = JOIN_TAG,
    responses(
        (status = 200, description = "Join batch finished, outcomes aggregated", body = JoinReportDto),
        (status = 400, description = "Bot settings incomplete or no authenticated members", body = ErrorDto),
    ),
)]
pub async fn join_all(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let service = JoinAllService::new(
        state.http_client.clone(),
        state.config.clone(),
        state.tokens.clone(),
        state.settings.current().await,
    );

    let report = service.join_all().await?;

    Ok(Json(report.into_dto()))
}
