use axum::{extract::State, Json};

use crate::{model::api::MemberDto, state::AppState};

pub static MEMBERS_TAG: &str = "members";

/// List every member with cached tokens.
///
/// Reports identity and expiry metadata only; tokens are never serialized
/// out. Members whose identity has not been resolved yet appear with a null
/// username.
///
/// # Returns
/// - `200 OK` - All cached members
#[utoipa::path(
    get,
    path = "/users",
    tag = MEMBERS_TAG,
    responses(
        (status = 200, description = "All cached members", body = Vec<MemberDto>),
    ),
)]
pub async fn list_members(State(state): State<AppState>) -> Json<Vec<MemberDto>> {
    let members = state.tokens.members().await;

    Json(
        members
            .into_iter()
            .map(|(user_id, record)| MemberDto::from_record(user_id, &record))
            .collect(),
    )
}
