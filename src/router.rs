use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    controller::{auth, join, join::JOIN_TAG, member, member::MEMBERS_TAG, settings},
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(tags(
    (name = JOIN_TAG, description = "Bulk guild-join runs over all cached members"),
    (name = MEMBERS_TAG, description = "Cached member tokens")
))]
struct ApiDoc;

pub fn router() -> Router<AppState> {
    let (api_router, api) = OpenApiRouter::<AppState>::with_openapi(ApiDoc::openapi())
        .routes(routes!(join::join_all))
        .routes(routes!(member::list_members))
        .split_for_parts();

    Router::new()
        .route(
            "/kanri",
            get(settings::settings_page).post(settings::save_settings),
        )
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
}
