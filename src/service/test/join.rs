use std::sync::Arc;

use super::*;
use wiremock::matchers::{any, body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::data::token::TokenStore;
use crate::error::{config::ConfigError, join::JoinError, AppError};
use crate::service::join::JoinAllService;

fn join_service(
    server_uri: &str,
    store: Arc<TokenStore>,
    settings: BotSettings,
) -> JoinAllService {
    JoinAllService::new(
        reqwest::Client::new(),
        Arc::new(test_config(server_uri)),
        store,
        settings,
    )
}

/// Seeds a store with one identified, unexpired record per member id.
async fn seeded_store(ids: &[&str]) -> Arc<TokenStore> {
    let store = Arc::new(TokenStore::new());
    for id in ids {
        store
            .put(
                id,
                record(&format!("access-{id}"), &format!("refresh-{id}"), 600)
                    .with_identity(identity(id)),
            )
            .await
            .unwrap();
    }
    store
}

/// Tests that a join run over an empty store is a caller error.
///
/// Expected: Err(NoAuthenticatedUsers), never a vacuous success
#[tokio::test]
async fn empty_store_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(any()).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

    let service = join_service(&server.uri(), Arc::new(TokenStore::new()), complete_settings());
    let result = service.join_all().await;

    assert!(matches!(
        result,
        Err(AppError::JoinErr(JoinError::NoAuthenticatedUsers))
    ));
}

/// Tests that incomplete settings fail before any network I/O.
///
/// Expected: Err(IncompleteSettings) naming the empty fields, zero requests
#[tokio::test]
async fn incomplete_settings_fail_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(any()).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

    let store = seeded_store(&["1"]).await;
    let settings = BotSettings {
        bot_token: String::new(),
        guild_id: String::new(),
        ..complete_settings()
    };

    let service = join_service(&server.uri(), store, settings);
    let result = service.join_all().await;

    let Err(AppError::ConfigErr(ConfigError::IncompleteSettings { missing })) = result else {
        panic!("expected IncompleteSettings error");
    };
    assert_eq!(missing, vec!["bot_token", "guild_id"]);
}

/// Tests a run where every member joins successfully.
///
/// Expected: success_count == N, failure_count == 0, no errors
#[tokio::test]
async fn joins_every_member() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/v10/guilds/99/members/[123]$"))
        .respond_with(ResponseTemplate::new(201))
        .expect(3)
        .mount(&server)
        .await;

    let store = seeded_store(&["1", "2", "3"]).await;
    let service = join_service(&server.uri(), store, complete_settings());

    let report = service.join_all().await.unwrap();

    assert_eq!(report.success_count, 3);
    assert_eq!(report.failure_count, 0);
    assert!(report.errors.is_empty());
}

/// Tests that the member's access token travels in the request body.
///
/// Expected: PUT body carries the stored access token
#[tokio::test]
async fn join_carries_access_token_in_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v10/guilds/99/members/1"))
        .and(body_string_contains("access-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = seeded_store(&["1"]).await;
    let service = join_service(&server.uri(), store, complete_settings());

    let report = service.join_all().await.unwrap();

    assert_eq!(report.success_count, 1);
}

/// Tests that one member's terminal failure never disturbs the others.
///
/// Member 2 always fails with a non-401 status; members 1 and 3 join fine,
/// and member 2's failure is reported exactly once with its reason.
///
/// Expected: success_count == 2, failure_count == 1, one error naming member 2
#[tokio::test]
async fn terminal_failure_is_isolated_to_its_member() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v10/guilds/99/members/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("guild exploded"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/v10/guilds/99/members/[13]$"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let store = seeded_store(&["1", "2", "3"]).await;
    let service = join_service(&server.uri(), store, complete_settings());

    let report = service.join_all().await.unwrap();

    assert_eq!(report.success_count, 2);
    assert_eq!(report.failure_count, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("member 2"));
    assert!(report.errors[0].contains("500"));
}

/// Tests the bounded retry for rejected tokens.
///
/// Discord answers 401 on every attempt; the unit must refresh and retry,
/// giving up after three total attempts.
///
/// Expected: exactly 3 PUT attempts, 2 refreshes, one failure mentioning 401
#[tokio::test]
async fn rejected_token_is_retried_at_most_three_times() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v10/guilds/99/members/7"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid access token"))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_response_body("fresh-access", "rotated-refresh")),
        )
        .expect(2)
        .mount(&server)
        .await;

    let store = seeded_store(&["7"]).await;
    let service = join_service(&server.uri(), store, complete_settings());

    let report = service.join_all().await.unwrap();

    assert_eq!(report.success_count, 0);
    assert_eq!(report.failure_count, 1);
    assert!(report.errors[0].contains("401"));
}

/// Tests a member whose refresh fails during the run.
///
/// The record is expired, the refresh is rejected, and the member must be
/// evicted and counted as one failure without touching the guild endpoint.
///
/// Expected: one failure, member evicted, zero guild-join calls
#[tokio::test]
async fn refresh_failure_evicts_member_and_fails_unit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "error": "invalid_grant" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/v10/guilds/.*"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(TokenStore::new());
    store
        .put(
            "9",
            record("stale-access", "dead-refresh", -60).with_identity(identity("9")),
        )
        .await
        .unwrap();

    let service = join_service(&server.uri(), store.clone(), complete_settings());
    let report = service.join_all().await.unwrap();

    assert_eq!(report.success_count, 0);
    assert_eq!(report.failure_count, 1);
    assert!(report.errors[0].contains("Token refresh failed"));
    assert!(store.is_empty().await);
}

/// Tests that a member stored without identity gets resolved before joining.
///
/// Expected: one `/users/@me` call, then a successful join for that id
#[tokio::test]
async fn unresolved_identity_is_fetched_and_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API_BASE_PATH}/users/@me")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(discord_user_body("5", "legacy-member")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/v10/guilds/99/members/5"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(TokenStore::new());
    store
        .put("5", record("access-5", "refresh-5", 600))
        .await
        .unwrap();

    let service = join_service(&server.uri(), store.clone(), complete_settings());
    let report = service.join_all().await.unwrap();

    assert_eq!(report.success_count, 1);
    assert_eq!(
        store.get("5").await.unwrap().identity.unwrap().username,
        "legacy-member"
    );
}
