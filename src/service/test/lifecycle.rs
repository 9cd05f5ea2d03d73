use super::*;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::data::token::TokenStore;
use crate::error::{auth::AuthError, AppError};
use crate::service::token::TokenLifecycleService;

/// Tests that an unexpired record is answered from the store.
///
/// Verifies that no request reaches the token endpoint when the cached
/// access token is still valid.
///
/// Expected: Ok with the stored token and zero refresh calls
#[tokio::test]
async fn unexpired_token_is_returned_without_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let http_client = reqwest::Client::new();
    let store = TokenStore::new();
    store
        .put("42", record("cached-access", "refresh", 600))
        .await
        .unwrap();

    let lifecycle = TokenLifecycleService::new(&store, &http_client, &config, complete_settings());
    let token = lifecycle.valid_access_token("42").await.unwrap();

    assert_eq!(token, "cached-access");
}

/// Tests that an expired record triggers exactly one refresh.
///
/// Verifies the record is overwritten in place: new access token, strictly
/// later expiry, rotated refresh token, identity preserved.
///
/// Expected: Ok with the refreshed token and an updated record
#[tokio::test]
async fn expired_token_is_refreshed_in_place() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_response_body("fresh-access", "rotated-refresh")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let http_client = reqwest::Client::new();
    let store = TokenStore::new();
    let expired = record("stale-access", "old-refresh", -60).with_identity(identity("42"));
    let old_expiry = expired.expires_at;
    store.put("42", expired).await.unwrap();

    let lifecycle = TokenLifecycleService::new(&store, &http_client, &config, complete_settings());
    let token = lifecycle.valid_access_token("42").await.unwrap();

    assert_eq!(token, "fresh-access");

    let refreshed = store.get("42").await.unwrap();
    assert_eq!(refreshed.access_token, "fresh-access");
    assert_eq!(refreshed.refresh_token, "rotated-refresh");
    assert!(refreshed.expires_at > old_expiry);
    assert_eq!(refreshed.identity, Some(identity("42")));
}

/// Tests that a failed refresh evicts the member's record.
///
/// Verifies the upstream error body survives into the error detail and the
/// member must re-authenticate.
///
/// Expected: Err(TokenRefresh) and the key gone from the store
#[tokio::test]
async fn failed_refresh_evicts_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Invalid refresh token"
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let http_client = reqwest::Client::new();
    let store = TokenStore::new();
    store
        .put("42", record("stale-access", "dead-refresh", -60))
        .await
        .unwrap();

    let lifecycle = TokenLifecycleService::new(&store, &http_client, &config, complete_settings());
    let result = lifecycle.valid_access_token("42").await;

    let Err(AppError::AuthErr(AuthError::TokenRefresh { detail })) = result else {
        panic!("expected TokenRefresh error");
    };
    assert!(detail.contains("invalid_grant"));
    assert_eq!(store.get("42").await, None);
}

/// Tests requesting a token for a member that was never stored.
///
/// Expected: Err(NoToken), no network traffic
#[tokio::test]
async fn unknown_member_is_a_no_token_error() {
    let server = MockServer::start().await;

    let config = test_config(&server.uri());
    let http_client = reqwest::Client::new();
    let store = TokenStore::new();

    let lifecycle = TokenLifecycleService::new(&store, &http_client, &config, complete_settings());
    let result = lifecycle.valid_access_token("42").await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::NoToken(key))) if key == "42"
    ));
}

/// Tests the unconditional refresh used after a 401-class join failure.
///
/// Verifies the refresh happens even though the wall clock still considers
/// the record valid.
///
/// Expected: Ok with the refreshed token
#[tokio::test]
async fn forced_refresh_ignores_expiry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_response_body("fresh-access", "rotated-refresh")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let http_client = reqwest::Client::new();
    let store = TokenStore::new();
    store
        .put("42", record("still-valid", "refresh", 600))
        .await
        .unwrap();

    let lifecycle = TokenLifecycleService::new(&store, &http_client, &config, complete_settings());
    let token = lifecycle.refreshed_access_token("42").await.unwrap();

    assert_eq!(token, "fresh-access");
    assert_eq!(store.get("42").await.unwrap().access_token, "fresh-access");
}
