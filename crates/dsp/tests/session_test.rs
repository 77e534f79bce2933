//! Token lifecycle and the single 401 retry.

mod common;

use campaign_core::error::DspError;
use campaign_dsp::session::{CLIENT_ID_HEADER, SCOPE_HEADER};
use campaign_dsp::ApiRequest;
use common::{mount_token, session, CLIENT_ID, TOKEN_PATH};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_unauthorized_reacquires_once_and_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "token-1" })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "token-2" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/profiles"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/profiles"))
        .and(header("authorization", "Bearer token-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "profileId": 1 }])))
        .expect(1)
        .mount(&server)
        .await;

    let session = session(&server);
    let profiles: Value = session
        .authorized_call(&ApiRequest::get("/v2/profiles"))
        .await
        .unwrap();

    assert_eq!(profiles, json!([{ "profileId": 1 }]));
    let token = session.cached_token().unwrap();
    assert_eq!(token.secret(), "token-2");
    assert_eq!(token.generation(), 2);
}

#[tokio::test]
async fn test_second_unauthorized_is_final() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 2).await;

    Mock::given(method("GET"))
        .and(path("/v2/profiles"))
        .respond_with(ResponseTemplate::new(401).set_body_string("still unauthorized"))
        .expect(2)
        .mount(&server)
        .await;

    let result: Result<Value, _> = session(&server)
        .authorized_call(&ApiRequest::get("/v2/profiles"))
        .await;

    match result {
        Err(DspError::Api { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "still unauthorized");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_other_failures_are_not_retried() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 1).await;

    Mock::given(method("GET"))
        .and(path("/v2/profiles"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = session(&server)
        .authorized_call::<Value>(&ApiRequest::get("/v2/profiles"))
        .await
        .unwrap_err();
    assert_eq!(err.remote_status(), Some(500));
    assert_eq!(err.code(), "api_error");
}

#[tokio::test]
async fn test_token_rejection_surfaces_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let session = session(&server);
    let err = session
        .authorized_call::<Value>(&ApiRequest::get("/v2/profiles"))
        .await
        .unwrap_err();

    match err {
        DspError::Auth { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("invalid_grant"));
        }
        other => panic!("expected Auth error, got {:?}", other),
    }
    assert!(session.cached_token().is_none());
}

#[tokio::test]
async fn test_concurrent_first_calls_share_one_acquisition() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "shared" }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/profiles"))
        .and(header("authorization", "Bearer shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(8)
        .mount(&server)
        .await;

    let session = session(&server);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let session = session.clone();
            tokio::spawn(async move {
                session
                    .authorized_call::<Value>(&ApiRequest::get("/v2/profiles"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(session.cached_token().unwrap().generation(), 1);
}

#[tokio::test]
async fn test_concurrent_stale_callers_share_one_reacquisition() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t1" })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "t2" }))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/profiles"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(50)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/profiles"))
        .and(header("authorization", "Bearer t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(8)
        .mount(&server)
        .await;

    let session = session(&server);
    let primed = session.acquire_token().await.unwrap();
    assert_eq!(primed.generation(), 1);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let session = session.clone();
            tokio::spawn(async move {
                session
                    .authorized_call::<Value>(&ApiRequest::get("/v2/profiles"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    let token = session.cached_token().unwrap();
    assert_eq!(token.secret(), "t2");
    assert_eq!(token.generation(), 2);
}

#[tokio::test]
async fn test_client_id_and_scope_headers_are_sent() {
    let server = MockServer::start().await;
    mount_token(&server, "token", 1).await;

    Mock::given(method("GET"))
        .and(path("/dsp/campaigns/v1/campaigns/cmp-1"))
        .and(header(CLIENT_ID_HEADER, CLIENT_ID))
        .and(header(SCOPE_HEADER, "adv-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "campaignId": "cmp-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ApiRequest::get("/dsp/campaigns/v1/campaigns/cmp-1").with_scope(Some("adv-42".into()));
    let body: Value = session(&server).authorized_call(&request).await.unwrap();
    assert_eq!(body["campaignId"], "cmp-1");
}
