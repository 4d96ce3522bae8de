//! HTTP transport tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt; // for oneshot

use rsiam_storage::PolicyStore;

use super::principal::PRINCIPAL_HEADER;
use super::routes::create_router;
use super::state::AppState;

/// Helper to create a test app over a fresh store.
fn test_app() -> (axum::Router, Arc<PolicyStore>) {
    let store = Arc::new(PolicyStore::new());
    let state = AppState::new(Arc::clone(&store));
    (create_router(state), store)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check_returns_ok() {
    let (app, _) = test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_set_and_get_policy_round_trip() {
    let (app, _) = test_app();

    let policy = serde_json::json!({
        "policy": {
            "version": 1,
            "bindings": [
                {"role": "roles/viewer", "members": ["user:dev@example.com"]}
            ]
        }
    });

    let response = app
        .clone()
        .oneshot(post("/v1/projects/test:setIamPolicy", policy))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let written = body_json(response).await;
    assert_eq!(written["version"], 1);
    assert!(written["etag"].as_str().is_some_and(|e| !e.is_empty()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/projects/test:getIamPolicy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let read = body_json(response).await;
    assert_eq!(read["bindings"][0]["role"], "roles/viewer");
    assert_eq!(read["etag"], written["etag"]);
}

#[tokio::test]
async fn test_get_policy_of_unset_resource_is_empty() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/projects/absent:getIamPolicy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["version"], 1);
    assert!(json["bindings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_test_permissions_uses_principal_header() {
    let (app, store) = test_app();
    store
        .set_iam_policy(
            "projects/test/secrets/s1",
            serde_json::from_value(serde_json::json!({
                "version": 1,
                "bindings": [{
                    "role": "roles/secretmanager.secretAccessor",
                    "members": ["serviceAccount:ci@test.iam.gserviceaccount.com"]
                }]
            }))
            .unwrap(),
        )
        .unwrap();

    let body = serde_json::json!({
        "permissions": ["secretmanager.versions.access", "secretmanager.secrets.delete"]
    });

    let mut request = post("/v1/projects/test/secrets/s1:testIamPermissions", body.clone());
    request.headers_mut().insert(
        PRINCIPAL_HEADER,
        "serviceAccount:ci@test.iam.gserviceaccount.com".parse().unwrap(),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["permissions"],
        serde_json::json!(["secretmanager.versions.access"])
    );

    // A different principal gets nothing.
    let mut request = post("/v1/projects/test/secrets/s1:testIamPermissions", body);
    request
        .headers_mut()
        .insert(PRINCIPAL_HEADER, "user:stranger@example.com".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    let json = body_json(response).await;
    assert!(json["permissions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_principal_header_runs_legacy_path() {
    let (app, store) = test_app();
    store
        .set_iam_policy(
            "projects/test",
            serde_json::from_value(serde_json::json!({
                "version": 1,
                "bindings": [{
                    "role": "roles/viewer",
                    "members": ["user:someone@example.com"]
                }]
            }))
            .unwrap(),
        )
        .unwrap();

    // No header: the decision only asks whether any role grants.
    let response = app
        .oneshot(post(
            "/v1/projects/test:testIamPermissions",
            serde_json::json!({"permissions": ["secretmanager.secrets.get"]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["permissions"], serde_json::json!(["secretmanager.secrets.get"]));
}

#[tokio::test]
async fn test_invalid_requests_return_400() {
    let (app, _) = test_app();

    // Missing policy body.
    let response = app
        .clone()
        .oneshot(post("/v1/projects/test:setIamPolicy", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["status"], "INVALID_ARGUMENT");
    assert_eq!(json["error"]["code"], 3);

    // Empty permissions list.
    let response = app
        .clone()
        .oneshot(post(
            "/v1/projects/test:testIamPermissions",
            serde_json::json!({"permissions": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Malformed JSON body.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/projects/test:setIamPolicy")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Path without a method suffix.
    let response = app
        .oneshot(post("/v1/projects/test", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_v3_policy_with_empty_condition_is_rejected() {
    let (app, _) = test_app();

    let body = serde_json::json!({
        "policy": {
            "version": 3,
            "bindings": [{
                "role": "roles/viewer",
                "members": ["user:dev@example.com"],
                "condition": {"expression": ""}
            }]
        }
    });

    let response = app
        .oneshot(post("/v1/projects/test:setIamPolicy", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("condition expression"));
}

#[tokio::test]
async fn test_unknown_rpc_method_is_unimplemented() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post("/v1/projects/test:frobnicate", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    let json = body_json(response).await;
    assert_eq!(json["error"]["status"], "UNIMPLEMENTED");
}

#[tokio::test]
async fn test_set_iam_policy_requires_post() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/projects/test:setIamPolicy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (app, _) = test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
