//! HTTP route definitions and handlers.
//!
//! The API mirrors the upstream service's HTTP mapping: the RPC method is
//! carried as a `:method` suffix on the resource path, so a single wildcard
//! route dispatches `setIamPolicy`, `getIamPolicy`, and
//! `testIamPermissions`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use rsiam_domain::model::Policy;
use rsiam_storage::StorageError;

use super::principal::extract_principal;
use super::state::AppState;

/// Default request body size limit (1MB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Creates the HTTP router with all emulator endpoints.
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);
    Router::new()
        .route("/v1/*rpc", get(handle_rpc).post(handle_rpc))
        .route("/health", get(health_check))
        .with_state(shared_state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(RequestBodyLimitLayer::new(DEFAULT_BODY_LIMIT)),
        )
}

// ============================================================
// Error Handling
// ============================================================

/// API error in the RPC error JSON shape:
/// `{"error": {"code": 3, "message": "...", "status": "INVALID_ARGUMENT"}}`.
#[derive(Debug)]
pub struct ApiError {
    pub code: i32,
    pub status: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            code: 3,
            status: "INVALID_ARGUMENT",
            message: message.into(),
        }
    }

    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self {
            code: 12,
            status: "UNIMPLEMENTED",
            message: message.into(),
        }
    }

    fn http_status(&self) -> StatusCode {
        match self.status {
            "INVALID_ARGUMENT" => StatusCode::BAD_REQUEST,
            "UNIMPLEMENTED" => StatusCode::NOT_IMPLEMENTED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": self.code,
                "message": self.message,
                "status": self.status,
            }
        });
        (self.http_status(), Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidArgument { message } => ApiError::invalid_argument(message),
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ============================================================
// Health
// ============================================================

/// Basic liveness probe.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// RPC dispatch
// ============================================================

/// Request body for `setIamPolicy`.
#[derive(Debug, Deserialize)]
struct SetIamPolicyRequest {
    policy: Option<Policy>,
}

/// Request body for `testIamPermissions`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TestIamPermissionsRequest {
    permissions: Vec<String>,
}

/// Response body for `testIamPermissions`.
#[derive(Debug, Serialize)]
struct TestIamPermissionsResponse {
    permissions: Vec<String>,
}

/// Splits `{resource}:{method}` and dispatches to the store operation.
async fn handle_rpc(
    State(state): State<Arc<AppState>>,
    Path(rpc): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some((resource, rpc_method)) = rpc.rsplit_once(':') else {
        return ApiError::invalid_argument("invalid path format").into_response();
    };

    match rpc_method {
        "setIamPolicy" => set_iam_policy(&state, resource, &method, &body).into_response(),
        "getIamPolicy" => get_iam_policy(&state, resource).into_response(),
        "testIamPermissions" => {
            test_iam_permissions(&state, resource, &method, &headers, &body).into_response()
        }
        unknown => ApiError::unimplemented(format!("unknown method: {unknown}")).into_response(),
    }
}

fn set_iam_policy(
    state: &AppState,
    resource: &str,
    method: &Method,
    body: &Bytes,
) -> ApiResult<Json<Policy>> {
    if method != Method::POST {
        return Err(ApiError::invalid_argument("method must be POST"));
    }

    let request: SetIamPolicyRequest = serde_json::from_slice(body)
        .map_err(|e| ApiError::invalid_argument(format!("invalid JSON: {e}")))?;
    let Some(policy) = request.policy else {
        return Err(ApiError::invalid_argument("policy is required"));
    };

    let stored = state.store.set_iam_policy(resource, policy)?;
    Ok(Json(stored))
}

fn get_iam_policy(state: &AppState, resource: &str) -> ApiResult<Json<Policy>> {
    let policy = state.store.get_iam_policy(resource)?;
    Ok(Json(policy))
}

fn test_iam_permissions(
    state: &AppState,
    resource: &str,
    method: &Method,
    headers: &HeaderMap,
    body: &Bytes,
) -> ApiResult<Json<TestIamPermissionsResponse>> {
    if method != Method::POST {
        return Err(ApiError::invalid_argument("method must be POST"));
    }

    let request: TestIamPermissionsRequest = serde_json::from_slice(body)
        .map_err(|e| ApiError::invalid_argument(format!("invalid JSON: {e}")))?;

    let principal = extract_principal(headers);
    let permissions =
        state
            .store
            .test_iam_permissions(resource, &principal, &request.permissions, state.trace)?;

    Ok(Json(TestIamPermissionsResponse { permissions }))
}
