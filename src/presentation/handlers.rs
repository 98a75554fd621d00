// HTTP request handlers
use crate::application::metric_service::RpcError;
use crate::presentation::app_state::AppState;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Dispatch one RPC call. The path carries the target; the body is the
/// JSON payload, with an empty body read as `{}`.
pub async fn rpc_call(
    Path((service, method)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Response {
    let payload = if body.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(e) => {
                return RpcError::InvalidRequest(format!("body is not JSON: {}", e))
                    .into_response();
            }
        }
    };

    match state.metric_service.dispatch(&service, &method, payload).await {
        Ok(result) => Json(result).into_response(),
        Err(error) => {
            if matches!(error, RpcError::Internal(_)) {
                tracing::error!("Error dispatching {}/{}: {}", service, method, error);
            }
            error.into_response()
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = match &self {
            RpcError::MethodNotFound { .. } => StatusCode::NOT_FOUND,
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}

/// Build the service router. Shared between the server binary and the
/// integration tests.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/unshadow/:service/:method", post(rpc_call))
        .with_state(state)
}
