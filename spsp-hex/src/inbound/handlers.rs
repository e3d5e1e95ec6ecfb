//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;

use spsp_types::{AccountId, AppError, CreateAccountRequest, ErrorResponse, UpstreamError};

use super::auth::Caller;
use crate::openapi::ApiDoc;
use crate::{Connector, NewAccountService};

/// Application state shared across handlers.
pub struct AppState<C: Connector> {
    pub service: NewAccountService<C, C>,
    pub balances: C,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

fn upstream_status(err: &UpstreamError) -> StatusCode {
    match err {
        UpstreamError::Rejected { status, .. } => StatusCode::from_u16(*status)
            .ok()
            .filter(StatusCode::is_client_error)
            .unwrap_or(StatusCode::BAD_GATEWAY),
        UpstreamError::Conflict(_) => StatusCode::CONFLICT,
        UpstreamError::NotFound(_) => StatusCode::NOT_FOUND,
        UpstreamError::Transport(_) | UpstreamError::Decode(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Upstream(err) => (upstream_status(err), err.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = ErrorResponse {
            error: message,
            code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Create an account.
///
/// The body is optional. An opaque bearer token becomes the new account's
/// SIMPLE credential; otherwise the service generates one.
#[tracing::instrument(skip(state, caller, body))]
pub async fn create_account<C: Connector>(
    State(state): State<Arc<AppState<C>>>,
    caller: Caller,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(
            serde_json::from_slice::<CreateAccountRequest>(&body)
                .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?,
        )
    };

    let account = state
        .service
        .create_account_from_request(caller.simple_token(), request)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Create the bootstrap peer account.
#[tracing::instrument(skip(state))]
pub async fn create_rainmaker<C: Connector>(
    State(state): State<Arc<AppState<C>>>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.service.create_seed_peer_account().await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Get the connector balance of an account, authenticating as the caller.
#[tracing::instrument(skip(state, caller), fields(account_id = %id))]
pub async fn get_balance<C: Connector>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    let account_id: AccountId = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid account ID".into()))?;

    let token = caller
        .bearer()
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".into()))?;

    let balance = state
        .balances
        .get_balance(&account_id, token)
        .await
        .map_err(AppError::from)?;
    Ok(Json(balance))
}

/// OpenAPI document.
pub async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
