//! Login and logout endpoints.

use std::sync::Arc;

use auth::{IssuedTokens, Subject};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use order_store::OrderRepository;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;
use crate::response::ApiResponse;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/v1/login — exchange the static credential for bearer tokens.
#[tracing::instrument(skip(state, payload))]
pub async fn login<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<IssuedTokens>, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::BadRequest("Invalid request format"))?;
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("Invalid request format"));
    }

    let tokens = state.auth.login(&req.username, &req.password)?;
    Ok(Json(tokens))
}

/// POST /api/v1/logout — tokens are stateless, so nothing is revoked.
pub async fn logout(Extension(subject): Extension<Subject>) -> ApiResponse<()> {
    tracing::info!(%subject, "logged out");
    ApiResponse::message(StatusCode::OK, "Successfully logged out")
}
