//! Bearer-token guard for protected routes.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use order_store::OrderRepository;

use crate::AppState;
use crate::error::ApiError;

/// Rejects the request with 401 unless it carries a valid access token.
///
/// On success the token's [`auth::Subject`] is stored in the request
/// extensions for handlers that want it.
pub async fn require_auth<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();

    let subject = state.auth.authenticate(token)?;
    request.extensions_mut().insert(subject);

    Ok(next.run(request).await)
}
