//! API error types with HTTP response mapping.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{FieldErrors, OrderError};

use crate::response::ApiResponse;

pub const VALIDATION_MESSAGE: &str = "Please fix the given errors";

/// API-level error type that maps to HTTP responses.
///
/// Every variant renders as the standard error envelope. Internal failures
/// carry only the generic message shown to clients; `OrderService` has
/// already logged the cause.
#[derive(Debug)]
pub enum ApiError {
    /// Field-level validation failure.
    Validation(FieldErrors),
    /// A rule rejected the request (422) with a fixed message.
    Unprocessable(&'static str),
    /// Bad request from the client.
    BadRequest(&'static str),
    NotFound(&'static str),
    InvalidCredentials,
    Unauthorized,
    /// Internal server error with the client-facing message.
    Internal(&'static str),
}

impl ApiError {
    /// Maps a service error, using `failure` as the message for store errors.
    pub fn from_order(err: OrderError, failure: &'static str) -> Self {
        match err {
            OrderError::Validation(errors) => ApiError::Validation(errors),
            OrderError::ConsignmentIdRequired => {
                ApiError::Unprocessable("Consignment ID is required")
            }
            OrderError::NotFound(_) => ApiError::NotFound("Order not found"),
            OrderError::AlreadyCancelled(_) => ApiError::Unprocessable("Order already cancelled"),
            OrderError::RequiresManualIntervention { .. } => {
                ApiError::BadRequest("Please contact cx to cancel the order")
            }
            OrderError::Store(_) => ApiError::Internal(failure),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Unprocessable(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Unauthorized => ApiError::Unauthorized,
            AuthError::Signing(source) => {
                tracing::error!(error = %source, "failed to sign token");
                ApiError::Internal("Error generating token")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, errors) = match self {
            ApiError::Validation(errors) => (VALIDATION_MESSAGE, Some(errors)),
            ApiError::Unprocessable(msg)
            | ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg) => (msg, None),
            ApiError::InvalidCredentials => ("The user credentials were incorrect", None),
            ApiError::Unauthorized => ("Unauthorized", None),
        };

        ApiResponse::error(status, message, errors).into_response()
    }
}

#[cfg(test)]
mod tests {
    use common::{ConsignmentId, OrderStatus};
    use order_store::StoreError;

    use super::*;

    fn cid() -> ConsignmentId {
        ConsignmentId::new("DA251018Ab12Cd")
    }

    #[test]
    fn order_errors_map_to_statuses() {
        let cases = [
            (
                OrderError::Validation(FieldErrors::single("recipient_name", "required")),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (OrderError::NotFound(cid()), StatusCode::NOT_FOUND),
            (
                OrderError::AlreadyCancelled(cid()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                OrderError::RequiresManualIntervention {
                    consignment_id: cid(),
                    status: OrderStatus::Delivered,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                OrderError::Store(StoreError::InvalidRecord("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from_order(err, "Failed").status(), expected);
        }
    }

    #[test]
    fn store_errors_hide_their_cause() {
        let err = ApiError::from_order(
            OrderError::Store(StoreError::InvalidRecord("secret detail".to_string())),
            "Failed to cancel order",
        );
        assert!(matches!(err, ApiError::Internal("Failed to cancel order")));
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::Unauthorized).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
