//! Standard response envelope shared by every business endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::FieldErrors;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Success,
    Error,
}

/// `{message, type, code, data?, errors?}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ResponseType,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiResponse<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            kind: ResponseType::Success,
            code: status.as_u16(),
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope with no `data` field.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ResponseType::Success,
            code: status.as_u16(),
            data: None,
            errors: None,
        }
    }

    pub fn error(
        status: StatusCode,
        message: impl Into<String>,
        errors: Option<FieldErrors>,
    ) -> Self {
        Self {
            message: message.into(),
            kind: ResponseType::Error,
            code: status.as_u16(),
            data: None,
            errors,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
