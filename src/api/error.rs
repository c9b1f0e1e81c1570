use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::error::PrmError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every failure leaves the api as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<PrmError> for ApiError {
    fn from(err: PrmError) -> Self {
        match err {
            PrmError::BlankField { .. }
            | PrmError::EmptySet { .. }
            | PrmError::InvalidCoordinates { .. }
            | PrmError::InvalidDateRange { .. } => Self::bad_request(err.to_string()),
            PrmError::NotFound { .. } => Self::not_found(err.to_string()),
            PrmError::AlreadyExists { .. } => Self::new(StatusCode::CONFLICT, err.to_string()),
            other => {
                tracing::error!(error = %other, "request failed");
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_status_codes() {
        let blank: ApiError = PrmError::BlankField {
            field: "name".into(),
        }
        .into();
        assert_eq!(blank.status, StatusCode::BAD_REQUEST);

        let missing: ApiError = PrmError::not_found("Person", "abc").into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let dup: ApiError = PrmError::AlreadyExists {
            entity_type: "Organization".into(),
            identifier: "Acme".into(),
        }
        .into();
        assert_eq!(dup.status, StatusCode::CONFLICT);
    }

    #[test]
    fn storage_errors_hide_detail() {
        let err: ApiError = PrmError::Other("disk on fire".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn unreadable_stored_json_is_a_server_error() {
        let decode = serde_json::from_str::<u8>("not a number").unwrap_err();
        let err: ApiError = PrmError::Json(decode).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }
}
