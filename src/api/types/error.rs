//! API error types
//!
//! Every error body is `{"id": <code>, "message": <text>}`. The code is also
//! stored in the response extensions so middleware can read it back.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{DomainError, ValidationError};

/// Machine-readable error identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "VALIDATION_ERROR")]
    ValidationError,
    #[serde(rename = "INVALID_USERID")]
    InvalidUserId,
    #[serde(rename = "INVALID_CATEGORY")]
    InvalidCategory,
    #[serde(rename = "INVALID_SUM")]
    InvalidSum,
    #[serde(rename = "INVALID_YEAR")]
    InvalidYear,
    #[serde(rename = "INVALID_MONTH")]
    InvalidMonth,
    #[serde(rename = "INVALID_DATE")]
    InvalidDate,
    #[serde(rename = "USER_NOT_FOUND")]
    UserNotFound,
    /// A store or collaborator failed while handling the request
    #[serde(rename = "SERVER_ERROR")]
    ServerError,
    /// No route matched
    #[serde(rename = "not_found")]
    RouteNotFound,
    /// A handler panicked
    #[serde(rename = "server_error")]
    Uncaught,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUserId => "INVALID_USERID",
            Self::InvalidCategory => "INVALID_CATEGORY",
            Self::InvalidSum => "INVALID_SUM",
            Self::InvalidYear => "INVALID_YEAR",
            Self::InvalidMonth => "INVALID_MONTH",
            Self::InvalidDate => "INVALID_DATE",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ServerError => "SERVER_ERROR",
            Self::RouteNotFound => "not_found",
            Self::Uncaught => "server_error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ValidationError> for ErrorCode {
    fn from(err: &ValidationError) -> Self {
        use ValidationError::*;

        match err {
            MissingFields(_) | MalformedBody(_) | MalformedQuery(_) | MalformedPath(_)
            | InvalidDescription => Self::ValidationError,
            UserIdRequired | InvalidUserId => Self::InvalidUserId,
            CategoryRequired | InvalidCategory => Self::InvalidCategory,
            SumRequired | SumNotNumeric | SumNotPositive | SumTooLarge => Self::InvalidSum,
            YearRequired | YearNotInteger | YearOutOfRange => Self::InvalidYear,
            MonthRequired | MonthNotInteger | MonthOutOfRange => Self::InvalidMonth,
            InvalidDay { .. } | BackdatedCost => Self::InvalidDate,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub id: ErrorCode,
    pub message: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, id: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                id,
                message: message.into(),
            },
        }
    }

    /// Malformed or incomplete request
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, message)
    }

    /// No route matched the request
    pub fn route_not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorCode::RouteNotFound, message)
    }

    /// Store or collaborator failure
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::ServerError, message)
    }

    /// Failure that escaped the handler
    pub fn uncaught(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Uncaught, message)
    }

    /// Replace the message of a `SERVER_ERROR`, leaving other errors untouched
    pub fn with_server_message(mut self, message: impl Into<String>) -> Self {
        if self.response.id == ErrorCode::ServerError {
            self.response.message = message.into();
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.response.id
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.response.id;
        let mut response = (self.status, Json(self.response)).into_response();
        response.extensions_mut().insert(code);
        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::Validation(e) => {
                Self::new(StatusCode::BAD_REQUEST, ErrorCode::from(e), e.to_string())
            }
            DomainError::UserNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, ErrorCode::UserNotFound, err.to_string())
            }
            DomainError::Conflict { .. }
            | DomainError::Storage { .. }
            | DomainError::Internal { .. } => {
                error!(error = %err, "Request failed");
                Self::server_error("Internal server error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.response.id, self.response.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    #[test]
    fn test_validation_errors_map_to_field_codes() {
        let cases = [
            (ValidationError::MissingFields(vec!["sum"]), ErrorCode::ValidationError),
            (ValidationError::InvalidUserId, ErrorCode::InvalidUserId),
            (ValidationError::InvalidCategory, ErrorCode::InvalidCategory),
            (ValidationError::SumTooLarge, ErrorCode::InvalidSum),
            (ValidationError::YearOutOfRange, ErrorCode::InvalidYear),
            (ValidationError::MonthNotInteger, ErrorCode::InvalidMonth),
            (ValidationError::BackdatedCost, ErrorCode::InvalidDate),
        ];

        for (validation, code) in cases {
            let api_err: ApiError = DomainError::from(validation).into();
            assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
            assert_eq!(api_err.code(), code);
        }
    }

    #[test]
    fn test_user_not_found_conversion() {
        let api_err: ApiError = DomainError::user_not_found(UserId::new(7).unwrap()).into();

        assert_eq!(api_err.status, StatusCode::NOT_FOUND);
        assert_eq!(api_err.code(), ErrorCode::UserNotFound);
    }

    #[test]
    fn test_storage_errors_hide_details() {
        let api_err: ApiError = DomainError::storage("password authentication failed").into();

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.code(), ErrorCode::ServerError);
        assert!(!api_err.response.message.contains("password"));
    }

    #[test]
    fn test_with_server_message_only_touches_server_errors() {
        let server = ApiError::server_error("x").with_server_message("Unable to add cost item");
        assert_eq!(server.response.message, "Unable to add cost item");

        let validation = ApiError::validation("Bad").with_server_message("Unable to add cost item");
        assert_eq!(validation.response.message, "Bad");
    }

    #[test]
    fn test_error_serialization() {
        let json = serde_json::to_value(&ApiError::route_not_found("Route not found").response)
            .unwrap();
        assert_eq!(json["id"], "not_found");
        assert_eq!(json["message"], "Route not found");

        let json = serde_json::to_value(&ApiError::uncaught("boom").response).unwrap();
        assert_eq!(json["id"], "server_error");
    }

    #[test]
    fn test_response_carries_code_extension() {
        let response = ApiError::validation("Missing").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.extensions().get::<ErrorCode>(),
            Some(&ErrorCode::ValidationError)
        );
    }
}
