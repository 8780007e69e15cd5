use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Validation,
    NotFound,
    Conflict,
    Storage,
    Internal,
}

impl ApiErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ApiErrorKind::BadRequest | ApiErrorKind::Validation => StatusCode::BAD_REQUEST,
            ApiErrorKind::NotFound => StatusCode::NOT_FOUND,
            ApiErrorKind::Conflict => StatusCode::CONFLICT,
            ApiErrorKind::Storage | ApiErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Extra context shipped alongside the error message: the validation
/// violation list on 400, or gated internal error text on 5xx.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub details: Option<ErrorDetails>,
}

impl ApiError {
    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        ApiError {
            kind: ApiErrorKind::BadRequest,
            message: message.into(),
            details: None,
        }
    }

    pub fn validation(violations: Vec<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Validation,
            message: "Validation failed".to_string(),
            details: Some(ErrorDetails::List(violations)),
        }
    }

    pub fn not_found<T: Into<String>>(message: T) -> Self {
        ApiError {
            kind: ApiErrorKind::NotFound,
            message: message.into(),
            details: None,
        }
    }

    pub fn conflict<T: Into<String>>(message: T) -> Self {
        ApiError {
            kind: ApiErrorKind::Conflict,
            message: message.into(),
            details: None,
        }
    }

    /// Storage layer unreachable or failing. Raw detail is shown only when
    /// the deployment flag allows it.
    pub fn storage(expose_details: bool, raw: String) -> Self {
        ApiError {
            kind: ApiErrorKind::Storage,
            message: "Database connection not available".to_string(),
            details: Some(gated_detail(expose_details, raw)),
        }
    }

    /// Catch-all for unexpected internal faults, with gated raw detail.
    pub fn internal<T: Into<String>>(message: T, expose_details: bool, raw: String) -> Self {
        ApiError {
            kind: ApiErrorKind::Internal,
            message: message.into(),
            details: Some(gated_detail(expose_details, raw)),
        }
    }
}

fn gated_detail(expose_details: bool, raw: String) -> ErrorDetails {
    if expose_details {
        ErrorDetails::Text(raw)
    } else {
        ErrorDetails::Text("Internal server error".to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (status, Json(body)).into_response()
    }
}
