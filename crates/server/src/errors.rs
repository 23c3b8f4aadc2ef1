use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::auth::errors::AuthError;
use service::{FieldViolation, ServiceError};
use thiserror::Error;
use tracing::error;

/// Error body returned by every handler:
/// `{ "error": title, "code": n, "detail": "...", "violations": [...] }`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub code: u16,
    pub detail: Option<String>,
    pub violations: Vec<FieldViolation>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "no_violations")]
    violations: &'a [FieldViolation],
}

fn no_violations(v: &&[FieldViolation]) -> bool {
    v.is_empty()
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, code: status.as_u16(), detail, violations: Vec::new() }
    }

    pub fn unauthenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("authentication required".into()))
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(detail.into()))
    }

    fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, detail = ?self.detail, "request failed");
        }
        let body = ErrorBody {
            error: self.title,
            code: self.code,
            detail: self.detail.as_deref(),
            violations: &self.violations,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let code = e.code();
        let detail = Some(e.to_string());
        let err = match e {
            ServiceError::Validation(violations) => JsonApiError {
                violations,
                ..JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", detail)
            },
            ServiceError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", detail),
            ServiceError::Forbidden(_) => JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", detail),
            ServiceError::Conflict(_) => JsonApiError::new(StatusCode::CONFLICT, "Conflict", detail),
            ServiceError::Internal(_) => JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", detail),
        };
        err.with_code(code)
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let code = e.code();
        let detail = Some(e.to_string());
        let err = match e {
            AuthError::Validation(violations) => JsonApiError {
                violations,
                ..JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", detail)
            },
            AuthError::Conflict => JsonApiError::new(StatusCode::CONFLICT, "Conflict", detail),
            AuthError::Forbidden(_) => JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", detail),
            AuthError::NotFound => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", detail),
            AuthError::Unauthorized | AuthError::TokenError(_) => {
                JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail)
            }
            AuthError::HashError(_) | AuthError::Repository(_) => {
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", detail)
            }
        };
        err.with_code(code)
    }
}

/// Unreadable JSON bodies are reported like any other validation failure. The
/// offending field is taken from the deserializer's path when it has one.
impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::Validation(vec![rejection_violation(&rejection)]).into()
    }
}

fn rejection_violation(rejection: &JsonRejection) -> FieldViolation {
    let text = rejection.body_text();
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            // "<what failed>: [<path>: ]<reason>"
            let reason = text.split_once(": ").map_or(text.as_str(), |(_, rest)| rest);
            match reason.split_once(": ") {
                Some((path, message))
                    if matches!(rejection, JsonRejection::JsonDataError(_)) && !path.contains(' ') =>
                {
                    FieldViolation::new(path, message)
                }
                _ => FieldViolation::new("body", reason),
            }
        }
        _ => FieldViolation::new("body", text),
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
