use crate::models::ErrorEnvelope;
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::{Method, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// # Application Error
///
/// Every failure a handler or pipeline stage raises on purpose. The HTTP
/// rendering is always the shared [`ErrorEnvelope`].
///
/// [`ErrorEnvelope`]: crate::models::ErrorEnvelope
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed { allowed: Vec<Method> },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Payload Too Large")]
    PayloadTooLarge { limit: usize },

    /// Raised with an explicit status and message, both surfaced verbatim.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// Internal fault. The detail is logged but never sent to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn method_not_allowed(allowed: &[Method]) -> Self {
        Self::MethodNotAllowed {
            allowed: allowed.to_vec(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn payload_too_large(limit: usize) -> Self {
        Self::PayloadTooLarge { limit }
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn internal(detail: impl ToString) -> Self {
        Self::Internal(detail.to_string())
    }

    /// Message placed in the envelope.
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_SERVER_ERROR.to_string(),
            other => other.to_string(),
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.status_code().as_u16(), self.public_message())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Status { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());
        if let Self::MethodNotAllowed { allowed } = self {
            let allow = allowed
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&allow) {
                res.insert_header((header::ALLOW, value));
            }
        }
        res.json(self.envelope())
    }
}

/// Builds the envelope for any error that reached the error boundary.
///
/// Application errors keep their own status and message. Foreign errors keep
/// their status; their message is only exposed for client errors.
pub fn envelope_for(err: &actix_web::Error) -> ErrorEnvelope {
    if let Some(api) = err.as_error::<ApiError>() {
        return api.envelope();
    }

    let status = err.as_response_error().status_code();
    let message = if status.is_server_error() {
        INTERNAL_SERVER_ERROR.to_string()
    } else {
        let text = err.to_string();
        if text.trim().is_empty() {
            status.canonical_reason().unwrap_or("Error").to_string()
        } else {
            text
        }
    };
    ErrorEnvelope::new(status.as_u16(), message)
}
