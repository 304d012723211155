use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error types
///
/// Every variant renders as `{"error": "<static message>"}`; callers never
/// see internal detail.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request failed the same-origin heuristic
    #[error("Forbidden")]
    Forbidden,
    /// Client key exhausted its window
    #[error("Too many requests")]
    RateLimited,
    /// No phone number configured
    #[error("Unavailable")]
    Unavailable,
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    /// Malformed estimate request
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Forbidden => "Forbidden",
            Self::RateLimited => "Too many requests",
            Self::Unavailable => "Unavailable",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::BadRequest(_) => "Bad Request",
            Self::InternalError(_) => "Internal Server Error",
        }
    }

    /// Label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Forbidden => "forbidden",
            Self::RateLimited => "rate_limited",
            Self::Unavailable => "unavailable",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::BadRequest(_) => "bad_request",
            Self::InternalError(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::InternalError(msg) = &self {
            tracing::error!(error = %msg, "Internal error");
        }

        let body = Json(json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}
