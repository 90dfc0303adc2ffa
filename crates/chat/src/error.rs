use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use config::ErrorSignaling;
use thiserror::Error;

use crate::messages::ErrorBody;

/// Failures of a single chat request. Each one ends up as an `{"error": ...}` envelope.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The body does not match the chat request shape.
    #[error("Invalid request format: {0}")]
    Validation(String),

    /// The requested provider is neither OpenAI nor Groq.
    #[error("Unsupported model provider: {0}")]
    UnsupportedProvider(String),

    /// The upstream completion call failed.
    #[error("API call failed: {0}")]
    ProviderCall(#[from] ProviderError),
}

impl ChatError {
    /// Status code used when errors are signaled through HTTP statuses.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UnsupportedProvider(_) => StatusCode::BAD_REQUEST,
            Self::ProviderCall(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Renders the error envelope with the status the signaling mode asks for.
    pub(crate) fn into_envelope(self, signaling: ErrorSignaling) -> Response {
        let status = match signaling {
            ErrorSignaling::Flat => StatusCode::OK,
            ErrorSignaling::Status => self.status_code(),
        };

        let body = ErrorBody { error: self.to_string() };

        (status, Json(body)).into_response()
    }
}

/// Errors raised while talking to an upstream provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Authentication failed (missing or invalid API key).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Insufficient quota or credits.
    #[error("Insufficient quota: {0}")]
    InsufficientQuota(String),

    /// Model not found at the provider.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The provider rejected the request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other non-success status.
    #[error("Provider API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// Network or connection error.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The provider answered, but not with a usable completion.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Classifies a non-success upstream status.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            400 => Self::InvalidRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::InsufficientQuota(message),
            404 => Self::ModelNotFound(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ProviderApiError { status, message },
        }
    }
}
