//! Error types for the OpenAI adapter

use sales_agent_application::GatewayError;
use thiserror::Error;

/// Result type alias for OpenAI adapter operations
pub type Result<T> = std::result::Result<T, OpenAiError>;

/// Errors that can occur when talking to an OpenAI-compatible endpoint
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Response contained no choices")]
    NoChoices,

    #[error("No API key found (set {0})")]
    MissingApiKey(String),

    #[error("No endpoint configured for provider '{0}'")]
    MissingEndpoint(String),
}

impl From<OpenAiError> for GatewayError {
    fn from(error: OpenAiError) -> Self {
        match error {
            OpenAiError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            OpenAiError::Http(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            OpenAiError::Http(e) if e.is_decode() => GatewayError::MalformedResponse(e.to_string()),
            OpenAiError::Http(e) => GatewayError::RequestFailed(e.to_string()),
            OpenAiError::Status {
                status: 401 | 403,
                message,
            } => GatewayError::AuthenticationFailed(message),
            OpenAiError::Status {
                status: 404,
                message,
            } => GatewayError::ModelNotAvailable(message),
            OpenAiError::Status { status, message } => {
                GatewayError::RequestFailed(format!("HTTP {}: {}", status, message))
            }
            e @ (OpenAiError::Decode(_) | OpenAiError::NoChoices) => {
                GatewayError::MalformedResponse(e.to_string())
            }
            e @ (OpenAiError::MissingApiKey(_) | OpenAiError::MissingEndpoint(_)) => {
                GatewayError::AuthenticationFailed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> GatewayError {
        OpenAiError::Status {
            status,
            message: "nope".to_string(),
        }
        .into()
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(status(401), GatewayError::AuthenticationFailed(_)));
        assert!(matches!(status(403), GatewayError::AuthenticationFailed(_)));
        assert!(matches!(status(404), GatewayError::ModelNotAvailable(_)));
        match status(500) {
            GatewayError::RequestFailed(msg) => assert_eq!(msg, "HTTP 500: nope"),
            other => panic!("unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn test_decode_is_malformed() {
        let error: GatewayError = OpenAiError::NoChoices.into();
        assert!(matches!(error, GatewayError::MalformedResponse(_)));
    }
}
