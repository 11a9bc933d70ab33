//! ViaCEP client error types.

use std::sync::Arc;

use cep_core::ProviderError;

/// Errors from the ViaCEP client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ViaCepError {
    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(Arc<reqwest::Error>),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ViaCepError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ViaCepError::Timeout } else { ViaCepError::Network(Arc::new(err)) }
    }
}

impl From<ViaCepError> for ProviderError {
    fn from(err: ViaCepError) -> Self {
        match err {
            ViaCepError::Parse(msg) => ProviderError::Malformed(msg),
            other => ProviderError::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ViaCepError::HttpError { status: 503 };
        assert_eq!(err.to_string(), "HTTP error: 503");

        let err = ViaCepError::Timeout;
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_provider_error_classification() {
        assert!(matches!(ProviderError::from(ViaCepError::Timeout), ProviderError::Unavailable(_)));
        assert!(matches!(
            ProviderError::from(ViaCepError::HttpError { status: 500 }),
            ProviderError::Unavailable(_)
        ));
        assert!(matches!(ProviderError::from(ViaCepError::Parse("eof".into())), ProviderError::Malformed(_)));
    }
}
