//! Diagnosis client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagnosisError {
    /// No API key configured. Raised before any request is built.
    #[error("no API key configured")]
    MissingCredential,

    /// HTTP transport error (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The service returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The response had no message content.
    #[error("service returned an empty response")]
    EmptyResponse,
}

impl DiagnosisError {
    /// Configuration problems are detected locally and never reach the
    /// network.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }

    /// Short message suitable for showing in place of the report.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_configuration() {
            String::from(
                "Error: Please provide an OpenAI API key (PLUMB_OPENAI__API_KEY, \
                 OPENAI_API_KEY, or --api-key).",
            )
        } else {
            format!("API Error: {self}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_is_configuration_error() {
        let err = DiagnosisError::MissingCredential;
        assert!(err.is_configuration());
        assert!(err.user_message().starts_with("Error: Please provide an OpenAI API key"));
    }

    #[test]
    fn service_errors_are_prefixed() {
        let err = DiagnosisError::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        assert!(!err.is_configuration());
        assert_eq!(err.user_message(), "API Error: API error (502): bad gateway");
    }
}
