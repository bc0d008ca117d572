//! Error types for the jib core library.

use thiserror::Error;

/// Errors that can occur talking to Jira or loading configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// A required environment variable is unset or empty.
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    /// Configuration is present but invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP transport failed before a response was read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Jira answered with a non-success status.
    #[error("Jira API error ({status}): {message}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The first error message from the response body, if any.
        message: String,
    },

    /// An I/O error occurred (attachment read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for jib operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_names_the_variable() {
        let err = Error::MissingEnv("JIRA_API_TOKEN");
        assert_eq!(
            err.to_string(),
            "Missing environment variable: JIRA_API_TOKEN"
        );
    }

    #[test]
    fn test_api_error_carries_status_and_message() {
        let err = Error::Api {
            status: 404,
            message: "Issue does not exist".to_string(),
        };
        assert_eq!(err.to_string(), "Jira API error (404): Issue does not exist");
    }
}
