//! Error types for the jib MCP server.

use thiserror::Error;

/// Errors that can occur in the jib MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid argument value provided.
    #[error("Invalid {field}: '{value}'. {hint}")]
    InvalidArgument {
        /// The field name that had an invalid value.
        field: &'static str,
        /// The invalid value that was provided.
        value: String,
        /// What a valid value looks like.
        hint: &'static str,
    },

    /// No attachment on the issue matched the selector.
    #[error("No attachment matching '{selector}' on {key}")]
    AttachmentNotFound {
        /// The issue key that was searched.
        key: String,
        /// The id or filename that was asked for.
        selector: String,
    },

    /// An error from the jib core (client, config, conversion).
    #[error(transparent)]
    Core(#[from] jib::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// MCP protocol error.
    #[error("MCP error: {0}")]
    Mcp(String),
}

/// Result type for jib MCP operations.
pub type Result<T> = std::result::Result<T, Error>;
