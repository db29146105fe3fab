//! Tool error types.

use thiserror::Error;

/// Errors produced by a tool run.
///
/// Every variant carries a message suitable for showing to the user as-is.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The input record is missing something or holds an out-of-range value.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid color `{0}`")]
    InvalidColor(String),

    /// A structured text format (JSON, YAML, ...) failed to parse.
    #[error("Invalid {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// The backing library refused to encode or render.
    #[error("{0}")]
    Encode(String),
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn parse(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            format,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse("JSON", err)
    }
}
