//! Error types for the IP lens.

use thiserror::Error;

/// Rejected user input. Surfaced inline; no network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Input was empty or whitespace only.
    #[error("missing address")]
    MissingAddress,

    /// Input is not a dotted-quad IPv4 address.
    #[error("malformed address")]
    MalformedAddress,
}

impl ValidationError {
    /// Message shown next to the input prompt
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingAddress => "Please enter a valid IP address",
            ValidationError::MalformedAddress => "Please enter a valid IPv4 address",
        }
    }
}

/// Failure of a single lookup attempt. Every variant is terminal for the
/// attempt; no partial record is produced.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Transport failure or non-success status from the lookup service.
    #[error("network error: {0}")]
    Network(String),

    /// Response body was not a JSON object.
    #[error("decode error: {0}")]
    Decode(String),

    /// Another lookup is still in flight on this session.
    #[error("a lookup is already in progress")]
    Busy,
}

impl LookupError {
    /// Generic message for the user; details go to the log.
    pub fn user_message(&self, self_lookup: bool) -> String {
        match self {
            LookupError::Validation(e) => e.user_message().to_string(),
            LookupError::Busy => "A lookup is already in progress".to_string(),
            LookupError::Network(_) | LookupError::Decode(_) => {
                if self_lookup {
                    "Failed to get your IP address. Please try again.".to_string()
                } else {
                    "Failed to lookup IP address. Please check the IP and try again.".to_string()
                }
            }
        }
    }
}

/// Failure while producing or writing an export artifact.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}
