use symbiomed_core::{CoreError, ErrorCategory};
use thiserror::Error;

/// Errors raised while talking to the terminology server
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to connect to server: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Failed to parse response JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code, when the server answered at all
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) => ErrorCategory::Transport,
            Self::Status { .. } => ErrorCategory::HttpStatus,
            Self::InvalidJson(_) | Self::InvalidUrl(_) => ErrorCategory::InvalidInput,
            Self::Decode(_) => ErrorCategory::Serialization,
            Self::Core(e) => e.category(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
