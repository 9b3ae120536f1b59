// src/error.rs
//! Error taxonomy shared by the remote client, the paging/lookup core and both
//! outward surfaces.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The operation needs `DEVTO_API_KEY` and none is configured.
    #[error("API key is required for this operation; set DEVTO_API_KEY in the server environment")]
    AuthMissing,

    /// Target absent, including after any fallback scan.
    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    /// Remote service answered with an unexpected status.
    #[error("Dev.to API returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    pub fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        ApiError::NotFound {
            what,
            key: key.into(),
        }
    }

    /// HTTP-equivalent status, used by the REST surface and as MCP error data.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::AuthMissing => 401,
            ApiError::NotFound { .. } => 404,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Transport { .. } | ApiError::Decode { .. } => 502,
            ApiError::InvalidInput(_) => 400,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
