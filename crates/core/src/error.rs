//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required credential variable is unset or empty
    #[error("{service} API Key missing")]
    MissingCredential {
        service: &'static str,
        var: &'static str,
    },

    #[error("Soundcloud user not found")]
    UserNotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether the error came from talking to an upstream service
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::UpstreamStatus { .. } | Self::Decode(_)
        )
    }
}
