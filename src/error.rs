//! Domain error types for gitgrade audits

use thiserror::Error;

/// Everything that can go wrong between a submitted URL and a rendered
/// dashboard. Each variant maps to one human-readable message shown in the
/// error pane; nothing is retried automatically.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("No Gemini API key is configured. Set GEMINI_API_KEY or add \"api_key\" to the config file.")]
    MissingCredential,

    #[error("The model returned no text content. Please try again.")]
    EmptyResponse,

    #[error("The model reply did not contain a usable JSON object: {detail}")]
    MalformedResponse { detail: String },

    #[error("Model call failed: {message}")]
    Transport { message: String },
}

impl From<reqwest::Error> for AuditError {
    fn from(err: reqwest::Error) -> Self {
        AuditError::Transport {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
