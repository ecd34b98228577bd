//! Error types for the Gemini adapter

use swarm_application::ReasoningError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("API key not set: environment variable {0} is empty")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Prompt blocked: {0}")]
    Blocked(String),

    #[error("No candidate text in response")]
    Empty,
}

impl From<GeminiError> for ReasoningError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Http(e) if e.is_timeout() => ReasoningError::Timeout,
            GeminiError::Status { status, .. } if status == 429 || status >= 500 => {
                ReasoningError::Unavailable(err.to_string())
            }
            e @ (GeminiError::Status { .. } | GeminiError::Blocked(_) | GeminiError::MissingApiKey(_)) => {
                ReasoningError::Rejected(e.to_string())
            }
            GeminiError::Empty => ReasoningError::EmptyResponse,
            e => ReasoningError::Unavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let busy: ReasoningError = GeminiError::Status {
            status: 503,
            body: "overloaded".into(),
        }
        .into();
        assert!(matches!(busy, ReasoningError::Unavailable(_)));

        let bad: ReasoningError = GeminiError::Status {
            status: 400,
            body: "invalid argument".into(),
        }
        .into();
        assert!(matches!(bad, ReasoningError::Rejected(_)));

        let empty: ReasoningError = GeminiError::Empty.into();
        assert!(matches!(empty, ReasoningError::EmptyResponse));
    }
}
