//! Gate error types
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use std::time::Duration;

/// A violated input rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Text cannot be empty")]
    EmptyText,

    #[error("Text is too long (maximum {max_chars} characters)")]
    TextTooLong { max_chars: usize },

    #[error("Text is too large (maximum {max_bytes} bytes)")]
    TextTooLarge { max_bytes: usize },

    #[error("Query contains unsupported characters")]
    MarkupCharacters,

    #[error("Language code cannot be empty")]
    EmptyLangCode,

    #[error("Invalid language code format (maximum {max_len} characters)")]
    LangCodeTooLong { max_len: usize },

    #[error("Language code contains invalid characters")]
    LangCodeCharacters,
}

/// Terminal failure of a gated request. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("upstream returned no usable data")]
    UpstreamEmpty,

    #[error("upstream timed out after {0:?}")]
    UpstreamTimeout(Duration),

    #[error("upstream error: {0}")]
    UpstreamError(String),
}

impl GateError {
    /// Text suitable for showing to the user who made the request
    pub fn user_message(&self) -> String {
        match self {
            GateError::InvalidInput(e) => format!("❌ **Invalid input:** {e}"),
            GateError::RateLimited => {
                "⏳ **Rate limit exceeded!** Please wait a moment before trying again.".to_string()
            }
            GateError::UpstreamEmpty => {
                "❌ **No result.** The service returned nothing for this request.".to_string()
            }
            GateError::UpstreamTimeout(_) => {
                "⏱️ **Timeout!** The request took too long. Please try again.".to_string()
            }
            GateError::UpstreamError(msg) => format!("❌ **Request failed:** {msg}"),
        }
    }

    /// Whether the failure came from the upstream rather than the caller's input or quota
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            GateError::UpstreamEmpty | GateError::UpstreamTimeout(_) | GateError::UpstreamError(_)
        )
    }
}
