//! Structured completion failures.
//!
//! The adapter classifies API errors into a small kind enum from the error's
//! structured code/type fields, and each kind maps to a fixed user-facing
//! apology. Raw errors never reach Discord.

use async_openai::error::{ApiError, OpenAIError};

/// Fallback reply when the service returns an empty completion.
pub const NO_RESPONSE_FALLBACK: &str = "I could not generate a response. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionErrorKind {
    RateLimited,
    AuthConfiguration,
    Unknown,
}

impl CompletionErrorKind {
    pub fn user_message(self) -> &'static str {
        match self {
            CompletionErrorKind::RateLimited => {
                "I'm handling too many requests right now. Please try again in a moment."
            }
            CompletionErrorKind::AuthConfiguration => {
                "The language model API is not configured correctly. Please contact the server administrator."
            }
            CompletionErrorKind::Unknown => {
                "Sorry, something went wrong while generating a response. Please try again."
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("completion request failed: {source}")]
pub struct CompletionError {
    pub kind: CompletionErrorKind,
    #[source]
    pub source: OpenAIError,
}

impl CompletionError {
    pub fn classify(source: OpenAIError) -> Self {
        let kind = match &source {
            OpenAIError::ApiError(api) => classify_api_error(api),
            _ => CompletionErrorKind::Unknown,
        };
        Self { kind, source }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

fn classify_api_error(api: &ApiError) -> CompletionErrorKind {
    let code = api.code.as_deref().unwrap_or("");
    let error_type = api.r#type.as_deref().unwrap_or("");

    if code == "rate_limit_exceeded"
        || code == "insufficient_quota"
        || error_type == "rate_limit_error"
        || error_type == "tokens"
    {
        CompletionErrorKind::RateLimited
    } else if code == "invalid_api_key"
        || code == "account_deactivated"
        || error_type == "authentication_error"
    {
        CompletionErrorKind::AuthConfiguration
    } else {
        CompletionErrorKind::Unknown
    }
}
