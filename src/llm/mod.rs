pub mod client;
pub mod error;

pub use client::LlmClient;
pub use error::{CompletionError, CompletionErrorKind};
