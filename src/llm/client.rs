use crate::config::Config;
use crate::llm::error::{CompletionError, NO_RESPONSE_FALLBACK};
use crate::prompt::CompletionRequest;
use async_openai::{
    config::OpenAIConfig, types::CreateChatCompletionRequestArgs, Client,
};

pub struct LlmClient {
    chat_client: Client<OpenAIConfig>,
    chat_model: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Self {
        let mut chat_config = OpenAIConfig::new().with_api_base(&config.openai_url);

        if let Some(key) = &config.openai_api_key {
            chat_config = chat_config.with_api_key(key);
        } else {
            chat_config = chat_config.with_api_key("unused");
        }

        Self {
            chat_client: Client::with_config(chat_config),
            chat_model: config.openai_model.clone(),
        }
    }

    /// One attempt per turn, no retries. Failures come back classified; an
    /// empty completion becomes the fixed fallback string.
    pub async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let api_request = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .messages(request.messages)
            .max_tokens(request.max_tokens)
            .temperature(request.temperature)
            .build()
            .map_err(CompletionError::classify)?;

        let response = self
            .chat_client
            .chat()
            .create(api_request)
            .await
            .map_err(CompletionError::classify)?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string());

        Ok(content)
    }
}
