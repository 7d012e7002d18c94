use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API error: {0}")]
    Api(String),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("provider configuration error: {0}")]
    Configuration(String),
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct GenerationResponse {
    pub content: String,
    pub model: String,
}

/// The model contract the pipeline depends on: prompt in, prose out.
///
/// Implementations own truncation to their input budget; callers never see
/// whether a long finding lost fields off the end of its prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;

    fn model_name(&self) -> &str;

    fn input_token_budget(&self) -> usize {
        512
    }

    fn estimate_tokens(&self, text: &str) -> usize {
        text.len() / 4
    }

    /// Truncates from the end to fit the input budget. The 4-chars-per-token
    /// estimate mirrors `estimate_tokens`.
    fn truncate_to_budget(&self, prompt: &str) -> String {
        let budget_chars = self.input_token_budget().saturating_mul(4);
        if prompt.len() <= budget_chars {
            return prompt.to_string();
        }
        prompt.chars().take(budget_chars).collect()
    }
}

pub struct OpenAIProvider {
    client: Client<OpenAIConfig>,
    model: String,
    input_token_budget: usize,
    max_retries: u32,
}

impl OpenAIProvider {
    pub fn new(model: Option<String>) -> Result<Self, GenerationError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| GenerationError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        Ok(Self::with_config(
            api_key,
            model.unwrap_or_else(|| "gpt-4o-mini".to_string()),
        ))
    }

    pub fn with_config(api_key: String, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);

        Self {
            client,
            model,
            input_token_budget: 512,
            max_retries: 3,
        }
    }

    pub fn with_input_token_budget(mut self, budget: usize) -> Self {
        self.input_token_budget = budget;
        self
    }
}

#[async_trait]
impl TextGenerator for OpenAIProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let prompt = self.truncate_to_budget(&request.prompt);

        debug!(
            model = %self.model,
            max_tokens = request.max_tokens,
            prompt_tokens_estimate = self.estimate_tokens(&prompt),
            "dispatching generation request"
        );

        let user_message = ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(prompt),
            ..Default::default()
        };

        let api_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestMessage::User(user_message)])
            .max_tokens(request.max_tokens.min(u16::MAX as u32) as u16)
            .build()
            .map_err(|e| GenerationError::Api(e.to_string()))?;

        let mut attempt = 0;
        let response = loop {
            attempt += 1;

            match self.client.chat().create(api_request.clone()).await {
                Ok(response) => break response,
                Err(error) => {
                    warn!(attempt, %error, "generation request failed");

                    if attempt >= self.max_retries {
                        return Err(GenerationError::Api(error.to_string()));
                    }

                    let wait = if error.to_string().contains("rate") {
                        Duration::from_secs(2_u64.pow(attempt))
                    } else {
                        Duration::from_millis(100 * attempt as u64)
                    };
                    tokio::time::sleep(wait).await;
                }
            }
        };

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(GenerationResponse {
            content,
            model: response.model,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn input_token_budget(&self) -> usize {
        self.input_token_budget
    }
}
