use crate::llm::provider::{
    GenerationError, GenerationRequest, GenerationResponse, TextGenerator,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deterministic provider for tests: routes on the first substring pattern
/// found in the prompt, counts calls, and can be built to fail.
pub struct MockProvider {
    responses: Vec<(String, String)>,
    default_response: String,
    call_count: AtomicUsize,
    should_fail: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: vec![
                (
                    "summarize:".to_string(),
                    "Summary: the finding describes a dependency vulnerability.".to_string(),
                ),
                (
                    "recommend:".to_string(),
                    "Recommendation: upgrade the affected package.".to_string(),
                ),
                (
                    "compare:".to_string(),
                    "The two findings describe unrelated issues.".to_string(),
                ),
            ],
            default_response: "No analysis available.".to_string(),
            call_count: AtomicUsize::new(0),
            should_fail: false,
        }
    }

    pub fn failing() -> Self {
        let mut provider = Self::new();
        provider.should_fail = true;
        provider
    }

    /// Prepends a pattern so it takes precedence over the defaults.
    pub fn with_response(mut self, pattern: &str, response: &str) -> Self {
        self.responses
            .insert(0, (pattern.to_string(), response.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn respond_to(&self, prompt: &str) -> String {
        for (pattern, response) in &self.responses {
            if prompt.contains(pattern.as_str()) {
                return response.clone();
            }
        }
        self.default_response.clone()
    }
}

#[async_trait]
impl TextGenerator for MockProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(GenerationError::Api(
                "mock provider configured to fail".to_string(),
            ));
        }

        let prompt = self.truncate_to_budget(&request.prompt);
        Ok(GenerationResponse {
            content: self.respond_to(&prompt),
            model: "mock-model".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.to_string(),
            max_tokens: 150,
        }
    }

    #[tokio::test]
    async fn routes_on_task_prefix() {
        let provider = MockProvider::new();

        let response = provider
            .generate(request("summarize: {\"severity\":\"High\"}"))
            .await
            .unwrap();
        assert!(response.content.starts_with("Summary:"));

        let response = provider
            .generate(request("recommend: {\"severity\":\"High\"}"))
            .await
            .unwrap();
        assert!(response.content.starts_with("Recommendation:"));
    }

    #[tokio::test]
    async fn custom_patterns_take_precedence() {
        let provider =
            MockProvider::new().with_response("compare:", "These look like duplicate reports.");

        let response = provider.generate(request("compare: {} and {}")).await.unwrap();
        assert_eq!(response.content, "These look like duplicate reports.");
    }

    #[tokio::test]
    async fn counts_calls() {
        let provider = MockProvider::new();
        assert_eq!(provider.call_count(), 0);

        provider.generate(request("anything")).await.unwrap();
        provider.generate(request("anything")).await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn failing_provider_errors() {
        let provider = MockProvider::failing();
        assert!(provider.generate(request("x")).await.is_err());
        assert_eq!(provider.call_count(), 1);
    }
}
