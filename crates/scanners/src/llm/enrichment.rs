use crate::core::Finding;
use crate::llm::prompts;
use crate::llm::provider::{GenerationError, GenerationRequest, TextGenerator};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// A finding plus the model's free-text summary and remediation advice.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedFinding {
    pub original: Finding,
    pub summary: String,
    pub recommendation: String,
}

/// Runs the two generation tasks per finding, one call at a time. Whatever
/// text the model returns is recorded as-is; there is no retry or fallback
/// for degenerate output.
pub struct EnrichmentEngine {
    generator: Arc<dyn TextGenerator>,
    max_output_tokens: u32,
}

impl EnrichmentEngine {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            max_output_tokens: 150,
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub async fn enrich_all(
        &self,
        findings: &[Finding],
    ) -> Result<Vec<EnrichedFinding>, GenerationError> {
        let mut enriched = Vec::with_capacity(findings.len());
        for (index, finding) in findings.iter().enumerate() {
            debug!(index, "enriching finding");
            enriched.push(self.enrich(finding).await?);
        }
        Ok(enriched)
    }

    pub async fn enrich(&self, finding: &Finding) -> Result<EnrichedFinding, GenerationError> {
        let summary = self.generate(prompts::summarize_prompt(finding)).await?;
        let recommendation = self.generate(prompts::recommend_prompt(finding)).await?;

        Ok(EnrichedFinding {
            original: finding.clone(),
            summary,
            recommendation,
        })
    }

    async fn generate(&self, prompt: String) -> Result<String, GenerationError> {
        let response = self
            .generator
            .generate(GenerationRequest {
                prompt,
                max_tokens: self.max_output_tokens,
            })
            .await?;
        Ok(response.content)
    }
}
