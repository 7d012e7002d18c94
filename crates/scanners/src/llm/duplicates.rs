use crate::core::Finding;
use crate::llm::prompts;
use crate::llm::provider::{GenerationError, GenerationRequest, TextGenerator};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Two findings the judge considered equivalent, with the model's prose as
/// the only justification. No confidence score, no transitive merging.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicatePair {
    pub first: Finding,
    pub second: Finding,
    pub justification: String,
}

/// The pair decision behind a seam, so the model judge can be swapped for a
/// cheaper pre-filter without touching the pairwise orchestration.
#[async_trait]
pub trait PairJudge: Send + Sync {
    /// `Some(justification)` marks the pair a duplicate.
    async fn judge(
        &self,
        first: &Finding,
        second: &Finding,
    ) -> Result<Option<String>, GenerationError>;
}

/// Model-backed judge: the verdict is a case-insensitive substring test for
/// "duplicate" on the generated prose. Negated phrasing such as "not a
/// duplicate" also matches; that false positive is a known limitation of
/// the substring rule, kept as-is.
pub struct ModelPairJudge {
    generator: Arc<dyn TextGenerator>,
    max_output_tokens: u32,
}

const DUPLICATE_MARKER: &str = "duplicate";

impl ModelPairJudge {
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
}

#[async_trait]
impl PairJudge for ModelPairJudge {
    async fn judge(
        &self,
        first: &Finding,
        second: &Finding,
    ) -> Result<Option<String>, GenerationError> {
        let response = self
            .generator
            .generate(GenerationRequest {
                prompt: prompts::compare_prompt(first, second),
                max_tokens: self.max_output_tokens,
            })
            .await?;

        if response.content.to_lowercase().contains(DUPLICATE_MARKER) {
            Ok(Some(response.content))
        } else {
            Ok(None)
        }
    }
}

/// Compares every unordered pair. Quadratic and unbounded: N findings cost
/// N·(N−1)/2 judgments, one at a time.
pub struct DuplicateDetector {
    judge: Arc<dyn PairJudge>,
}

impl DuplicateDetector {
    pub fn new(judge: Arc<dyn PairJudge>) -> Self {
        Self { judge }
    }

    pub fn from_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(Arc::new(ModelPairJudge::new(generator)))
    }

    pub async fn detect(
        &self,
        findings: &[Finding],
    ) -> Result<Vec<DuplicatePair>, GenerationError> {
        let mut duplicates = Vec::new();

        for i in 0..findings.len() {
            for j in (i + 1)..findings.len() {
                debug!(first = i, second = j, "judging finding pair");
                if let Some(justification) =
                    self.judge.judge(&findings[i], &findings[j]).await?
                {
                    duplicates.push(DuplicatePair {
                        first: findings[i].clone(),
                        second: findings[j].clone(),
                        justification,
                    });
                }
            }
        }

        Ok(duplicates)
    }
}
