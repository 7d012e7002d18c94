//! Text-generation integration for finding triage
//!
//! The provider abstraction keeps the model an opaque collaborator: the
//! pipeline only ever asks `generate(prompt) -> text`. The enrichment engine
//! produces per-finding summaries and remediation text, and the duplicate
//! detector judges unordered finding pairs through the same provider. Tests
//! run against the deterministic mock instead of real weights.

pub mod duplicates;
pub mod enrichment;
pub mod mock_provider;
pub mod prompts;
pub mod provider;

pub use duplicates::{DuplicateDetector, DuplicatePair, ModelPairJudge, PairJudge};
pub use enrichment::{EnrichedFinding, EnrichmentEngine};
pub use mock_provider::MockProvider;
pub use provider::{
    GenerationError, GenerationRequest, GenerationResponse, OpenAIProvider, TextGenerator,
};
