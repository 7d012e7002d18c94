use crate::aggregate::aggregate_findings;
use crate::config::PipelineConfig;
use crate::core::{classify, detect_language, fingerprint_project};
use crate::invokers::{
    BearerScanner, ExternalScanner, ScanOutcome, SemgrepScanner, TrivyScanner,
};
use crate::llm::{DuplicateDetector, EnrichmentEngine, ModelPairJudge, TextGenerator};
use crate::report::{PipelineReport, ProjectProfile, ScanRecord};
use anyhow::{ensure, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// One run of the whole pipeline. Everything is sequential and blocking:
/// scanners launch one after another, and model calls are awaited one at a
/// time. The generator is optional; without one the model stages are
/// skipped and the report carries empty enrichment sections.
pub struct ScanPipeline {
    config: PipelineConfig,
    scanners: Vec<Box<dyn ExternalScanner>>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl ScanPipeline {
    /// Default scanner set in invocation order: Bearer, Semgrep, Trivy.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            scanners: vec![
                Box::new(BearerScanner),
                Box::new(SemgrepScanner),
                Box::new(TrivyScanner),
            ],
            generator: None,
        }
    }

    pub fn with_scanners(mut self, scanners: Vec<Box<dyn ExternalScanner>>) -> Self {
        self.scanners = scanners;
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self, target: &Path) -> Result<PipelineReport> {
        ensure!(
            target.is_dir(),
            "scan target {} is not a directory",
            target.display()
        );
        info!(target = %target.display(), "starting scan pipeline");

        let language = detect_language(target).to_string();
        let fingerprint =
            fingerprint_project(target).context("fingerprinting project tree")?;
        info!(%language, %fingerprint, "profiled project");

        let mut scans = Vec::with_capacity(self.scanners.len());
        for scanner in &self.scanners {
            info!(scanner = scanner.id(), "invoking external scanner");
            let outcome = scanner.invoke(target);
            if let ScanOutcome::Failed { reason } = &outcome {
                warn!(scanner = scanner.id(), %reason, "scanner did not launch");
            }
            scans.push(ScanRecord {
                id: scanner.id().to_string(),
                name: scanner.name().to_string(),
                outcome,
            });
        }

        let mut findings = aggregate_findings(&self.config.work_dir)
            .context("aggregating scanner reports")?;
        info!(count = findings.len(), "aggregated findings");

        classify(&mut findings, &self.config.risk);

        let (enriched, duplicates) = match &self.generator {
            Some(generator) => {
                let enriched = EnrichmentEngine::new(Arc::clone(generator))
                    .with_max_output_tokens(self.config.generation.max_output_tokens)
                    .enrich_all(&findings)
                    .await
                    .context("generating summaries and recommendations")?;

                let judge = ModelPairJudge::new(Arc::clone(generator))
                    .with_max_output_tokens(self.config.generation.max_output_tokens);
                let duplicates = DuplicateDetector::new(Arc::new(judge))
                    .detect(&findings)
                    .await
                    .context("judging finding pairs for duplicates")?;

                (enriched, duplicates)
            }
            None => {
                info!("no text generator configured; skipping enrichment and duplicate detection");
                (Vec::new(), Vec::new())
            }
        };

        Ok(PipelineReport {
            project: ProjectProfile {
                language,
                fingerprint,
            },
            scans,
            findings,
            enriched,
            duplicates,
        })
    }
}
