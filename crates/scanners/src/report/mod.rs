//! Report assembly and output
//!
//! One `PipelineReport` per run: the project profile, how each scanner
//! launch went, the classified findings, and the optional model
//! enrichments. It is written once (newline-delimited JSON, one record per
//! finding) and rendered once to the console; nothing persists across runs.

use crate::core::{Finding, Severity};
use crate::invokers::ScanOutcome;
use crate::llm::{DuplicatePair, EnrichedFinding};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct ProjectProfile {
    pub language: String,
    pub fingerprint: String,
}

/// One scanner's launch record, kept verbatim in the run header even when
/// the launch failed.
#[derive(Debug)]
pub struct ScanRecord {
    pub id: String,
    pub name: String,
    pub outcome: ScanOutcome,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeverityCount {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

#[derive(Debug)]
pub struct PipelineReport {
    pub project: ProjectProfile,
    pub scans: Vec<ScanRecord>,
    pub findings: Vec<Finding>,
    pub enriched: Vec<EnrichedFinding>,
    pub duplicates: Vec<DuplicatePair>,
}

impl PipelineReport {
    /// Run header in the source wire shape: the project block plus one
    /// `<id>_results` object per scanner holding `<id>_output` or
    /// `<id>_error`.
    pub fn header_json(&self) -> Value {
        let mut root = Map::new();

        let mut project = Map::new();
        project.insert(
            "language".to_string(),
            Value::String(self.project.language.clone()),
        );
        project.insert(
            "project_hash".to_string(),
            Value::String(self.project.fingerprint.clone()),
        );
        root.insert("project".to_string(), Value::Object(project));

        for record in &self.scans {
            let (key, value) = record.outcome.report_entry(&record.id);
            let entry: Map<String, Value> = std::iter::once((key, value)).collect();
            root.insert(format!("{}_results", record.id), Value::Object(entry));
        }

        Value::Object(root)
    }

    /// Tallies parsed severity labels; unrecognized or absent labels count
    /// as Info, consistent with their zero score.
    pub fn count_by_severity(&self) -> SeverityCount {
        let mut count = SeverityCount::default();
        for finding in &self.findings {
            match finding.severity_label().and_then(Severity::parse_label) {
                Some(Severity::Critical) => count.critical += 1,
                Some(Severity::High) => count.high += 1,
                Some(Severity::Medium) => count.medium += 1,
                Some(Severity::Low) => count.low += 1,
                Some(Severity::Info) | None => count.info += 1,
            }
        }
        count
    }

    /// Writes the classified findings as newline-delimited JSON, one record
    /// per finding.
    pub fn write_ndjson(&self, path: &Path) -> Result<()> {
        let mut body = String::new();
        for finding in &self.findings {
            let line = serde_json::to_string(finding).context("serializing finding")?;
            body.push_str(&line);
            body.push('\n');
        }
        fs::write(path, body)
            .with_context(|| format!("writing combined report {}", path.display()))?;
        Ok(())
    }

    pub fn render_console(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{}\n{}\n",
            "🔍 Troika Security Scan".bright_blue().bold(),
            "=".repeat(50).bright_blue()
        ));
        out.push_str(&format!("📁 Language: {}\n", self.project.language));
        out.push_str(&format!("🔑 Fingerprint: {}\n\n", self.project.fingerprint));

        out.push_str(&format!("{}\n", "Scanners".bold()));
        for record in &self.scans {
            match &record.outcome {
                ScanOutcome::Completed { .. } => {
                    out.push_str(&format!("  ✅ {} completed\n", record.name));
                }
                ScanOutcome::Failed { reason } => {
                    out.push_str(&format!(
                        "  ❌ {} failed: {}\n",
                        record.name,
                        reason.bright_red()
                    ));
                }
            }
        }
        out.push('\n');

        if !self.enriched.is_empty() {
            out.push_str(&format!(
                "{}\n",
                "Summarized findings and recommendations".bold()
            ));
            for entry in &self.enriched {
                out.push_str(&format!("  • {}\n", entry.summary));
                out.push_str(&format!("    ↳ {}\n", entry.recommendation));
            }
            out.push('\n');
        }

        if !self.duplicates.is_empty() {
            out.push_str(&format!("{}\n", "Duplicate findings".bold()));
            for pair in &self.duplicates {
                out.push_str(&format!(
                    "  Duplicate: {} and {} - Reason: {}\n",
                    pair.first.to_prompt_text(),
                    pair.second.to_prompt_text(),
                    pair.justification
                ));
            }
            out.push('\n');
        }

        let count = self.count_by_severity();
        out.push_str(&format!(
            "{} ({} total)\n",
            "Classified findings".bold(),
            self.findings.len()
        ));
        out.push_str(&format!(
            "  {} {}  {} {}  {} {}  {} {}  {} {}\n",
            Severity::Critical.emoji(),
            count.critical,
            Severity::High.emoji(),
            count.high,
            Severity::Medium.emoji(),
            count.medium,
            Severity::Low.emoji(),
            count.low,
            Severity::Info.emoji(),
            count.info
        ));
        for finding in &self.findings {
            let score = finding.risk_score().unwrap_or(0);
            let severity = finding.severity_label().unwrap_or("Info");
            out.push_str(&format!(
                "  [{score:>2}] {severity:<8} {}\n",
                preview(&finding.to_prompt_text())
            ));
        }

        out
    }
}

/// First line's worth of a finding, enough to recognize it in the table.
fn preview(text: &str) -> String {
    const MAX: usize = 96;
    if text.len() <= MAX {
        return text.to_string();
    }
    let truncated: String = text.chars().take(MAX).collect();
    format!("{truncated}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn report_with(findings: Vec<Finding>, scans: Vec<ScanRecord>) -> PipelineReport {
        PipelineReport {
            project: ProjectProfile {
                language: "Python".to_string(),
                fingerprint: "abc123".to_string(),
            },
            scans,
            findings,
            enriched: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    #[test]
    fn header_keeps_the_source_wire_shape() {
        let report = report_with(
            Vec::new(),
            vec![
                ScanRecord {
                    id: "bearer".to_string(),
                    name: "Bearer".to_string(),
                    outcome: ScanOutcome::Completed {
                        stdout: "ok".to_string(),
                    },
                },
                ScanRecord {
                    id: "trivy".to_string(),
                    name: "Trivy".to_string(),
                    outcome: ScanOutcome::Failed {
                        reason: "not found".to_string(),
                    },
                },
            ],
        );

        let header = report.header_json();
        assert_eq!(header["project"]["language"], json!("Python"));
        assert_eq!(header["project"]["project_hash"], json!("abc123"));
        assert_eq!(header["bearer_results"]["bearer_output"], json!("ok"));
        assert_eq!(header["trivy_results"]["trivy_error"], json!("not found"));
    }

    #[test]
    fn ndjson_writes_one_record_per_finding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("combined_vulnerabilities.json");

        let mut finding = Finding::from_value(json!({"severity": "High"})).unwrap();
        finding.set_risk_score(8);
        let report = report_with(vec![finding], Vec::new());

        report.write_ndjson(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines.len(), 1);

        let record: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record["severity"], json!("High"));
        assert_eq!(record["risk_score"], json!(8));
    }

    #[test]
    fn severity_counts_bucket_unknowns_as_info() {
        let findings = vec![
            Finding::from_value(json!({"severity": "Critical"})).unwrap(),
            Finding::from_value(json!({"severity": "nonsense"})).unwrap(),
            Finding::from_value(json!({"rule": "no severity"})).unwrap(),
        ];
        let report = report_with(findings, Vec::new());

        let count = report.count_by_severity();
        assert_eq!(count.critical, 1);
        assert_eq!(count.info, 2);
    }

    #[test]
    fn console_rendering_mentions_failures_and_counts() {
        let mut finding = Finding::from_value(json!({"severity": "High"})).unwrap();
        finding.set_risk_score(8);
        let report = report_with(
            vec![finding],
            vec![ScanRecord {
                id: "semgrep".to_string(),
                name: "Semgrep".to_string(),
                outcome: ScanOutcome::Failed {
                    reason: "no such binary".to_string(),
                },
            }],
        );

        let console = report.render_console();
        assert!(console.contains("Semgrep failed"));
        assert!(console.contains("(1 total)"));
        assert!(console.contains("[ 8] High"));
    }
}
