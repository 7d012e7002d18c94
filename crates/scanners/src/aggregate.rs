//! Loads the three scanner reports and concatenates their finding lists.
//!
//! This stage is deliberately stricter than the invokers: a missing or
//! unparseable report file is fatal, where a failed scanner launch was
//! tolerated and recorded. A report that parses but lacks its findings key
//! contributes an empty list.

use crate::core::Finding;
use crate::invokers::{BearerScanner, ExternalScanner, SemgrepScanner, TrivyScanner};
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Concatenation order: Trivy, then Semgrep, then Bearer. Element order
/// within each report is preserved.
pub fn aggregate_findings(work_dir: &Path) -> Result<Vec<Finding>> {
    let sources: [&dyn ExternalScanner; 3] = [&TrivyScanner, &SemgrepScanner, &BearerScanner];

    let mut findings = Vec::new();
    for scanner in sources {
        let path = work_dir.join(scanner.output_file());
        let loaded = load_findings(&path, scanner.findings_key())?;
        debug!(
            scanner = scanner.id(),
            count = loaded.len(),
            "loaded scanner report"
        );
        findings.extend(loaded);
    }
    Ok(findings)
}

fn load_findings(path: &Path, key: &str) -> Result<Vec<Finding>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading scanner report {}", path.display()))?;
    let report: Value = serde_json::from_str(&raw)
        .with_context(|| format!("scanner report {} is not valid JSON", path.display()))?;

    let Some(items) = report.get(key).and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut findings = Vec::with_capacity(items.len());
    for item in items {
        match Finding::from_value(item.clone()) {
            Some(finding) => findings.push(finding),
            None => bail!(
                "scanner report {} holds a non-object entry under {key:?}",
                path.display()
            ),
        }
    }
    Ok(findings)
}
