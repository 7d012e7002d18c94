use crate::core::Finding;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical severity labels as the scanners emit them.
///
/// Parsing is exact: scanners that spell severities differently (or not at
/// all) fall through to a zero risk score rather than being guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn parse_label(label: &str) -> Option<Self> {
        match label {
            "Critical" => Some(Self::Critical),
            "High" => Some(Self::High),
            "Medium" => Some(Self::Medium),
            "Low" => Some(Self::Low),
            "Info" => Some(Self::Info),
            _ => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Critical => "🔴",
            Self::High => "🟠",
            Self::Medium => "🟡",
            Self::Low => "🟢",
            Self::Info => "🔵",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "Critical"),
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
            Self::Info => write!(f, "Info"),
        }
    }
}

/// Severity-to-score table. Constructed once, passed by reference; never
/// mutated after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskModel {
    #[serde(default = "default_critical")]
    pub critical: u32,
    #[serde(default = "default_high")]
    pub high: u32,
    #[serde(default = "default_medium")]
    pub medium: u32,
    #[serde(default = "default_low")]
    pub low: u32,
    #[serde(default = "default_info")]
    pub info: u32,
}

fn default_critical() -> u32 {
    10
}
fn default_high() -> u32 {
    8
}
fn default_medium() -> u32 {
    5
}
fn default_low() -> u32 {
    2
}
fn default_info() -> u32 {
    0
}

impl Default for RiskModel {
    fn default() -> Self {
        Self {
            critical: default_critical(),
            high: default_high(),
            medium: default_medium(),
            low: default_low(),
            info: default_info(),
        }
    }
}

impl RiskModel {
    pub fn score(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
        }
    }

    /// Unknown or absent labels score 0, not the Info score: the two only
    /// coincide under the default table.
    pub fn score_for_label(&self, label: Option<&str>) -> u32 {
        label
            .and_then(Severity::parse_label)
            .map(|severity| self.score(severity))
            .unwrap_or(0)
    }
}

/// Annotates every finding with a `risk_score` derived from its severity
/// label. Pure in-place annotation: no reordering, no filtering.
pub fn classify(findings: &mut [Finding], risk: &RiskModel) {
    for finding in findings.iter_mut() {
        let score = risk.score_for_label(finding.severity_label());
        finding.set_risk_score(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn finding(value: serde_json::Value) -> Finding {
        Finding::from_value(value).unwrap()
    }

    #[test]
    fn default_table_matches_documented_scores() {
        let risk = RiskModel::default();
        assert_eq!(risk.score(Severity::Critical), 10);
        assert_eq!(risk.score(Severity::High), 8);
        assert_eq!(risk.score(Severity::Medium), 5);
        assert_eq!(risk.score(Severity::Low), 2);
        assert_eq!(risk.score(Severity::Info), 0);
    }

    #[test]
    fn unknown_labels_score_zero() {
        let risk = RiskModel::default();
        assert_eq!(risk.score_for_label(Some("Severe")), 0);
        assert_eq!(risk.score_for_label(Some("critical")), 0);
        assert_eq!(risk.score_for_label(Some("")), 0);
        assert_eq!(risk.score_for_label(None), 0);
    }

    #[test]
    fn classify_annotates_in_place() {
        let risk = RiskModel::default();
        let mut findings = vec![
            finding(json!({"severity": "High", "id": "CVE-2024-0001"})),
            finding(json!({"severity": "bogus"})),
            finding(json!({"check_id": "rule.no-severity"})),
        ];

        classify(&mut findings, &risk);

        assert_eq!(findings[0].risk_score(), Some(8));
        assert_eq!(findings[1].risk_score(), Some(0));
        assert_eq!(findings[2].risk_score(), Some(0));
        assert_eq!(findings[0].get("id"), Some(&json!("CVE-2024-0001")));
    }

    #[test]
    fn risk_model_deserializes_with_partial_overrides() {
        let risk: RiskModel = serde_yaml::from_str("critical: 100\n").unwrap();
        assert_eq!(risk.critical, 100);
        assert_eq!(risk.high, 8);
        assert_eq!(risk.info, 0);
    }

    #[test]
    fn severity_labels_round_trip() {
        for label in ["Critical", "High", "Medium", "Low", "Info"] {
            let severity = Severity::parse_label(label).unwrap();
            assert_eq!(severity.to_string(), label);
        }
    }
}
