use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One reported issue in its scanner-native shape.
///
/// The three scanners emit structurally unrelated records, and downstream
/// stages only ever interpret the `severity` field, so findings stay as the
/// untyped JSON objects they arrived as. Concatenating them into one list
/// never normalizes their schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Finding(Map<String, Value>);

impl Finding {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Accepts JSON objects only; scanner output arrays holding anything
    /// else are malformed.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The raw severity label, if the scanner attached one as a string.
    pub fn severity_label(&self) -> Option<&str> {
        self.0.get("severity").and_then(Value::as_str)
    }

    pub fn risk_score(&self) -> Option<u32> {
        self.0
            .get("risk_score")
            .and_then(Value::as_u64)
            .map(|score| score as u32)
    }

    pub fn set_risk_score(&mut self, score: u32) {
        self.0.insert("risk_score".to_string(), Value::from(score));
    }

    /// Compact JSON rendering used when a finding is embedded in a model
    /// prompt.
    pub fn to_prompt_text(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Finding {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_accepts_objects_only() {
        assert!(Finding::from_value(json!({"severity": "Low"})).is_some());
        assert!(Finding::from_value(json!("just a string")).is_none());
        assert!(Finding::from_value(json!([1, 2, 3])).is_none());
        assert!(Finding::from_value(Value::Null).is_none());
    }

    #[test]
    fn severity_label_requires_a_string() {
        let finding = Finding::from_value(json!({"severity": 8})).unwrap();
        assert_eq!(finding.severity_label(), None);

        let finding = Finding::from_value(json!({"severity": "High"})).unwrap();
        assert_eq!(finding.severity_label(), Some("High"));
    }

    #[test]
    fn risk_score_round_trips() {
        let mut finding = Finding::from_value(json!({"severity": "Medium"})).unwrap();
        assert_eq!(finding.risk_score(), None);

        finding.set_risk_score(5);
        assert_eq!(finding.risk_score(), Some(5));
        assert_eq!(finding.get("risk_score"), Some(&json!(5)));
    }

    #[test]
    fn prompt_text_is_compact_json() {
        let finding = Finding::from_value(json!({"severity": "Low", "rule": "x"})).unwrap();
        let text = finding.to_prompt_text();
        assert!(text.starts_with('{') && text.ends_with('}'));
        assert!(text.contains("\"severity\":\"Low\""));
    }

    #[test]
    fn serde_is_transparent() {
        let raw = json!({"severity": "High", "cve": "CVE-2024-1"});
        let finding: Finding = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&finding).unwrap(), raw);
    }
}
