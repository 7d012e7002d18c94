//! Task-prefixed prompt construction.
//!
//! The model receives the finding's compact JSON behind one of three fixed
//! task prefixes. The wire format is part of the model contract; changing a
//! prefix changes what the pretrained model does with the input.

use crate::core::Finding;

pub fn summarize_prompt(finding: &Finding) -> String {
    format!("summarize: {}", finding.to_prompt_text())
}

pub fn recommend_prompt(finding: &Finding) -> String {
    format!("recommend: {}", finding.to_prompt_text())
}

pub fn compare_prompt(first: &Finding, second: &Finding) -> String {
    format!(
        "compare: {} and {}",
        first.to_prompt_text(),
        second.to_prompt_text()
    )
}
