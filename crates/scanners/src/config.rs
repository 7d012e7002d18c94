use crate::core::RiskModel;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pipeline-wide settings. Loaded once at startup and passed by reference;
/// every field has a default so an empty config file (or none at all) is a
/// complete configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory the scanner report files are read from and the combined
    /// report is written to.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    #[serde(default)]
    pub risk: RiskModel,

    #[serde(default)]
    pub generation: GenerationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    #[serde(default = "default_model")]
    pub model: String,

    /// Prompts longer than this are truncated from the end before dispatch.
    #[serde(default = "default_input_token_budget")]
    pub input_token_budget: usize,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("combined_vulnerabilities.json")
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_input_token_budget() -> usize {
    512
}

fn default_max_output_tokens() -> u32 {
    150
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            report_path: default_report_path(),
            risk: RiskModel::default(),
            generation: GenerationSettings::default(),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            input_token_budget: default_input_token_budget(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Environment overrides on top of an existing config.
    pub fn apply_env(mut self) -> Self {
        if let Ok(model) = std::env::var("TROIKA_MODEL") {
            self.generation.model = model;
        }
        if let Ok(path) = std::env::var("TROIKA_REPORT_PATH") {
            self.report_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("TROIKA_WORK_DIR") {
            self.work_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn save_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
