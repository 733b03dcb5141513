//! Configuration management for the resume curator

use crate::curate::{CurationOptions, RecencyConfig, ScorerConfig, SelectorConfig};
use crate::error::{Result, ResumeCuratorError};
use crate::metrics;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub curation: CurationConfig,
    pub scoring: ScoringConfig,
    pub optimizer: OptimizerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Page budget; converted to a line budget for selection.
    pub page_limit: i64,
    /// Most bullets any single entry may keep.
    pub bullet_cap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub required_weight: f64,
    pub preferred_weight: f64,
    pub keyword_weight: f64,
    pub fuzzy_threshold: f64,
    pub recency_decay: f64,
    pub recency_max_bonus: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Extra lines a rewrite may add per item; 0 keeps costs non-increasing.
    pub cost_tolerance: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            curation: CurationConfig {
                page_limit: 1,
                bullet_cap: 4,
            },
            scoring: ScoringConfig {
                required_weight: 3.0,
                preferred_weight: 2.0,
                keyword_weight: 1.0,
                fuzzy_threshold: 0.9,
                recency_decay: 0.85,
                recency_max_bonus: 0.5,
            },
            optimizer: OptimizerConfig {
                enabled: true,
                endpoint: "http://localhost:11434".to_string(),
                model: "llama3.1".to_string(),
                timeout_secs: 20,
                cost_tolerance: 0,
            },
            output: OutputConfig {
                format: OutputFormat::Json,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &PathBuf) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                ResumeCuratorError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeCuratorError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-curator")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.curation.bullet_cap == 0 {
            return Err(ResumeCuratorError::Configuration(
                "curation.bullet_cap must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("scoring.required_weight", self.scoring.required_weight),
            ("scoring.preferred_weight", self.scoring.preferred_weight),
            ("scoring.keyword_weight", self.scoring.keyword_weight),
            ("scoring.recency_decay", self.scoring.recency_decay),
            ("scoring.recency_max_bonus", self.scoring.recency_max_bonus),
        ] {
            if !(value >= 0.0) {
                return Err(ResumeCuratorError::Configuration(format!(
                    "{} must be non-negative (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Pipeline options for one run. The budget is NOT validated here; the
    /// pipeline rejects non-positive budgets itself so CLI overrides get the
    /// same treatment.
    pub fn curation_options(&self) -> CurationOptions {
        CurationOptions {
            budget: metrics::pages_to_lines(self.curation.page_limit),
            scorer: ScorerConfig {
                required_weight: self.scoring.required_weight,
                preferred_weight: self.scoring.preferred_weight,
                keyword_weight: self.scoring.keyword_weight,
                fuzzy_threshold: self.scoring.fuzzy_threshold,
                recency: RecencyConfig {
                    decay: self.scoring.recency_decay,
                    max_bonus: self.scoring.recency_max_bonus,
                },
                reference_year: chrono::Utc::now().year(),
            },
            selector: SelectorConfig {
                bullet_cap: self.curation.bullet_cap,
            },
            // Covers the remote optimizer's single retry plus backoff.
            optimizer_timeout: Duration::from_secs(self.optimizer.timeout_secs * 2 + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.curation.page_limit, 1);
        assert_eq!(config.curation_options().budget, 45);
    }

    #[test]
    fn test_zero_bullet_cap_rejected() {
        let mut config = Config::default();
        config.curation.bullet_cap = 0;
        assert!(matches!(
            config.validate(),
            Err(ResumeCuratorError::Configuration(_))
        ));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.curation.page_limit, config.curation.page_limit);
        assert_eq!(parsed.optimizer.endpoint, config.optimizer.endpoint);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.curation.page_limit, 1);
    }
}
