//! Run configuration

use crate::collection::IamDataCollection;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

/// Scenario parameters supplied by the orchestrator.
///
/// ```json
/// { "model": "remind", "pathway": "SSP2-Base", "year": 2030,
///   "regions": ["EUR", "USA"], "log_dir": "out/logs" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub model: String,
    pub pathway: String,
    pub year: i32,
    /// Optional subset of IAM regions to process, in processing order.
    #[serde(default)]
    pub regions: Option<Vec<String>>,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl ScenarioConfig {
    pub fn new(model: &str, pathway: &str, year: i32) -> Self {
        Self {
            model: model.to_string(),
            pathway: pathway.to_string(),
            year,
            regions: None,
            log_dir: default_log_dir(),
        }
    }

    pub fn with_regions(mut self, regions: &[&str]) -> Self {
        self.regions = Some(regions.iter().map(|r| r.to_string()).collect());
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing scenario configuration")
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario configuration {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    /// Regions to process: the configured subset, else every IAM region.
    pub fn regions(&self, iam: &IamDataCollection) -> Vec<String> {
        match &self.regions {
            Some(subset) => {
                for region in subset {
                    if !iam.regions.contains(region) {
                        tracing::warn!(region = %region, "configured region absent from IAM data");
                    }
                }
                subset.clone()
            }
            None => iam.regions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_log_dir() {
        let cfg = ScenarioConfig::from_json_str(
            r#"{"model": "remind", "pathway": "SSP2-Base", "year": 2030}"#,
        )
        .unwrap();
        assert_eq!(cfg.log_dir, PathBuf::from("logs"));
        assert_eq!(cfg.regions, None);
    }

    #[test]
    fn subset_overrides_iam_regions() {
        let iam = IamDataCollection::new("remind", "SSP2-Base", &["EUR", "USA", "CHA"]);
        let cfg = ScenarioConfig::new("remind", "SSP2-Base", 2030);
        assert_eq!(cfg.regions(&iam), ["EUR", "USA", "CHA"]);
        let cfg = cfg.with_regions(&["USA", "EUR"]);
        assert_eq!(cfg.regions(&iam), ["USA", "EUR"]);
    }
}
