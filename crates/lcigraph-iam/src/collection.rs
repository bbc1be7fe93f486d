//! The scenario data handed over by the IAM loader

use crate::array::DataArray;
use crate::metals::MetalIntensity;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every IAM quantity the transformations read.
///
/// - `data`: production volumes, land use (ha/GJ), land-use-change CO2
///   (kg CO2/GJ), ...
/// - `fuel_markets`: fuel consumption per fuel variable, from which mix shares
///   are derived
/// - `fuel_efficiencies`: progress factors relative to 2020
/// - `metals`: metal-intensity curves
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IamDataCollection {
    pub model: String,
    pub pathway: String,
    /// IAM regions in declaration order.
    pub regions: Vec<String>,
    #[serde(default)]
    pub data: DataArray,
    #[serde(default)]
    pub fuel_markets: DataArray,
    #[serde(default)]
    pub fuel_efficiencies: DataArray,
    #[serde(default)]
    pub metals: MetalIntensity,
}

impl IamDataCollection {
    pub fn new(model: &str, pathway: &str, regions: &[&str]) -> Self {
        Self {
            model: model.to_string(),
            pathway: pathway.to_string(),
            regions: regions.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let collection: Self = serde_json::from_str(json).context("parsing IAM data")?;
        Ok(collection)
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading IAM data from {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    /// Fuel variables in declaration order.
    pub fn fuel_labels(&self) -> &[String] {
        self.fuel_markets.variables()
    }
}
