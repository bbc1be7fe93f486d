//! Reference tables for the metal-intensity update
//!
//! - ecoinvent metal factors: kg of each metal already embodied, per dataset
//! - conversion factors: DLR unit of technology -> dataset reference unit
//! - technology map: DLR technology variable -> dataset names
//! - metal flow map: metal -> biosphere resource flow names
//! - biosphere codes: (name, category, subcategory, unit) -> flow code

use crate::table::{number, Table};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

// ============================================================================
// Ecoinvent factors
// ============================================================================

/// `name;product;location;<metal>;<metal>...`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EcoinventMetalFactors {
    metals: Vec<String>,
    factors: BTreeMap<(String, String, String, String), f64>,
}

impl EcoinventMetalFactors {
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let table = Table::parse(text, ';').context("parsing ecoinvent metal factors")?;
        if table.header.len() < 3 {
            bail!("ecoinvent metal factors need name, product and location columns");
        }
        let metals: Vec<String> = table.header[3..].to_vec();

        let mut factors = BTreeMap::new();
        for row in &table.rows {
            for (metal, cell) in metals.iter().zip(&row[3..]) {
                if cell.is_empty() {
                    continue;
                }
                let value = number(cell, metal)?;
                let key = (row[0].clone(), row[1].clone(), row[2].clone(), metal.clone());
                *factors.entry(key).or_insert(0.0) += value;
            }
        }
        Ok(Self { metals, factors })
    }

    pub fn load_csv(path: &Path) -> Result<Self> {
        Self::from_csv_str(&read(path)?)
    }

    pub fn has_metal(&self, metal: &str) -> bool {
        self.metals.iter().any(|m| m == metal)
    }

    /// Current embodied amount, 0 when the dataset or metal is not listed.
    pub fn factor(&self, name: &str, product: &str, location: &str, metal: &str) -> f64 {
        let key = (
            name.to_string(),
            product.to_string(),
            location.to_string(),
            metal.to_string(),
        );
        self.factors.get(&key).copied().unwrap_or(0.0)
    }
}

// ============================================================================
// Conversion factors
// ============================================================================

/// `Activity;Conversion_factor` (further columns ignored).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionFactors {
    factors: BTreeMap<String, f64>,
}

impl ConversionFactors {
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let table = Table::parse(text, ';').context("parsing metal conversion factors")?;
        let (Some(act), Some(cf)) = (table.column("Activity"), table.column("Conversion_factor"))
        else {
            bail!("conversion factors need 'Activity' and 'Conversion_factor' columns");
        };

        let mut factors = BTreeMap::new();
        for row in &table.rows {
            // first entry wins, like a lookup on the first matching row
            if !factors.contains_key(&row[act]) {
                factors.insert(row[act].clone(), number(&row[cf], "Conversion_factor")?);
            }
        }
        Ok(Self { factors })
    }

    pub fn load_csv(path: &Path) -> Result<Self> {
        Self::from_csv_str(&read(path)?)
    }

    pub fn get(&self, activity: &str) -> Option<f64> {
        self.factors.get(activity).copied()
    }
}

// ============================================================================
// One-to-many name maps
// ============================================================================

/// `key -> [names]` read from YAML, with the reverse lookup `name -> key`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameMap {
    forward: BTreeMap<String, Vec<String>>,
    reverse: BTreeMap<String, String>,
}

impl NameMap {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let forward: BTreeMap<String, Vec<String>> =
            serde_yaml::from_str(yaml).context("parsing name map")?;
        Ok(Self::from_map(forward))
    }

    pub fn load_yaml(path: &Path) -> Result<Self> {
        Self::from_yaml_str(&read(path)?)
    }

    pub fn from_map(forward: BTreeMap<String, Vec<String>>) -> Self {
        let mut reverse = BTreeMap::new();
        for (key, names) in &forward {
            for name in names {
                if let Some(previous) = reverse.insert(name.clone(), key.clone()) {
                    tracing::warn!(name = %name, previous = %previous, key = %key, "name mapped twice, last key wins");
                }
            }
        }
        Self { forward, reverse }
    }

    pub fn names(&self, key: &str) -> &[String] {
        self.forward.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn key_for(&self, name: &str) -> Option<&str> {
        self.reverse.get(name).map(String::as_str)
    }
}

/// DLR technology variable -> dataset names.
pub type TechnologyMap = NameMap;
/// Metal -> biosphere resource flow names.
pub type MetalFlowMap = NameMap;

// ============================================================================
// Biosphere flow codes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiosphereFlow {
    pub name: String,
    pub categories: Vec<String>,
    pub unit: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BiosphereCodes {
    codes: BTreeMap<(String, String, String, String), String>,
}

impl BiosphereCodes {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let flows: Vec<BiosphereFlow> =
            serde_yaml::from_str(yaml).context("parsing biosphere flow codes")?;
        Ok(flows.into_iter().collect())
    }

    pub fn load_yaml(path: &Path) -> Result<Self> {
        Self::from_yaml_str(&read(path)?)
    }

    pub fn insert(&mut self, flow: BiosphereFlow) {
        let category = flow.categories.first().cloned().unwrap_or_default();
        let subcategory = flow.categories.get(1).cloned().unwrap_or_default();
        self.codes
            .insert((flow.name, category, subcategory, flow.unit), flow.code);
    }

    pub fn code(&self, name: &str, category: &str, subcategory: &str, unit: &str) -> Option<&str> {
        self.codes
            .get(&(
                name.to_string(),
                category.to_string(),
                subcategory.to_string(),
                unit.to_string(),
            ))
            .map(String::as_str)
    }
}

impl FromIterator<BiosphereFlow> for BiosphereCodes {
    fn from_iter<I: IntoIterator<Item = BiosphereFlow>>(iter: I) -> Self {
        let mut codes = BiosphereCodes::default();
        for flow in iter {
            codes.insert(flow);
        }
        codes
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// Everything the metal updater reads, loaded from one directory:
/// `ecoinvent_factors.csv`, `conversion_factors.csv`,
/// `activities_metals_map.yaml`, `metals_map.yaml`, `biosphere_flows.yaml`.
#[derive(Debug, Clone, Default)]
pub struct MetalsRefData {
    pub ecoinvent_factors: EcoinventMetalFactors,
    pub conversion_factors: ConversionFactors,
    pub technologies: TechnologyMap,
    pub flows: MetalFlowMap,
    pub biosphere_codes: BiosphereCodes,
}

impl MetalsRefData {
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let data = Self {
            ecoinvent_factors: EcoinventMetalFactors::load_csv(&dir.join("ecoinvent_factors.csv"))?,
            conversion_factors: ConversionFactors::load_csv(&dir.join("conversion_factors.csv"))?,
            technologies: NameMap::load_yaml(&dir.join("activities_metals_map.yaml"))?,
            flows: NameMap::load_yaml(&dir.join("metals_map.yaml"))?,
            biosphere_codes: BiosphereCodes::load_yaml(&dir.join("biosphere_flows.yaml"))?,
        };
        tracing::debug!(dir = %dir.display(), "loaded metal reference data");
        Ok(data)
    }
}
