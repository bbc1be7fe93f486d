//! Physical properties of the fuels an IAM reports

use crate::table::{number, Table};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelProperties {
    /// Lower heating value, MJ/kg.
    pub lhv: f64,
    /// Combustion CO2, kg CO2/MJ.
    pub co2: f64,
    /// Share of the combustion CO2 of biogenic origin, 0..=1.
    pub biogenic_share: f64,
}

impl FuelProperties {
    /// Fossil CO2 released by burning `mass` kg.
    pub fn fossil_co2(&self, mass: f64) -> f64 {
        mass * self.lhv * self.co2 * (1.0 - self.biogenic_share)
    }

    /// Biogenic CO2 released by burning `mass` kg.
    pub fn non_fossil_co2(&self, mass: f64) -> f64 {
        mass * self.lhv * self.co2 * self.biogenic_share
    }
}

/// Properties keyed by IAM fuel variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuelPropertyTable {
    fuels: BTreeMap<String, FuelProperties>,
}

const COLUMNS: [&str; 4] = ["variable", "lhv", "co2", "biogenic_share"];

impl FuelPropertyTable {
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let table = Table::parse(text, ';').context("parsing fuel properties")?;
        let mut idx = [0usize; 4];
        for (slot, name) in idx.iter_mut().zip(COLUMNS) {
            *slot = match table.column(name) {
                Some(i) => i,
                None => bail!("fuel properties lack a '{name}' column"),
            };
        }

        let mut fuels = BTreeMap::new();
        for row in &table.rows {
            let props = FuelProperties {
                lhv: number(&row[idx[1]], "lhv")?,
                co2: number(&row[idx[2]], "co2")?,
                biogenic_share: number(&row[idx[3]], "biogenic_share")?,
            };
            if !(0.0..=1.0).contains(&props.biogenic_share) {
                bail!(
                    "biogenic share of '{}' is {}, expected 0..=1",
                    row[idx[0]],
                    props.biogenic_share
                );
            }
            fuels.insert(row[idx[0]].clone(), props);
        }
        Ok(Self { fuels })
    }

    pub fn load_csv(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_csv_str(&text)
    }

    pub fn insert(&mut self, variable: &str, props: FuelProperties) {
        self.fuels.insert(variable.to_string(), props);
    }

    pub fn get(&self, variable: &str) -> Option<&FuelProperties> {
        self.fuels.get(variable)
    }

    pub fn len(&self) -> usize {
        self.fuels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fuels.is_empty()
    }
}
