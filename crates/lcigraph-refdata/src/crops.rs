//! Region -> climate -> crop mappings and crop properties

use crate::table::Table;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Crop families an IAM distinguishes for first- and second-generation
/// biofuels. Declaration order is processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropType {
    Sugar,
    Oil,
    Wood,
    Grass,
    Grain,
}

impl CropType {
    pub const ALL: [CropType; 5] = [
        CropType::Sugar,
        CropType::Oil,
        CropType::Wood,
        CropType::Grass,
        CropType::Grain,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CropType::Sugar => "sugar",
            CropType::Oil => "oil",
            CropType::Wood => "wood",
            CropType::Grass => "grass",
            CropType::Grain => "grain",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Oil crops are converted by transesterification, the rest by fermentation.
    pub fn conversion_keyword(self) -> &'static str {
        match self {
            CropType::Oil => "via transesterification",
            _ => "via fermentation",
        }
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Region -> climate
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionClimateMap {
    climates: BTreeMap<String, String>,
}

impl RegionClimateMap {
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let table = Table::parse(text, ';').context("parsing region/climate mapping")?;
        if table.header.len() != 2 {
            bail!("region/climate mapping needs two columns, found {}", table.header.len());
        }
        let climates = table
            .rows
            .into_iter()
            .map(|row| (row[0].clone(), row[1].clone()))
            .collect();
        Ok(Self { climates })
    }

    pub fn load_csv(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_csv_str(&text)
    }

    pub fn climate(&self, region: &str) -> Option<&str> {
        self.climates.get(region).map(String::as_str)
    }
}

// ============================================================================
// Climate -> crop per crop type
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropClimateMap {
    crops: BTreeMap<String, Vec<(CropType, String)>>,
}

impl CropClimateMap {
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let table = Table::parse(text, ';').context("parsing crop/climate mapping")?;
        let mut types = Vec::with_capacity(table.header.len().saturating_sub(1));
        for column in table.header.iter().skip(1) {
            match CropType::parse(column) {
                Some(t) => types.push(t),
                None => bail!("unknown crop type column '{column}'"),
            }
        }

        let crops = table
            .rows
            .into_iter()
            .map(|row| {
                let climate = row[0].clone();
                let crops = types
                    .iter()
                    .copied()
                    .zip(row.into_iter().skip(1))
                    .collect();
                (climate, crops)
            })
            .collect();
        Ok(Self { crops })
    }

    pub fn load_csv(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_csv_str(&text)
    }

    /// (crop type, crop) pairs grown in this climate, in column order.
    pub fn crops(&self, climate: &str) -> Option<&[(CropType, String)]> {
        self.crops.get(climate).map(Vec::as_slice)
    }
}

// ============================================================================
// Crop properties
// ============================================================================

/// IAM variable names, per model, for one crop type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropProperty {
    /// Land occupation, ha per GJ of primary crop energy.
    #[serde(default)]
    pub land_use: BTreeMap<String, String>,
    /// Land-use-change emissions, kg CO2 per GJ of primary crop energy.
    #[serde(default)]
    pub land_use_change: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropProperties {
    crops: BTreeMap<CropType, CropProperty>,
}

impl CropProperties {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("parsing crop properties")
    }

    pub fn load_yaml(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_yaml_str(&text)
    }

    pub fn get(&self, crop_type: CropType) -> Option<&CropProperty> {
        self.crops.get(&crop_type)
    }

    pub fn land_use_variable(&self, crop_type: CropType, model: &str) -> Option<&str> {
        self.get(crop_type)?
            .land_use
            .get(&model.to_lowercase())
            .map(String::as_str)
    }

    pub fn land_use_change_variable(&self, crop_type: CropType, model: &str) -> Option<&str> {
        self.get(crop_type)?
            .land_use_change
            .get(&model.to_lowercase())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_columns_follow_header() {
        let map = CropClimateMap::from_csv_str(
            "climate;oil;sugar\ntemperate;rapeseed;sugarbeet\n",
        )
        .unwrap();
        let crops = map.crops("temperate").unwrap();
        assert_eq!(crops[0], (CropType::Oil, "rapeseed".to_string()));
        assert_eq!(crops[1], (CropType::Sugar, "sugarbeet".to_string()));
        assert!(map.crops("arctic").is_none());
    }

    #[test]
    fn unknown_crop_column_fails() {
        assert!(CropClimateMap::from_csv_str("climate;algae\nx;y\n").is_err());
    }

    #[test]
    fn property_variables_by_model() {
        let props = CropProperties::from_yaml_str(
            "sugar:\n  land_use:\n    remind: LU sugar\n  land_use_change:\n    remind: LUC sugar\n",
        )
        .unwrap();
        assert_eq!(props.land_use_variable(CropType::Sugar, "REMIND"), Some("LU sugar"));
        assert_eq!(props.land_use_change_variable(CropType::Sugar, "remind"), Some("LUC sugar"));
        assert_eq!(props.land_use_variable(CropType::Sugar, "image"), None);
        assert!(props.get(CropType::Wood).is_none());
    }
}
