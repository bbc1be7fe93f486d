//! lcigraph-refdata: static reference data
//!
//! Small delimited tables and YAML maps that parameterize the fuel and metal
//! transformations. Fuel tables ship with the crate and can be replaced by
//! files on disk; metal tables are always read from a directory.

pub mod crops;
pub mod fuel_properties;
pub mod fuel_suppliers;
pub mod metals;
pub mod table;

pub use crops::{CropClimateMap, CropProperties, CropProperty, CropType, RegionClimateMap};
pub use fuel_properties::{FuelProperties, FuelPropertyTable};
pub use fuel_suppliers::{FuelSupplierMap, SupplierFilter};
pub use metals::{
    BiosphereCodes, BiosphereFlow, ConversionFactors, EcoinventMetalFactors, MetalFlowMap,
    MetalsRefData, NameMap, TechnologyMap,
};

use anyhow::Result;
use std::path::Path;

const REGION_CLIMATE: &str = include_str!("../data/region_climate_mapping.csv");
const CROP_CLIMATE: &str = include_str!("../data/crop_climate_mapping.csv");
const FUEL_PROPERTIES: &str = include_str!("../data/fuel_properties.csv");
const CROP_PROPERTIES: &str = include_str!("../data/crops_properties.yaml");
const FUEL_SUPPLIERS: &str = include_str!("../data/fuel_suppliers.yaml");

/// Reference data read by the fuel transformations.
#[derive(Debug, Clone, Default)]
pub struct FuelsRefData {
    pub fuel_properties: FuelPropertyTable,
    pub crop_properties: CropProperties,
    pub region_climate: RegionClimateMap,
    pub crop_climate: CropClimateMap,
    pub fuel_suppliers: FuelSupplierMap,
}

impl FuelsRefData {
    /// The tables shipped with this crate.
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            fuel_properties: FuelPropertyTable::from_csv_str(FUEL_PROPERTIES)?,
            crop_properties: CropProperties::from_yaml_str(CROP_PROPERTIES)?,
            region_climate: RegionClimateMap::from_csv_str(REGION_CLIMATE)?,
            crop_climate: CropClimateMap::from_csv_str(CROP_CLIMATE)?,
            fuel_suppliers: FuelSupplierMap::from_yaml_str(FUEL_SUPPLIERS)?,
        })
    }

    /// Tables from `dir`, using the bundled copy for any file not present.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut data = Self::bundled()?;
        let path = dir.join("fuel_properties.csv");
        if path.exists() {
            data.fuel_properties = FuelPropertyTable::load_csv(&path)?;
        }
        let path = dir.join("crops_properties.yaml");
        if path.exists() {
            data.crop_properties = CropProperties::load_yaml(&path)?;
        }
        let path = dir.join("region_climate_mapping.csv");
        if path.exists() {
            data.region_climate = RegionClimateMap::load_csv(&path)?;
        }
        let path = dir.join("crop_climate_mapping.csv");
        if path.exists() {
            data.crop_climate = CropClimateMap::load_csv(&path)?;
        }
        let path = dir.join("fuel_suppliers.yaml");
        if path.exists() {
            data.fuel_suppliers = FuelSupplierMap::load_yaml(&path)?;
        }
        tracing::debug!(dir = %dir.display(), "loaded fuel reference data");
        Ok(data)
    }
}
