//! Ecoinvent location <-> IAM region mapping
//!
//! The topology is a YAML mapping of IAM region to the ecoinvent locations it
//! covers, in declaration order:
//!
//! ```yaml
//! EUR: [DE, FR, IT, RER]
//! USA: [US]
//! ```

use crate::Result;
use ahash::AHashMap;
use std::path::Path;

pub trait Geomap {
    /// IAM regions in declaration order.
    fn iam_regions(&self) -> &[String];

    /// IAM region covering an ecoinvent location.
    fn ecoinvent_to_iam_location(&self, location: &str) -> String;

    /// Ecoinvent locations covered by an IAM region.
    fn iam_to_ecoinvent_locations(&self, region: &str) -> Vec<String>;
}

impl<G: Geomap + ?Sized> Geomap for &G {
    fn iam_regions(&self) -> &[String] {
        (**self).iam_regions()
    }

    fn ecoinvent_to_iam_location(&self, location: &str) -> String {
        (**self).ecoinvent_to_iam_location(location)
    }

    fn iam_to_ecoinvent_locations(&self, region: &str) -> Vec<String> {
        (**self).iam_to_ecoinvent_locations(region)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticGeomap {
    regions: Vec<String>,
    topology: AHashMap<String, Vec<String>>,
    reverse: AHashMap<String, String>,
}

impl StaticGeomap {
    pub fn new<I, S>(topology: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let mut map = Self::default();
        for (region, locations) in topology {
            let region: String = region.into();
            let locations: Vec<String> = locations.into_iter().map(Into::into).collect();
            for loc in &locations {
                // first declaration wins
                map.reverse
                    .entry(loc.clone())
                    .or_insert_with(|| region.clone());
            }
            map.regions.push(region.clone());
            map.topology.insert(region, locations);
        }
        map
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // `Mapping` keeps the file order, which fixes the region order
        let mapping: serde_yaml::Mapping = serde_yaml::from_str(yaml)?;
        let mut topology = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let region: String = serde_yaml::from_value(key)?;
            let locations: Vec<String> = serde_yaml::from_value(value)?;
            topology.push((region, locations));
        }
        Ok(Self::new(topology))
    }

    pub fn load_yaml(path: &Path) -> Result<Self> {
        Self::from_yaml_str(&std::fs::read_to_string(path)?)
    }
}

impl Geomap for StaticGeomap {
    fn iam_regions(&self) -> &[String] {
        &self.regions
    }

    fn ecoinvent_to_iam_location(&self, location: &str) -> String {
        if let Some(region) = self.reverse.get(location) {
            return region.clone();
        }
        if self.topology.contains_key(location) {
            return location.to_string();
        }
        self.reverse
            .get("RoW")
            .or_else(|| self.regions.first())
            .cloned()
            .unwrap_or_else(|| location.to_string())
    }

    fn iam_to_ecoinvent_locations(&self, region: &str) -> Vec<String> {
        self.topology
            .get(region)
            .cloned()
            .unwrap_or_else(|| vec!["RoW".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPOLOGY: &str = "\
USA: [US, CA]
EUR: [DE, FR, RER]
World: [GLO, RoW]
";

    #[test]
    fn yaml_order_is_region_order() {
        let geo = StaticGeomap::from_yaml_str(TOPOLOGY).unwrap();
        assert_eq!(geo.iam_regions(), ["USA", "EUR", "World"]);
        assert_eq!(geo.iam_to_ecoinvent_locations("EUR"), ["DE", "FR", "RER"]);
    }

    #[test]
    fn unknown_locations_fall_back() {
        let geo = StaticGeomap::from_yaml_str(TOPOLOGY).unwrap();
        assert_eq!(geo.ecoinvent_to_iam_location("FR"), "EUR");
        assert_eq!(geo.ecoinvent_to_iam_location("USA"), "USA");
        assert_eq!(geo.ecoinvent_to_iam_location("BR"), "World");
        assert_eq!(geo.iam_to_ecoinvent_locations("OAS"), ["RoW"]);

        let no_row = StaticGeomap::new(vec![("CHA", vec!["CN"]), ("IND", vec!["IN"])]);
        assert_eq!(no_row.ecoinvent_to_iam_location("BR"), "CHA");
    }
}
