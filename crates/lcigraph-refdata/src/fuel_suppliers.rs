//! Which activities may supply an IAM fuel variable
//!
//! Filters are resolved against a database, so activities generated during
//! the run are picked up by resolving again after generation.

use anyhow::{Context, Result};
use lcigraph_db::{Database, Field, Filter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Name filter for one fuel variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierFilter {
    /// The activity name contains any of these.
    pub fltr: Vec<String>,
    /// ...and none of these.
    #[serde(default)]
    pub mask: Vec<String>,
}

impl SupplierFilter {
    pub fn to_filters(&self) -> Vec<Filter> {
        let mut filters = vec![Filter::either(
            self.fltr
                .iter()
                .map(|f| Filter::contains(Field::Name, f.as_str()))
                .collect(),
        )];
        if !self.mask.is_empty() {
            filters.push(Filter::doesnt_contain_any(Field::Name, self.mask.iter()));
        }
        filters
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuelSupplierMap {
    filters: BTreeMap<String, SupplierFilter>,
}

impl FuelSupplierMap {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("parsing fuel supplier filters")
    }

    pub fn load_yaml(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_yaml_str(&text)
    }

    pub fn insert(&mut self, variable: &str, filter: SupplierFilter) {
        self.filters.insert(variable.to_string(), filter);
    }

    pub fn filter(&self, variable: &str) -> Option<&SupplierFilter> {
        self.filters.get(variable)
    }

    /// Activity names in `db` that may supply each fuel variable.
    pub fn names_in(&self, db: &Database) -> BTreeMap<String, BTreeSet<String>> {
        self.filters
            .iter()
            .map(|(variable, filter)| {
                let filters = filter.to_filters();
                let names = db
                    .get_many(&filters)
                    .into_iter()
                    .map(|a| a.name.clone())
                    .collect();
                (variable.clone(), names)
            })
            .collect()
    }
}
