//! Metal-intensity projections
//!
//! Curves of kg metal per unit of technology, keyed by
//! (technology variable, metal, statistic), e.g. `("Wind onshore", "Copper",
//! "median")`.

use crate::series::TimeSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MEDIAN: &str = "median";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetalEntry {
    pub technology: String,
    pub metal: String,
    pub statistic: String,
    pub years: Vec<i32>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MetalEntry>", into = "Vec<MetalEntry>")]
pub struct MetalIntensity {
    metals: Vec<String>,
    series: BTreeMap<(String, String, String), TimeSeries>,
}

impl MetalIntensity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, technology: &str, metal: &str, statistic: &str, series: TimeSeries) {
        if !self.metals.iter().any(|m| m == metal) {
            self.metals.push(metal.to_string());
        }
        self.series.insert(
            (technology.to_string(), metal.to_string(), statistic.to_string()),
            series,
        );
    }

    pub fn with(
        mut self,
        technology: &str,
        metal: &str,
        statistic: &str,
        points: &[(i32, f64)],
    ) -> Self {
        self.insert(technology, metal, statistic, TimeSeries::new(points.iter().copied()));
        self
    }

    /// Metals in declaration order.
    pub fn metals(&self) -> &[String] {
        &self.metals
    }

    pub fn has_technology(&self, technology: &str) -> bool {
        self.series.keys().any(|(t, _, _)| t == technology)
    }

    pub fn value(&self, technology: &str, metal: &str, statistic: &str, year: i32) -> Option<f64> {
        self.series
            .get(&(technology.to_string(), metal.to_string(), statistic.to_string()))?
            .at(year)
    }

    /// Every metal with a value for `technology` at `year`, in metal order.
    pub fn profile(&self, technology: &str, statistic: &str, year: i32) -> Vec<(String, f64)> {
        self.metals
            .iter()
            .filter_map(|m| {
                self.value(technology, m, statistic, year)
                    .map(|v| (m.clone(), v))
            })
            .collect()
    }
}

impl TryFrom<Vec<MetalEntry>> for MetalIntensity {
    type Error = String;

    fn try_from(entries: Vec<MetalEntry>) -> Result<Self, Self::Error> {
        let mut out = MetalIntensity::new();
        for e in entries {
            if e.years.len() != e.values.len() {
                return Err(format!(
                    "curve '{}' / '{}' ({}) has {} years but {} values",
                    e.technology,
                    e.metal,
                    e.statistic,
                    e.years.len(),
                    e.values.len()
                ));
            }
            let series = TimeSeries::new(e.years.into_iter().zip(e.values));
            out.insert(&e.technology, &e.metal, &e.statistic, series);
        }
        Ok(out)
    }
}

impl From<MetalIntensity> for Vec<MetalEntry> {
    fn from(m: MetalIntensity) -> Self {
        m.series
            .iter()
            .map(|((technology, metal, statistic), series)| MetalEntry {
                technology: technology.clone(),
                metal: metal.clone(),
                statistic: statistic.clone(),
                years: series.years().to_vec(),
                values: series
                    .years()
                    .iter()
                    .map(|&y| series.at(y).unwrap_or(f64::NAN))
                    .collect(),
            })
            .collect()
    }
}
