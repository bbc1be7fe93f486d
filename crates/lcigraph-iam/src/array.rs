//! Variable x region x year arrays

use crate::series::TimeSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub variable: String,
    pub region: String,
    pub years: Vec<i32>,
    pub values: Vec<f64>,
}

/// Time series keyed by (variable, region).
///
/// Variables keep their first-seen order, which is the iteration order used
/// by every consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SeriesEntry>", into = "Vec<SeriesEntry>")]
pub struct DataArray {
    variables: Vec<String>,
    series: BTreeMap<(String, String), TimeSeries>,
}

impl DataArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: &str, region: &str, series: TimeSeries) {
        if !self.variables.iter().any(|v| v == variable) {
            self.variables.push(variable.to_string());
        }
        self.series
            .insert((variable.to_string(), region.to_string()), series);
    }

    /// Builder form of [`DataArray::insert`].
    pub fn with(mut self, variable: &str, region: &str, points: &[(i32, f64)]) -> Self {
        self.insert(variable, region, TimeSeries::new(points.iter().copied()));
        self
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn has_variable(&self, variable: &str) -> bool {
        self.variables.iter().any(|v| v == variable)
    }

    pub fn series(&self, variable: &str, region: &str) -> Option<&TimeSeries> {
        self.series.get(&(variable.to_string(), region.to_string()))
    }

    /// Interpolated value, `None` when the pair is absent or the value NaN.
    pub fn value(&self, variable: &str, region: &str, year: i32) -> Option<f64> {
        self.series(variable, region)?.at(year)
    }

    /// Sum over the given variables; absent values count as zero.
    pub fn sum<'a, I>(&self, variables: I, region: &str, year: i32) -> f64
    where
        I: IntoIterator<Item = &'a str>,
    {
        variables
            .into_iter()
            .filter_map(|v| self.value(v, region, year))
            .sum()
    }
}

impl TryFrom<Vec<SeriesEntry>> for DataArray {
    type Error = String;

    fn try_from(entries: Vec<SeriesEntry>) -> Result<Self, Self::Error> {
        let mut array = DataArray::new();
        for entry in entries {
            if entry.years.len() != entry.values.len() {
                return Err(format!(
                    "series '{}' in '{}' has {} years but {} values",
                    entry.variable,
                    entry.region,
                    entry.years.len(),
                    entry.values.len()
                ));
            }
            let series = TimeSeries::new(entry.years.into_iter().zip(entry.values));
            array.insert(&entry.variable, &entry.region, series);
        }
        Ok(array)
    }
}

impl From<DataArray> for Vec<SeriesEntry> {
    fn from(array: DataArray) -> Self {
        let mut entries = Vec::with_capacity(array.series.len());
        for variable in &array.variables {
            for ((v, region), series) in &array.series {
                if v != variable {
                    continue;
                }
                entries.push(SeriesEntry {
                    variable: v.clone(),
                    region: region.clone(),
                    years: series.years().to_vec(),
                    values: series
                        .years()
                        .iter()
                        .map(|&y| series.at(y).unwrap_or(f64::NAN))
                        .collect(),
                });
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_keep_declaration_order() {
        let array = DataArray::new()
            .with("petrol", "EUR", &[(2020, 0.8), (2050, 0.2)])
            .with("bioethanol, wood-based", "EUR", &[(2020, 0.2), (2050, 0.8)])
            .with("diesel", "EUR", &[(2020, 1.0)]);
        assert_eq!(array.variables(), ["petrol", "bioethanol, wood-based", "diesel"]);
        assert_eq!(array.value("petrol", "EUR", 2035), Some(0.5));
        assert_eq!(array.value("petrol", "USA", 2035), None);
        let total = array.sum(["petrol", "bioethanol, wood-based"], "EUR", 2035);
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mismatched_entry_is_rejected() {
        let entry = SeriesEntry {
            variable: "diesel".into(),
            region: "EUR".into(),
            years: vec![2020, 2030],
            values: vec![1.0],
        };
        assert!(DataArray::try_from(vec![entry]).is_err());
    }
}
