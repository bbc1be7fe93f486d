//! Activity and exchange records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Dry-matter lower heating value of a crop, MJ/kg.
pub const PROP_LHV_DRY: &str = "LHV [MJ/kg dry]";
/// Moisture content of a crop as received, mass fraction.
pub const PROP_MOISTURE: &str = "Moisture content [% wt]";
/// Fossil CO2 carried by one unit of an assembled market.
pub const PROP_FOSSIL_CO2: &str = "fossil CO2";
/// Biogenic CO2 carried by one unit of an assembled market.
pub const PROP_NON_FOSSIL_CO2: &str = "non-fossil CO2";
/// Blended lower heating value of an assembled market.
pub const PROP_LHV: &str = "LHV";

// ============================================================================
// Exchanges
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Production,
    Technosphere,
    Biosphere,
}

/// Link from an exchange to the supplying activity or biosphere flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeInput {
    pub database: String,
    pub code: String,
}

impl ExchangeInput {
    pub fn new(database: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            code: code.into(),
        }
    }
}

/// Uncertainty metadata. Carried along, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Uncertainty {
    pub uncertainty_type: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

/// A flow attached to an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub kind: ExchangeKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub unit: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<ExchangeInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<Uncertainty>,
}

impl Exchange {
    fn bare(kind: ExchangeKind, name: &str, unit: &str, amount: f64) -> Self {
        Self {
            kind,
            name: name.to_string(),
            product: None,
            location: None,
            unit: unit.to_string(),
            amount,
            input: None,
            categories: Vec::new(),
            comment: None,
            production_volume: None,
            uncertainty: None,
        }
    }

    pub fn production(name: &str, product: &str, location: &str, unit: &str) -> Self {
        Self {
            product: Some(product.to_string()),
            location: Some(location.to_string()),
            ..Self::bare(ExchangeKind::Production, name, unit, 1.0)
        }
    }

    pub fn technosphere(name: &str, product: &str, location: &str, unit: &str, amount: f64) -> Self {
        Self {
            product: Some(product.to_string()),
            location: Some(location.to_string()),
            ..Self::bare(ExchangeKind::Technosphere, name, unit, amount)
        }
    }

    pub fn biosphere(name: &str, categories: &[&str], unit: &str, amount: f64) -> Self {
        Self {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            ..Self::bare(ExchangeKind::Biosphere, name, unit, amount)
        }
    }

    pub fn with_input(mut self, input: ExchangeInput) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_production_volume(mut self, volume: f64) -> Self {
        self.production_volume = Some(volume);
        self
    }

    pub fn is_production(&self) -> bool {
        self.kind == ExchangeKind::Production
    }

    pub fn is_technosphere(&self) -> bool {
        self.kind == ExchangeKind::Technosphere
    }

    pub fn is_biosphere(&self) -> bool {
        self.kind == ExchangeKind::Biosphere
    }

    pub fn product_or_empty(&self) -> &str {
        self.product.as_deref().unwrap_or("")
    }
}

// ============================================================================
// Activities
// ============================================================================

/// Identity of an activity: must be unique within a database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityKey {
    pub name: String,
    pub reference_product: String,
    pub location: String,
}

impl fmt::Display for ActivityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' ({}) in {}",
            self.name, self.reference_product, self.location
        )
    }
}

/// A process record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub reference_product: String,
    pub location: String,
    pub unit: String,
    pub code: String,
    pub database: String,
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, f64>,
}

impl Activity {
    /// A new activity with a single unit production exchange.
    pub fn new(
        name: &str,
        reference_product: &str,
        location: &str,
        unit: &str,
        database: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            reference_product: reference_product.to_string(),
            location: location.to_string(),
            unit: unit.to_string(),
            code: new_code(),
            database: database.to_string(),
            exchanges: vec![Exchange::production(
                name,
                reference_product,
                location,
                unit,
            )],
            comment: String::new(),
            production_volume: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> ActivityKey {
        ActivityKey {
            name: self.name.clone(),
            reference_product: self.reference_product.clone(),
            location: self.location.clone(),
        }
    }

    /// Link that other exchanges use to point at this activity.
    pub fn input_ref(&self) -> ExchangeInput {
        ExchangeInput::new(self.database.clone(), self.code.clone())
    }

    pub fn production(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter().filter(|e| e.is_production())
    }

    pub fn production_mut(&mut self) -> impl Iterator<Item = &mut Exchange> {
        self.exchanges.iter_mut().filter(|e| e.is_production())
    }

    pub fn technosphere(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter().filter(|e| e.is_technosphere())
    }

    pub fn technosphere_mut(&mut self) -> impl Iterator<Item = &mut Exchange> {
        self.exchanges.iter_mut().filter(|e| e.is_technosphere())
    }

    pub fn biosphere(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter().filter(|e| e.is_biosphere())
    }

    pub fn biosphere_mut(&mut self) -> impl Iterator<Item = &mut Exchange> {
        self.exchanges.iter_mut().filter(|e| e.is_biosphere())
    }

    /// Rename the activity together with its production flow.
    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
        for exc in self.production_mut() {
            exc.name = name.to_string();
        }
    }

    /// Append to the provenance log.
    pub fn append_comment(&mut self, text: &str) {
        self.comment.push_str(text);
    }

    /// Volume recorded on the production exchange, else on the activity.
    pub fn production_volume(&self) -> Option<f64> {
        self.production()
            .find_map(|e| e.production_volume)
            .or(self.production_volume)
    }

    pub fn set_production_volume(&mut self, volume: f64) {
        self.production_volume = Some(volume);
        for exc in self.production_mut() {
            exc.production_volume = Some(volume);
        }
    }

    pub fn property(&self, name: &str) -> Option<f64> {
        self.properties.get(name).copied()
    }

    /// Remove the exchanges matching `remove` and return them, order kept.
    pub fn take_exchanges_where<F>(&mut self, mut remove: F) -> Vec<Exchange>
    where
        F: FnMut(&Exchange) -> bool,
    {
        let (removed, kept): (Vec<Exchange>, Vec<Exchange>) =
            std::mem::take(&mut self.exchanges)
                .into_iter()
                .partition(|e| remove(e));
        self.exchanges = kept;
        removed
    }
}

/// Fresh activity code: 32 lowercase hex digits.
pub fn new_code() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
