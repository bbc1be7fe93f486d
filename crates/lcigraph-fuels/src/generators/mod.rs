//! Supply-chain generators
//!
//! Each generator reads templates from the original database, produces one
//! variant per target region (and per technology option), and appends the
//! result to the working database. Order matters: later generators link to
//! activities created by earlier ones.
//!
//! - [`Dac`]: direct air capture with three heat sources
//! - [`Hydrogen`]: production routes and multimodal delivery chains
//! - [`Biogas`]: biomethane and synthetic methane
//! - [`SyntheticFuels`]: methanol and Fischer-Tropsch fuels
//! - [`Biofuels`]: crop farming and conversion, with IAM land use

mod biofuels;
mod biogas;
mod dac;
mod hydrogen;
mod synthetic;

pub use biofuels::Biofuels;
pub use biogas::Biogas;
pub use dac::{Dac, HeatSource};
pub use hydrogen::{H2State, Hydrogen, HydrogenRoute, Vehicle, HYDROGEN_ROUTES};
pub use synthetic::{SyntheticFuels, SYNTHETIC_FUELS};

use crate::Result;
use lcigraph_db::{Activity, Database, DbError, Field, Filter, Relinker};
use lcigraph_iam::{IamDataCollection, ScenarioConfig};
use lcigraph_refdata::FuelsRefData;

pub(crate) const ELECTRICITY_MARKET: (&str, &str, &str) = (
    "market group for electricity, low voltage",
    "electricity, low voltage",
    "kilowatt hour",
);

/// Everything a generator reads, plus the working database it extends.
pub struct Context<'a> {
    pub original: &'a Database,
    pub working: &'a mut Database,
    pub relinker: &'a dyn Relinker,
    pub iam: &'a IamDataCollection,
    pub refdata: &'a FuelsRefData,
    pub config: &'a ScenarioConfig,
    pub regions: &'a [String],
}

impl Context<'_> {
    pub fn year(&self) -> i32 {
        self.config.year
    }

    /// Resolve `activity`'s suppliers in the working database.
    pub fn relink(&self, activity: &mut Activity) -> Result<()> {
        self.relinker.relink(activity, &*self.working)?;
        Ok(())
    }

    /// Append unless an activity with the same identity already exists.
    pub fn push(&mut self, activity: Activity) -> bool {
        self.working.push_unique(activity)
    }

    /// Standard provenance sentence naming the scenario.
    pub(crate) fn scenario_note(&self, region: &str) -> String {
        format!(
            "to be in line with the pathway {} of {} in {} in the region {region}.",
            self.config.pathway,
            self.config.model.to_uppercase(),
            self.config.year
        )
    }
}

/// The single template whose name contains `fragment`, or `None` with a
/// warning when the database has none.
pub(crate) fn optional_template<'t>(db: &'t Database, fragment: &str) -> Result<Option<&'t Activity>> {
    match db.get_one(&[Filter::contains(Field::Name, fragment)]) {
        Ok(template) => Ok(Some(template)),
        Err(DbError::NoResults { .. }) => {
            tracing::warn!(template = %fragment, "template not found, skipped");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub trait Generator {
    fn name(&self) -> &'static str;

    /// Generate for every region in `ctx`; returns the number of activities
    /// added to the working database.
    fn generate(&self, ctx: &mut Context<'_>) -> Result<usize>;
}

/// The generators in dependency order.
pub fn default_generators() -> Vec<Box<dyn Generator>> {
    vec![
        Box::new(Dac),
        Box::new(Hydrogen),
        Box::new(Biogas),
        Box::new(SyntheticFuels),
        Box::new(Biofuels),
    ]
}
