//! lcigraph-fuels: regional fuel supply chains and fuel markets
//!
//! Two passes over a life-cycle database, parameterized by one IAM scenario:
//!
//! 1. **Supply chains** ([`Fuels::generate_fuel_supply_chains`]): regional
//!    copies of fuel production templates (direct air capture, hydrogen with
//!    its delivery chains, biogas, synthetic fuels, crop biofuels), adjusted
//!    to the scenario year.
//! 2. **Markets** ([`Fuels::generate_fuel_markets`]): every fuel market is
//!    replaced by one market per IAM region weighted by the IAM fuel mix,
//!    and every consumer is relinked to its regional market with the
//!    biogenic share of its CO2 moved to a non-fossil flow.
//!
//! Templates are always read from the database as it was handed over;
//! results accumulate in a working copy.

pub mod cloner;
pub mod generators;
pub mod markets;
pub mod physics;
pub mod relink;

pub use cloner::clone_to_region;
pub use generators::{default_generators, Context, Generator};
pub use markets::{FuelMarket, MarketAssembler, MarketAssembly, MarketRecord, SearchState, SupplierSearch};
pub use relink::relink_to_new_markets;

use lcigraph_db::{Database, DbError, Geomap, LocationCascadeRelinker};
use lcigraph_iam::{IamDataCollection, ScenarioConfig};
use lcigraph_refdata::FuelsRefData;

#[derive(Debug, thiserror::Error)]
pub enum FuelsError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),
    #[error("no template for '{market}' in region {region} (looked at {location} and GLO)")]
    MissingMarketTemplate {
        market: String,
        region: String,
        location: String,
    },
    #[error("no assembled '{market}' for region {region}")]
    MissingMarketRecord { market: String, region: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FuelsError>;

/// Fuel transformation of one scenario.
pub struct Fuels<G: Geomap> {
    original: Database,
    working: Database,
    relinker: LocationCascadeRelinker<G>,
    iam: IamDataCollection,
    refdata: FuelsRefData,
    config: ScenarioConfig,
    regions: Vec<String>,
}

impl<G: Geomap> Fuels<G> {
    pub fn new(
        database: Database,
        iam: IamDataCollection,
        geomap: G,
        refdata: FuelsRefData,
        config: ScenarioConfig,
    ) -> Self {
        let regions = config.regions(&iam);
        Self {
            original: database.clone(),
            working: database,
            relinker: LocationCascadeRelinker::new(geomap),
            iam,
            refdata,
            config,
            regions,
        }
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Run every generator in dependency order; returns the number of
    /// activities added.
    pub fn generate_fuel_supply_chains(&mut self) -> Result<usize> {
        let mut ctx = Context {
            original: &self.original,
            working: &mut self.working,
            relinker: &self.relinker,
            iam: &self.iam,
            refdata: &self.refdata,
            config: &self.config,
            regions: &self.regions,
        };
        let mut added = 0;
        for generator in default_generators() {
            let n = generator.generate(&mut ctx)?;
            tracing::info!(generator = generator.name(), added = n, "generator finished");
            added += n;
        }
        Ok(added)
    }

    /// Replace the fuel markets and relink their consumers.
    pub fn generate_fuel_markets(&mut self) -> Result<MarketAssembly> {
        let assembler = MarketAssembler {
            relinker: &self.relinker,
            geomap: self.relinker.geomap(),
            iam: &self.iam,
            refdata: &self.refdata,
            config: &self.config,
            regions: &self.regions,
        };
        let assembly = assembler.assemble(&mut self.working)?;
        relink_to_new_markets(
            &mut self.working,
            &assembly,
            self.relinker.geomap(),
            &self.regions,
        )?;
        Ok(assembly)
    }

    pub fn database(&self) -> &Database {
        &self.working
    }

    pub fn into_database(self) -> Database {
        self.working
    }
}
