//! Regional fuel markets weighted by the IAM fuel mix
//!
//! Every regional instance of the six fuel markets is replaced by one market
//! per IAM region. Each fuel variable contributes its energy share of the
//! regional consumption, split over the activities that can supply it and
//! converted to mass through the ratio of lower heating values.

use crate::cloner::clone_to_region;
use crate::{FuelsError, Result};
use lcigraph_db::{
    log_file_name, Activity, ActivityKey, AuditLog, Database, Exchange, ExchangeInput, Geomap,
    Relinker, PROP_FOSSIL_CO2, PROP_LHV, PROP_NON_FOSSIL_CO2,
};
use lcigraph_iam::{IamDataCollection, ScenarioConfig};
use lcigraph_refdata::{FuelProperties, FuelsRefData};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Volume assumed for a supplier that records none.
const DEFAULT_PRODUCTION_VOLUME: f64 = 1e-3;
/// kg per cubic meter, applied when supplier and market units differ.
const GAS_DENSITY: f64 = 0.679;

const CREATED_LOG_HEADER: [&str; 14] = [
    "market name",
    "location",
    "unit",
    "reference product",
    "fuel type",
    "supplier name",
    "supplier reference product",
    "supplier location",
    "supplier unit",
    "fuel mix share (energy-wise)",
    "amount supplied [kg]",
    "LHV [mj/kg]",
    "CO2 emmission factor [kg CO2]",
    "biogenic share",
];

// ============================================================================
// Markets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FuelMarket {
    PetrolUnleaded,
    PetrolLowSulfur,
    DieselLowSulfur,
    Diesel,
    NaturalGasHighPressure,
    HydrogenGaseous,
}

impl FuelMarket {
    /// Processing order.
    pub const ALL: [FuelMarket; 6] = [
        FuelMarket::PetrolUnleaded,
        FuelMarket::PetrolLowSulfur,
        FuelMarket::DieselLowSulfur,
        FuelMarket::Diesel,
        FuelMarket::NaturalGasHighPressure,
        FuelMarket::HydrogenGaseous,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FuelMarket::PetrolUnleaded => "market for petrol, unleaded",
            FuelMarket::PetrolLowSulfur => "market for petrol, low-sulfur",
            FuelMarket::DieselLowSulfur => "market for diesel, low-sulfur",
            FuelMarket::Diesel => "market for diesel",
            FuelMarket::NaturalGasHighPressure => "market for natural gas, high pressure",
            FuelMarket::HydrogenGaseous => "market for hydrogen, gaseous",
        }
    }

    pub fn product(self) -> &'static str {
        match self {
            FuelMarket::PetrolUnleaded => "petrol, unleaded",
            FuelMarket::PetrolLowSulfur => "petrol, low-sulfur",
            FuelMarket::DieselLowSulfur => "diesel, low-sulfur",
            FuelMarket::Diesel => "diesel",
            FuelMarket::NaturalGasHighPressure => "natural gas, high pressure",
            FuelMarket::HydrogenGaseous => "hydrogen, gaseous",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            FuelMarket::NaturalGasHighPressure => "cubic meter",
            _ => "kilogram",
        }
    }

    /// LHV of the fuel the market historically supplied, MJ/kg.
    pub fn reference_lhv(self) -> f64 {
        match self {
            FuelMarket::PetrolUnleaded | FuelMarket::PetrolLowSulfur => 42.6,
            FuelMarket::DieselLowSulfur | FuelMarket::Diesel => 43.0,
            FuelMarket::NaturalGasHighPressure => 47.5,
            FuelMarket::HydrogenGaseous => 120.0,
        }
    }

    /// Fuel variables and supplier products that may enter the market.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            FuelMarket::PetrolUnleaded | FuelMarket::PetrolLowSulfur => {
                &["petrol", "ethanol", "methanol", "gasoline"]
            }
            FuelMarket::DieselLowSulfur | FuelMarket::Diesel => &["diesel", "biodiesel"],
            FuelMarket::NaturalGasHighPressure => &["natural gas", "biomethane"],
            FuelMarket::HydrogenGaseous => &["hydrogen"],
        }
    }

    /// Whether the IAM fuel variable `label` feeds this market, ignoring case.
    pub fn supplies(self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.keywords().iter().any(|k| label.contains(k))
    }

    /// Supplier product fragment this market never takes.
    fn excluded_grade(self) -> Option<&'static str> {
        let product = self.product();
        if product.contains("low-sulfur") {
            Some("unleaded")
        } else if product.contains("unleaded") {
            Some("low-sulfur")
        } else {
            None
        }
    }

    /// A market is rebuilt only when the IAM reports its fuel at all.
    pub fn is_reported(self, fuel_labels: &[String]) -> bool {
        let head = self.product().split(", ").next().unwrap_or_default();
        fuel_labels.iter().any(|label| label.contains(head))
    }

    fn key(self, location: &str) -> ActivityKey {
        ActivityKey {
            name: self.name().to_string(),
            reference_product: self.product().to_string(),
            location: location.to_string(),
        }
    }

    fn is_instance(self, activity: &Activity) -> bool {
        activity.name == self.name() && activity.reference_product == self.product()
    }
}

impl fmt::Display for FuelMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Assembly result
// ============================================================================

/// Per-unit CO2 and LHV of one regional market, plus the link to it.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRecord {
    pub fossil_co2: f64,
    pub non_fossil_co2: f64,
    pub lhv: f64,
    pub input: ExchangeInput,
}

/// What the assembler built, handed to the downstream relinker.
#[derive(Debug, Clone, Default)]
pub struct MarketAssembly {
    records: BTreeMap<(FuelMarket, String), MarketRecord>,
    replaced: Vec<FuelMarket>,
}

impl MarketAssembly {
    pub fn record(&self, market: FuelMarket, region: &str) -> Option<&MarketRecord> {
        self.records.get(&(market, region.to_string()))
    }

    /// Markets whose instances were replaced, in processing order.
    pub fn replaced(&self) -> &[FuelMarket] {
        &self.replaced
    }

    pub fn is_new_market(&self, name: &str) -> bool {
        self.replaced.iter().any(|m| m.name() == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Supplier search
// ============================================================================

/// Where suppliers of a fuel variable are looked for, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    SameRegion,
    MappedLocations,
    RestOfWorld,
    Exhausted,
}

impl SearchState {
    pub fn next(self) -> Self {
        match self {
            SearchState::SameRegion => SearchState::MappedLocations,
            SearchState::MappedLocations => SearchState::RestOfWorld,
            SearchState::RestOfWorld | SearchState::Exhausted => SearchState::Exhausted,
        }
    }
}

/// Suppliers of one fuel variable for one market and region.
pub struct SupplierSearch<'a> {
    pub market: FuelMarket,
    pub region: &'a str,
    /// Activity names allowed to supply the variable.
    pub names: &'a BTreeSet<String>,
    pub geomap: &'a dyn Geomap,
}

impl SupplierSearch<'_> {
    fn accepts(&self, activity: &Activity) -> bool {
        let product = activity.reference_product.as_str();
        self.market.keywords().iter().any(|k| product.contains(k))
            && !product.contains("petroleum coke")
            && !product.contains("petroleum gas")
            && self
                .market
                .excluded_grade()
                .map_or(true, |grade| !product.contains(grade))
    }

    fn in_state(&self, activity: &Activity, state: SearchState, mapped: &[String]) -> bool {
        match state {
            SearchState::SameRegion => activity.location == self.region,
            SearchState::MappedLocations => mapped.iter().any(|l| *l == activity.location),
            SearchState::RestOfWorld => activity.location == "RoW",
            SearchState::Exhausted => false,
        }
    }

    /// Candidates of the first state that yields any, with that state.
    pub fn run<'d>(&self, db: &'d Database) -> (SearchState, Vec<&'d Activity>) {
        let mapped = self.geomap.iam_to_ecoinvent_locations(self.region);
        let mut state = SearchState::SameRegion;
        while state != SearchState::Exhausted {
            let found: Vec<&Activity> = self
                .names
                .iter()
                .flat_map(|name| db.named(name))
                .filter(|a| self.in_state(a, state, &mapped) && self.accepts(a))
                .collect();
            if !found.is_empty() {
                return (state, found);
            }
            state = state.next();
        }
        (state, Vec::new())
    }
}

/// Production-volume shares of `suppliers`, summing to one.
pub fn supplier_weights(suppliers: &[&Activity]) -> Vec<f64> {
    let volumes: Vec<f64> = suppliers
        .iter()
        .map(|s| s.production_volume().unwrap_or(DEFAULT_PRODUCTION_VOLUME))
        .collect();
    let total: f64 = volumes.iter().sum();
    if total <= 0.0 {
        let n = suppliers.len() as f64;
        return vec![1.0 / n; suppliers.len()];
    }
    volumes.into_iter().map(|v| v / total).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Assembler
// ============================================================================

/// Running totals of one regional market.
#[derive(Debug, Default)]
struct Blend {
    fossil_co2: f64,
    non_fossil_co2: f64,
    lhv: f64,
    composition: Vec<(String, f64, f64)>,
}

pub struct MarketAssembler<'a> {
    pub relinker: &'a dyn Relinker,
    pub geomap: &'a dyn Geomap,
    pub iam: &'a IamDataCollection,
    pub refdata: &'a FuelsRefData,
    pub config: &'a ScenarioConfig,
    pub regions: &'a [String],
}

impl MarketAssembler<'_> {
    fn year(&self) -> i32 {
        self.config.year
    }

    fn log_name(&self, kind: &str) -> String {
        log_file_name(kind, &self.config.model, &self.config.pathway, self.year())
    }

    /// Replace every reported fuel market in `working` by one market per
    /// region and write the deleted and created audit logs.
    pub fn assemble(&self, working: &mut Database) -> Result<MarketAssembly> {
        let log = AuditLog::new(&self.config.log_dir);
        let names_in = self.refdata.fuel_suppliers.names_in(working);
        let mut assembly = MarketAssembly::default();
        let mut created_rows: Vec<Vec<String>> = Vec::new();

        for market in FuelMarket::ALL {
            if !market.is_reported(self.iam.fuel_labels()) {
                tracing::info!(market = %market, "fuel not reported by the IAM, market kept");
                continue;
            }

            let mut regional = Vec::with_capacity(self.regions.len());
            for region in self.regions {
                let mut ds = self.clone_market(working, market, region)?;
                let blend = self.fill(working, market, region, &names_in, &mut ds, &mut created_rows);
                self.finish(&mut ds, &blend);
                assembly.records.insert(
                    (market, region.clone()),
                    MarketRecord {
                        fossil_co2: blend.fossil_co2,
                        non_fossil_co2: blend.non_fossil_co2,
                        lhv: blend.lhv,
                        input: ds.input_ref(),
                    },
                );
                regional.push(ds);
            }

            let deleted = working.remove_where(|a| market.is_instance(a));
            log.append_rows(
                &self.log_name("deleted fuel datasets"),
                deleted
                    .iter()
                    .map(|a| [a.name.clone(), a.reference_product.clone(), a.location.clone()]),
                ';',
            )?;
            tracing::info!(market = %market, deleted = deleted.len(), created = regional.len(), "replaced fuel market");
            working.extend(regional);
            assembly.replaced.push(market);
        }

        if !created_rows.is_empty() {
            log.append_table(
                &self.log_name("created fuel markets"),
                &CREATED_LOG_HEADER,
                created_rows,
                ';',
            )?;
        }
        Ok(assembly)
    }

    /// Region's copy of the closest existing market, stripped of its supply.
    fn clone_market(&self, working: &Database, market: FuelMarket, region: &str) -> Result<Activity> {
        let mut best: BTreeMap<String, String> = BTreeMap::new();
        for existing in working.named(market.name()) {
            if existing.reference_product == market.product() {
                best.insert(
                    self.geomap.ecoinvent_to_iam_location(&existing.location),
                    existing.location.clone(),
                );
            }
        }
        let location = best.get(region).map_or("RoW", String::as_str);

        let template = working
            .find(&market.key(location))
            .or_else(|| working.find(&market.key("GLO")))
            .ok_or_else(|| FuelsError::MissingMarketTemplate {
                market: market.name().to_string(),
                region: region.to_string(),
                location: location.to_string(),
            })?;

        let mut ds = clone_to_region(template, region, working, self.relinker)?;
        ds.take_exchanges_where(|e| {
            e.is_technosphere()
                && (e.product.as_deref() == Some(market.product())
                    || ["production", "evaporation", "import"]
                        .iter()
                        .any(|k| e.name.contains(k)))
        });
        Ok(ds)
    }

    /// Append one supply exchange per (fuel variable, supplier).
    fn fill(
        &self,
        working: &Database,
        market: FuelMarket,
        region: &str,
        names_in: &BTreeMap<String, BTreeSet<String>>,
        ds: &mut Activity,
        rows: &mut Vec<Vec<String>>,
    ) -> Blend {
        let mut blend = Blend::default();
        let labels = self.iam.fuel_labels();

        let total = self.iam.fuel_markets.sum(
            labels
                .iter()
                .map(String::as_str)
                .filter(|l| market.supplies(l)),
            region,
            self.year(),
        );
        if total <= 0.0 {
            tracing::warn!(market = %market, region = %region, "no IAM consumption for market fuels");
            return blend;
        }

        for fuel in labels.iter().filter(|l| market.supplies(l)) {
            let share = self
                .iam
                .fuel_markets
                .value(fuel, region, self.year())
                .unwrap_or(0.0)
                / total;
            if share <= 0.0 {
                continue;
            }
            let Some(props) = self.refdata.fuel_properties.get(fuel) else {
                tracing::warn!(fuel = %fuel, "no fuel properties, variable skipped");
                continue;
            };
            let Some(names) = names_in.get(fuel) else {
                tracing::warn!(fuel = %fuel, "no supplier filter, variable skipped");
                continue;
            };

            let search = SupplierSearch {
                market,
                region,
                names,
                geomap: self.geomap,
            };
            let (state, suppliers) = search.run(working);
            if suppliers.is_empty() {
                tracing::warn!(market = %market, region = %region, fuel = %fuel, share, "no supplier found, variable skipped");
                continue;
            }
            tracing::debug!(market = %market, region = %region, fuel = %fuel, ?state, suppliers = suppliers.len(), "suppliers found");

            for (supplier, weight) in suppliers.iter().zip(supplier_weights(&suppliers)) {
                let cf = if supplier.unit == market.unit() { 1.0 } else { GAS_DENSITY };
                let amount = share * weight * (market.reference_lhv() / props.lhv) * cf;
                self.supply(ds, &mut blend, supplier, amount, props);
                rows.push(vec![
                    ds.name.clone(),
                    ds.location.clone(),
                    ds.unit.clone(),
                    ds.reference_product.clone(),
                    fuel.clone(),
                    supplier.name.clone(),
                    supplier.reference_product.clone(),
                    supplier.location.clone(),
                    supplier.unit.clone(),
                    format!("{share}"),
                    format!("{amount}"),
                    format!("{}", props.lhv),
                    format!("{}", props.co2),
                    format!("{}", props.biogenic_share),
                ]);
            }
            blend.composition.push((fuel.clone(), share, props.lhv));
        }
        blend
    }

    fn supply(
        &self,
        ds: &mut Activity,
        blend: &mut Blend,
        supplier: &Activity,
        amount: f64,
        props: &FuelProperties,
    ) {
        blend.fossil_co2 += props.fossil_co2(amount);
        blend.non_fossil_co2 += props.non_fossil_co2(amount);
        blend.lhv += amount * props.lhv;
        ds.exchanges.push(
            Exchange::technosphere(
                &supplier.name,
                &supplier.reference_product,
                &supplier.location,
                &supplier.unit,
                amount,
            )
            .with_input(supplier.input_ref()),
        );
    }

    fn finish(&self, ds: &mut Activity, blend: &Blend) {
        let mut comment = String::from(" Fuel market composition: ");
        for (fuel, share, lhv) in &blend.composition {
            comment.push_str(&format!(
                "{}: {:.1} pct @ {lhv} MJ/kg. ",
                capitalize(fuel),
                share * 100.0
            ));
        }
        comment.push_str(&format!("Final average LHV of {:.2} MJ/kg.", blend.lhv));
        ds.append_comment(&comment);

        ds.properties.insert(PROP_FOSSIL_CO2.to_string(), blend.fossil_co2);
        ds.properties
            .insert(PROP_NON_FOSSIL_CO2.to_string(), blend.non_fossil_co2);
        ds.properties.insert(PROP_LHV.to_string(), blend.lhv);
    }
}
