//! Shared fixture: a small ecoinvent-like database and a one-region scenario

#![allow(dead_code)]

use lcigraph_db::{Activity, Database, Exchange, StaticGeomap, PROP_LHV_DRY, PROP_MOISTURE};
use lcigraph_fuels::Fuels;
use lcigraph_iam::{DataArray, IamDataCollection, ScenarioConfig};
use lcigraph_refdata::FuelsRefData;
use std::path::Path;

pub const YEAR: i32 = 2035;
pub const DB: &str = "ecoinvent";

pub const ELECTRICITY: (&str, &str, &str) = (
    "market group for electricity, low voltage",
    "electricity, low voltage",
    "kilowatt hour",
);
pub const DAC: &str = "carbon dioxide, captured from atmosphere";
pub const CO2_PRODUCT: &str = "carbon dioxide, captured from the atmosphere";
pub const ELECTROLYSIS: &str = "hydrogen production, gaseous, 25 bar, from electrolysis";
pub const FARMING: &str = "Farming and supply of sugarbeet";
pub const ETHANOL: &str = "Ethanol production, via fermentation, from sugarbeet";
pub const ETHANOL_PRODUCT: &str = "ethanol, without water, in 99.7% solution state, from fermentation";
pub const PETROL_MARKET: &str = "market for petrol, unleaded";
pub const PETROL_PRODUCTION: &str = "petrol production, unleaded";
pub const CAR: &str = "transport, passenger car, petrol";

pub fn act(name: &str, product: &str, location: &str, unit: &str) -> Activity {
    Activity::new(name, product, location, unit, DB)
}

pub fn uses(supplier: &Activity, amount: f64) -> Exchange {
    Exchange::technosphere(
        &supplier.name,
        &supplier.reference_product,
        &supplier.location,
        &supplier.unit,
        amount,
    )
    .with_input(supplier.input_ref())
}

pub fn electricity(amount: f64) -> Exchange {
    let (name, product, unit) = ELECTRICITY;
    Exchange::technosphere(name, product, "RER", unit, amount)
}

pub fn geomap() -> StaticGeomap {
    StaticGeomap::new(vec![
        ("EUR", vec!["RER", "DE", "CH"]),
        ("USA", vec!["US"]),
    ])
}

/// Suppliers, templates and consumers for every generator and market.
pub fn database() -> Database {
    let grid = act(ELECTRICITY.0, ELECTRICITY.1, "RER", ELECTRICITY.2);
    let waste_heat = act(
        "heat, from municipal waste incineration to generic market for heat district or industrial, other than natural gas",
        "heat, district or industrial, other than natural gas",
        "RoW",
        "megajoule",
    );
    let steam = act(
        "market for heat, from steam, in chemical industry",
        "heat, from steam, in chemical industry",
        "RER",
        "megajoule",
    );
    let lorry = act(
        "market for transport, freight, lorry, unspecified",
        "transport, freight, lorry, unspecified",
        "RER",
        "ton kilometer",
    );
    let ship = act(
        "market for transport, freight, sea, tanker for liquefied natural gas",
        "transport, freight, sea, tanker for liquefied natural gas",
        "RoW",
        "ton kilometer",
    );

    let mut dac = act(DAC, CO2_PRODUCT, "RER", "kilogram");
    dac.exchanges.push(electricity(0.3));
    dac.exchanges.push(uses(&steam, 5.4));

    let mut electrolysis = act(ELECTROLYSIS, "hydrogen, gaseous, 25 bar", "RER", "kilogram");
    electrolysis.exchanges.push(electricity(55.0));

    let mut acts = vec![grid, waste_heat, steam, lorry.clone(), ship, dac.clone(), electrolysis.clone()];

    for part in ["distribution", "transmission"] {
        for kind in ["dedicated hydrogen pipeline", "reassigned CNG pipeline"] {
            acts.push(act(
                &format!("{part} pipeline for hydrogen, {kind}"),
                &format!("pipeline, for hydrogen {part}"),
                "RER",
                "kilometer",
            ));
        }
    }
    for (name, unit) in [
        ("hydrogen embrittlement inhibition", "kilogram"),
        ("geological hydrogen storage", "kilogram"),
        ("hydrogenation of hydrogen", "kilogram"),
        ("dehydrogenation of hydrogen", "kilogram"),
        ("Hydrogen refuelling station", "unit"),
    ] {
        let mut aux = act(name, name, "RER", unit);
        aux.exchanges.push(electricity(0.1));
        acts.push(aux);
    }

    let mut upgrading = act("biogas upgrading - sewage sludge", "biomethane", "CH", "cubic meter");
    upgrading.exchanges.push(electricity(0.25));
    acts.push(upgrading);

    let mut methane = act(
        "methane, from electrochemical methanation, with carbon from atmospheric CO2 capture",
        "methane, synthetic",
        "RER",
        "kilogram",
    );
    methane.exchanges.push(uses(&dac, 2.75));
    methane.exchanges.push(uses(&electrolysis, 0.5));
    acts.push(methane);

    let mut methanol = act(
        "methanol, hydrogen from electrolysis, CO2 from DAC, energy allocation",
        "methanol",
        "RER",
        "kilogram",
    );
    methanol.exchanges.push(uses(&dac, 1.4));
    methanol.exchanges.push(uses(&electrolysis, 0.19));
    acts.push(methanol);

    let mut farming = act(FARMING, "sugarbeet", "RER", "kilogram");
    farming.properties.insert(PROP_LHV_DRY.to_string(), 16.0);
    farming.properties.insert(PROP_MOISTURE.to_string(), 0.75);
    farming.exchanges.push(Exchange::biosphere(
        "Occupation, annual crop",
        &["natural resource", "land"],
        "square meter-year",
        0.2,
    ));
    farming.exchanges.push(uses(&lorry, 0.05));
    let mut ethanol = act(ETHANOL, ETHANOL_PRODUCT, "RER", "kilogram");
    ethanol.exchanges.push(uses(&farming, 10.0));
    ethanol.exchanges.push(electricity(0.5));
    acts.push(farming);
    acts.push(ethanol);

    let mut refinery_eu = act(PETROL_PRODUCTION, "petrol, unleaded", "RER", "kilogram");
    refinery_eu.set_production_volume(100.0);
    let mut refinery_ch = act(PETROL_PRODUCTION, "petrol, unleaded", "CH", "kilogram");
    refinery_ch.set_production_volume(100.0);
    let mut refinery_row = act(PETROL_PRODUCTION, "petrol, unleaded", "RoW", "kilogram");
    refinery_row.set_production_volume(900.0);

    let mut market_eu = act(PETROL_MARKET, "petrol, unleaded", "RER", "kilogram");
    market_eu.exchanges.push(uses(&refinery_eu, 0.9));
    market_eu.exchanges.push(uses(&lorry, 0.08));
    let mut market_row = act(PETROL_MARKET, "petrol, unleaded", "RoW", "kilogram");
    market_row.exchanges.push(uses(&refinery_row, 1.0));
    let low_sulfur = act("market for petrol, low-sulfur", "petrol, low-sulfur", "RER", "kilogram");

    let mut car = act(CAR, "transport, passenger car", "DE", "kilometer");
    car.exchanges.push(uses(&market_eu, 0.05));
    car.exchanges.push(Exchange::biosphere(
        "Carbon dioxide, fossil",
        &["air"],
        "kilogram",
        0.16,
    ));

    let mut hydrogen_market = act("market for hydrogen, gaseous", "hydrogen, gaseous", "GLO", "kilogram");
    hydrogen_market.exchanges.push(uses(&electrolysis, 1.0));

    acts.extend([
        refinery_eu,
        refinery_ch,
        refinery_row,
        // the last location mapped to a region is its template
        market_row,
        market_eu,
        low_sulfur,
        car,
        hydrogen_market,
    ]);
    acts.into_iter().collect()
}

/// One region; petrol and sugar bioethanol split the petrol market.
pub fn iam(petrol: f64, bioethanol: f64) -> IamDataCollection {
    let mut iam = IamDataCollection::new("remind", "SSP2-Base", &["EUR"]);
    iam.fuel_markets = DataArray::new()
        .with("petrol", "EUR", &[(2020, petrol), (2050, petrol)])
        .with("bioethanol, sugar-based", "EUR", &[(2020, bioethanol), (2050, bioethanol)])
        .with("hydrogen, from electrolysis", "EUR", &[(2020, 1.0), (2050, 1.0)]);
    iam.fuel_efficiencies = DataArray::new()
        .with("Efficiency|Bioethanol|Sugar", "EUR", &[(2020, 1.0), (2050, 1.5)]);
    iam.data = DataArray::new()
        .with("Land use|Bioenergy crops|Sugar", "EUR", &[(2020, 0.02), (2050, 0.01)])
        .with("Emissions|CO2|Land use change|Sugar", "EUR", &[(2020, 6.0), (2050, 2.0)]);
    iam
}

pub fn config(log_dir: &Path) -> ScenarioConfig {
    ScenarioConfig::new("remind", "SSP2-Base", YEAR).with_log_dir(log_dir)
}

pub fn refdata() -> FuelsRefData {
    FuelsRefData::bundled().unwrap()
}

/// Route warnings to the test harness; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_test_writer()
        .try_init();
}

pub fn fuels(petrol: f64, bioethanol: f64, log_dir: &Path) -> Fuels<StaticGeomap> {
    init_tracing();
    Fuels::new(
        database(),
        iam(petrol, bioethanol),
        geomap(),
        refdata(),
        config(log_dir),
    )
}

pub fn find<'a>(db: &'a Database, name: &str, location: &str) -> &'a Activity {
    db.iter()
        .find(|a| a.name == name && a.location == location)
        .unwrap_or_else(|| panic!("no '{name}' in {location}"))
}
