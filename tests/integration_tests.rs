//! Integration tests for the complete lcigraph pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - JSON snapshots → Fuels → regional markets → relinked consumers
//! - Fuels output → Metals → modified-use report
//!
//! Run with: cargo test --test integration_tests

use approx::assert_relative_eq;
use lcigraph_db::{Activity, Database, Exchange, StaticGeomap, PROP_LHV};
use lcigraph_fuels::{FuelMarket, Fuels};
use lcigraph_iam::{IamDataCollection, ScenarioConfig};
use lcigraph_metals::Metals;
use lcigraph_refdata::{FuelsRefData, MetalsRefData};
use std::path::Path;
use tempfile::tempdir;

const GEOMAP: &str = "EUR: [RER, DE, FR]\nUSA: [US]\n";

const IAM: &str = r#"{
  "model": "remind",
  "pathway": "SSP2-Base",
  "regions": ["EUR", "USA"],
  "fuel_markets": [
    {"variable": "petrol", "region": "EUR", "years": [2020, 2050], "values": [1.0, 1.0]},
    {"variable": "petrol", "region": "USA", "years": [2020, 2050], "values": [3.0, 1.0]}
  ],
  "metals": [
    {"technology": "Wind onshore", "metal": "Copper", "statistic": "median",
     "years": [2020, 2050], "values": [900.0, 600.0]}
  ]
}"#;

const CONFIG: &str = r#"{"model": "remind", "pathway": "SSP2-Base", "year": 2030}"#;

fn activity(name: &str, product: &str, location: &str) -> Activity {
    Activity::new(name, product, location, "kilogram", "ecoinvent")
}

/// Two equal-volume refineries in Europe, one in the US, the generic petrol
/// market and one consumer per region.
fn snapshot(dir: &Path) -> std::path::PathBuf {
    let mut refineries = Vec::new();
    for (location, volume) in [("DE", 50.0), ("FR", 50.0), ("US", 80.0)] {
        let mut r = activity("petrol production, unleaded", "petrol, unleaded", location);
        r.set_production_volume(volume);
        refineries.push(r);
    }

    let mut market = activity("market for petrol, unleaded", "petrol, unleaded", "RoW");
    market.exchanges.push(Exchange::technosphere(
        "petrol production, unleaded",
        "petrol, unleaded",
        "US",
        "kilogram",
        1.0,
    ));
    let low_sulfur = activity("market for petrol, low-sulfur", "petrol, low-sulfur", "RoW");

    let consumers = [("FR", 0.04), ("US", 0.06)].map(|(location, kg)| {
        let mut car = Activity::new(
            "transport, passenger car, petrol",
            "transport, passenger car",
            location,
            "kilometer",
            "ecoinvent",
        );
        car.exchanges.push(Exchange::technosphere(
            "market for petrol, unleaded",
            "petrol, unleaded",
            "RoW",
            "kilogram",
            kg,
        ));
        car.exchanges.push(Exchange::biosphere(
            "Carbon dioxide, fossil",
            &["air"],
            "kilogram",
            0.13,
        ));
        car
    });

    let mut turbine = Activity::new(
        "wind turbine construction, 2MW, onshore",
        "wind turbine, 2MW, onshore",
        "GLO",
        "unit",
        "ecoinvent",
    );
    turbine.exchanges.push(Exchange::biosphere(
        "Copper, in ground",
        &["natural resource", "in ground"],
        "kilogram",
        900.0,
    ));

    let db: Database = refineries
        .into_iter()
        .chain([market, low_sulfur, turbine])
        .chain(consumers)
        .collect();
    let path = dir.join("database.json");
    db.save_json(&path).unwrap();
    path
}

fn fuels(dir: &Path) -> Fuels<StaticGeomap> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let database = Database::load_json(&snapshot(dir)).unwrap();
    let iam = IamDataCollection::from_json_str(IAM).unwrap();
    let geomap = StaticGeomap::from_yaml_str(GEOMAP).unwrap();
    let config = ScenarioConfig::from_json_str(CONFIG)
        .unwrap()
        .with_log_dir(dir.join("logs"));
    Fuels::new(database, iam, geomap, FuelsRefData::bundled().unwrap(), config)
}

// ============================================================================
// Fuels
// ============================================================================

#[test]
fn test_petrol_market_splits_between_equal_refineries() {
    let dir = tempdir().unwrap();
    let mut fuels = fuels(dir.path());
    let assembly = fuels.generate_fuel_markets().unwrap();
    let db = fuels.into_database();

    let eur = db
        .iter()
        .find(|a| a.name == "market for petrol, unleaded" && a.location == "EUR")
        .unwrap();
    let supply: Vec<&Exchange> = eur.technosphere().collect();
    assert_eq!(supply.len(), 2);
    for exc in supply {
        assert_eq!(exc.name, "petrol production, unleaded");
        assert_relative_eq!(exc.amount, 0.5 * 42.6 / 42.6);
    }
    assert_relative_eq!(eur.property(PROP_LHV).unwrap(), 42.6);

    let usa = db
        .iter()
        .find(|a| a.name == "market for petrol, unleaded" && a.location == "USA")
        .unwrap();
    let us: Vec<&Exchange> = usa.technosphere().collect();
    assert_eq!(us.len(), 1);
    assert_eq!(us[0].location.as_deref(), Some("US"));
    assert_relative_eq!(us[0].amount, 1.0);

    assert!(assembly.record(FuelMarket::PetrolUnleaded, "USA").is_some());
    assert!(assembly.record(FuelMarket::Diesel, "EUR").is_none());
    assert!(!db.iter().any(|a| a.name.starts_with("market for petrol") && a.location == "RoW"));
}

#[test]
fn test_consumers_follow_their_region() {
    let dir = tempdir().unwrap();
    let mut fuels = fuels(dir.path());
    fuels.generate_fuel_markets().unwrap();
    let db = fuels.into_database();

    for (location, region, kg) in [("FR", "EUR", 0.04), ("US", "USA", 0.06)] {
        let car = db
            .iter()
            .find(|a| a.name == "transport, passenger car, petrol" && a.location == location)
            .unwrap();
        let fuel: Vec<&Exchange> = car.technosphere().collect();
        assert_eq!(fuel.len(), 1);
        assert_eq!(fuel[0].location.as_deref(), Some(region));
        assert_eq!(fuel[0].amount, kg);

        let market = db.by_code(&fuel[0].input.as_ref().unwrap().code).unwrap();
        assert_eq!(market.location, region);

        // fossil petrol only: nothing moves to the non-fossil flow
        assert!(!car.biosphere().any(|e| e.name == "Carbon dioxide, non-fossil"));
    }
}

#[test]
fn test_snapshot_round_trip_keeps_result() {
    let dir = tempdir().unwrap();
    let mut fuels = fuels(dir.path());
    fuels.generate_fuel_markets().unwrap();
    let db = fuels.into_database();

    let path = dir.path().join("result.json");
    db.save_json(&path).unwrap();
    let reloaded = Database::load_json(&path).unwrap();
    assert_eq!(reloaded.len(), db.len());
    assert!(reloaded.duplicate_keys().is_empty());
}

// ============================================================================
// Fuels, then metals
// ============================================================================

#[test]
fn test_metals_pass_over_fuels_output() {
    let dir = tempdir().unwrap();
    let mut fuels = fuels(dir.path());
    fuels.generate_fuel_markets().unwrap();
    let db = fuels.into_database();

    let data = dir.path().join("metals");
    std::fs::create_dir_all(&data).unwrap();
    let write = |name: &str, body: &str| std::fs::write(data.join(name), body).unwrap();
    write("ecoinvent_factors.csv", "name;product;location;Copper\n");
    write("conversion_factors.csv", "Activity;Conversion_factor\n");
    write(
        "activities_metals_map.yaml",
        "Wind onshore:\n  - wind turbine construction, 2MW, onshore\n",
    );
    write("metals_map.yaml", "Copper:\n  - Copper, in ground\n");
    write("biosphere_flows.yaml", "[]\n");

    let iam = IamDataCollection::from_json_str(IAM).unwrap();
    let config = ScenarioConfig::from_json_str(CONFIG)
        .unwrap()
        .with_log_dir(dir.path().join("logs"));
    let mut metals = Metals::new(db, iam.metals, MetalsRefData::load_dir(&data).unwrap(), config);
    let (updated, report) = metals.update_metals_use_in_database().unwrap();
    assert_eq!(updated, 1);
    assert!(report.starts_with(dir.path().join("logs")));

    let turbine = metals
        .database()
        .named("wind turbine construction, 2MW, onshore")
        .next()
        .unwrap();
    let cu = turbine.biosphere().next().unwrap();
    // 800 kg at 2030, no conversion factor, nothing embodied
    assert_relative_eq!(cu.amount, 900.0 + 800.0);
    assert_eq!(cu.comment.as_deref(), Some("0;800;Wind onshore;Copper"));
}
