//! Supply-Chain Generator Tests

mod common;

use approx::assert_relative_eq;
use common::*;
use lcigraph_db::{ExchangeKind, Field, Filter};
use lcigraph_fuels::generators::{H2State, HeatSource, Vehicle};
use lcigraph_fuels::physics::electrolysis_electricity;
use tempfile::tempdir;

fn generated() -> lcigraph_db::Database {
    let dir = tempdir().unwrap();
    let mut fuels = fuels(50.0, 50.0, dir.path());
    fuels.generate_fuel_supply_chains().unwrap();
    fuels.into_database()
}

// ============================================================================
// Counts and identity
// ============================================================================

#[test]
fn test_generators_add_expected_activities() {
    let dir = tempdir().unwrap();
    let mut fuels = fuels(50.0, 50.0, dir.path());
    let before = fuels.database().len();

    let added = fuels.generate_fuel_supply_chains().unwrap();

    // DAC 3, hydrogen 1 + 5 auxiliaries + 12 chains, biogas 1 + 2,
    // methanol 1, biofuels 2
    assert_eq!(added, 27);
    assert_eq!(fuels.database().len(), before + added);
}

#[test]
fn test_no_duplicate_identity_after_generation() {
    let db = generated();
    assert!(db.duplicate_keys().is_empty(), "{:?}", db.duplicate_keys());
}

#[test]
fn test_every_technosphere_exchange_is_linked() {
    let db = generated();
    for ds in db.iter().filter(|a| a.location == "EUR") {
        for exc in ds.technosphere() {
            let input = exc.input.as_ref().unwrap_or_else(|| panic!("{} -> {}", ds.name, exc.name));
            let supplier = db.by_code(&input.code).unwrap();
            assert_eq!(supplier.name, exc.name);
        }
    }
}

#[test]
fn test_second_run_adds_nothing() {
    let dir = tempdir().unwrap();
    let mut fuels = fuels(50.0, 50.0, dir.path());
    fuels.generate_fuel_supply_chains().unwrap();
    assert_eq!(fuels.generate_fuel_supply_chains().unwrap(), 0);
}

// ============================================================================
// Direct air capture
// ============================================================================

#[test]
fn test_dac_heat_pump_runs_on_electricity() {
    let db = generated();
    let name = format!("{DAC}{}", HeatSource::HeatPumpHeat.dac_suffix());
    let ds = find(&db, &name, "EUR");

    let heat: Vec<_> = ds
        .technosphere()
        .filter(|e| e.unit == "kilowatt hour")
        .collect();
    assert_eq!(heat.len(), 2);
    assert!(heat
        .iter()
        .any(|e| (e.amount - 5.4 / (2.9 * 3.6)).abs() < 1e-12));
    assert!(heat.iter().all(|e| e.location.as_deref() == Some("RER")));
    assert!(ds.comment.contains("CoP of 2.9"));
}

#[test]
fn test_dac_waste_heat_links_rest_of_world() {
    let db = generated();
    let name = format!("{DAC}{}", HeatSource::WasteHeat.dac_suffix());
    let ds = find(&db, &name, "EUR");
    let heat = ds
        .technosphere()
        .find(|e| e.unit == "megajoule")
        .unwrap();
    assert!(heat.name.starts_with("heat, from municipal waste incineration"));
    assert_eq!(heat.location.as_deref(), Some("RoW"));
    assert_eq!(heat.amount, 5.4);
}

// ============================================================================
// Hydrogen
// ============================================================================

#[test]
fn test_electrolysis_follows_year() {
    let db = generated();
    let ds = find(&db, ELECTROLYSIS, "EUR");
    let kwh = ds
        .technosphere()
        .find(|e| e.name == ELECTRICITY.0)
        .unwrap()
        .amount;
    assert_relative_eq!(kwh, electrolysis_electricity(YEAR));
    assert_relative_eq!(kwh, 49.744, epsilon = 1e-9);
    assert!(ds.comment.contains("Region-specific hydrogen production dataset."));
}

#[test]
fn test_delivery_chains_cover_every_vehicle() {
    let db = generated();
    let chains = db.get_many(&[
        Filter::starts_with(Field::Name, "hydrogen supply, from electrolysis"),
        Filter::equals(Field::Location, "EUR"),
    ]);
    assert_eq!(chains.len(), 12);
    assert!(chains.iter().all(|c| c.reference_product == "hydrogen, 700 bar"));

    for vehicle in Vehicle::ALL {
        assert!(
            chains.iter().any(|c| c.name.contains(&format!("by {vehicle},"))),
            "{vehicle}"
        );
    }
}

#[test]
fn test_pipeline_chain_inputs() {
    let db = generated();
    let ds = find(
        &db,
        "hydrogen supply, from electrolysis, by CNG pipeline, as gaseous, over 500 km",
        "EUR",
    );
    let names: Vec<&str> = ds.technosphere().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"distribution pipeline for hydrogen, reassigned CNG pipeline"));
    assert!(names.contains(&"transmission pipeline for hydrogen, reassigned CNG pipeline"));
    assert!(names.contains(&"hydrogen embrittlement inhibition"));
    assert!(names.contains(&"geological hydrogen storage"));

    let h2 = ds.technosphere().find(|e| e.name == ELECTROLYSIS).unwrap();
    let loss = Vehicle::CngPipeline.loss(H2State::Gaseous, 500.0).unwrap();
    assert_relative_eq!(h2.amount, 1.0 + loss);
    assert_eq!(h2.location.as_deref(), Some("EUR"));

    // purification electricity comes on top of compression and pre-cooling
    let kwh: Vec<f64> = ds
        .technosphere()
        .filter(|e| e.name == ELECTRICITY.0)
        .map(|e| e.amount)
        .collect();
    assert_eq!(kwh.len(), 3);
    assert!(kwh.contains(&2.46));
}

#[test]
fn test_truck_lohc_chain_has_hydrogenation() {
    let db = generated();
    let ds = find(
        &db,
        "hydrogen supply, from electrolysis, by truck, as liquid organic compound, over 1000 km",
        "EUR",
    );
    let lorry = ds
        .technosphere()
        .find(|e| e.unit == "ton kilometer")
        .unwrap();
    assert_relative_eq!(lorry.amount, 1.0);
    assert!(ds.technosphere().any(|e| e.name == "hydrogenation of hydrogen"));
    assert!(ds.technosphere().any(|e| e.name == "dehydrogenation of hydrogen"));
    assert!(!ds.technosphere().any(|e| e.name == "geological hydrogen storage"));
}

#[test]
fn test_missing_auxiliary_is_fatal() {
    let dir = tempdir().unwrap();
    let mut db = database();
    db.remove_where(|a| a.name == "geological hydrogen storage");
    let mut fuels = lcigraph_fuels::Fuels::new(
        db,
        iam(50.0, 50.0),
        geomap(),
        refdata(),
        config(dir.path()),
    );
    let err = fuels.generate_fuel_supply_chains().unwrap_err();
    assert!(matches!(
        err,
        lcigraph_fuels::FuelsError::Db(lcigraph_db::DbError::NoResults { .. })
    ));
}

// ============================================================================
// Methane and synthetic fuels
// ============================================================================

#[test]
fn test_synthetic_methane_variants_per_heat_source() {
    let db = generated();
    for heat in HeatSource::FOR_METHANATION {
        let name = format!(
            "methane, from electrochemical methanation, with carbon from atmospheric CO2 capture, using {}",
            heat.label()
        );
        let ds = find(&db, &name, "EUR");
        let co2 = ds.technosphere().find(|e| e.name.starts_with(DAC)).unwrap();
        assert_eq!(co2.name, format!("{DAC}{}", heat.dac_suffix()));
        assert_eq!(co2.location.as_deref(), Some("EUR"));
    }
}

#[test]
fn test_methanol_uses_heat_pump_dac() {
    let db = generated();
    let ds = find(
        &db,
        "methanol, hydrogen from electrolysis, CO2 from DAC, energy allocation",
        "EUR",
    );
    let co2 = ds.technosphere().find(|e| e.name.starts_with(DAC)).unwrap();
    assert!(co2.name.ends_with("with heat pump heat, and grid electricity"));
    let h2 = ds.technosphere().find(|e| e.name == ELECTROLYSIS).unwrap();
    assert_eq!(h2.location.as_deref(), Some("EUR"));
}

// ============================================================================
// Biofuels
// ============================================================================

#[test]
fn test_conversion_scaled_by_progress_factor() {
    let db = generated();
    let ds = find(&db, ETHANOL, "EUR");
    // progress factor 1.25 at 2035
    let farming = ds.technosphere().find(|e| e.name == FARMING).unwrap();
    assert_relative_eq!(farming.amount, 10.0 / 1.25, epsilon = 1e-12);
    assert_eq!(farming.location.as_deref(), Some("EUR"));
    assert!(ds.comment.contains("1.91 kg CO2/kg"));
    assert_eq!(ds.production_volume(), Some(50.0));
}

#[test]
fn test_farming_land_use_follows_iam() {
    let db = generated();
    let ds = find(&db, FARMING, "EUR");
    // LHV as received: 16 * (1 - 0.75) = 4 MJ/kg
    let occupation = ds
        .biosphere()
        .find(|e| e.name.starts_with("Occupation"))
        .unwrap();
    assert_relative_eq!(occupation.amount, 0.015 * 10.0 * 4.0, epsilon = 1e-12);

    let luc = ds
        .exchanges
        .iter()
        .find(|e| e.name == "Carbon dioxide, from soil or biomass stock")
        .unwrap();
    assert_eq!(luc.kind, ExchangeKind::Biosphere);
    assert_relative_eq!(luc.amount, 4.0 / 1000.0 * 4.0, epsilon = 1e-12);
    assert_eq!(luc.input.as_ref().unwrap().database, "biosphere3");
}

#[test]
fn test_world_region_gets_no_biofuels() {
    let dir = tempdir().unwrap();
    let mut iam = iam(50.0, 50.0);
    iam.regions.push("World".to_string());
    let mut fuels = lcigraph_fuels::Fuels::new(database(), iam, geomap(), refdata(), config(dir.path()));
    fuels.generate_fuel_supply_chains().unwrap();

    let db = fuels.database();
    assert!(db.iter().any(|a| a.name.starts_with(DAC) && a.location == "World"));
    assert!(!db.iter().any(|a| a.name == FARMING && a.location == "World"));
    assert!(db.iter().any(|a| a.name == FARMING && a.location == "EUR"));
}
