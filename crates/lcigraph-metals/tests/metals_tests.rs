//! Metal-Intensity Update Tests

use approx::assert_relative_eq;
use lcigraph_db::{Activity, Database, Exchange};
use lcigraph_iam::{MetalIntensity, ScenarioConfig, MEDIAN};
use lcigraph_metals::{Metals, MetalStamp, REPORT_HEADER};
use lcigraph_refdata::MetalsRefData;
use std::path::Path;
use tempfile::tempdir;

fn refdata(dir: &Path) -> MetalsRefData {
    let write = |name: &str, body: &str| std::fs::write(dir.join(name), body).unwrap();
    write(
        "ecoinvent_factors.csv",
        "name;product;location;Copper;Neodymium\n\
         wind turbine construction, 2MW, onshore;wind turbine, 2MW, onshore;GLO;1000;\n",
    );
    write(
        "conversion_factors.csv",
        "Activity;Conversion_factor;Comment\n\
         wind turbine construction, 2MW, onshore;2;kg/MW -> kg/unit\n",
    );
    write(
        "activities_metals_map.yaml",
        "Wind onshore:\n  - wind turbine construction, 2MW, onshore\n\
         Hydro:\n  - hydropower plant construction\n",
    );
    write("metals_map.yaml", "Copper:\n  - Copper, Cu 0.52%, in mined ore\n");
    write(
        "biosphere_flows.yaml",
        "- name: Neodymium, in ground\n  categories: [natural resource, in ground]\n  unit: kilogram\n  code: nd0001\n",
    );
    MetalsRefData::load_dir(dir).unwrap()
}

fn database() -> Database {
    let mut turbine = Activity::new(
        "wind turbine construction, 2MW, onshore",
        "wind turbine, 2MW, onshore",
        "GLO",
        "unit",
        "ecoinvent",
    );
    turbine.exchanges.push(Exchange::biosphere(
        "Copper, Cu 0.52%, in mined ore",
        &["natural resource", "in ground"],
        "kilogram",
        1200.0,
    ));
    let hydro = Activity::new(
        "hydropower plant construction",
        "hydropower plant",
        "CH",
        "unit",
        "ecoinvent",
    );
    let other = Activity::new("cement production", "cement", "CH", "kilogram", "ecoinvent");
    vec![turbine, hydro, other].into_iter().collect()
}

fn intensity() -> MetalIntensity {
    MetalIntensity::new()
        .with("Wind onshore", "Copper", MEDIAN, &[(2020, 800.0), (2050, 400.0)])
        .with("Wind onshore", "Neodymium", MEDIAN, &[(2020, 30.0), (2050, 10.0)])
        .with("Wind onshore", "Copper", "max", &[(2020, 5000.0)])
}

#[test]
fn test_turbine_metal_use_follows_projection() {
    let data_dir = tempdir().unwrap();
    let log_dir = tempdir().unwrap();
    let config = ScenarioConfig::new("image", "SSP2-RCP26", 2035).with_log_dir(log_dir.path());

    let mut metals = Metals::new(database(), intensity(), refdata(data_dir.path()), config);
    let (updated, report) = metals.update_metals_use_in_database().unwrap();
    // the hydro plant has no curve
    assert_eq!(updated, 1);

    let db = metals.into_database();
    let turbine = db.named("wind turbine construction, 2MW, onshore").next().unwrap();

    // copper 600 kg/MW at 2035, x2, net of the 1000 kg already embodied
    let cu = turbine
        .biosphere()
        .find(|e| e.name == "Copper, Cu 0.52%, in mined ore")
        .unwrap();
    assert_relative_eq!(cu.amount, 1200.0 + 1200.0 - 1000.0);
    let stamp = MetalStamp::parse(cu.comment.as_deref().unwrap()).unwrap();
    assert_eq!(stamp.technology, "Wind onshore");
    assert_relative_eq!(stamp.new, 1200.0);

    let nd = turbine
        .biosphere()
        .find(|e| e.name == "Neodymium, in ground")
        .unwrap();
    assert_relative_eq!(nd.amount, 40.0);
    assert_eq!(nd.input.as_ref().unwrap().code, "nd0001");

    let text = std::fs::read_to_string(&report).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), REPORT_HEADER.join(","));
    assert_eq!(lines.count(), 2);
    let name = report.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("log modified metals use IMAGE SSP2-RCP26 2035-"));
}

#[test]
fn test_untouched_datasets_stay_identical() {
    let data_dir = tempdir().unwrap();
    let log_dir = tempdir().unwrap();
    let config = ScenarioConfig::new("image", "SSP2-RCP26", 2035).with_log_dir(log_dir.path());
    let before = database();

    let mut metals = Metals::new(database(), intensity(), refdata(data_dir.path()), config);
    metals.update_metals_use_in_database().unwrap();

    for name in ["hydropower plant construction", "cement production"] {
        let old = before.named(name).next().unwrap();
        let new = metals.database().named(name).next().unwrap();
        assert_eq!(old.exchanges, new.exchanges);
    }
}
