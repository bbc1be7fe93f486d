//! Point fuel consumers at the regional markets
//!
//! After assembly every exchange still naming a replaced market is folded
//! into one exchange to the consumer's regional market. Consumers that burn
//! the fuel have the biogenic part of their CO2 moved from the fossil flow to
//! a non-fossil flow.

use crate::markets::MarketAssembly;
use crate::{FuelsError, Result};
use lcigraph_db::{Activity, Database, Exchange, ExchangeInput, Geomap, Uncertainty};

pub const FOSSIL_CO2: &str = "Carbon dioxide, fossil";
pub const NON_FOSSIL_CO2: &str = "Carbon dioxide, non-fossil";
const NON_FOSSIL_CO2_CODE: &str = "e4e9febc-07c1-403d-8d3a-6707bb4d96e6";

/// Consumers whose fuel input is blended or refined, not burned.
const NOT_COMBUSTED: [&str; 4] = [
    "blending",
    "market group",
    "lubricating oil production",
    "petrol production",
];

fn is_combustion(activity: &Activity) -> bool {
    let name = activity.name.to_lowercase();
    !NOT_COMBUSTED.iter().any(|k| name.contains(k))
}

/// Regional market an activity buys from.
fn supplier_location(activity: &Activity, geomap: &dyn Geomap, regions: &[String]) -> Option<String> {
    if regions.contains(&activity.location) {
        return Some(activity.location.clone());
    }
    let mapped = geomap.ecoinvent_to_iam_location(&activity.location);
    if regions.contains(&mapped) {
        return Some(mapped);
    }
    regions.first().cloned()
}

/// Redirect every consumer of a replaced market; returns the number of
/// activities modified.
pub fn relink_to_new_markets(
    working: &mut Database,
    assembly: &MarketAssembly,
    geomap: &dyn Geomap,
    regions: &[String],
) -> Result<usize> {
    if regions.is_empty() {
        return Ok(0);
    }
    let mut modified = 0;

    for ds in working.iter_mut() {
        if assembly.is_new_market(&ds.name) {
            continue;
        }
        if !ds.technosphere().any(|e| assembly.is_new_market(&e.name)) {
            continue;
        }
        let Some(location) = supplier_location(ds, geomap, regions) else {
            continue;
        };

        let mut fossil = 0.0;
        let mut non_fossil = 0.0;
        let mut touched = false;
        for &market in assembly.replaced() {
            let taken = ds.take_exchanges_where(|e| {
                e.is_technosphere()
                    && e.name == market.name()
                    && (e.unit == "kilogram" || e.unit == "cubic meter")
            });
            let amount: f64 = taken.iter().map(|e| e.amount).sum();
            if amount <= 0.0 {
                continue;
            }
            touched = true;
            let record = assembly
                .record(market, &location)
                .ok_or_else(|| FuelsError::MissingMarketRecord {
                    market: market.name().to_string(),
                    region: location.clone(),
                })?;
            ds.exchanges.push(
                Exchange::technosphere(
                    market.name(),
                    market.product(),
                    &location,
                    market.unit(),
                    amount,
                )
                .with_input(record.input.clone()),
            );
            fossil += amount * record.fossil_co2;
            non_fossil += amount * record.non_fossil_co2;
        }
        if !touched {
            continue;
        }
        modified += 1;

        if non_fossil > 0.0 && is_combustion(ds) {
            split_biogenic_co2(ds, non_fossil);
        }
        tracing::debug!(name = %ds.name, location = %ds.location, fossil, non_fossil, "relinked to regional fuel markets");
    }
    tracing::info!(modified, "relinked fuel consumers");
    Ok(modified)
}

fn is_fossil_co2(exc: &Exchange) -> bool {
    exc.name == FOSSIL_CO2
}

/// Move `non_fossil` kg of CO2 from the fossil flow to a non-fossil flow.
fn split_biogenic_co2(ds: &mut Activity, non_fossil: f64) {
    if !ds.biosphere().any(is_fossil_co2) {
        tracing::warn!(name = %ds.name, location = %ds.location, "no fossil CO2 flow to reduce");
    }
    for exc in ds.biosphere_mut() {
        if is_fossil_co2(exc) {
            exc.amount = (exc.amount - non_fossil).max(0.0);
        }
    }
    let mut exc = Exchange::biosphere(NON_FOSSIL_CO2, &["air"], "kilogram", non_fossil)
        .with_input(ExchangeInput::new("biosphere3", NON_FOSSIL_CO2_CODE));
    exc.uncertainty = Some(Uncertainty {
        uncertainty_type: 0,
        loc: Some(non_fossil),
        ..Default::default()
    });
    ds.exchanges.push(exc);
}
