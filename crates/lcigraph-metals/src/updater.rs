//! Metal-use adjustment of one dataset

use crate::stamp::MetalStamp;
use lcigraph_db::{Activity, Exchange, ExchangeInput};
use lcigraph_refdata::MetalsRefData;

const RESOURCE_CATEGORIES: [&str; 2] = ["natural resource", "in ground"];

/// Set the metal use of `ds` to `profile` (metal, kg per unit of
/// technology), net of the amounts the base inventory already embodies.
///
/// Existing resource exchanges are shifted by the difference; metals without
/// an exchange get a new `<metal>, in ground` flow. Returns the number of
/// exchanges touched.
pub fn update_metal_use(
    ds: &mut Activity,
    technology: &str,
    profile: &[(String, f64)],
    refdata: &MetalsRefData,
) -> usize {
    let conversion = refdata.conversion_factors.get(&ds.name);
    if conversion.is_none() {
        tracing::warn!(name = %ds.name, "conversion factor not found, intensities used as is");
    }
    let cf = conversion.unwrap_or(1.0);

    let embodied = |metal: &str| {
        refdata
            .ecoinvent_factors
            .factor(&ds.name, &ds.reference_product, &ds.location, metal)
    };
    let stamps: Vec<(String, f64, MetalStamp)> = profile
        .iter()
        .map(|(metal, use_factor)| {
            let stamp = MetalStamp {
                old: embodied(metal),
                new: use_factor * cf,
                technology: technology.to_string(),
                metal: metal.clone(),
            };
            (metal.clone(), stamp.new - stamp.old, stamp)
        })
        .collect();

    let mut touched = 0;
    let mut remaining: Vec<&(String, f64, MetalStamp)> = stamps.iter().collect();

    for exc in ds.biosphere_mut() {
        let Some(metal) = refdata.flows.key_for(&exc.name) else {
            continue;
        };
        let Some(pos) = remaining.iter().position(|(m, _, _)| m == metal) else {
            continue;
        };
        let (_, delta, stamp) = remaining.remove(pos);
        exc.amount += delta;
        if !exc.comment.as_deref().unwrap_or_default().contains(metal) {
            exc.comment = Some(stamp.to_string());
        }
        touched += 1;
    }

    for (metal, delta, stamp) in remaining {
        let name = format!("{metal}, in ground");
        let Some(code) = refdata
            .biosphere_codes
            .code(&name, RESOURCE_CATEGORIES[0], RESOURCE_CATEGORIES[1], "kilogram")
        else {
            tracing::warn!(flow = %name, "no biosphere code for metal flow, skipped");
            continue;
        };
        ds.exchanges.push(
            Exchange::biosphere(&name, &RESOURCE_CATEGORIES, "kilogram", *delta)
                .with_input(ExchangeInput::new("biosphere3", code))
                .with_comment(stamp.to_string()),
        );
        touched += 1;
    }
    touched
}
