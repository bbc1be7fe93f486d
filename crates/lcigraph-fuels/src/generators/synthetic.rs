//! Synthetic liquid fuels: methanol and Fischer-Tropsch

use super::dac::{HeatSource, DAC_TEMPLATE};
use super::{Context, Generator};
use crate::Result;
use lcigraph_db::{copy_to_new_location, Field, Filter};

/// Fuel family and the keywords its templates' names all contain.
pub const SYNTHETIC_FUELS: [(&str, [&str; 3]); 5] = [
    (
        "methanol",
        ["methanol", "hydrogen from electrolysis", "energy allocation"],
    ),
    (
        "methanol, from coal",
        ["methanol", "hydrogen from coal gasification", "energy allocation"],
    ),
    (
        "fischer-tropsch",
        ["Fischer Tropsch process", "hydrogen from electrolysis", "energy allocation"],
    ),
    (
        "fischer-tropsch, from woody biomass",
        ["Fischer Tropsch process", "hydrogen from wood gasification", "energy allocation"],
    ),
    (
        "fischer-tropsch, from coal",
        ["Fischer Tropsch process", "hydrogen from coal gasification", "energy allocation"],
    ),
];

/// Regional synthetic fuels; captured CO2 comes from heat-pump DAC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticFuels;

impl Generator for SyntheticFuels {
    fn name(&self) -> &'static str {
        "synthetic fuels"
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<usize> {
        let (original, regions) = (ctx.original, ctx.regions);
        let dac_name = format!("{DAC_TEMPLATE}{}", HeatSource::HeatPumpHeat.dac_suffix());

        let families: Vec<(&str, Vec<Filter>)> = SYNTHETIC_FUELS
            .iter()
            .map(|(family, keywords)| {
                let filters = keywords
                    .iter()
                    .map(|k| Filter::contains(Field::Name, *k))
                    .collect();
                (*family, filters)
            })
            .collect();

        let mut added = 0;
        for region in regions {
            for (family, filters) in &families {
                let mut count = 0;
                for template in original.get_many(filters) {
                    let mut ds = copy_to_new_location(template, region);
                    for exc in ds.technosphere_mut() {
                        if exc.name.contains(DAC_TEMPLATE) {
                            exc.name = dac_name.clone();
                            exc.product = Some("carbon dioxide, captured from the atmosphere".to_string());
                            exc.location = Some(region.to_string());
                        }
                    }
                    ctx.relink(&mut ds)?;
                    added += usize::from(ctx.push(ds));
                    count += 1;
                }
                tracing::debug!(family, region = %region, templates = count, "synthetic fuel family");
            }
        }
        tracing::info!(added, "generated synthetic fuel activities");
        Ok(added)
    }
}
