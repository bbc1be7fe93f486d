//! Crop-based biofuels
//!
//! Per region: climate -> crop per crop type -> farming and conversion
//! templates. Conversion efficiency follows the IAM progress factor; farming
//! land occupation and land-use-change CO2 follow the IAM land data.

use super::{Context, Generator};
use crate::cloner::clone_to_region;
use crate::Result;
use lcigraph_db::{
    Activity, Exchange, ExchangeInput, Field, Filter, Uncertainty, PROP_LHV_DRY, PROP_MOISTURE,
};
use lcigraph_refdata::CropType;
use std::collections::HashSet;

pub(crate) const LAND_USE_CHANGE_CO2: &str = "Carbon dioxide, from soil or biomass stock";
const LAND_USE_CHANGE_CO2_CODE: &str = "78eb1859-abd9-44c6-9ce3-f3b5b33d619c";

#[derive(Debug, Clone, Copy, Default)]
pub struct Biofuels;

fn is_conversion(name: &str) -> bool {
    (name.contains("fermentation") || name.contains("transesterification"))
        && (name.contains("Ethanol production") || name.contains("Biodiesel production"))
}

fn is_farming(name: &str) -> bool {
    name.to_lowercase().contains("farming and supply")
}

/// Lower heating value as received, MJ/kg: dry LHV discounted by moisture.
fn lhv_as_received(ds: &Activity) -> Option<f64> {
    Some(ds.property(PROP_LHV_DRY)? * (1.0 - ds.property(PROP_MOISTURE)?))
}

impl Biofuels {
    /// Sum of the IAM efficiency variables for this crop type's biofuel.
    fn progress_factor(ctx: &Context<'_>, crop_type: CropType, region: &str) -> Option<f64> {
        let eff = &ctx.iam.fuel_efficiencies;
        let variables: Vec<&str> = eff
            .variables()
            .iter()
            .map(String::as_str)
            .filter(|v| {
                let v = v.to_lowercase();
                v.contains(crop_type.as_str()) && (v.contains("bioethanol") || v.contains("biodiesel"))
            })
            .collect();
        if variables.is_empty() {
            return None;
        }
        let factor = eff.sum(variables, region, ctx.year());
        (factor > 0.0).then_some(factor)
    }

    fn rescale_conversion(ctx: &Context<'_>, ds: &mut Activity, crop_type: CropType, region: &str) {
        let Some(factor) = Self::progress_factor(ctx, crop_type, region) else {
            tracing::warn!(name = %ds.name, region = %region, crop_type = %crop_type, "no progress factor, efficiency unchanged");
            return;
        };
        for exc in ds.technosphere_mut() {
            exc.amount /= factor;
        }
        ds.append_comment(&format!(
            " Conversion efficiency rescaled by {factor:.4}, {}",
            ctx.scenario_note(region)
        ));
        let lower = ds.name.to_lowercase();
        if lower.contains("ethanol") {
            ds.append_comment(" Bioethanol has a combustion CO2 emission factor of 1.91 kg CO2/kg.");
        }
        if lower.contains("biodiesel") {
            ds.append_comment(" Biodiesel has a combustion CO2 emission factor of 2.85 kg CO2/kg.");
        }
    }

    fn adjust_farming(ctx: &Context<'_>, ds: &mut Activity, crop_type: CropType, region: &str) {
        let model = &ctx.config.model;
        let Some(lhv_ar) = lhv_as_received(ds) else {
            tracing::warn!(name = %ds.name, "farming dataset lacks LHV or moisture, land use unchanged");
            return;
        };

        let land_use = ctx
            .refdata
            .crop_properties
            .land_use_variable(crop_type, model)
            .and_then(|var| ctx.iam.data.value(var, region, ctx.year()));
        match land_use {
            Some(ha_per_gj) => {
                // ha/GJ -> m2/MJ -> m2/kg as received
                let m2_per_kg = ha_per_gj * 10_000.0 / 1000.0 * lhv_ar;
                for exc in ds.biosphere_mut() {
                    if exc.name.starts_with("Occupation") {
                        exc.amount = m2_per_kg;
                    }
                }
                ds.append_comment(&format!(
                    " Land occupation set to {m2_per_kg:.4} m2/kg, {}",
                    ctx.scenario_note(region)
                ));
            }
            None => {
                tracing::warn!(name = %ds.name, region = %region, crop_type = %crop_type, "no IAM land use, occupation unchanged");
            }
        }

        let land_use_change = ctx
            .refdata
            .crop_properties
            .land_use_change_variable(crop_type, model)
            .and_then(|var| ctx.iam.data.value(var, region, ctx.year()));
        match land_use_change {
            Some(kg_per_gj) => {
                let kg_per_kg = kg_per_gj / 1000.0 * lhv_ar;
                let mut exc = Exchange::biosphere(
                    LAND_USE_CHANGE_CO2,
                    &["air", "non-urban air or from high stacks"],
                    "kilogram",
                    kg_per_kg,
                )
                .with_input(ExchangeInput::new("biosphere3", LAND_USE_CHANGE_CO2_CODE));
                exc.uncertainty = Some(Uncertainty {
                    uncertainty_type: 0,
                    loc: Some(kg_per_kg),
                    ..Default::default()
                });
                ds.exchanges.push(exc);
                ds.append_comment(&format!(
                    " {kg_per_kg:.4} kg of land-use-change CO2 added, {}",
                    ctx.scenario_note(region)
                ));
            }
            None => {
                tracing::warn!(name = %ds.name, region = %region, crop_type = %crop_type, "no IAM land-use-change CO2");
            }
        }
    }
}

impl Generator for Biofuels {
    fn name(&self) -> &'static str {
        "biofuels"
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<usize> {
        let (original, regions, refdata) = (ctx.original, ctx.regions, ctx.refdata);
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut added = 0;

        for region in regions.iter().filter(|r| r.as_str() != "World") {
            let Some(climate) = refdata.region_climate.climate(region) else {
                tracing::warn!(region = %region, "no climate for region, biofuels skipped");
                continue;
            };
            let Some(crops) = refdata.crop_climate.crops(climate) else {
                tracing::warn!(region = %region, climate, "no crops for climate, biofuels skipped");
                continue;
            };

            for (crop_type, crop) in crops {
                let filters = [
                    Filter::contains(Field::Name, crop.as_str()),
                    Filter::either(vec![
                        Filter::contains(Field::Name, "supply of"),
                        Filter::contains(Field::Name, crop_type.conversion_keyword()),
                    ]),
                ];

                for template in original.get_many(&filters) {
                    let mut ds = clone_to_region(template, region, &*ctx.working, ctx.relinker)?;

                    let volume = ctx
                        .iam
                        .fuel_labels()
                        .iter()
                        .filter(|label| label.contains(crop_type.as_str()))
                        .filter_map(|label| ctx.iam.fuel_markets.value(label, region, ctx.year()))
                        .last();
                    if let Some(volume) = volume {
                        ds.set_production_volume(volume);
                    }

                    if is_conversion(&ds.name) {
                        Self::rescale_conversion(ctx, &mut ds, *crop_type, region);
                    }
                    if is_farming(&ds.name) && refdata.crop_properties.get(*crop_type).is_some() {
                        Self::adjust_farming(ctx, &mut ds, *crop_type, region);
                    }

                    if seen.insert((ds.name.clone(), ds.location.clone())) {
                        added += usize::from(ctx.push(ds));
                    }
                }
            }
        }
        tracing::info!(added, "generated biofuel activities");
        Ok(added)
    }
}
