//! Direct air capture with alternative heat supply

use super::{Context, Generator, ELECTRICITY_MARKET};
use crate::Result;
use lcigraph_db::{copy_to_new_location, Field, Filter};

pub(crate) const DAC_TEMPLATE: &str = "carbon dioxide, captured from atmosphere";

/// Coefficient of performance of the heat pump.
const HEAT_PUMP_COP: f64 = 2.9;
const MJ_PER_KWH: f64 = 3.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeatSource {
    WasteHeat,
    IndustrialSteamHeat,
    HeatPumpHeat,
}

impl HeatSource {
    pub const ALL: [HeatSource; 3] = [
        HeatSource::WasteHeat,
        HeatSource::IndustrialSteamHeat,
        HeatSource::HeatPumpHeat,
    ];

    /// Heat sources offered for the CO2 of synthetic methane.
    pub const FOR_METHANATION: [HeatSource; 2] = [HeatSource::WasteHeat, HeatSource::HeatPumpHeat];

    pub fn label(self) -> &'static str {
        match self {
            HeatSource::WasteHeat => "waste heat",
            HeatSource::IndustrialSteamHeat => "industrial steam heat",
            HeatSource::HeatPumpHeat => "heat pump heat",
        }
    }

    /// (name, product) of the activity supplying the heat.
    pub fn supplier(self) -> (&'static str, &'static str) {
        match self {
            HeatSource::WasteHeat => (
                "heat, from municipal waste incineration to generic market for heat district or industrial, other than natural gas",
                "heat, district or industrial, other than natural gas",
            ),
            HeatSource::IndustrialSteamHeat => (
                "market for heat, from steam, in chemical industry",
                "heat, from steam, in chemical industry",
            ),
            HeatSource::HeatPumpHeat => (ELECTRICITY_MARKET.0, ELECTRICITY_MARKET.1),
        }
    }

    /// Name suffix of the DAC variant using this heat.
    pub fn dac_suffix(self) -> String {
        format!(", with {}, and grid electricity", self.label())
    }
}

/// Regional DAC variants, one per [`HeatSource`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Dac;

impl Generator for Dac {
    fn name(&self) -> &'static str {
        "direct air capture"
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<usize> {
        let (original, regions) = (ctx.original, ctx.regions);
        let template = original.get_one(&[Filter::contains(Field::Name, DAC_TEMPLATE)])?;

        let mut added = 0;
        for region in regions {
            for heat in HeatSource::ALL {
                let mut ds = copy_to_new_location(template, region);
                let name = format!("{}{}", ds.name, heat.dac_suffix());
                ds.rename(&name);

                let (supplier, product) = heat.supplier();
                for exc in ds.technosphere_mut() {
                    if !exc.name.contains("heat") {
                        continue;
                    }
                    exc.name = supplier.to_string();
                    exc.product = Some(product.to_string());
                    exc.location = Some("RoW".to_string());
                    if heat == HeatSource::HeatPumpHeat {
                        exc.unit = ELECTRICITY_MARKET.2.to_string();
                        exc.amount *= 1.0 / (HEAT_PUMP_COP * MJ_PER_KWH);
                        exc.location = Some("RER".to_string());
                    }
                }

                if heat == HeatSource::HeatPumpHeat {
                    ds.append_comment(&format!(
                        " Heat supplied by a heat pump with a CoP of {HEAT_PUMP_COP}; the heat pump itself is not included."
                    ));
                }
                ds.append_comment(
                    " CO2 compression from 1 to 25 bar requires 0.78 kWh. \
                     2.1% of the CO2 is lost on site; pipeline transport is limited to 1 km.",
                );

                ctx.relink(&mut ds)?;
                if ctx.push(ds) {
                    added += 1;
                }
            }
        }
        tracing::info!(added, "generated direct air capture variants");
        Ok(added)
    }
}
