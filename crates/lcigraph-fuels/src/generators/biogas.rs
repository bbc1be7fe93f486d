//! Biomethane and synthetic methane

use super::dac::{HeatSource, DAC_TEMPLATE};
use super::{optional_template, Context, Generator};
use crate::cloner::clone_to_region;
use crate::Result;
use lcigraph_db::{copy_to_new_location, Activity};

const BIOMETHANE: [&str; 3] = [
    "production of 2 wt-% potassium",
    "biogas upgrading - sewage sludge",
    "Biomethane, gaseous",
];

const SYNTHETIC_METHANE: [&str; 2] = [
    "methane, from electrochemical methanation, with carbon from atmospheric CO2 capture",
    "Methane, synthetic, gaseous, 5 bar, from electrochemical methanation, at fuelling station",
];

const METHANATION: &str = "from electrochemical methanation";

#[derive(Debug, Clone, Copy, Default)]
pub struct Biogas;

impl Biogas {
    /// Synthetic methane variant whose CO2 comes from DAC running on `heat`.
    fn synthetic_variant(
        ctx: &Context<'_>,
        template: &Activity,
        region: &str,
        heat: HeatSource,
    ) -> Result<Activity> {
        let mut ds = copy_to_new_location(template, region);
        let using = format!(", using {}", heat.label());

        let mut captured = false;
        let mut methanated = false;
        for exc in ds.technosphere_mut() {
            if exc.name.contains(DAC_TEMPLATE) {
                exc.name = format!("{DAC_TEMPLATE}{}", heat.dac_suffix());
                exc.product = Some("carbon dioxide, captured from the atmosphere".to_string());
                exc.location = Some(region.to_string());
                captured = true;
            }
            if exc.name.contains("methane, from electrochemical methanation") {
                exc.name.push_str(&using);
                methanated = true;
            }
        }

        if captured {
            let name = format!("{}{using}", ds.name);
            ds.rename(&name);
        }
        if methanated {
            let expanded = format!(
                "{METHANATION} (H2 from electrolysis, CO2 from DAC using {})",
                heat.label()
            );
            let name = ds.name.replacen(METHANATION, &expanded, 1);
            ds.rename(&name);
        }

        ctx.relink(&mut ds)?;
        Ok(ds)
    }
}

impl Generator for Biogas {
    fn name(&self) -> &'static str {
        "biogas"
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<usize> {
        let (original, regions) = (ctx.original, ctx.regions);
        let biomethane = BIOMETHANE
            .iter()
            .map(|f| optional_template(original, f))
            .collect::<Result<Vec<_>>>()?;
        let synthetic = SYNTHETIC_METHANE
            .iter()
            .map(|f| optional_template(original, f))
            .collect::<Result<Vec<_>>>()?;

        let mut added = 0;
        for region in regions {
            for template in biomethane.iter().flatten() {
                let ds = clone_to_region(template, region, &*ctx.working, ctx.relinker)?;
                added += usize::from(ctx.push(ds));
            }
            for template in synthetic.iter().flatten() {
                for heat in HeatSource::FOR_METHANATION {
                    let ds = Self::synthetic_variant(ctx, template, region, heat)?;
                    added += usize::from(ctx.push(ds));
                }
            }
        }
        tracing::info!(added, "generated biogas and synthetic methane activities");
        Ok(added)
    }
}
