//! Hydrogen production routes and delivery chains
//!
//! Every production route is cloned per region. On top of each regional
//! route, one delivery chain is built per vehicle, hydrogen state and
//! distance. A chain delivers 1 kg at 700 bar and carries:
//! - the transport service (ton-km, or a share of pipeline infrastructure)
//! - regional storage and inhibitor handling where the vehicle needs them
//! - conditioning energy (compression, liquefaction, or LOHC handling)
//! - the hydrogen itself, inflated by distance-dependent losses
//! - a share of the refuelling station and pre-cooling electricity

use super::{optional_template, Context, Generator, ELECTRICITY_MARKET};
use crate::physics::{
    compression_effort, electrolysis_electricity, liquefaction_electricity,
    precooling_electricity, station_utilization, AMBIENT_TEMPERATURE, REFUELLING_STATION_SHARE,
};
use crate::cloner::clone_to_region;
use crate::Result;
use lcigraph_db::{copy_to_new_location, Activity, Database, DbError, Exchange, Field, Filter};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrogenRoute {
    /// Name fragment identifying the production template.
    pub template: &'static str,
    /// Label used in delivery chain names.
    pub label: &'static str,
}

const fn route(template: &'static str, label: &'static str) -> HydrogenRoute {
    HydrogenRoute { template, label }
}

const ELECTROLYSIS: &str = "hydrogen production, gaseous, 25 bar, from electrolysis";

pub const HYDROGEN_ROUTES: [HydrogenRoute; 14] = [
    route(ELECTROLYSIS, "from electrolysis"),
    route(
        "hydrogen production, steam methane reforming, from biomethane, high and low temperature, with CCS (MDEA, 98% eff.), 26 bar",
        "from SMR of biogas, with CCS",
    ),
    route(
        "hydrogen production, steam methane reforming, from biomethane, high and low temperature, 26 bar",
        "from SMR of biogas",
    ),
    route(
        "hydrogen production, auto-thermal reforming, from biomethane, 25 bar",
        "from ATR of biogas",
    ),
    route(
        "hydrogen production, auto-thermal reforming, from biomethane, with CCS (MDEA, 98% eff.), 25 bar",
        "from ATR of biogas, with CCS",
    ),
    route(
        "hydrogen production, steam methane reforming of natural gas, 25 bar",
        "from SMR of nat. gas",
    ),
    route(
        "hydrogen production, steam methane reforming of natural gas, with CCS (MDEA, 98% eff.), 25 bar",
        "from SMR of nat. gas, with CCS",
    ),
    route(
        "hydrogen production, auto-thermal reforming of natural gas, 25 bar",
        "from ATR of nat. gas",
    ),
    route(
        "hydrogen production, auto-thermal reforming of natural gas, with CCS (MDEA, 98% eff.), 25 bar",
        "from ATR of nat. gas, with CCS",
    ),
    route(
        "hydrogen production, gaseous, 25 bar, from heatpipe reformer gasification of woody biomass with CCS, at gasification plant",
        "from gasification of biomass by heatpipe reformer, with CCS",
    ),
    route(
        "hydrogen production, gaseous, 25 bar, from heatpipe reformer gasification of woody biomass, at gasification plant",
        "from gasification of biomass by heatpipe reformer",
    ),
    route(
        "hydrogen production, gaseous, 25 bar, from gasification of woody biomass in entrained flow gasifier, with CCS, at gasification plant",
        "from gasification of biomass, with CCS",
    ),
    route(
        "hydrogen production, gaseous, 25 bar, from gasification of woody biomass in entrained flow gasifier, at gasification plant",
        "from gasification of biomass",
    ),
    route(
        "hydrogen production, gaseous, 30 bar, from hard coal gasification and reforming, at coal gasification plant",
        "from coal gasification",
    ),
];

const INHIBITION: &str = "hydrogen embrittlement inhibition";
const STORAGE: &str = "geological hydrogen storage";
const HYDROGENATION: &str = "hydrogenation of hydrogen";
const DEHYDROGENATION: &str = "dehydrogenation of hydrogen";
const REFUELLING_STATION: &str = "Hydrogen refuelling station";

pub const DELIVERED_PRODUCT: &str = "hydrogen, 700 bar";

/// 40 years at 400 000 t per year, in kg.
const PIPELINE_LIFETIME: f64 = 40.0 * 400_000.0 * 1e3;
/// Electricity to separate hydrogen from the inhibitor gas, kWh/kg.
const PURIFICATION_ELECTRICITY: f64 = 2.46;
/// Re-compression along pipelines: 0.6 kWh every 250 km.
const RECOMPRESSION_PER_KM: f64 = 0.6 / 250.0;

// ============================================================================
// Vehicles and states
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum H2State {
    Gaseous,
    Liquid,
    LiquidOrganicCompound,
}

impl H2State {
    pub fn label(self) -> &'static str {
        match self {
            H2State::Gaseous => "gaseous",
            H2State::Liquid => "liquid",
            H2State::LiquidOrganicCompound => "liquid organic compound",
        }
    }
}

impl fmt::Display for H2State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vehicle {
    Truck,
    Ship,
    H2Pipeline,
    CngPipeline,
}

impl Vehicle {
    pub const ALL: [Vehicle; 4] = [
        Vehicle::Truck,
        Vehicle::Ship,
        Vehicle::H2Pipeline,
        Vehicle::CngPipeline,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Vehicle::Truck => "truck",
            Vehicle::Ship => "ship",
            Vehicle::H2Pipeline => "H2 pipeline",
            Vehicle::CngPipeline => "CNG pipeline",
        }
    }

    pub fn states(self) -> &'static [H2State] {
        match self {
            Vehicle::Truck => &[
                H2State::Gaseous,
                H2State::Liquid,
                H2State::LiquidOrganicCompound,
            ],
            Vehicle::Ship => &[H2State::Liquid],
            Vehicle::H2Pipeline | Vehicle::CngPipeline => &[H2State::Gaseous],
        }
    }

    /// Delivery distances, km.
    pub fn distances(self) -> &'static [u32] {
        match self {
            Vehicle::Ship => &[2000, 5000],
            _ => &[500, 1000],
        }
    }

    pub fn is_pipeline(self) -> bool {
        matches!(self, Vehicle::H2Pipeline | Vehicle::CngPipeline)
    }

    /// Pipelines buffer hydrogen in a salt cavern between transmission and
    /// distribution.
    pub fn has_regional_storage(self) -> bool {
        self.is_pipeline()
    }

    /// Fraction of hydrogen lost over `distance` km, `None` if the vehicle
    /// does not carry that state.
    pub fn loss(self, state: H2State, distance: f64) -> Option<f64> {
        // liquefaction + vaporization at the station + boil-off of 0.2%/day
        let liquid = |speed_kmh: f64| 0.013 + 0.02 + (1.002f64.powf(distance / speed_kmh / 24.0) - 1.0);
        // compression + cavern buffer gas + cavern leakage + pipeline leakage
        let pipeline = 0.005 + 0.023 + 0.01 + 4e-5 * distance;

        match (self, state) {
            (Vehicle::Truck, H2State::Gaseous) => Some(0.005),
            (Vehicle::Truck, H2State::Liquid) => Some(liquid(50.0)),
            (Vehicle::Truck, H2State::LiquidOrganicCompound) => Some(0.005),
            (Vehicle::Ship, H2State::Liquid) => Some(liquid(36.0)),
            (Vehicle::H2Pipeline, H2State::Gaseous) => Some(pipeline),
            // 7% lost when separating hydrogen from the inhibitor
            (Vehicle::CngPipeline, H2State::Gaseous) => Some(pipeline + 0.07),
            _ => None,
        }
    }

    fn loss_note(self, state: H2State) -> &'static str {
        match (self, state) {
            (Vehicle::Truck, H2State::Liquid) => {
                " 1.3% lost at liquefaction, 0.2% boil-off per day of driving, 2% lost to vaporization when filling at the station."
            }
            (Vehicle::Ship, _) => {
                " 1.3% lost at liquefaction, 0.2% boil-off per day of shipping, 2% lost to vaporization when filling at the station."
            }
            (Vehicle::Truck, H2State::LiquidOrganicCompound) => " 0.5% lost at hydrogenation.",
            (Vehicle::Truck, _) => " 0.5% lost at compression.",
            (Vehicle::H2Pipeline, _) => {
                " 0.5% lost at compression, 3.3% at regional storage, 4e-5 kg per km of pipeline."
            }
            (Vehicle::CngPipeline, _) => {
                " 0.5% lost at compression, 3.3% at regional storage, 4e-5 kg per km of pipeline, 7% at separation from the inhibitor gas."
            }
        }
    }

    /// Compression electricity for gaseous delivery over `distance` km.
    fn compression(self, distance: f64) -> f64 {
        match self {
            // 25 -> 500 bar for the trailer, 500 -> 900 bar for dispensing
            Vehicle::Truck => {
                compression_effort(25.0, 500.0, 1000.0) + compression_effort(500.0, 900.0, 1000.0)
            }
            // 25 -> 100 bar into the pipeline, boosters, 100 -> 900 bar for dispensing
            _ => {
                compression_effort(25.0, 100.0, 1000.0)
                    + RECOMPRESSION_PER_KM * distance
                    + compression_effort(100.0, 900.0, 1000.0)
            }
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A transport service consumed by a delivery chain.
#[derive(Debug, Clone, PartialEq)]
struct TransportService {
    name: String,
    product: String,
    unit: String,
    location: String,
}

impl TransportService {
    fn new(name: &str, product: &str, unit: &str, location: &str) -> Self {
        Self {
            name: name.to_string(),
            product: product.to_string(),
            unit: unit.to_string(),
            location: location.to_string(),
        }
    }

    fn amount(&self, distance: f64) -> f64 {
        if self.unit == "ton kilometer" {
            distance / 1000.0
        } else {
            distance / 2.0 / PIPELINE_LIFETIME
        }
    }
}

fn pipelines(kind: &str) -> Vec<TransportService> {
    ["distribution", "transmission"]
        .iter()
        .map(|part| {
            TransportService::new(
                &format!("{part} pipeline for hydrogen, {kind}"),
                &format!("pipeline, for hydrogen {part}"),
                "kilometer",
                "RER",
            )
        })
        .collect()
}

/// Transport activity whose name contains every `include` and none of
/// `exclude`, preferring `location`.
fn find_transport_activity(
    db: &Database,
    include: &[&str],
    exclude: &[&str],
    location: &str,
) -> Result<TransportService> {
    let mut filters: Vec<Filter> = include
        .iter()
        .map(|i| Filter::contains(Field::Name, *i))
        .collect();
    filters.push(Filter::doesnt_contain_any(Field::Name, exclude.iter().copied()));

    let mut located = filters.clone();
    located.push(Filter::equals(Field::Location, location));
    let ds = match db.get_one(&located) {
        Ok(ds) => ds,
        Err(DbError::NoResults { .. }) => db.get_one(&filters)?,
        Err(e) => return Err(e.into()),
    };
    Ok(TransportService::new(
        &ds.name,
        &ds.reference_product,
        &ds.unit,
        &ds.location,
    ))
}

fn transport_services(vehicle: Vehicle, db: &Database) -> Result<Vec<TransportService>> {
    Ok(match vehicle {
        Vehicle::Truck => vec![TransportService::new(
            "market for transport, freight, lorry, unspecified",
            "transport, freight, lorry, unspecified",
            "ton kilometer",
            "RER",
        )],
        Vehicle::Ship => vec![find_transport_activity(
            db,
            &["market for transport, freight, sea", "liquefied"],
            &["other"],
            "RoW",
        )?],
        Vehicle::H2Pipeline => pipelines("dedicated hydrogen pipeline"),
        Vehicle::CngPipeline => pipelines("reassigned CNG pipeline"),
    })
}

fn electricity(amount: f64) -> Exchange {
    let (name, product, unit) = ELECTRICITY_MARKET;
    Exchange::technosphere(name, product, "RoW", unit, amount)
}

fn consume(template: &Activity, region: &str, amount: f64) -> Exchange {
    Exchange::technosphere(
        &template.name,
        &template.reference_product,
        region,
        &template.unit,
        amount,
    )
}

// ============================================================================
// Generator
// ============================================================================

/// Regional hydrogen production and delivery.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hydrogen;

struct Auxiliaries<'t> {
    inhibition: &'t Activity,
    storage: &'t Activity,
    hydrogenation: &'t Activity,
    dehydrogenation: &'t Activity,
    station: &'t Activity,
}

impl<'t> Auxiliaries<'t> {
    fn resolve(original: &'t Database) -> Result<Self> {
        let get = move |name: &str| original.get_one(&[Filter::equals(Field::Name, name)]);
        Ok(Self {
            inhibition: get(INHIBITION)?,
            storage: get(STORAGE)?,
            hydrogenation: get(HYDROGENATION)?,
            dehydrogenation: get(DEHYDROGENATION)?,
            station: get(REFUELLING_STATION)?,
        })
    }

    fn all(&self) -> [&'t Activity; 5] {
        [
            self.inhibition,
            self.storage,
            self.hydrogenation,
            self.dehydrogenation,
            self.station,
        ]
    }
}

/// Templates and transport services, resolved once per run.
struct ChainPlan<'t> {
    routes: Vec<(HydrogenRoute, &'t Activity)>,
    auxiliaries: Auxiliaries<'t>,
    vehicles: Vec<(Vehicle, Vec<TransportService>)>,
}

impl<'t> ChainPlan<'t> {
    fn resolve(original: &'t Database, working: &Database) -> Result<Self> {
        let mut routes = Vec::with_capacity(HYDROGEN_ROUTES.len());
        for route in HYDROGEN_ROUTES {
            if let Some(template) = optional_template(original, route.template)? {
                routes.push((route, template));
            }
        }

        let vehicles = Vehicle::ALL
            .iter()
            .map(|&v| Ok((v, transport_services(v, working)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            routes,
            auxiliaries: Auxiliaries::resolve(original)?,
            vehicles,
        })
    }
}

/// One delivery chain to build.
struct Chain<'p> {
    route: &'p HydrogenRoute,
    producer: &'p Activity,
    region: &'p str,
    vehicle: Vehicle,
    transport: &'p [TransportService],
    state: H2State,
    distance: u32,
}

impl Hydrogen {
    fn production(ctx: &Context<'_>, template: &Activity, region: &str) -> Result<Activity> {
        let mut ds = copy_to_new_location(template, region);
        if template.name.contains(ELECTROLYSIS) {
            let kwh = electrolysis_electricity(ctx.year());
            for exc in ds.technosphere_mut() {
                if exc.name.contains("market group for electricity") {
                    exc.amount = kwh;
                }
            }
            ds.append_comment(&format!(
                " Electricity input per kg of H2 adapted to {} ({kwh:.3} kWh).",
                ctx.year()
            ));
        }
        ctx.relink(&mut ds)?;
        ds.append_comment(" Region-specific hydrogen production dataset.");
        Ok(ds)
    }

    fn supply_chain(ctx: &Context<'_>, aux: &Auxiliaries<'_>, chain: Chain<'_>) -> Result<Option<Activity>> {
        let Chain {
            route,
            producer,
            region,
            vehicle,
            transport,
            state,
            distance,
        } = chain;
        let d = f64::from(distance);
        let Some(loss) = vehicle.loss(state, d) else {
            return Ok(None);
        };

        let name = format!(
            "hydrogen supply, {}, by {vehicle}, as {state}, over {distance} km",
            route.label
        );
        let mut act = Activity::new(&name, DELIVERED_PRODUCT, region, "kilogram", &producer.database);
        act.exchanges[0].production_volume = Some(1.0);
        act.comment = "Dataset representing hydrogen supply.".to_string();

        for t in transport {
            act.exchanges.push(
                Exchange::technosphere(&t.name, &t.product, &t.location, &t.unit, t.amount(d))
                    .with_comment(format!("Transport over {distance} km by {vehicle}.")),
            );
            act.append_comment(&format!(" Transport over {distance} km by {vehicle}."));
        }

        if vehicle == Vehicle::CngPipeline {
            act.exchanges.push(
                consume(aux.inhibition, region, 1.0)
                    .with_comment("Oxygen injected to prevent embrittlement of the steel."),
            );
            act.exchanges.push(
                electricity(PURIFICATION_ELECTRICITY)
                    .with_comment("Separation of hydrogen from the inhibitor gas."),
            );
            act.append_comment(&format!(
                " {PURIFICATION_ELECTRICITY} kWh/kg H2 purifies the hydrogen from the inhibiting gas, with a 93% recovery rate."
            ));
        }

        if vehicle.has_regional_storage() {
            act.exchanges.push(
                consume(aux.storage, region, 1.0)
                    .with_comment("Geological storage (salt cavern)."),
            );
            act.append_comment(" Geological storage included, with 0.344 kWh/kg for injection and pumping.");
        }

        match state {
            H2State::Gaseous => {
                let kwh = vehicle.compression(d);
                act.exchanges.push(electricity(kwh));
                act.append_comment(&format!(
                    " {kwh:.3} kWh to compress to {} bar and then to 900 bar for dispensing into 700 bar tanks.",
                    if vehicle.is_pipeline() { 100 } else { 500 }
                ));
                if vehicle.is_pipeline() {
                    act.append_comment(" Re-compression of 0.6 kWh every 250 km of pipeline.");
                }
            }
            H2State::Liquid => {
                let kwh = liquefaction_electricity(ctx.year());
                act.exchanges.push(electricity(kwh));
                act.append_comment(&format!(" {kwh:.3} kWh to liquefy the hydrogen."));
            }
            H2State::LiquidOrganicCompound => {
                act.exchanges.push(consume(aux.hydrogenation, region, 1.0));
                act.exchanges.push(consume(aux.dehydrogenation, region, 1.0));
                act.exchanges.push(electricity(compression_effort(25.0, 900.0, 1000.0)));
                act.append_comment(
                    " Hydrogenation, dehydrogenation and compression to 900 bar at delivery included.",
                );
            }
        }

        act.exchanges.push(Exchange::technosphere(
            &producer.name,
            &producer.reference_product,
            region,
            &producer.unit,
            1.0 + loss,
        ));
        act.append_comment(vehicle.loss_note(state));

        act.exchanges.push(consume(aux.station, region, REFUELLING_STATION_SHARE));

        let precooling = precooling_electricity(ctx.year());
        act.exchanges.push(electricity(precooling));
        act.append_comment(&format!(
            " Pre-cooling electricity of {precooling:.3} kWh, for an ambient temperature of {AMBIENT_TEMPERATURE} C \
             and a station utilization of {:.1} kg/day.",
            station_utilization(ctx.year())
        ));

        ctx.relink(&mut act)?;
        Ok(Some(act))
    }
}

impl Generator for Hydrogen {
    fn name(&self) -> &'static str {
        "hydrogen"
    }

    fn generate(&self, ctx: &mut Context<'_>) -> Result<usize> {
        let (original, regions) = (ctx.original, ctx.regions);
        let plan = ChainPlan::resolve(original, &*ctx.working)?;

        let mut added = 0;
        for region in regions {
            for (_, template) in &plan.routes {
                let ds = Self::production(ctx, template, region)?;
                added += usize::from(ctx.push(ds));
            }
            for template in plan.auxiliaries.all() {
                let ds = clone_to_region(template, region, &*ctx.working, ctx.relinker)?;
                added += usize::from(ctx.push(ds));
            }

            for (route, producer) in &plan.routes {
                for (vehicle, transport) in &plan.vehicles {
                    for &state in vehicle.states() {
                        for &distance in vehicle.distances() {
                            let chain = Chain {
                                route,
                                producer,
                                region,
                                vehicle: *vehicle,
                                transport,
                                state,
                                distance,
                            };
                            if let Some(act) = Self::supply_chain(ctx, &plan.auxiliaries, chain)? {
                                added += usize::from(ctx.push(act));
                            }
                        }
                    }
                }
            }
        }
        tracing::info!(added, routes = plan.routes.len(), "generated hydrogen activities");
        Ok(added)
    }
}
