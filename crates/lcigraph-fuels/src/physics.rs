//! Engineering relations for hydrogen supply
//!
//! All results are electricity in kWh per kg of hydrogen delivered.

use lcigraph_iam::interp;

const Z_FACTOR: f64 = 1.03198;
const STAGES: f64 = 2.0;
/// Compressor inlet temperature, K.
const T_INLET: f64 = 310.95;
/// Ratio of specific heats.
const GAMMA: f64 = 1.4;
/// Molar mass of hydrogen, g/mol.
const M_H2: f64 = 2.15;
const EFFICIENCY: f64 = 0.75;
const R: f64 = 8.314;

/// Compressor electricity to bring hydrogen from `p_in` to `p_out` bar.
///
/// `flow_rate` is the mass flow in kg/day; it cancels out of the per-kg result
/// but is kept so the shaft-power terms read as in the compressor model.
pub fn compression_effort(p_in: f64, p_out: f64, flow_rate: f64) -> f64 {
    let part1 = flow_rate / (24.0 * 3600.0) * (Z_FACTOR * T_INLET * R) / (M_H2 * EFFICIENCY)
        * (STAGES * GAMMA / (GAMMA - 1.0));
    let part2 = (p_out / p_in).powf((GAMMA - 1.0) / (STAGES * GAMMA)) - 1.0;
    part1 * part2 * 24.0 / flow_rate
}

/// PEM electrolysis: 58.6 kWh/kg in 2010 improving linearly to 44.4 kWh/kg in
/// 2050. Years outside 2010..=2050 are clamped.
pub fn electrolysis_electricity(year: i32) -> f64 {
    let year = year.clamp(2010, 2050);
    -0.3538 * f64::from(year - 2010) + 58.589
}

/// Liquefaction: 12 kWh/kg today, 8 by 2035, 6 by 2050.
pub fn liquefaction_electricity(year: i32) -> f64 {
    interp(f64::from(year), &[2020.0, 2035.0, 2050.0], &[12.0, 8.0, 6.0])
        .unwrap_or(12.0)
        .clamp(6.0, 12.0)
}

/// Ambient temperature at the refuelling station, degrees C.
pub const AMBIENT_TEMPERATURE: f64 = 25.0;

/// Station capacity utilization, kg H2/day: 10 in 2020 rising to 150 in 2050.
pub fn station_utilization(year: i32) -> f64 {
    interp(f64::from(year), &[2020.0, 2050.0], &[10.0, 150.0]).unwrap_or(10.0)
}

/// Refrigeration that keeps dispensed hydrogen at -30 C.
pub fn precooling_electricity(year: i32) -> f64 {
    let t = AMBIENT_TEMPERATURE;
    0.3 / 1.6 * (-0.018 * t).exp() + (25.0 * t.ln() - 21.0) / station_utilization(year)
}

/// Share of a refuelling station per kg dispensed: 600 kg/day over 40 years.
pub const REFUELLING_STATION_SHARE: f64 = 1.0 / (600.0 * 365.0 * 40.0);
