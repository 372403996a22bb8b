//! The double carbon externality.
//!
//! Extraction produces two distinct monetized line items: the CO2 mass
//! released from biomass and soil, and the future absorption capacity lost
//! for the rest of each unit's productive lifetime. They are never merged
//! into a single figure. During restoration, absorption ramps up with the
//! succession curve; a sapling absorbs in proportion to its maturation
//! state, not at the full adult rate.

use eco_model::{CarbonLedger, CarbonProfile, SuccessionCurve};

/// Tonnes CO2 released by extracting `units` units:
/// `units * (stored + soil * soil_release_fraction)`.
pub fn release_tonnes(profile: &CarbonProfile, units: u32) -> f64 {
    let per_unit =
        profile.stored_carbon_tonnes + profile.soil_carbon_tonnes * profile.soil_release_fraction;
    per_unit * units as f64
}

/// The full carbon ledger at a cumulative unit count.
pub fn ledger_at(profile: &CarbonProfile, units: u32) -> CarbonLedger {
    let release = release_tonnes(profile, units);
    let foregone_per_year = profile.annual_absorption_tonnes * units as f64;
    let foregone_total = foregone_per_year * profile.remaining_lifetime_years;
    CarbonLedger {
        release_tonnes: release,
        foregone_tonnes_per_year: foregone_per_year,
        foregone_total_tonnes: foregone_total,
        release_cost: release * profile.carbon_price_per_tonne,
        foregone_cost: foregone_total * profile.carbon_price_per_tonne,
    }
}

/// Tonnes CO2 absorbed in one year by `units` restored units at the given
/// succession service fraction.
pub fn annual_absorption(profile: &CarbonProfile, units: u32, service_fraction: f64) -> f64 {
    profile.annual_absorption_tonnes * units as f64 * service_fraction
}

/// First year at which cumulative restored absorption covers the release
/// from extracting `units_extracted` units. `None` when `max_years` pass
/// without payback. Zero release pays back immediately.
pub fn payback_year(
    profile: &CarbonProfile,
    units_extracted: u32,
    units_restored: u32,
    curve: &SuccessionCurve,
    max_years: u32,
) -> Option<u32> {
    let total_release = release_tonnes(profile, units_extracted);
    if total_release <= 0.0 {
        return Some(0);
    }
    let mut cumulative = 0.0;
    for year in 1..=max_years {
        let fraction = curve.service(year as f64);
        cumulative += annual_absorption(profile, units_restored, fraction);
        if cumulative >= total_release {
            return Some(year);
        }
    }
    None
}
