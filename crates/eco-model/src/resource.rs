//! The shared natural asset and its optional accounting profiles.

use serde::{Deserialize, Serialize};

use crate::curve::SuccessionCurve;

/// The shared natural asset being extracted or restored.
///
/// Immutable once a run starts. The threshold is the fraction of total units
/// that can be extracted before damage accelerates sharply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    /// Total number of extractable units, e.g. 10000 trees.
    pub total_units: u32,
    /// Fraction of total units safely extractable, in (0, 1).
    pub safe_threshold_ratio: f64,
    /// Private revenue per unit extracted, in euros.
    pub unit_value: f64,
    /// Carbon accounting per unit. Absence means no carbon output at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon: Option<CarbonProfile>,
    /// Resilience-zone tagging. Absence means no resilience output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resilience: Option<ResilienceConfig>,
}

impl Resource {
    pub fn new(name: impl Into<String>, total_units: u32, threshold: f64, unit_value: f64) -> Self {
        Resource {
            name: name.into(),
            total_units,
            safe_threshold_ratio: threshold,
            unit_value,
            carbon: None,
            resilience: None,
        }
    }

    pub fn with_carbon(mut self, profile: CarbonProfile) -> Self {
        self.carbon = Some(profile);
        self
    }

    pub fn with_resilience(mut self, config: ResilienceConfig) -> Self {
        self.resilience = Some(config);
        self
    }

    /// Absolute number of units at the safe threshold.
    pub fn safe_threshold_units(&self) -> u32 {
        (self.total_units as f64 * self.safe_threshold_ratio) as u32
    }
}

/// Per-unit carbon figures for the double carbon externality: mass released
/// on extraction, and future absorption capacity lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonProfile {
    /// Tonnes CO2 stored in biomass per unit.
    pub stored_carbon_tonnes: f64,
    /// Tonnes CO2 absorbed per unit per year at full maturity.
    pub annual_absorption_tonnes: f64,
    /// Tonnes CO2 held in soil per unit.
    pub soil_carbon_tonnes: f64,
    /// Fraction of soil carbon released when the unit is extracted.
    pub soil_release_fraction: f64,
    /// Price per tonne CO2, in euros.
    pub carbon_price_per_tonne: f64,
    /// Estimated productive years each unit had left, used for the
    /// foregone-absorption line item.
    pub remaining_lifetime_years: f64,
    /// Overrides the ecosystem succession curve for absorption ramp-up
    /// during restoration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absorption_curve: Option<SuccessionCurve>,
}

/// Three-zone resilience model parameters.
///
/// Confidence is fixed at `confidence_green` in the green zone, interpolates
/// linearly from green to yellow across the warning zone, and from yellow to
/// red past the safe-remaining fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Width of the yellow warning band above the safe-remaining fraction.
    pub warning_zone_width: f64,
    pub confidence_green: f64,
    pub confidence_yellow: f64,
    pub confidence_red: f64,
    /// Depletion ratio past which the irreversibility flag is raised.
    pub irreversibility_flag_ratio: f64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        ResilienceConfig {
            warning_zone_width: 0.10,
            confidence_green: 0.90,
            confidence_yellow: 0.60,
            confidence_red: 0.30,
            irreversibility_flag_ratio: 0.50,
        }
    }
}
