//! Immutable per-step and per-year records produced by the engine.
//!
//! Records are created in strictly increasing step order and never mutated
//! afterwards. Optional sub-records (resilience, carbon) are attached only
//! when the resource carries the matching profile; absence is `None`, never
//! zeros standing in for absence.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::curve::SuccessionPhase;

/// One agent's damage figures for a single step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEffect {
    pub agent: String,
    /// Damage from depletion alone, before any cascade.
    pub direct_damage: f64,
    /// Damage after trophic amplification and edge propagation.
    pub effective_damage: f64,
    /// `effective - direct`, floored at zero.
    pub cascade_damage: f64,
    /// Monetary cost at this step, in euros.
    pub cost: f64,
}

/// Resilience zone at a given depletion level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResilienceZone {
    /// Ecosystem very likely resilient, high model confidence.
    Green,
    /// Resilience uncertain, degraded confidence.
    Yellow,
    /// Resilience likely compromised, low confidence.
    Red,
}

impl fmt::Display for ResilienceZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResilienceZone::Green => write!(f, "green"),
            ResilienceZone::Yellow => write!(f, "yellow"),
            ResilienceZone::Red => write!(f, "red"),
        }
    }
}

/// Resilience zone, model confidence, and the confidence-adjusted cost band
/// at one step. The band is `cost * (1 ± (1 - confidence))`, a heuristic
/// spread rather than a statistical interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResilienceReading {
    pub zone: ResilienceZone,
    pub confidence: f64,
    pub cost_band_low: f64,
    pub cost_band_high: f64,
    pub irreversibility_warning: bool,
}

/// The double carbon externality at one step, evaluated at the cumulative
/// unit count: mass released now, and future absorption capacity lost.
/// The two line items are reported separately, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonLedger {
    pub release_tonnes: f64,
    pub foregone_tonnes_per_year: f64,
    /// Total foregone over the profile's remaining lifetime.
    pub foregone_total_tonnes: f64,
    pub release_cost: f64,
    pub foregone_cost: f64,
}

impl CarbonLedger {
    pub fn total_cost(&self) -> f64 {
        self.release_cost + self.foregone_cost
    }
}

/// The simulation state after extracting `units_extracted` units total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStep {
    /// 1-indexed step number; equals `units_extracted`.
    pub step: u32,
    pub units_extracted: u32,
    pub depletion_ratio: f64,
    pub agent_effects: Vec<AgentEffect>,
    /// Agents whose keystone health threshold was crossed this step.
    pub keystone_triggered: Vec<String>,
    /// Externality cost of this unit only, derived by differencing
    /// consecutive cumulative totals.
    pub marginal_cost: f64,
    pub cumulative_cost: f64,
    pub private_revenue: f64,
    /// Weighted average health index, 0.0 collapsed to 1.0 pristine.
    pub ecosystem_health: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resilience: Option<ResilienceReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon: Option<CarbonLedger>,
}

/// The restoration planting pass state after restoring `units_restored`
/// units total. Recovered value is a level at the current restoration
/// ratio, not an increment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestorationStep {
    pub step: u32,
    pub units_restored: u32,
    /// Progress through the restoration project, `step / units_to_restore`.
    pub restoration_ratio: f64,
    pub agent_effects: Vec<AgentEffect>,
    pub keystone_triggered: Vec<String>,
    /// Direct restoration cost accrued so far (planting + maintenance).
    pub restoration_cost_so_far: f64,
    /// Total service value recovered at this restoration level.
    pub recovered_value: f64,
    pub ecosystem_health: f64,
}

/// One year of the post-restoration succession timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturationStep {
    /// 1-indexed year since restoration began.
    pub year: u32,
    pub phase: SuccessionPhase,
    /// Ecosystem-wide service fraction, weighted across agents.
    pub service_fraction: f64,
    pub annual_service_value: f64,
    pub cumulative_service_value: f64,
    pub annual_carbon_absorbed: f64,
    pub cumulative_carbon_absorbed: f64,
}
