//! Run-level aggregates returned by the engine.

use serde::{Deserialize, Serialize};

use crate::agent::Ecosystem;
use crate::step::{MaturationStep, RestorationStep, SimulationStep};

/// The complete output of an extraction run. Owned by the caller once
/// returned; the engine holds no further reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub ecosystem: Ecosystem,
    pub steps: Vec<SimulationStep>,
    pub total_units_extracted: u32,
    pub total_private_revenue: f64,
    pub total_externality_cost: f64,
    /// Revenue minus externality. Positive means society gained.
    pub net_social_cost: f64,
    pub final_ecosystem_health: f64,
}

/// Per-unit restoration cost structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestorationCost {
    pub planting_cost_per_unit: f64,
    pub annual_maintenance_per_unit: f64,
    pub maintenance_years: u32,
}

impl RestorationCost {
    pub fn new(planting: f64, maintenance: f64, years: u32) -> Self {
        RestorationCost {
            planting_cost_per_unit: planting,
            annual_maintenance_per_unit: maintenance,
            maintenance_years: years,
        }
    }

    /// Full per-unit cost: planting plus maintenance over its duration.
    pub fn total_per_unit(&self) -> f64 {
        self.planting_cost_per_unit
            + self.annual_maintenance_per_unit * self.maintenance_years as f64
    }
}

/// Summary of the maturation pass, empty when the pass was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaturationSummary {
    pub years_to_pioneer: f64,
    pub years_to_50pct: f64,
    pub years_to_90pct: f64,
    /// Accumulated shortfall between the recoverable ceiling and what the
    /// maturing ecosystem actually delivered each year.
    pub total_maturation_gap: f64,
    /// First year cumulative absorption covers the release at destruction.
    /// `None` when the horizon ends before payback.
    pub carbon_payback_year: Option<u32>,
}

/// The complete output of a restoration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestorationResult {
    pub ecosystem: Ecosystem,
    pub steps: Vec<RestorationStep>,
    /// Year-by-year succession timeline; empty when no succession curve or
    /// time horizon was configured.
    pub maturation_timeline: Vec<MaturationStep>,
    pub total_units_restored: u32,
    pub total_restoration_cost: f64,
    /// Service value ceiling recovered by the planting pass.
    pub total_recovered_value: f64,
    /// `total_recovered_value - total_restoration_cost`.
    pub net_restoration_value: f64,
    /// How much cheaper never destroying would have been:
    /// `(foregone_revenue + restoration_cost) / foregone_revenue`.
    pub prevention_advantage: f64,
    pub final_ecosystem_health: f64,
    pub maturation: MaturationSummary,
}
