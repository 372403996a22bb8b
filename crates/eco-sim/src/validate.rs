//! Pre-flight validation of simulation inputs.
//!
//! Every check runs once, before any simulation step executes, and every
//! failure is fatal to the run. Bad input must be caught early and loudly;
//! nothing here silently defaults. Once a run begins it is guaranteed to
//! complete.

use std::collections::HashSet;

use thiserror::Error;
use tracing::warn;

use eco_model::{Ecosystem, InteractionEdge, RecoveryCurve, Resource};

/// Tolerance for the dependency-weight sum check.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Tolerance for curve boundary checks.
pub const BOUNDARY_TOLERANCE: f64 = 1e-4;

/// Sample points used when probing curve invariants.
const INVARIANT_CHECK_POINTS: usize = 1_000;

/// Configuration and curve-contract violations, all detected before any
/// simulation step runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("resource '{name}': total_units must be > 0")]
    EmptyResource { name: String },
    #[error("resource '{name}': safe_threshold_ratio must be in (0, 1), got {ratio}")]
    ThresholdOutOfRange { name: String, ratio: f64 },
    #[error("resource '{name}': unit_value must be >= 0, got {value}")]
    NegativeUnitValue { name: String, value: f64 },
    #[error("ecosystem '{name}' must have at least one agent")]
    NoAgents { name: String },
    #[error("agent '{name}': dependency_weight must be in (0, 1], got {weight}")]
    WeightOutOfRange { name: String, weight: f64 },
    #[error("agent '{name}': monetary_rate must be >= 0, got {rate}")]
    NegativeMonetaryRate { name: String, rate: f64 },
    #[error("agent dependency_weights must sum to 1.0, got {sum:.6}")]
    WeightSumMismatch { sum: f64 },
    #[error("agent '{name}': keystone_threshold must be in (0, 1), got {threshold}")]
    KeystoneThresholdOutOfRange { name: String, threshold: f64 },
    #[error("interaction edge {endpoint} '{name}' is not an agent in the ecosystem")]
    UnknownEdgeEndpoint { endpoint: &'static str, name: String },
    #[error("interaction edge cannot be a self-loop: '{name}'")]
    SelfLoopEdge { name: String },
    // Field is not named `source` so thiserror does not treat it as the
    // error's cause.
    #[error("interaction edge '{source_agent}' -> '{target}': strength must be in (0, 1], got {strength}")]
    EdgeStrengthOutOfRange {
        source_agent: String,
        target: String,
        strength: f64,
    },
    #[error("curve for '{agent}': {violation}")]
    CurveContract { agent: String, violation: CurveViolation },
    #[error("units_to_extract ({units}) exceeds resource total_units ({total})")]
    TooManyUnits { units: u32, total: u32 },
    #[error("units_to_restore must be > 0")]
    NothingToRestore,
    #[error("units_to_restore ({units}) exceeds resource total_units ({total})")]
    RestoreBeyondCapacity { units: u32, total: u32 },
    #[error("got {curves} recovery curves for {agents} agents, need one per agent")]
    RecoveryCurveCountMismatch { curves: usize, agents: usize },
}

/// Which of the five curve invariants a probe violated.
#[derive(Debug, Error)]
pub enum CurveViolation {
    #[error("f(0) must be ~0 (tolerance {BOUNDARY_TOLERANCE}), got {value}")]
    NonzeroAtOrigin { value: f64 },
    #[error("f(1) must be ~1 (tolerance {BOUNDARY_TOLERANCE}), got {value}")]
    NotOneAtFull { value: f64 },
    #[error("output at x={x:.4} is {value:.6}, must be in [0, 1]")]
    OutOfRange { x: f64, value: f64 },
    #[error("monotonicity violated at x={x:.4}: f fell from {previous:.6} to {value:.6}")]
    Decreasing { x: f64, previous: f64, value: f64 },
    #[error("damage below threshold too steep: f({threshold}) = {value:.6} >= {threshold}")]
    PreThresholdTooSteep { threshold: f64, value: f64 },
    #[error("curve is not convex just past its threshold {threshold}")]
    NotConvexPastThreshold { threshold: f64 },
}

/// Validates an ecosystem's resource, agents, graph, and damage curves.
pub fn validate_ecosystem(ecosystem: &Ecosystem) -> Result<(), ValidationError> {
    validate_resource(&ecosystem.resource)?;

    if ecosystem.agents.is_empty() {
        return Err(ValidationError::NoAgents {
            name: ecosystem.name.clone(),
        });
    }

    let mut weight_sum = 0.0;
    for agent in &ecosystem.agents {
        if agent.dependency_weight <= 0.0 || agent.dependency_weight > 1.0 {
            return Err(ValidationError::WeightOutOfRange {
                name: agent.name.clone(),
                weight: agent.dependency_weight,
            });
        }
        if agent.monetary_rate < 0.0 {
            return Err(ValidationError::NegativeMonetaryRate {
                name: agent.name.clone(),
                rate: agent.monetary_rate,
            });
        }
        if let Some(threshold) = agent.keystone_threshold {
            if threshold <= 0.0 || threshold >= 1.0 {
                return Err(ValidationError::KeystoneThresholdOutOfRange {
                    name: agent.name.clone(),
                    threshold,
                });
            }
        }
        weight_sum += agent.dependency_weight;
    }
    if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        warn!(sum = weight_sum, "rejecting ecosystem: weights do not sum to 1");
        return Err(ValidationError::WeightSumMismatch { sum: weight_sum });
    }

    let names: HashSet<&str> = ecosystem.agents.iter().map(|a| a.name.as_str()).collect();
    for edge in &ecosystem.interactions {
        validate_edge(edge, &names)?;
    }

    for agent in &ecosystem.agents {
        probe_curve(|x| agent.damage_curve.evaluate(x), agent.damage_curve.threshold())
            .map_err(|violation| ValidationError::CurveContract {
                agent: agent.name.clone(),
                violation,
            })?;
    }

    Ok(())
}

/// Validates the resource's own field ranges.
pub fn validate_resource(resource: &Resource) -> Result<(), ValidationError> {
    if resource.total_units == 0 {
        return Err(ValidationError::EmptyResource {
            name: resource.name.clone(),
        });
    }
    if resource.safe_threshold_ratio <= 0.0 || resource.safe_threshold_ratio >= 1.0 {
        return Err(ValidationError::ThresholdOutOfRange {
            name: resource.name.clone(),
            ratio: resource.safe_threshold_ratio,
        });
    }
    if resource.unit_value < 0.0 {
        return Err(ValidationError::NegativeUnitValue {
            name: resource.name.clone(),
            value: resource.unit_value,
        });
    }
    Ok(())
}

/// Validates extraction parameters. Zero units is allowed and yields an
/// empty result.
pub fn validate_extraction(
    ecosystem: &Ecosystem,
    units_to_extract: u32,
) -> Result<(), ValidationError> {
    if units_to_extract > ecosystem.resource.total_units {
        return Err(ValidationError::TooManyUnits {
            units: units_to_extract,
            total: ecosystem.resource.total_units,
        });
    }
    Ok(())
}

/// Validates restoration parameters and the recovery curves, one per agent.
pub fn validate_restoration(
    ecosystem: &Ecosystem,
    units_to_restore: u32,
    recovery_curves: &[RecoveryCurve],
) -> Result<(), ValidationError> {
    if units_to_restore == 0 {
        return Err(ValidationError::NothingToRestore);
    }
    if units_to_restore > ecosystem.resource.total_units {
        return Err(ValidationError::RestoreBeyondCapacity {
            units: units_to_restore,
            total: ecosystem.resource.total_units,
        });
    }
    if recovery_curves.len() != ecosystem.agents.len() {
        return Err(ValidationError::RecoveryCurveCountMismatch {
            curves: recovery_curves.len(),
            agents: ecosystem.agents.len(),
        });
    }
    for (agent, curve) in ecosystem.agents.iter().zip(recovery_curves) {
        probe_curve(|x| curve.evaluate(x), curve.threshold()).map_err(|violation| {
            ValidationError::CurveContract {
                agent: agent.name.clone(),
                violation,
            }
        })?;
    }
    Ok(())
}

fn validate_edge(edge: &InteractionEdge, names: &HashSet<&str>) -> Result<(), ValidationError> {
    if !names.contains(edge.source.as_str()) {
        return Err(ValidationError::UnknownEdgeEndpoint {
            endpoint: "source",
            name: edge.source.clone(),
        });
    }
    if !names.contains(edge.target.as_str()) {
        return Err(ValidationError::UnknownEdgeEndpoint {
            endpoint: "target",
            name: edge.target.clone(),
        });
    }
    if edge.source == edge.target {
        return Err(ValidationError::SelfLoopEdge {
            name: edge.source.clone(),
        });
    }
    if edge.strength <= 0.0 || edge.strength > 1.0 {
        return Err(ValidationError::EdgeStrengthOutOfRange {
            source_agent: edge.source.clone(),
            target: edge.target.clone(),
            strength: edge.strength,
        });
    }
    Ok(())
}

/// Probes a curve against the five shape invariants.
///
/// 1. Boundaries: f(0) ~ 0 and f(1) ~ 1 within tolerance.
/// 2. Non-decreasing over 1000 sample points.
/// 3. Output confined to [0, 1] at every sample.
/// 4. Post-threshold average slope exceeds the pre-threshold average slope.
///    With exact boundaries this reduces to f(threshold) < threshold.
/// 5. Positive mean second difference over the window just past the
///    threshold, `[t, t + 0.1 * (1 - t)]`.
pub fn probe_curve<F: Fn(f64) -> f64>(f: F, threshold: f64) -> Result<(), CurveViolation> {
    // Every check also rejects NaN and infinity. A curve whose arithmetic
    // overflows must fail the probe here, not get clamped downstream.
    let at_zero = f(0.0);
    if !at_zero.is_finite() || at_zero.abs() > BOUNDARY_TOLERANCE {
        return Err(CurveViolation::NonzeroAtOrigin { value: at_zero });
    }
    let at_one = f(1.0);
    if !at_one.is_finite() || (at_one - 1.0).abs() > BOUNDARY_TOLERANCE {
        return Err(CurveViolation::NotOneAtFull { value: at_one });
    }

    let n = INVARIANT_CHECK_POINTS;
    let mut prev = at_zero;
    for i in 1..=n {
        let x = i as f64 / n as f64;
        let value = f(x);
        if !value.is_finite() || value < -BOUNDARY_TOLERANCE || value > 1.0 + BOUNDARY_TOLERANCE {
            return Err(CurveViolation::OutOfRange { x, value });
        }
        if value < prev - BOUNDARY_TOLERANCE {
            return Err(CurveViolation::Decreasing {
                x,
                previous: prev,
                value,
            });
        }
        prev = value;
    }

    let at_threshold = f(threshold);
    if at_threshold.is_nan() || at_threshold >= threshold {
        return Err(CurveViolation::PreThresholdTooSteep {
            threshold,
            value: at_threshold,
        });
    }

    // Second-difference probe over the stretch immediately past the threshold.
    let h = 0.1 * (1.0 - threshold) / 8.0;
    let mut sum = 0.0;
    for k in 0..8 {
        let x = threshold + k as f64 * h;
        sum += f(x + h) - 2.0 * f(x) + f(x - h);
    }
    if sum.is_nan() || sum <= 0.0 {
        return Err(CurveViolation::NotConvexPastThreshold { threshold });
    }

    Ok(())
}
