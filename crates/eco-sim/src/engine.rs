//! The step-wise extraction and restoration engine.
//!
//! Both runs are deterministic pure computations over immutable
//! configuration: validate once, then walk discrete unit steps, invoking
//! the curve library, the cascade pass, and the optional carbon and
//! resilience accounting at each step. The damage and recovery curves
//! return TOTAL values at a level, not increments, so marginal cost is
//! derived by differencing consecutive totals. Once a run begins it is
//! guaranteed to complete; there are no mid-run failures and no retries.

use tracing::{debug, info};

use eco_model::{
    AgentEffect, Ecosystem, MaturationSummary, RecoveryCurve, RestorationCost, RestorationResult,
    RestorationStep, SimulationResult, SimulationStep,
};

use crate::carbon;
use crate::cascade::{propagate, CascadeMode, CascadeParams};
use crate::maturation;
use crate::resilience;
use crate::validate::{
    validate_ecosystem, validate_extraction, validate_restoration, ValidationError,
};

/// Simulates extracting `units_to_extract` units with default cascade
/// parameters.
pub fn run_extraction(
    ecosystem: &Ecosystem,
    units_to_extract: u32,
) -> Result<SimulationResult, ValidationError> {
    run_extraction_with(ecosystem, units_to_extract, &CascadeParams::default())
}

/// Simulates extracting `units_to_extract` units, one per step.
pub fn run_extraction_with(
    ecosystem: &Ecosystem,
    units_to_extract: u32,
    params: &CascadeParams,
) -> Result<SimulationResult, ValidationError> {
    validate_ecosystem(ecosystem)?;
    validate_extraction(ecosystem, units_to_extract)?;

    info!(
        ecosystem = %ecosystem.name,
        units = units_to_extract,
        "starting extraction run"
    );

    let resource = &ecosystem.resource;
    let total_units = resource.total_units as f64;
    let mut steps = Vec::with_capacity(units_to_extract as usize);

    if units_to_extract == 0 {
        return Ok(SimulationResult {
            ecosystem: ecosystem.clone(),
            steps,
            total_units_extracted: 0,
            total_private_revenue: 0.0,
            total_externality_cost: 0.0,
            net_social_cost: 0.0,
            final_ecosystem_health: 1.0,
        });
    }

    let mut previous_total_cost = 0.0;

    for step in 1..=units_to_extract {
        let depletion_ratio = step as f64 / total_units;

        let direct: Vec<f64> = ecosystem
            .agents
            .iter()
            .map(|a| a.damage_curve.evaluate(depletion_ratio))
            .collect();
        let outcome = propagate(ecosystem, &direct, params, CascadeMode::Damage);

        let mut cumulative_cost = 0.0;
        let mut health_loss = 0.0;
        let agent_effects: Vec<AgentEffect> = ecosystem
            .agents
            .iter()
            .enumerate()
            .map(|(i, agent)| {
                let cost = outcome.effective[i] * agent.dependency_weight * agent.monetary_rate;
                cumulative_cost += cost;
                health_loss += agent.dependency_weight * outcome.effective[i];
                AgentEffect {
                    agent: agent.name.clone(),
                    direct_damage: direct[i],
                    effective_damage: outcome.effective[i],
                    cascade_damage: outcome.cascade[i],
                    cost,
                }
            })
            .collect();

        if !outcome.keystone_triggered.is_empty() {
            debug!(step, agents = ?outcome.keystone_triggered, "keystone threshold crossed");
        }

        let resilience = resource.resilience.as_ref().map(|config| {
            resilience::reading_at(
                depletion_ratio,
                resource.safe_threshold_ratio,
                cumulative_cost,
                config,
            )
        });
        let carbon = resource.carbon.as_ref().map(|profile| carbon::ledger_at(profile, step));

        steps.push(SimulationStep {
            step,
            units_extracted: step,
            depletion_ratio,
            agent_effects,
            keystone_triggered: outcome.keystone_triggered,
            marginal_cost: cumulative_cost - previous_total_cost,
            cumulative_cost,
            private_revenue: step as f64 * resource.unit_value,
            ecosystem_health: (1.0 - health_loss).clamp(0.0, 1.0),
            resilience,
            carbon,
        });
        previous_total_cost = cumulative_cost;
    }

    // `steps` is non-empty here, the zero-unit case returned above.
    let last = &steps[steps.len() - 1];
    let total_externality = last.cumulative_cost;
    let total_revenue = last.private_revenue;
    let final_health = last.ecosystem_health;

    info!(
        externality = total_externality,
        revenue = total_revenue,
        health = final_health,
        "extraction run complete"
    );

    Ok(SimulationResult {
        ecosystem: ecosystem.clone(),
        steps,
        total_units_extracted: units_to_extract,
        total_private_revenue: total_revenue,
        total_externality_cost: total_externality,
        net_social_cost: total_revenue - total_externality,
        final_ecosystem_health: final_health,
    })
}

/// Simulates restoring `units_to_restore` units with default cascade
/// parameters. The maturation pass runs when `horizon_years > 0` and the
/// ecosystem carries a succession curve.
pub fn run_restoration(
    ecosystem: &Ecosystem,
    units_to_restore: u32,
    cost: &RestorationCost,
    recovery_curves: &[RecoveryCurve],
    horizon_years: u32,
) -> Result<RestorationResult, ValidationError> {
    run_restoration_with(
        ecosystem,
        units_to_restore,
        cost,
        recovery_curves,
        horizon_years,
        &CascadeParams::default(),
    )
}

/// Simulates restoring `units_to_restore` units, one per step, walking the
/// recovery curves upward over the project's own progress ratio.
pub fn run_restoration_with(
    ecosystem: &Ecosystem,
    units_to_restore: u32,
    cost: &RestorationCost,
    recovery_curves: &[RecoveryCurve],
    horizon_years: u32,
    params: &CascadeParams,
) -> Result<RestorationResult, ValidationError> {
    validate_ecosystem(ecosystem)?;
    validate_restoration(ecosystem, units_to_restore, recovery_curves)?;

    info!(
        ecosystem = %ecosystem.name,
        units = units_to_restore,
        horizon_years,
        "starting restoration run"
    );

    let resource = &ecosystem.resource;
    let cost_per_unit = cost.total_per_unit();
    let mut steps = Vec::with_capacity(units_to_restore as usize);
    let mut agent_ceilings = vec![0.0; ecosystem.agents.len()];

    for step in 1..=units_to_restore {
        let restoration_ratio = step as f64 / units_to_restore as f64;

        let direct: Vec<f64> = recovery_curves
            .iter()
            .map(|c| c.evaluate(restoration_ratio))
            .collect();
        let outcome = propagate(ecosystem, &direct, params, CascadeMode::Recovery);

        let mut recovered_value = 0.0;
        let mut health = 0.0;
        let agent_effects: Vec<AgentEffect> = ecosystem
            .agents
            .iter()
            .enumerate()
            .map(|(i, agent)| {
                let value = outcome.effective[i] * agent.dependency_weight * agent.monetary_rate;
                recovered_value += value;
                health += agent.dependency_weight * outcome.effective[i];
                agent_ceilings[i] = value;
                AgentEffect {
                    agent: agent.name.clone(),
                    direct_damage: direct[i],
                    effective_damage: outcome.effective[i],
                    cascade_damage: outcome.cascade[i],
                    cost: value,
                }
            })
            .collect();

        steps.push(RestorationStep {
            step,
            units_restored: step,
            restoration_ratio,
            agent_effects,
            keystone_triggered: outcome.keystone_triggered,
            restoration_cost_so_far: step as f64 * cost_per_unit,
            recovered_value,
            ecosystem_health: health.clamp(0.0, 1.0),
        });
    }

    let last = &steps[steps.len() - 1];
    let total_recovered_value = last.recovered_value;
    let final_health = last.ecosystem_health;
    let total_restoration_cost = units_to_restore as f64 * cost_per_unit;

    let foregone_revenue = units_to_restore as f64 * resource.unit_value;
    let prevention_advantage = if foregone_revenue > 0.0 {
        (foregone_revenue + total_restoration_cost) / foregone_revenue
    } else {
        1.0
    };

    let (maturation_timeline, maturation) = match (&ecosystem.succession, horizon_years) {
        (Some(curve), horizon) if horizon > 0 => {
            let outcome =
                maturation::run(ecosystem, curve, &agent_ceilings, units_to_restore, horizon);
            (outcome.timeline, outcome.summary)
        }
        _ => (Vec::new(), MaturationSummary::default()),
    };

    info!(
        recovered = total_recovered_value,
        cost = total_restoration_cost,
        health = final_health,
        "restoration run complete"
    );

    Ok(RestorationResult {
        ecosystem: ecosystem.clone(),
        steps,
        maturation_timeline,
        total_units_restored: units_to_restore,
        total_restoration_cost,
        total_recovered_value,
        net_restoration_value: total_recovered_value - total_restoration_cost,
        prevention_advantage,
        final_ecosystem_health: final_health,
        maturation,
    })
}
