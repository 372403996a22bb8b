//! Trophic amplification and single-pass cascade propagation.
//!
//! Per step, direct damages are first amplified by trophic level, then
//! keystone collapse doubles outgoing edge strengths for this step only,
//! then every interaction edge is walked exactly once, adding spillover
//! from the frozen amplified source values to each target. Edges are never
//! revisited and cycles are never resolved to a fixed point: a 2-cycle
//! contributes one hop of damage in each direction and nothing more. Because
//! sources are read from the frozen array, the result is independent of
//! edge order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use eco_model::Ecosystem;

/// Tunable cascade constants. The amplification and boost factors are
/// acknowledged placeholders pending field calibration, so they are
/// configuration rather than hard-coded values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeParams {
    /// Fraction of energy that survives each trophic transfer.
    pub transfer_efficiency: f64,
    /// Exponent scale taming the raw trophic pyramid math. The amplification
    /// at level L is `(1 / transfer_efficiency) ^ (L * scale)`, roughly
    /// 1.5x to 3.3x across levels 1-3 at the defaults.
    pub trophic_exponent_scale: f64,
    /// Outgoing-strength multiplier when a keystone collapses.
    pub keystone_boost: f64,
    /// Edge-strength dampening in recovery mode; recovery cascades
    /// propagate more weakly than damage cascades.
    pub recovery_dampening: f64,
}

impl Default for CascadeParams {
    fn default() -> Self {
        CascadeParams {
            transfer_efficiency: 0.2,
            trophic_exponent_scale: 0.25,
            keystone_boost: 2.0,
            recovery_dampening: 0.5,
        }
    }
}

impl CascadeParams {
    /// Amplification factor for a numeric trophic level. Levels 0 and below
    /// are unamplified.
    pub fn amplification(&self, level: i8) -> f64 {
        if level <= 0 {
            return 1.0;
        }
        (1.0 / self.transfer_efficiency).powf(level as f64 * self.trophic_exponent_scale)
    }
}

/// Whether edge strengths carry the recovery-mode dampening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeMode {
    Damage,
    Recovery,
}

/// Output of one propagation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    /// Post-amplification, post-propagation value per agent, clamped to 1.0.
    pub effective: Vec<f64>,
    /// `effective - direct`, floored at zero per agent.
    pub cascade: Vec<f64>,
    /// Names of agents whose keystone threshold was crossed this step.
    pub keystone_triggered: Vec<String>,
}

/// Runs one propagation pass over the ecosystem's interaction graph.
///
/// `direct` holds the raw curve value per agent, in agent order. The
/// graph is assumed well-formed; the validator rejects bad edges before
/// any step runs.
pub fn propagate(
    ecosystem: &Ecosystem,
    direct: &[f64],
    params: &CascadeParams,
    mode: CascadeMode,
) -> CascadeOutcome {
    let agents = &ecosystem.agents;
    debug_assert_eq!(agents.len(), direct.len());

    // Trophic amplification, clamped to full damage.
    let amplified: Vec<f64> = agents
        .iter()
        .zip(direct)
        .map(|(agent, &d)| (d * params.amplification(agent.trophic_level.level())).min(1.0))
        .collect();

    let mut effective = amplified.clone();
    let mut keystone_triggered = Vec::new();

    if !ecosystem.interactions.is_empty() {
        // Keystone collapse boosts outgoing strengths for this step only.
        let mut strengths: Vec<f64> = ecosystem.interactions.iter().map(|e| e.strength).collect();
        for (agent, &value) in agents.iter().zip(&amplified) {
            let Some(threshold) = agent.keystone_threshold else {
                continue;
            };
            let health = 1.0 - value;
            if health < threshold {
                keystone_triggered.push(agent.name.clone());
                for (edge, strength) in ecosystem.interactions.iter().zip(&mut strengths) {
                    if edge.source == agent.name {
                        *strength = (*strength * params.keystone_boost).min(1.0);
                    }
                }
            }
        }

        if mode == CascadeMode::Recovery {
            for strength in &mut strengths {
                *strength *= params.recovery_dampening;
            }
        }

        // Single pass: sources are read from the frozen amplified array.
        // The validator guarantees both endpoints resolve.
        let index: HashMap<&str, usize> = agents
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.as_str(), i))
            .collect();
        for (edge, &strength) in ecosystem.interactions.iter().zip(&strengths) {
            let (Some(&src), Some(&tgt)) = (
                index.get(edge.source.as_str()),
                index.get(edge.target.as_str()),
            ) else {
                continue;
            };
            effective[tgt] = (effective[tgt] + amplified[src] * strength).min(1.0);
        }
    }

    // Cascade delta is measured against the raw direct value, so it also
    // covers the trophic share; capping can push it to zero.
    let cascade: Vec<f64> = effective
        .iter()
        .zip(direct)
        .map(|(&eff, &d)| (eff - d).max(0.0))
        .collect();

    CascadeOutcome {
        effective,
        cascade,
        keystone_triggered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_model::{Agent, DamageCurve, InteractionEdge, InteractionKind, Resource, TrophicLevel};

    fn ecosystem(agents: Vec<Agent>, edges: Vec<InteractionEdge>) -> Ecosystem {
        let resource = Resource::new("test", 1_000, 0.3, 10.0);
        Ecosystem::new("test", resource, agents).with_interactions(edges)
    }

    fn agent(name: &str, weight: f64, level: TrophicLevel) -> Agent {
        Agent::new(name, weight, DamageCurve::logistic(0.3), 100_000.0, "")
            .with_trophic_level(level)
    }

    fn edge(source: &str, target: &str, strength: f64) -> InteractionEdge {
        InteractionEdge::new(source, target, strength, InteractionKind::Dependency, "")
    }

    #[test]
    fn test_amplification_grows_with_trophic_level() {
        let params = CascadeParams::default();
        assert_eq!(params.amplification(-1), 1.0);
        assert_eq!(params.amplification(0), 1.0);
        let a1 = params.amplification(1);
        let a2 = params.amplification(2);
        let a3 = params.amplification(3);
        assert!(a1 > 1.0 && a2 > a1 && a3 > a2);
        assert!(a1 > 1.4 && a1 < 1.6);
        assert!(a3 > 3.2 && a3 < 3.5);
    }

    #[test]
    fn test_no_edges_abiotic_is_identity() {
        let eco = ecosystem(
            vec![
                agent("a", 0.5, TrophicLevel::Abiotic),
                agent("b", 0.5, TrophicLevel::Abiotic),
            ],
            vec![],
        );
        let out = propagate(&eco, &[0.3, 0.7], &CascadeParams::default(), CascadeMode::Damage);
        assert_eq!(out.effective, vec![0.3, 0.7]);
        assert_eq!(out.cascade, vec![0.0, 0.0]);
        assert!(out.keystone_triggered.is_empty());
    }

    #[test]
    fn test_trophic_amplification_applies_without_edges() {
        let eco = ecosystem(
            vec![
                agent("producer", 0.5, TrophicLevel::Producer),
                agent("predator", 0.5, TrophicLevel::SecondaryConsumer),
            ],
            vec![],
        );
        let params = CascadeParams::default();
        let out = propagate(&eco, &[0.2, 0.2], &params, CascadeMode::Damage);
        assert_eq!(out.effective[0], 0.2);
        let expected = 0.2 * params.amplification(2);
        assert!((out.effective[1] - expected).abs() < 1e-12);
        assert!((out.cascade[1] - (expected - 0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_amplified_damage_clamped_to_one() {
        let eco = ecosystem(vec![agent("apex", 1.0, TrophicLevel::TertiaryConsumer)], vec![]);
        let out = propagate(&eco, &[0.9], &CascadeParams::default(), CascadeMode::Damage);
        assert_eq!(out.effective[0], 1.0);
    }

    #[test]
    fn test_edge_adds_source_damage_times_strength() {
        let eco = ecosystem(
            vec![
                agent("a", 0.5, TrophicLevel::Abiotic),
                agent("b", 0.5, TrophicLevel::Abiotic),
            ],
            vec![edge("a", "b", 0.5)],
        );
        let out = propagate(&eco, &[0.4, 0.1], &CascadeParams::default(), CascadeMode::Damage);
        assert!((out.effective[1] - 0.3).abs() < 1e-12);
        assert!((out.cascade[1] - 0.2).abs() < 1e-12);
        assert_eq!(out.effective[0], 0.4);
    }

    #[test]
    fn test_chain_moves_one_hop_per_step() {
        // a -> b -> c: c only receives b's frozen value, not a's spillover.
        let eco = ecosystem(
            vec![
                agent("a", 0.4, TrophicLevel::Abiotic),
                agent("b", 0.3, TrophicLevel::Abiotic),
                agent("c", 0.3, TrophicLevel::Abiotic),
            ],
            vec![edge("a", "b", 1.0), edge("b", "c", 1.0)],
        );
        let out = propagate(&eco, &[0.5, 0.0, 0.0], &CascadeParams::default(), CascadeMode::Damage);
        assert!((out.effective[1] - 0.5).abs() < 1e-12);
        assert_eq!(out.effective[2], 0.0);
    }

    #[test]
    fn test_two_cycle_is_bounded() {
        let eco = ecosystem(
            vec![
                agent("a", 0.5, TrophicLevel::Abiotic),
                agent("b", 0.5, TrophicLevel::Abiotic),
            ],
            vec![edge("a", "b", 0.8), edge("b", "a", 0.8)],
        );
        let out = propagate(&eco, &[0.5, 0.5], &CascadeParams::default(), CascadeMode::Damage);
        // One hop in each direction: 0.5 + 0.5 * 0.8 = 0.9, no accumulation.
        assert!((out.effective[0] - 0.9).abs() < 1e-12);
        assert!((out.effective[1] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_result_independent_of_edge_order() {
        let agents = || {
            vec![
                agent("a", 0.4, TrophicLevel::Abiotic),
                agent("b", 0.3, TrophicLevel::Abiotic),
                agent("c", 0.3, TrophicLevel::Abiotic),
            ]
        };
        let forward = ecosystem(agents(), vec![edge("a", "b", 0.5), edge("b", "c", 0.5)]);
        let reversed = ecosystem(agents(), vec![edge("b", "c", 0.5), edge("a", "b", 0.5)]);
        let direct = [0.6, 0.2, 0.1];
        let params = CascadeParams::default();
        let out_fwd = propagate(&forward, &direct, &params, CascadeMode::Damage);
        let out_rev = propagate(&reversed, &direct, &params, CascadeMode::Damage);
        assert_eq!(out_fwd.effective, out_rev.effective);
    }

    #[test]
    fn test_keystone_boost_below_threshold_only() {
        let keystone = agent("key", 0.5, TrophicLevel::Abiotic).with_keystone_threshold(0.6);
        let eco = ecosystem(
            vec![keystone, agent("dep", 0.5, TrophicLevel::Abiotic)],
            vec![edge("key", "dep", 0.3)],
        );
        let params = CascadeParams::default();

        // Health 0.8 >= 0.6: no boost.
        let calm = propagate(&eco, &[0.2, 0.0], &params, CascadeMode::Damage);
        assert!(calm.keystone_triggered.is_empty());
        assert!((calm.effective[1] - 0.2 * 0.3).abs() < 1e-12);

        // Health 0.5 < 0.6: outgoing strength doubles.
        let collapsed = propagate(&eco, &[0.5, 0.0], &params, CascadeMode::Damage);
        assert_eq!(collapsed.keystone_triggered, vec!["key".to_string()]);
        assert!((collapsed.effective[1] - 0.5 * 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_keystone_boost_caps_strength_at_one() {
        let keystone = agent("key", 0.5, TrophicLevel::Abiotic).with_keystone_threshold(0.9);
        let eco = ecosystem(
            vec![keystone, agent("dep", 0.5, TrophicLevel::Abiotic)],
            vec![edge("key", "dep", 0.7)],
        );
        let out = propagate(&eco, &[0.4, 0.0], &CascadeParams::default(), CascadeMode::Damage);
        // 0.7 doubled caps at 1.0, so the target gets exactly the source value.
        assert!((out.effective[1] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_recovery_mode_halves_strengths() {
        let eco = ecosystem(
            vec![
                agent("a", 0.5, TrophicLevel::Abiotic),
                agent("b", 0.5, TrophicLevel::Abiotic),
            ],
            vec![edge("a", "b", 0.4)],
        );
        let out = propagate(&eco, &[0.5, 0.0], &CascadeParams::default(), CascadeMode::Recovery);
        assert!((out.effective[1] - 0.5 * 0.4 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_effective_clamped_to_one_under_heavy_cascade() {
        let eco = ecosystem(
            vec![
                agent("a", 0.5, TrophicLevel::Abiotic),
                agent("b", 0.5, TrophicLevel::Abiotic),
            ],
            vec![edge("a", "b", 1.0)],
        );
        let out = propagate(&eco, &[0.9, 0.8], &CascadeParams::default(), CascadeMode::Damage);
        assert_eq!(out.effective[1], 1.0);
        // Cascade delta shrinks to what the cap allows.
        assert!((out.cascade[1] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_params_toml_round_trip_with_defaults() {
        let parsed: CascadeParams = toml::from_str("transfer_efficiency = 0.15").unwrap();
        assert_eq!(parsed.transfer_efficiency, 0.15);
        assert_eq!(parsed.keystone_boost, 2.0);
        assert_eq!(parsed.recovery_dampening, 0.5);
    }
}
