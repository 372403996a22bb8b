//! Oak Valley Forest, a temperate deciduous forest case.
//!
//! Four agents sharing a logistic damage curve centered on the safe
//! extraction threshold, no interaction graph. Monetary rates are
//! calibrated so the effective maximum externality sums to about 1.2M
//! euros, keeping the externality below revenue at the 30% threshold and
//! well above it at 50% depletion. All parameters are placeholders
//! pending scientific review.

use eco_model::{
    Agent, CarbonProfile, DamageCurve, Ecosystem, ResilienceConfig, Resource, RestorationCost,
    SuccessionCurve,
};

pub const DEFAULT_TOTAL_TREES: u32 = 10_000;
pub const DEFAULT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_TREE_VALUE: f64 = 100.0;

/// Temperate forest succession: pioneers within a decade, climax on the
/// order of a human lifetime.
pub fn succession() -> SuccessionCurve {
    SuccessionCurve {
        maturation_delay: 2.0,
        pioneer_end_year: 8.0,
        intermediate_end_year: 25.0,
        climax_approach_year: 60.0,
        pioneer_service: 0.05,
        intermediate_service: 0.35,
    }
}

/// Per-tree carbon profile for a medium-sized temperate deciduous forest.
pub fn carbon() -> CarbonProfile {
    CarbonProfile {
        stored_carbon_tonnes: 0.8,
        annual_absorption_tonnes: 0.022,
        soil_carbon_tonnes: 0.3,
        soil_release_fraction: 0.25,
        carbon_price_per_tonne: 80.0,
        remaining_lifetime_years: 40.0,
        absorption_curve: None,
    }
}

pub fn restoration_cost() -> RestorationCost {
    RestorationCost::new(15.0, 10.0, 10)
}

/// Builds the Oak Valley Forest ecosystem with the four standard agents.
pub fn build(total_trees: u32, threshold: f64, tree_value: f64) -> Ecosystem {
    let resource = Resource::new("Oak Valley Forest", total_trees, threshold, tree_value)
        .with_carbon(carbon())
        .with_resilience(ResilienceConfig::default());

    // All agents degrade together on the resource threshold.
    let curve = DamageCurve::logistic(threshold);

    let agents = vec![
        Agent::new(
            "Human Communities",
            0.20,
            curve,
            750_000.0,
            "Health costs, water treatment, lost recreation",
        ),
        Agent::new(
            "Animal Populations",
            0.30,
            curve,
            1_167_000.0,
            "Habitat loss, population decline, species loss",
        ),
        Agent::new(
            "Vegetation & Flora",
            0.15,
            curve,
            1_000_000.0,
            "Soil erosion, pollination network disruption",
        ),
        Agent::new(
            "General Biosphere",
            0.35,
            curve,
            1_571_000.0,
            "Carbon release, watershed degradation, climate impact",
        ),
    ];

    Ecosystem::new("Oak Valley Forest", resource, agents).with_succession(succession())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_sim::validate_ecosystem;

    #[test]
    fn test_weights_sum_to_one() {
        let eco = build(DEFAULT_TOTAL_TREES, DEFAULT_THRESHOLD, DEFAULT_TREE_VALUE);
        let sum: f64 = eco.agents.iter().map(|a| a.dependency_weight).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_preset_validates_cleanly() {
        let eco = build(DEFAULT_TOTAL_TREES, DEFAULT_THRESHOLD, DEFAULT_TREE_VALUE);
        assert!(validate_ecosystem(&eco).is_ok());
    }

    #[test]
    fn test_effective_max_externality_calibration() {
        let eco = build(DEFAULT_TOTAL_TREES, DEFAULT_THRESHOLD, DEFAULT_TREE_VALUE);
        let ceiling: f64 = eco
            .agents
            .iter()
            .map(|a| a.dependency_weight * a.monetary_rate)
            .sum();
        assert!((ceiling - 1_199_950.0).abs() < 1.0);
    }
}
