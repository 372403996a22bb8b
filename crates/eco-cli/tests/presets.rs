//! Cross-preset behavior: the three built-in ecosystems must validate,
//! respect their calibrations, and order sensibly against each other.

use eco_cli::cases::{costa_brava, forest, posidonia};
use eco_cli::report::{format_report, format_restoration_report};
use eco_model::{Ecosystem, RecoveryCurve};
use eco_sim::{run_extraction, run_restoration, validate_ecosystem};

fn forest_eco() -> Ecosystem {
    forest::build(
        forest::DEFAULT_TOTAL_TREES,
        forest::DEFAULT_THRESHOLD,
        forest::DEFAULT_TREE_VALUE,
    )
}

fn costa_brava_eco() -> Ecosystem {
    costa_brava::build(
        costa_brava::DEFAULT_TOTAL_TREES,
        costa_brava::DEFAULT_THRESHOLD,
        costa_brava::DEFAULT_TREE_VALUE,
    )
}

fn posidonia_eco() -> Ecosystem {
    posidonia::build(
        posidonia::DEFAULT_TOTAL_HECTARES,
        posidonia::DEFAULT_THRESHOLD,
        posidonia::DEFAULT_REVENUE_PER_HECTARE,
    )
}

fn recovery_curves(ecosystem: &Ecosystem) -> Vec<RecoveryCurve> {
    ecosystem
        .agents
        .iter()
        .map(|a| RecoveryCurve::new(a.damage_curve))
        .collect()
}

#[test]
fn test_all_presets_validate() {
    for eco in [forest_eco(), costa_brava_eco(), posidonia_eco()] {
        assert!(validate_ecosystem(&eco).is_ok(), "{} should validate", eco.name);
    }
}

#[test]
fn test_thresholds_order_by_fragility() {
    assert_eq!(forest_eco().resource.safe_threshold_ratio, 0.3);
    assert_eq!(costa_brava_eco().resource.safe_threshold_ratio, 0.25);
    assert_eq!(posidonia_eco().resource.safe_threshold_ratio, 0.20);
}

#[test]
fn test_marine_carbon_payback_is_slowest() {
    // Forest: 875 t released per 1,000 trees against a 22 t/yr full-rate
    // absorption. Posidonia releases 260 t/ha, two orders of magnitude
    // more per unit, and its succession curve ramps far slower.
    let horizon = 1_000;
    let forest_payback = payback(&forest_eco(), &forest::restoration_cost(), 2_000, horizon);
    let marine_payback =
        payback(&posidonia_eco(), &posidonia::restoration_cost(), 1_000, horizon);
    match (forest_payback, marine_payback) {
        (Some(f), Some(p)) => assert!(p > f, "marine payback {p} vs forest {f}"),
        (Some(_), None) => {}
        other => panic!("unexpected payback pair {other:?}"),
    }
}

fn payback(
    ecosystem: &Ecosystem,
    cost: &eco_model::RestorationCost,
    units: u32,
    horizon: u32,
) -> Option<u32> {
    let curves = recovery_curves(ecosystem);
    let result =
        run_restoration(ecosystem, units, cost, &curves, horizon).expect("restoration runs");
    assert!(!result.maturation_timeline.is_empty(), "maturation pass should run");
    result.maturation.carbon_payback_year
}

#[test]
fn test_trophic_webs_cascade_under_deep_extraction() {
    // At 80% depletion the cascades must add cost on top of direct damage
    // and the keystone agents are far below their health thresholds.
    for eco in [costa_brava_eco(), posidonia_eco()] {
        let units = eco.resource.total_units * 4 / 5;
        let result = run_extraction(&eco, units).expect("extraction runs");
        let last = result.steps.last().expect("steps present");
        let cascade_total: f64 = last.agent_effects.iter().map(|e| e.cascade_damage).sum();
        assert!(cascade_total > 0.0, "{} should cascade", eco.name);
        assert!(
            !last.keystone_triggered.is_empty(),
            "{} keystones should trip at 80%",
            eco.name
        );
    }
}

#[test]
fn test_reports_render_for_every_preset() {
    for eco in [forest_eco(), costa_brava_eco(), posidonia_eco()] {
        let units = eco.resource.total_units / 2;
        let extraction = run_extraction(&eco, units).expect("extraction runs");
        let report = format_report(&extraction);
        assert!(report.contains(&eco.name));
        assert!(report.contains("TOTAL EXTERNALITY:"));

        let curves = recovery_curves(&eco);
        let cost = eco_model::RestorationCost::new(15.0, 10.0, 10);
        let restoration =
            run_restoration(&eco, units, &cost, &curves, 50).expect("restoration runs");
        let report = format_restoration_report(&restoration);
        assert!(report.contains("NET RESTORATION VALUE:"));
        assert!(report.contains("-- Maturation "));
    }
}
