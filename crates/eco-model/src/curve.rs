//! Damage, Recovery, and Succession Curves
//!
//! All curves map a ratio in [0, 1] to a ratio in [0, 1]. Damage curves take
//! a depletion ratio and return total damage at that depletion level; recovery
//! curves take a restoration ratio and return recovered services; succession
//! curves take years since restoration and return a service-capacity fraction.
//!
//! Every damage and recovery curve must satisfy five invariants, checked by
//! the validator before a run starts:
//!
//! 1. f(0) ≈ 0 and f(1) ≈ 1 (tolerance 1e-4)
//! 2. Non-decreasing over the whole domain
//! 3. Output confined to [0, 1]
//! 4. Average slope past the threshold exceeds the average slope before it
//! 5. Locally convex just past the threshold (damage accelerates)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default steepness for the logistic family.
pub const DEFAULT_STEEPNESS: f64 = 12.0;

/// Default base for the exponential family.
pub const DEFAULT_EXPONENTIAL_BASE: f64 = 2.0;

/// Default establishment-lag exponent for recovery curves.
pub const DEFAULT_RECOVERY_LAG: f64 = 1.0;

/// Where the logistic inflection sits inside the post-threshold span.
///
/// The inflection is placed at `threshold + 0.25 * (1 - threshold)` so the
/// region just past the safe threshold is always in the convex, accelerating
/// part of the S-curve, for any threshold in (0, 1).
const INFLECTION_OFFSET: f64 = 0.25;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// A damage curve: depletion ratio in, damage ratio out.
///
/// The three families are interchangeable at every call site; which one an
/// agent uses is pure configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum DamageCurve {
    /// Sigmoid normalized so its endpoints land exactly on 0 and 1.
    /// Damage is modest below the threshold, accelerates sharply past it,
    /// then saturates toward 1.0.
    Logistic { threshold: f64, steepness: f64 },
    /// Monotonically accelerating with no plateau. Used for quantities that
    /// keep compounding (atmospheric carbon) rather than saturating.
    Exponential { threshold: f64, base: f64 },
    /// Two linear segments meeting at the threshold. `pre_fraction` is the
    /// share of total damage incurred before the threshold; keeping it below
    /// the threshold guarantees the post-threshold slope is steeper.
    Piecewise { threshold: f64, pre_fraction: f64 },
}

impl DamageCurve {
    /// Logistic curve with the default steepness.
    pub fn logistic(threshold: f64) -> Self {
        DamageCurve::Logistic {
            threshold,
            steepness: DEFAULT_STEEPNESS,
        }
    }

    /// Exponential curve with the default base.
    pub fn exponential(threshold: f64) -> Self {
        DamageCurve::Exponential {
            threshold,
            base: DEFAULT_EXPONENTIAL_BASE,
        }
    }

    /// Piecewise-linear curve with `pre_fraction = min(0.2, threshold / 2)`,
    /// which keeps the pre-threshold rise below the threshold for any valid
    /// threshold value.
    pub fn piecewise(threshold: f64) -> Self {
        DamageCurve::Piecewise {
            threshold,
            pre_fraction: (0.2f64).min(threshold * 0.5),
        }
    }

    /// The safe-extraction threshold this curve was built around.
    pub fn threshold(&self) -> f64 {
        match *self {
            DamageCurve::Logistic { threshold, .. }
            | DamageCurve::Exponential { threshold, .. }
            | DamageCurve::Piecewise { threshold, .. } => threshold,
        }
    }

    /// Evaluates the curve at a depletion ratio. Input is clamped to [0, 1].
    pub fn evaluate(&self, ratio: f64) -> f64 {
        let x = ratio.clamp(0.0, 1.0);
        match *self {
            DamageCurve::Logistic {
                threshold,
                steepness,
            } => {
                let inflection = threshold + (1.0 - threshold) * INFLECTION_OFFSET;
                // Normalization anchors force exact boundary values.
                let raw_0 = sigmoid(steepness * (0.0 - inflection));
                let raw_1 = sigmoid(steepness * (1.0 - inflection));
                let raw = sigmoid(steepness * (x - inflection));
                (raw - raw_0) / (raw_1 - raw_0)
            }
            DamageCurve::Exponential { threshold, base } => {
                // Stretch the x-axis by 1/(1-threshold): shallow early growth,
                // steep growth past the threshold. raw(0) = 0 exactly.
                let scale = 1.0 / (1.0 - threshold).max(1e-9);
                let raw_1 = base.powf(scale) - 1.0;
                (base.powf(x * scale) - 1.0) / raw_1
            }
            DamageCurve::Piecewise {
                threshold,
                pre_fraction,
            } => {
                if x <= threshold {
                    pre_fraction / threshold.max(1e-9) * x
                } else {
                    pre_fraction
                        + (1.0 - pre_fraction) / (1.0 - threshold).max(1e-9) * (x - threshold)
                }
            }
        }
    }
}

/// A recovery curve: restoration ratio in, recovered-service ratio out.
///
/// Restoration lags destruction: a recovery curve is its base damage family
/// multiplied by an establishment factor `x^lag` (`lag >= 1`), which keeps it
/// at or below the base curve at every point while preserving the boundary,
/// monotonicity, and acceleration invariants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryCurve {
    /// Shape family shared with the matching damage curve.
    pub base: DamageCurve,
    /// Establishment-lag exponent; 1.0 is the mildest admissible lag.
    pub lag: f64,
}

impl RecoveryCurve {
    /// Recovery curve with the default lag.
    pub fn new(base: DamageCurve) -> Self {
        RecoveryCurve {
            base,
            lag: DEFAULT_RECOVERY_LAG,
        }
    }

    /// Recovery curve with an explicit lag exponent, clamped to at least 1.
    /// A lag below 1 breaks the establishment-factor contract, and a
    /// negative one makes `x^lag` blow up at zero.
    pub fn with_lag(base: DamageCurve, lag: f64) -> Self {
        let lag = if lag.is_finite() {
            lag.max(1.0)
        } else {
            DEFAULT_RECOVERY_LAG
        };
        RecoveryCurve { base, lag }
    }

    /// The threshold of the underlying family.
    pub fn threshold(&self) -> f64 {
        self.base.threshold()
    }

    /// Evaluates the curve at a restoration ratio. Input is clamped to [0, 1].
    pub fn evaluate(&self, ratio: f64) -> f64 {
        let x = ratio.clamp(0.0, 1.0);
        self.base.evaluate(x) * x.powf(self.lag)
    }
}

/// Phase of ecological succession after restoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessionPhase {
    /// Dead zone before pioneer species establish; zero services.
    Delay,
    Pioneer,
    Intermediate,
    Climax,
}

impl fmt::Display for SuccessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessionPhase::Delay => write!(f, "delay"),
            SuccessionPhase::Pioneer => write!(f, "pioneer"),
            SuccessionPhase::Intermediate => write!(f, "intermediate"),
            SuccessionPhase::Climax => write!(f, "climax"),
        }
    }
}

/// Three-phase succession curve: years since restoration to service capacity.
///
/// Phase interpolations:
/// - delay: 0.0 until `maturation_delay` years have passed
/// - pioneer: linear ramp from 0 to `pioneer_service`
/// - intermediate: Hermite smoothstep from `pioneer_service` to
///   `intermediate_service` (accelerating)
/// - climax approach: decelerating `1 - (1 - t)^2` ramp toward 1.0
///
/// Phase boundary years are measured from the end of the delay. The curve is
/// continuous at every boundary and monotonically non-decreasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuccessionCurve {
    /// Years of zero service before pioneer species establish.
    pub maturation_delay: f64,
    pub pioneer_end_year: f64,
    pub intermediate_end_year: f64,
    pub climax_approach_year: f64,
    /// Service ceiling at the end of the pioneer phase.
    pub pioneer_service: f64,
    /// Service ceiling at the end of the intermediate phase. The climax
    /// ceiling is fixed at 1.0.
    pub intermediate_service: f64,
}

impl SuccessionCurve {
    /// The succession phase at a given year since restoration began.
    pub fn phase(&self, years: f64) -> SuccessionPhase {
        if years < self.maturation_delay {
            return SuccessionPhase::Delay;
        }
        let effective = years - self.maturation_delay;
        if effective <= self.pioneer_end_year {
            SuccessionPhase::Pioneer
        } else if effective <= self.intermediate_end_year {
            SuccessionPhase::Intermediate
        } else {
            SuccessionPhase::Climax
        }
    }

    /// Service capacity fraction in [0, 1] at a given year.
    pub fn service(&self, years: f64) -> f64 {
        if years < self.maturation_delay {
            return 0.0;
        }
        let effective = years - self.maturation_delay;

        if effective <= self.pioneer_end_year {
            if self.pioneer_end_year == 0.0 {
                return self.pioneer_service;
            }
            let t = effective / self.pioneer_end_year;
            return self.pioneer_service * t;
        }

        if effective <= self.intermediate_end_year {
            let span = self.intermediate_end_year - self.pioneer_end_year;
            if span == 0.0 {
                return self.intermediate_service;
            }
            let t = (effective - self.pioneer_end_year) / span;
            let smooth = t * t * (3.0 - 2.0 * t);
            return self.pioneer_service
                + (self.intermediate_service - self.pioneer_service) * smooth;
        }

        let span = self.climax_approach_year - self.intermediate_end_year;
        if span == 0.0 {
            return 1.0;
        }
        let t = ((effective - self.intermediate_end_year) / span).min(1.0);
        let decel = 1.0 - (1.0 - t) * (1.0 - t);
        self.intermediate_service + (1.0 - self.intermediate_service) * decel
    }

    /// First year at which service capacity reaches `fraction`.
    ///
    /// Numerical scan at 0.1-year resolution; sufficient for the reporting
    /// use case (years to 50% / 90%). Falls back to the climax-approach year
    /// plus the delay when the fraction is never reached.
    pub fn years_to_service(&self, fraction: f64) -> f64 {
        let max_year = self.climax_approach_year + self.maturation_delay + 10.0;
        let mut year = 0.0;
        while year <= max_year {
            if self.service(year) >= fraction {
                return year;
            }
            year += 0.1;
        }
        self.climax_approach_year + self.maturation_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: [f64; 5] = [0.1, 0.2, 0.3, 0.5, 0.7];

    fn forest_succession() -> SuccessionCurve {
        SuccessionCurve {
            maturation_delay: 2.0,
            pioneer_end_year: 8.0,
            intermediate_end_year: 25.0,
            climax_approach_year: 60.0,
            pioneer_service: 0.05,
            intermediate_service: 0.35,
        }
    }

    fn families(threshold: f64) -> Vec<DamageCurve> {
        vec![
            DamageCurve::logistic(threshold),
            DamageCurve::exponential(threshold),
            DamageCurve::piecewise(threshold),
        ]
    }

    #[test]
    fn test_boundaries_exact_for_all_families() {
        for &t in &THRESHOLDS {
            for curve in families(t) {
                assert!(curve.evaluate(0.0).abs() < 1e-4, "{curve:?} at 0");
                assert!((curve.evaluate(1.0) - 1.0).abs() < 1e-4, "{curve:?} at 1");
            }
        }
    }

    #[test]
    fn test_monotone_and_bounded_for_all_families() {
        for &t in &THRESHOLDS {
            for curve in families(t) {
                let mut prev = curve.evaluate(0.0);
                for i in 1..=1000 {
                    let v = curve.evaluate(i as f64 / 1000.0);
                    assert!(v >= prev - 1e-9, "{curve:?} decreased at {i}");
                    assert!((-1e-4..=1.0 + 1e-4).contains(&v), "{curve:?} out of range");
                    prev = v;
                }
            }
        }
    }

    #[test]
    fn test_post_threshold_slope_exceeds_pre_threshold_slope() {
        for &t in &THRESHOLDS {
            for curve in families(t) {
                let pre = (curve.evaluate(t) - curve.evaluate(0.0)) / t;
                let post = (curve.evaluate(1.0) - curve.evaluate(t)) / (1.0 - t);
                assert!(
                    post > pre,
                    "{curve:?}: post slope {post} <= pre slope {pre}"
                );
            }
        }
    }

    #[test]
    fn test_convex_just_past_threshold() {
        for &t in &THRESHOLDS {
            for curve in families(t) {
                let h = 0.1 * (1.0 - t) / 8.0;
                let mut sum = 0.0;
                for k in 0..8 {
                    let x = t + k as f64 * h;
                    sum += curve.evaluate(x + h) - 2.0 * curve.evaluate(x)
                        + curve.evaluate(x - h);
                }
                assert!(sum > 0.0, "{curve:?}: not convex past threshold");
            }
        }
    }

    #[test]
    fn test_recovery_never_exceeds_damage() {
        for &t in &THRESHOLDS {
            for base in families(t) {
                for lag in [1.0, 1.5, 2.0] {
                    let recovery = RecoveryCurve::with_lag(base, lag);
                    for i in 0..=1000 {
                        let x = i as f64 / 1000.0;
                        assert!(
                            recovery.evaluate(x) <= base.evaluate(x) + 1e-12,
                            "recovery above damage at x={x} for {base:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_recovery_lag_is_clamped_to_admissible_range() {
        let base = DamageCurve::logistic(0.3);
        assert_eq!(RecoveryCurve::with_lag(base, 0.5).lag, 1.0);
        assert_eq!(RecoveryCurve::with_lag(base, -2.0).lag, 1.0);
        assert_eq!(RecoveryCurve::with_lag(base, f64::NAN).lag, DEFAULT_RECOVERY_LAG);
        assert!(RecoveryCurve::with_lag(base, -2.0).evaluate(0.0).is_finite());
    }

    #[test]
    fn test_recovery_satisfies_curve_invariants() {
        for &t in &THRESHOLDS {
            for base in families(t) {
                let recovery = RecoveryCurve::new(base);
                assert!(recovery.evaluate(0.0).abs() < 1e-4);
                assert!((recovery.evaluate(1.0) - 1.0).abs() < 1e-4);
                let pre = recovery.evaluate(t) / t;
                let post = (recovery.evaluate(1.0) - recovery.evaluate(t)) / (1.0 - t);
                assert!(post > pre);
            }
        }
    }

    #[test]
    fn test_logistic_damage_below_threshold_is_modest() {
        // Invariant 4 is equivalent to f(threshold) < threshold.
        for &t in &THRESHOLDS {
            let curve = DamageCurve::logistic(t);
            assert!(curve.evaluate(t) < t);
        }
    }

    #[test]
    fn test_input_clamped() {
        let curve = DamageCurve::logistic(0.3);
        assert_eq!(curve.evaluate(-0.5), curve.evaluate(0.0));
        assert_eq!(curve.evaluate(1.5), curve.evaluate(1.0));
    }

    #[test]
    fn test_succession_zero_during_delay() {
        let curve = forest_succession();
        assert_eq!(curve.service(0.0), 0.0);
        assert_eq!(curve.service(1.9), 0.0);
        assert_eq!(curve.phase(1.0), SuccessionPhase::Delay);
    }

    #[test]
    fn test_succession_phase_ceilings() {
        let curve = forest_succession();
        let pioneer_end = curve.maturation_delay + curve.pioneer_end_year;
        assert!((curve.service(pioneer_end) - curve.pioneer_service).abs() < 1e-6);
        let intermediate_end = curve.maturation_delay + curve.intermediate_end_year;
        assert!((curve.service(intermediate_end) - curve.intermediate_service).abs() < 1e-6);
    }

    #[test]
    fn test_succession_near_one_at_climax_approach() {
        let curve = forest_succession();
        let year = curve.maturation_delay + curve.climax_approach_year;
        let svc = curve.service(year);
        assert!(svc >= 0.95 && svc <= 1.0, "got {svc}");
    }

    #[test]
    fn test_succession_continuous_at_phase_boundaries() {
        let curve = forest_succession();
        for boundary in [
            curve.maturation_delay,
            curve.maturation_delay + curve.pioneer_end_year,
            curve.maturation_delay + curve.intermediate_end_year,
        ] {
            let before = curve.service(boundary - 1e-7);
            let after = curve.service(boundary + 1e-7);
            assert!(
                (after - before).abs() < 1e-6,
                "jump at year {boundary}: {before} vs {after}"
            );
        }
    }

    #[test]
    fn test_succession_monotone() {
        let curve = forest_succession();
        let mut prev = 0.0;
        let mut year = 0.0;
        while year <= curve.maturation_delay + curve.climax_approach_year + 10.0 {
            let svc = curve.service(year);
            assert!(svc >= prev - 1e-10, "decreased at year {year}");
            prev = svc;
            year += 0.25;
        }
    }

    #[test]
    fn test_years_to_service_ordering() {
        let curve = forest_succession();
        let to_50 = curve.years_to_service(0.5);
        let to_90 = curve.years_to_service(0.9);
        assert!(to_50 > 0.0);
        assert!(to_90 > to_50);
    }

    #[test]
    fn test_curve_serde_round_trip() {
        let curve = DamageCurve::logistic(0.3);
        let json = serde_json::to_string(&curve).unwrap();
        assert!(json.contains("\"family\":\"logistic\""));
        let back: DamageCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(curve, back);
    }
}
