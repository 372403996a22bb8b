//! Three-zone resilience model.
//!
//! The zone is a statement about how much of the resource remains relative
//! to the safe threshold, and the confidence scalar tags how much the model
//! itself can be trusted at that depletion level. Confidence interpolates
//! linearly inside the yellow and red zones, so it decreases continuously
//! as the remaining fraction falls.

use eco_model::{ResilienceConfig, ResilienceReading, ResilienceZone};

/// Computes the resilience reading at a depletion level.
///
/// The resource threshold is the fraction that can be extracted, so the
/// fraction that must remain is `1 - threshold`. Zones over the remaining
/// fraction r:
///
/// - green:  `r > safe_remaining + warning_zone_width`
/// - yellow: `safe_remaining < r <= safe_remaining + warning_zone_width`
/// - red:    `r <= safe_remaining`
///
/// The cost band `cost * (1 ± (1 - confidence))` is a heuristic spread, not
/// a statistical interval; it widens as confidence drops.
pub fn reading_at(
    depletion_ratio: f64,
    threshold: f64,
    cumulative_cost: f64,
    config: &ResilienceConfig,
) -> ResilienceReading {
    let remaining = 1.0 - depletion_ratio;
    let safe_remaining = 1.0 - threshold;
    let warning_start = safe_remaining + config.warning_zone_width;

    let (zone, confidence) = if remaining > warning_start {
        (ResilienceZone::Green, config.confidence_green)
    } else if remaining > safe_remaining {
        let confidence = if config.warning_zone_width > 0.0 {
            let t = (warning_start - remaining) / config.warning_zone_width;
            config.confidence_green - t * (config.confidence_green - config.confidence_yellow)
        } else {
            config.confidence_yellow
        };
        (ResilienceZone::Yellow, confidence)
    } else {
        let confidence = if safe_remaining > 0.0 {
            let t = ((safe_remaining - remaining) / safe_remaining).min(1.0);
            config.confidence_yellow - t * (config.confidence_yellow - config.confidence_red)
        } else {
            config.confidence_red
        };
        (ResilienceZone::Red, confidence)
    };

    let uncertainty = 1.0 - confidence;
    ResilienceReading {
        zone,
        confidence,
        cost_band_low: cumulative_cost * (1.0 - uncertainty),
        cost_band_high: cumulative_cost * (1.0 + uncertainty),
        irreversibility_warning: depletion_ratio > config.irreversibility_flag_ratio,
    }
}
