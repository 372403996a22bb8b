//! Plain-text report rendering.
//!
//! Fixed-width reports suitable for a terminal: resource state, private
//! gains, per-agent externalized costs, and the net social cost, plus
//! resilience, carbon, and maturation sections when the simulation
//! produced them.

use eco_model::{RestorationResult, SimulationResult};

const WIDTH: usize = 63;

fn double_rule() -> String {
    "=".repeat(WIDTH)
}

fn single_rule() -> String {
    "-".repeat(WIDTH)
}

/// Formats an amount with thousands separators and two decimals,
/// e.g. `1234567.891` becomes `1,234,567.89`.
fn money(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let formatted = format!("{whole}.{:02}", cents % 100);
    if negative {
        format!("-{formatted}")
    } else {
        formatted
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn units(value: u32) -> String {
    group_thousands(value as u64)
}

/// Renders a completed extraction run as a multi-line report.
pub fn format_report(result: &SimulationResult) -> String {
    let ecosystem = &result.ecosystem;
    let resource = &ecosystem.resource;

    let final_depletion = if resource.total_units > 0 {
        result.total_units_extracted as f64 / resource.total_units as f64
    } else {
        0.0
    };

    let mut lines = Vec::new();
    lines.push(double_rule());
    lines.push(format!("  Externality Report: {}", ecosystem.name));
    lines.push(double_rule());
    lines.push(String::new());

    lines.push(format!(
        "  {:<18} {:>10} units  ({})",
        "Resource:",
        units(resource.total_units),
        resource.name
    ));
    lines.push(format!(
        "  {:<18} {:>10} units  ({:.1}%)",
        "Safe Threshold:",
        units(resource.safe_threshold_units()),
        resource.safe_threshold_ratio * 100.0
    ));
    lines.push(format!(
        "  {:<18} {:>10}",
        "Units Extracted:",
        units(result.total_units_extracted)
    ));
    lines.push(format!("  {:<18} {:>9.1}%", "Depletion:", final_depletion * 100.0));
    lines.push(format!(
        "  {:<18} {:>9.1}%",
        "Ecosystem Health:",
        result.final_ecosystem_health * 100.0
    ));
    lines.push(String::new());

    lines.push(section_rule("Private Gains"));
    lines.push(format!(
        "  {:<40} {:>14} EUR",
        "Revenue:",
        money(result.total_private_revenue)
    ));
    lines.push(String::new());

    lines.push(section_rule("Externalized Costs"));
    let last = result.steps.last();
    for (i, agent) in ecosystem.agents.iter().enumerate() {
        let cost = last
            .and_then(|step| step.agent_effects.get(i))
            .map_or(0.0, |effect| effect.cost);
        lines.push(format!("  {:<40} {:>14} EUR", format!("{}:", agent.name), money(cost)));
        lines.push(format!("    -> {}", agent.description));
    }
    lines.push(String::new());

    lines.push(format!(
        "  {:<40} {:>14} EUR",
        "TOTAL EXTERNALITY:",
        money(result.total_externality_cost)
    ));
    lines.push(format!("  {}", single_rule()));
    lines.push(format!(
        "  {:<40} {:>14} EUR",
        "NET SOCIAL COST:",
        money(result.net_social_cost)
    ));

    if let Some(reading) = last.and_then(|step| step.resilience.as_ref()) {
        lines.push(String::new());
        lines.push(section_rule("Resilience"));
        lines.push(format!("  {:<18} {}", "Zone:", reading.zone));
        lines.push(format!("  {:<18} {:>9.0}%", "Confidence:", reading.confidence * 100.0));
        lines.push(format!(
            "  {:<18} {} EUR to {} EUR",
            "Cost Band:",
            money(reading.cost_band_low),
            money(reading.cost_band_high)
        ));
        if reading.irreversibility_warning {
            lines.push("  !! IRREVERSIBILITY WARNING: depletion beyond the range where".into());
            lines.push("     recovery can be assumed".into());
        }
    }

    if let Some(ledger) = last.and_then(|step| step.carbon.as_ref()) {
        lines.push(String::new());
        lines.push(section_rule("Carbon"));
        lines.push(format!(
            "  {:<28} {:>12.1} t CO2",
            "Released (biomass + soil):", ledger.release_tonnes
        ));
        lines.push(format!(
            "  {:<28} {:>12.1} t CO2/yr",
            "Absorption foregone:", ledger.foregone_tonnes_per_year
        ));
        lines.push(format!(
            "  {:<28} {:>12.1} t CO2",
            "Foregone over lifetime:", ledger.foregone_total_tonnes
        ));
        lines.push(format!("  {:<28} {:>14} EUR", "Release cost:", money(ledger.release_cost)));
        lines.push(format!("  {:<28} {:>14} EUR", "Foregone cost:", money(ledger.foregone_cost)));
        lines.push(format!(
            "  {:<28} {:>14} EUR",
            "Carbon externality:",
            money(ledger.total_cost())
        ));
    }

    lines.push(double_rule());
    lines.join("\n")
}

/// Renders a completed restoration run, including the maturation timeline
/// when one was simulated.
pub fn format_restoration_report(result: &RestorationResult) -> String {
    let ecosystem = &result.ecosystem;
    let resource = &ecosystem.resource;

    let mut lines = Vec::new();
    lines.push(double_rule());
    lines.push(format!("  Restoration Report: {}", ecosystem.name));
    lines.push(double_rule());
    lines.push(String::new());

    lines.push(format!(
        "  {:<18} {:>10} units  ({})",
        "Capacity:",
        units(resource.total_units),
        resource.name
    ));
    lines.push(format!(
        "  {:<18} {:>10}",
        "Units Restored:",
        units(result.total_units_restored)
    ));
    lines.push(format!(
        "  {:<18} {:>9.1}%",
        "Ecosystem Health:",
        result.final_ecosystem_health * 100.0
    ));
    lines.push(String::new());

    lines.push(section_rule("Restoration Economics"));
    lines.push(format!(
        "  {:<40} {:>14} EUR",
        "Restoration cost:",
        money(result.total_restoration_cost)
    ));
    lines.push(format!(
        "  {:<40} {:>14} EUR",
        "Recovered service value:",
        money(result.total_recovered_value)
    ));
    lines.push(format!(
        "  {:<40} {:>14} EUR",
        "NET RESTORATION VALUE:",
        money(result.net_restoration_value)
    ));
    lines.push(format!("  {}", single_rule()));
    lines.push(format!(
        "  {:<40} {:>13.2}x",
        "Prevention advantage:", result.prevention_advantage
    ));
    lines.push("    -> every euro of avoided destruction saves this multiple in".into());
    lines.push("       restoration spending and service losses".into());

    if !result.maturation_timeline.is_empty() {
        let summary = &result.maturation;
        lines.push(String::new());
        lines.push(section_rule("Maturation"));
        lines.push(format!(
            "  {:<32} {:>8.1} years",
            "Pioneer phase begins:", summary.years_to_pioneer
        ));
        lines.push(format!(
            "  {:<32} {:>8.1} years",
            "50% of service recovered:", summary.years_to_50pct
        ));
        lines.push(format!(
            "  {:<32} {:>8.1} years",
            "90% of service recovered:", summary.years_to_90pct
        ));
        lines.push(format!(
            "  {:<32} {:>10} EUR",
            "Maturation gap (service lost):",
            money(summary.total_maturation_gap)
        ));
        match summary.carbon_payback_year {
            Some(0) => lines.push(format!("  {:<32} immediate", "Carbon payback:")),
            Some(year) => {
                lines.push(format!("  {:<32} {:>8} years", "Carbon payback:", units(year)))
            }
            None => lines.push(format!(
                "  {:<32} not reached within the horizon",
                "Carbon payback:"
            )),
        }
    }

    if !result.maturation_timeline.is_empty() {
        lines.push(String::new());
        lines.push(section_rule("Timeline"));
        lines.push(format!(
            "  {:>5}  {:<13} {:>9} {:>16} {:>13}",
            "Year", "Phase", "Service", "Annual Value", "CO2 (t/yr)"
        ));
        for step in timeline_sample(&result.maturation_timeline) {
            lines.push(format!(
                "  {:>5}  {:<13} {:>8.1}% {:>12} EUR {:>13.1}",
                step.year,
                step.phase.to_string(),
                step.service_fraction * 100.0,
                money(step.annual_service_value),
                step.annual_carbon_absorbed
            ));
        }
    }

    lines.push(double_rule());
    lines.join("\n")
}

fn section_rule(title: &str) -> String {
    let head = format!("  -- {title} ");
    let fill = WIDTH.saturating_sub(head.len());
    format!("{head}{}", "-".repeat(fill))
}

/// Long horizons get thinned to roughly a dozen rows; short ones print in
/// full.
fn timeline_sample(timeline: &[eco_model::MaturationStep]) -> Vec<&eco_model::MaturationStep> {
    if timeline.len() <= 12 {
        return timeline.iter().collect();
    }
    let stride = timeline.len().div_ceil(12);
    let mut rows: Vec<&eco_model::MaturationStep> =
        timeline.iter().step_by(stride).collect();
    if let Some(last) = timeline.last() {
        if rows.last().map(|r| r.year) != Some(last.year) {
            rows.push(last);
        }
    }
    rows
}
