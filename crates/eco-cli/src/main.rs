//! Ecosystem externality simulator.
//!
//! Runs one of the built-in presets in extraction or restoration mode and
//! prints a plain-text report. The full result can also be exported as
//! JSON for downstream tooling.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use eco_model::{Ecosystem, RecoveryCurve, RestorationCost};
use eco_sim::{run_extraction_with, run_restoration_with, CascadeParams};
use eco_cli::{cases, report};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ecosim")]
#[command(about = "Ecosystem externality and restoration simulator")]
struct Cli {
    #[command(subcommand)]
    preset: Preset,
}

#[derive(Subcommand, Debug)]
enum Preset {
    /// Temperate forest, 4 agents, no interaction web
    Forest(RunArgs),
    /// Costa Brava holm oak forest, 11 agents, full trophic web
    CostaBrava(RunArgs),
    /// Costa Brava Posidonia meadow, 11 agents, marine economics
    Posidonia(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Total units in the resource (preset default when omitted)
    #[arg(long)]
    units: Option<u32>,

    /// Safe depletion threshold ratio, 0 < t < 1
    #[arg(long)]
    threshold: Option<f64>,

    /// Private revenue per unit extracted, in euros
    #[arg(long)]
    unit_value: Option<f64>,

    /// Units to extract or restore (default: 40% of total)
    #[arg(long)]
    take: Option<u32>,

    /// Simulation mode
    #[arg(long, value_enum, default_value_t = Mode::Extract)]
    mode: Mode,

    /// [restore] Planting cost per unit in euros
    #[arg(long)]
    planting_cost: Option<f64>,

    /// [restore] Annual maintenance cost per unit in euros
    #[arg(long)]
    maintenance_cost: Option<f64>,

    /// [restore] Years of active maintenance
    #[arg(long)]
    maintenance_years: Option<u32>,

    /// [restore] Years of maturation to simulate (0 = skip)
    #[arg(long, default_value_t = 0)]
    time_horizon: u32,

    /// Write the full result as pretty-printed JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// TOML file overriding cascade propagation parameters
    #[arg(long)]
    cascade_params: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Extract,
    Restore,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let (ecosystem, default_cost, note, args) = match cli.preset {
        Preset::Forest(args) => {
            let eco = cases::forest::build(
                args.units.unwrap_or(cases::forest::DEFAULT_TOTAL_TREES),
                args.threshold.unwrap_or(cases::forest::DEFAULT_THRESHOLD),
                args.unit_value.unwrap_or(cases::forest::DEFAULT_TREE_VALUE),
            );
            (eco, cases::forest::restoration_cost(), None, args)
        }
        Preset::CostaBrava(args) => {
            let eco = cases::costa_brava::build(
                args.units.unwrap_or(cases::costa_brava::DEFAULT_TOTAL_TREES),
                args.threshold.unwrap_or(cases::costa_brava::DEFAULT_THRESHOLD),
                args.unit_value.unwrap_or(cases::costa_brava::DEFAULT_TREE_VALUE),
            );
            (eco, cases::costa_brava::restoration_cost(), None, args)
        }
        Preset::Posidonia(args) => {
            let eco = cases::posidonia::build(
                args.units.unwrap_or(cases::posidonia::DEFAULT_TOTAL_HECTARES),
                args.threshold.unwrap_or(cases::posidonia::DEFAULT_THRESHOLD),
                args.unit_value
                    .unwrap_or(cases::posidonia::DEFAULT_REVENUE_PER_HECTARE),
            );
            (
                eco,
                cases::posidonia::restoration_cost(),
                Some(cases::posidonia::ANNUAL_EXTERNALITY_NOTE),
                args,
            )
        }
    };

    let params = load_cascade_params(args.cascade_params.as_deref())?;
    let take = args
        .take
        .unwrap_or_else(|| default_take(ecosystem.resource.total_units));

    match args.mode {
        Mode::Extract => {
            let result = run_extraction_with(&ecosystem, take, &params)?;
            println!("{}", report::format_report(&result));
            if let Some(note) = note {
                println!("{note}");
            }
            if let Some(path) = &args.json {
                fs::write(path, serde_json::to_string_pretty(&result)?)?;
                info!(path = %path.display(), "wrote extraction result JSON");
            }
        }
        Mode::Restore => {
            let cost = restoration_cost_with_overrides(&args, &default_cost);
            let curves = recovery_curves(&ecosystem);
            let result = run_restoration_with(
                &ecosystem,
                take,
                &cost,
                &curves,
                args.time_horizon,
                &params,
            )?;
            println!("{}", report::format_restoration_report(&result));
            if let Some(note) = note {
                println!("{note}");
            }
            if let Some(path) = &args.json {
                fs::write(path, serde_json::to_string_pretty(&result)?)?;
                info!(path = %path.display(), "wrote restoration result JSON");
            }
        }
    }
    Ok(())
}

/// Default action covers 40% of the resource, well past every preset's
/// safe threshold. Widened to u64 so user-supplied unit counts near
/// `u32::MAX` do not overflow.
fn default_take(total_units: u32) -> u32 {
    (u64::from(total_units) * 2 / 5) as u32
}

fn load_cascade_params(path: Option<&std::path::Path>) -> Result<CascadeParams, Box<dyn Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok(toml::from_str(&text)?)
        }
        None => Ok(CascadeParams::default()),
    }
}

fn restoration_cost_with_overrides(args: &RunArgs, defaults: &RestorationCost) -> RestorationCost {
    RestorationCost::new(
        args.planting_cost.unwrap_or(defaults.planting_cost_per_unit),
        args.maintenance_cost
            .unwrap_or(defaults.annual_maintenance_per_unit),
        args.maintenance_years.unwrap_or(defaults.maintenance_years),
    )
}

/// One recovery curve per agent, lagged behind the matching damage curve.
fn recovery_curves(ecosystem: &Ecosystem) -> Vec<RecoveryCurve> {
    ecosystem
        .agents
        .iter()
        .map(|agent| RecoveryCurve::new(agent.damage_curve))
        .collect()
}
