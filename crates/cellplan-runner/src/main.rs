//! # cellplan-runner
//!
//! CLI for 4G/5G indoor coverage planning.
//!
//! This is the main entry point for evaluating link budgets, comparing
//! propagation models and computing site distances.

use cellplan_core::GeoCoord;
use cellplan_engine::constants::{
    penetration_loss_db, qos_threshold_dbm, technology_preset, FacadeMaterial, QosService,
    SMALL_CELL,
};
use cellplan_engine::propagation::compare_models;
use cellplan_engine::{
    compute_full_budget, AnalysisOptions, Environment, LinkBudgetResult, ScenarioInput,
    ScenarioParams, Technology,
};
use cellplan_runner::export::{render_comparison, render_results, OutputFormat};
use cellplan_runner::history::{RunHistory, RunRecord};
use cellplan_runner::{RunnerError, ScenarioFile};

use cellplan_core::DiagnosticsBuffer;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// CLI Configuration
// ============================================================================

/// cellplan - 4G/5G indoor coverage advisor
#[derive(Parser, Debug)]
#[command(name = "cellplan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the full link budget for one or more scenarios
    Evaluate(EvaluateConfig),
    /// Compare every propagation model on the same scenario
    Compare(CompareConfig),
    /// Great-circle and slant distance between two coordinates
    Distance(DistanceConfig),
    /// List technology presets, facade losses and QoS thresholds
    Presets(PresetsConfig),
}

/// Scenario fields shared by `evaluate` and `compare`.
///
/// Each flag overrides the corresponding field of the base scenario, which is
/// either the named config-file entry or the standard LTE macro-cell default.
#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    /// Path to a YAML scenario file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Named scenario inside the config file (default: all of them)
    #[arg(short, long)]
    pub scenario: Option<String>,

    /// Carrier frequency in MHz
    #[arg(long)]
    pub frequency: Option<f64>,

    /// Transmit power in dBm
    #[arg(long)]
    pub tx_power: Option<f64>,

    /// Transmit antenna gain in dBi
    #[arg(long)]
    pub tx_gain: Option<f64>,

    /// Receive antenna gain in dBi
    #[arg(long)]
    pub rx_gain: Option<f64>,

    /// Link distance in meters
    #[arg(short, long)]
    pub distance: Option<f64>,

    /// Building penetration loss in dB
    #[arg(long)]
    pub penetration: Option<f64>,

    /// Base-station antenna height in meters
    #[arg(long)]
    pub bs_height: Option<f64>,

    /// User-equipment height in meters
    #[arg(long)]
    pub ue_height: Option<f64>,

    /// Environment: rural, suburban, urban or dense-urban
    #[arg(short, long, value_parser = parse_environment)]
    pub environment: Option<Environment>,

    /// Treat the outdoor link as line-of-sight
    #[arg(long)]
    pub los: bool,
}

impl ScenarioArgs {
    /// Apply the CLI overrides onto a base scenario.
    fn apply_to(&self, mut input: ScenarioInput) -> ScenarioInput {
        if let Some(v) = self.frequency {
            input.frequency_mhz = v;
        }
        if let Some(v) = self.tx_power {
            input.tx_power_dbm = v;
        }
        if let Some(v) = self.tx_gain {
            input.tx_gain_dbi = v;
        }
        if let Some(v) = self.rx_gain {
            input.rx_gain_dbi = v;
        }
        if let Some(v) = self.distance {
            input.distance_m = v;
        }
        if let Some(v) = self.penetration {
            input.penetration_loss_db = v;
        }
        if let Some(v) = self.bs_height {
            input.bs_height_m = v;
        }
        if let Some(v) = self.ue_height {
            input.ue_height_m = v;
        }
        if let Some(v) = self.environment {
            input.environment = v;
        }
        if self.los {
            input.line_of_sight = true;
        }
        input
    }
}

fn parse_environment(s: &str) -> Result<Environment, String> {
    Environment::ALL
        .into_iter()
        .find(|env| env.as_str() == s)
        .ok_or_else(|| {
            format!(
                "unknown environment '{s}' (expected one of: {})",
                Environment::ALL
                    .map(|env| env.as_str())
                    .join(", ")
            )
        })
}

fn parse_service(s: &str) -> Result<QosService, String> {
    QosService::parse(s).ok_or_else(|| {
        format!(
            "unknown service '{s}' (expected one of: {})",
            QosService::ALL.map(|svc| svc.as_str()).join(", ")
        )
    })
}

/// Configuration for `evaluate`
#[derive(Args, Debug)]
pub struct EvaluateConfig {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Minimum indoor RSRP in dBm the deployment must deliver
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Derive the threshold from a service class instead:
    /// voice, data-basic, video-sd, video-hd or gaming
    #[arg(long, value_parser = parse_service, conflicts_with = "threshold")]
    pub service: Option<QosService>,

    /// Skip the probabilistic coverage stage
    #[arg(long)]
    pub no_probabilistic: bool,

    /// Override the environment's shadowing spread in dB
    #[arg(long)]
    pub sigma: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the rendered output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Append each result to a JSON-lines history file
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,
}

/// Configuration for `compare`
#[derive(Args, Debug)]
pub struct CompareConfig {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Configuration for `distance`
#[derive(Args, Debug)]
pub struct DistanceConfig {
    /// Latitude of the first point (degrees)
    #[arg(allow_hyphen_values = true)]
    pub from_lat: f64,
    /// Longitude of the first point (degrees)
    #[arg(allow_hyphen_values = true)]
    pub from_lon: f64,
    /// Latitude of the second point (degrees)
    #[arg(allow_hyphen_values = true)]
    pub to_lat: f64,
    /// Longitude of the second point (degrees)
    #[arg(allow_hyphen_values = true)]
    pub to_lon: f64,
    /// Altitude of the first point in meters
    #[arg(long, default_value = "0.0")]
    pub from_alt: f64,
    /// Altitude of the second point in meters
    #[arg(long, default_value = "0.0")]
    pub to_alt: f64,
}

/// Configuration for `presets`
#[derive(Args, Debug)]
pub struct PresetsConfig {
    /// Output format (text or json)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

// ============================================================================
// Command Implementations
// ============================================================================

/// Resolve the (name, scenario, threshold, options) tuples an `evaluate` or
/// `compare` invocation addresses.
fn resolve_scenarios(
    args: &ScenarioArgs,
    threshold: Option<f64>,
    service: Option<QosService>,
    no_probabilistic: bool,
    sigma: Option<f64>,
) -> Result<Vec<(String, ScenarioParams, f64, AnalysisOptions)>, RunnerError> {
    let cli_threshold = match (threshold, service) {
        (Some(t), _) => Some(t),
        (None, Some(svc)) => Some(qos_threshold_dbm(svc)),
        (None, None) => None,
    };

    let mut resolved = Vec::new();
    if let Some(config) = &args.config {
        let file = ScenarioFile::load(config)?;
        let names: Vec<String> = match &args.scenario {
            Some(name) => vec![name.clone()],
            None => file.scenarios.keys().cloned().collect(),
        };
        for name in names {
            let (_, entry) = file.resolve(&name)?;
            let input = args.apply_to(entry.scenario.clone());
            let params = ScenarioParams::new(input)?;
            let mut options = entry.analysis_options();
            if no_probabilistic {
                options.probabilistic = false;
            }
            if sigma.is_some() {
                options.sigma_override_db = sigma;
            }
            let threshold_dbm = cli_threshold.unwrap_or_else(|| file.threshold_for(entry));
            resolved.push((name, params, threshold_dbm, options));
        }
    } else {
        if args.scenario.is_some() {
            return Err(RunnerError::Config(
                "--scenario requires --config".to_owned(),
            ));
        }
        let input = args.apply_to(ScenarioInput::default());
        let params = ScenarioParams::new(input)?;
        let options = AnalysisOptions {
            probabilistic: !no_probabilistic,
            sigma_override_db: sigma,
        };
        resolved.push((
            "ad-hoc".to_owned(),
            params,
            cli_threshold.unwrap_or(-100.0),
            options,
        ));
    }
    Ok(resolved)
}

fn run_evaluate(config: EvaluateConfig) -> Result<(), RunnerError> {
    let scenarios = resolve_scenarios(
        &config.scenario,
        config.threshold,
        config.service,
        config.no_probabilistic,
        config.sigma,
    )?;

    let history = config.history.map(RunHistory::new);
    let mut results: Vec<(String, LinkBudgetResult)> = Vec::new();
    for (name, params, threshold_dbm, options) in scenarios {
        let result = compute_full_budget(&params, threshold_dbm, &options)?;
        if let Some(history) = &history {
            history.append(&RunRecord::from_result(&name, &result))?;
        }
        results.push((name, result));
    }

    let rendered = render_results(&results, config.format)?;
    match &config.output {
        Some(path) => std::fs::write(path, rendered)?,
        None => print!("{rendered}"),
    }

    // Exit non-zero when any scenario needs a small cell, so scripts can
    // branch on the verdict without parsing output. Flush first: exit()
    // skips the stdout buffer's drop.
    if results.iter().any(|(_, r)| r.small_cell_required) {
        std::io::Write::flush(&mut std::io::stdout())?;
        std::process::exit(2);
    }
    Ok(())
}

fn run_compare(config: CompareConfig) -> Result<(), RunnerError> {
    let scenarios = resolve_scenarios(&config.scenario, None, None, true, None)?;
    for (name, params, _, _) in scenarios {
        let mut diag = DiagnosticsBuffer::new();
        let estimates = compare_models(&params, &mut diag)
            .map_err(cellplan_engine::BudgetError::from)?;
        println!(
            "Model comparison for '{name}' ({} MHz, {} m, {}):",
            params.frequency_mhz(),
            params.distance_m(),
            params.environment()
        );
        print!("{}", render_comparison(&estimates, config.format)?);
        for note in diag.messages() {
            println!("  note: {note}");
        }
        println!();
    }
    Ok(())
}

fn run_distance(config: DistanceConfig) -> Result<(), RunnerError> {
    let from = GeoCoord::with_altitude(config.from_lat, config.from_lon, config.from_alt);
    let to = GeoCoord::with_altitude(config.to_lat, config.to_lon, config.to_alt);
    let ground_m = from.distance_to(&to)?;
    let slant_m = from.slant_distance_to(&to)?;
    println!("Ground distance: {ground_m:.1} m");
    println!("Slant distance:  {slant_m:.1} m");
    Ok(())
}

fn run_presets(config: PresetsConfig) -> Result<(), RunnerError> {
    if config.format == OutputFormat::Json {
        let value = serde_json::json!({
            "technologies": {
                "4G": technology_preset(Technology::Lte),
                "5G": technology_preset(Technology::Nr),
            },
            "penetration_loss_db": FacadeMaterial::ALL
                .map(|m| serde_json::json!({
                    "material": m.as_str(),
                    "4G": penetration_loss_db(m, Technology::Lte),
                    "5G": penetration_loss_db(m, Technology::Nr),
                })),
            "qos_thresholds_dbm": QosService::ALL
                .map(|svc| serde_json::json!({
                    "service": svc.as_str(),
                    "threshold_dbm": qos_threshold_dbm(svc),
                })),
            "small_cell": SMALL_CELL,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Technology presets:");
    for tech in [Technology::Lte, Technology::Nr] {
        let p = technology_preset(tech);
        println!(
            "  {tech}: {} MHz, {} dBm + {} dBi, sensitivity {} dBm",
            p.frequency_mhz, p.tx_power_dbm, p.tx_gain_dbi, p.rx_sensitivity_dbm
        );
    }
    println!("\nBuilding penetration loss (dB):");
    for material in FacadeMaterial::ALL {
        println!(
            "  {:<22} 4G {:>4.0}   5G {:>4.0}",
            material.as_str(),
            penetration_loss_db(material, Technology::Lte),
            penetration_loss_db(material, Technology::Nr)
        );
    }
    println!("\nQoS thresholds (dBm):");
    for service in QosService::ALL {
        println!("  {:<12} {:>6.0}", service.as_str(), qos_threshold_dbm(service));
    }
    println!(
        "\nSmall cell reference: {} dBm + {} dBi, ~{} m range",
        SMALL_CELL.tx_power_dbm, SMALL_CELL.antenna_gain_dbi, SMALL_CELL.typical_range_m
    );
    Ok(())
}

fn main() -> Result<(), RunnerError> {
    // Respect RUST_LOG, default to warnings only. Diagnostics go to stderr so
    // stdout stays parseable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Evaluate(config) => run_evaluate(config),
        Commands::Compare(config) => run_compare(config),
        Commands::Distance(config) => run_distance(config),
        Commands::Presets(config) => run_presets(config),
    }
}
