use analytics::{SimulationStatistics, SimulationStatsEngine};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Table};
use configuration::{Config, InvalidValuePolicy};
use core_types::{Asset, SimulationMatrix, WeightVector};
use rebalancer::WeightRebalancer;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the Allocation Lab command-line tool.
fn main() -> Result<()> {
    // A missing .env file is fine; RUST_LOG and ALLOCATION_* may come from the shell.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_dir.as_deref())?;

    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;

    match cli.command {
        Commands::Rebalance(args) => handle_rebalance(args, &config),
        Commands::Equalize(args) => handle_equalize(args, &config),
        Commands::Analyze(args) => handle_analyze(args, config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Portfolio weight rebalancing and Monte Carlo simulation statistics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./config.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to a daily rolling file in this directory instead of stderr.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move one asset's weight and redistribute the rest proportionally.
    Rebalance(RebalanceArgs),
    /// Reset every asset to an equal weight.
    Equalize(EqualizeArgs),
    /// Summarize a Monte Carlo simulation response.
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct OutputArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RebalanceArgs {
    /// JSON file with the portfolio assets.
    #[arg(long)]
    assets: PathBuf,

    /// The asset whose slider moved (e.g., "AAPL").
    #[arg(long)]
    symbol: String,

    /// The new weight as a fraction, clamped to [0, 1].
    #[arg(long, allow_negative_numbers = true)]
    weight: f64,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct EqualizeArgs {
    /// JSON file with the portfolio assets.
    #[arg(long)]
    assets: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// JSON file holding the simulation matrix (T arrays of N values).
    #[arg(long)]
    input: PathBuf,

    /// Override how NaN or negative terminal values are handled.
    #[arg(long, value_enum)]
    policy: Option<InvalidValuePolicy>,

    /// Override the kernel bandwidth.
    #[arg(long)]
    bandwidth: Option<f64>,

    /// Override the density grid step.
    #[arg(long)]
    step: Option<f64>,

    #[command(flatten)]
    output: OutputArgs,
}

/// The portfolio API returns `{"assets": [...]}`; a bare array is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum AssetList {
    Wrapped { assets: Vec<Asset> },
    Bare(Vec<Asset>),
}

impl From<AssetList> for Vec<Asset> {
    fn from(list: AssetList) -> Self {
        match list {
            AssetList::Wrapped { assets } | AssetList::Bare(assets) => assets,
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_rebalance(args: RebalanceArgs, config: &Config) -> Result<()> {
    let assets = read_assets(&args.assets)?;
    let rebalancer = WeightRebalancer::new(config.rebalancing.clone());

    let rebalanced = rebalancer.rebalance(&assets, &args.symbol, args.weight);
    tracing::info!(
        symbol = %args.symbol,
        weight = args.weight,
        normalized = rebalancer.is_normalized(&rebalanced),
        "Portfolio rebalanced."
    );

    print_weights(&rebalanced, args.output.json)
}

fn handle_equalize(args: EqualizeArgs, config: &Config) -> Result<()> {
    let assets = read_assets(&args.assets)?;
    let equalized = WeightRebalancer::new(config.rebalancing.clone()).equalize(&assets);
    print_weights(&equalized, args.output.json)
}

fn handle_analyze(args: AnalyzeArgs, mut config: Config) -> Result<()> {
    if let Some(policy) = args.policy {
        config.statistics.invalid_values = policy;
    }
    if let Some(bandwidth) = args.bandwidth {
        config.statistics.bandwidth = bandwidth;
    }
    if let Some(step) = args.step {
        config.statistics.grid_step = step;
    }
    configuration::validate(&config).context("Invalid command-line overrides")?;

    let payload = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let matrix = SimulationMatrix::from_json(&payload)
        .with_context(|| format!("Failed to parse simulation matrix from {}", args.input.display()))?;

    let engine = SimulationStatsEngine::new(config.statistics);
    let stats = engine.analyze(&matrix).context("Failed to compute simulation statistics")?;
    tracing::info!(
        steps = matrix.num_steps(),
        runs = matrix.num_runs(),
        "Simulation analyzed."
    );

    if args.output.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    print_statistics(&stats, &engine)
}

// ==============================================================================
// Helpers
// ==============================================================================

fn read_assets(path: &Path) -> Result<WeightVector> {
    let payload =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let list: AssetList = serde_json::from_str(&payload)
        .with_context(|| format!("Failed to parse asset list from {}", path.display()))?;
    Ok(list.into())
}

fn print_weights(assets: &[Asset], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(assets)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Symbol", "Name", "Weight (%)"]);
    for asset in assets {
        table.add_row(vec![
            Cell::new(&asset.symbol),
            Cell::new(asset.name.as_deref().unwrap_or("-")),
            Cell::new(to_display(asset.weight_pct())).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn print_statistics(stats: &SimulationStatistics, engine: &SimulationStatsEngine) -> Result<()> {
    let summary = stats.summary()?;
    let settings = engine.settings();

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Simulated paths".to_string(), summary.count.to_string()),
        ("Mean final value".to_string(), summary.mean.to_string()),
        ("Std. deviation".to_string(), summary.std_dev.to_string()),
        ("Minimum".to_string(), summary.min.to_string()),
        ("Median".to_string(), summary.median.to_string()),
        ("Maximum".to_string(), summary.max.to_string()),
        (
            format!("Quantile {}", settings.lower_quantile),
            summary.quantile5.to_string(),
        ),
        (
            format!("Quantile {}", settings.upper_quantile),
            summary.quantile95.to_string(),
        ),
        (
            format!("Density points (h = {})", settings.bandwidth),
            stats.density.len().to_string(),
        ),
    ];
    for (metric, value) in rows {
        table.add_row(vec![
            Cell::new(metric),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn to_display(value: f64) -> String {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2).to_string())
        .unwrap_or_else(|| value.to_string())
}

fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "allocation-lab.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
    }
}
