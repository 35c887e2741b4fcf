//! pillar-cli: expected daily delegation rewards for every pillar.
//!
//! Fetches the pillar list from a node (or a saved snapshot), simulates
//! momentum allocation, and ranks pillars by what a given balance would earn.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pillar_core::emission::{TableSchedule, elapsed_days_since_genesis, period_index};
use pillar_core::traits::{EmissionSchedule, MomentumSimulator, ProducerDirectory, ReportSink};
use pillar_rewards::RewardAllocator;
use pillar_rpc::{
    CalculatorConfig, ConsoleReport, CsvReportSink, JsonReportSink, JsonRpcDirectory,
    StaticDirectory,
};
use pillar_sim::{MomentumAllocationSimulator, SelectionRule, expected_daily_wins};
use tracing::info;

/// Pillar delegation reward estimator.
#[derive(Parser)]
#[command(name = "pillar-cli")]
#[command(version, about = "Which pillar pays the most for your delegation?")]
struct Cli {
    /// Config file (default: <config dir>/pillar-rewards/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank pillars by expected daily reward for a balance.
    Rewards(RewardsArgs),
    /// Run only the momentum allocation simulator.
    Simulate(SimulateArgs),
    /// Show the current emission period.
    Emission(EmissionArgs),
}

#[derive(Args)]
struct SimulationFlags {
    /// Simulated days; more days give a steadier estimate.
    #[arg(long)]
    days: Option<f64>,

    /// PRNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Committee selection rule.
    #[arg(long, default_value_t = SelectionRule::DisjointTiers)]
    rule: SelectionRule,
}

#[derive(Args)]
struct ScheduleFlags {
    /// JSON array of daily emission per 30-day period, replacing the built-in table.
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Days since genesis to price rewards at (default: today).
    #[arg(long)]
    elapsed_days: Option<u64>,
}

#[derive(Args)]
struct RewardsArgs {
    /// Balance to delegate, in ZNN.
    #[arg(short, long)]
    balance: Option<f64>,

    /// Pillar you already delegate to.
    #[arg(short = 'p', long)]
    current_pillar: Option<String>,

    /// RPC endpoint URL.
    #[arg(short, long)]
    rpc_endpoint: Option<String>,

    /// Read pillars from a saved `embedded.pillar.getAll` response instead of RPC.
    #[arg(long, conflicts_with = "rpc_endpoint")]
    snapshot: Option<PathBuf>,

    /// Report output path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
    format: ReportFormat,

    /// Only print the first N rows.
    #[arg(long)]
    top: Option<usize>,

    #[command(flatten)]
    simulation: SimulationFlags,

    #[command(flatten)]
    schedule: ScheduleFlags,
}

#[derive(Args)]
struct SimulateArgs {
    /// Active pillars to simulate.
    #[arg(short = 'n', long)]
    producers: usize,

    #[command(flatten)]
    simulation: SimulationFlags,
}

#[derive(Args)]
struct EmissionArgs {
    #[command(flatten)]
    schedule: ScheduleFlags,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config =
        CalculatorConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_logging(&level, cli.log_format);

    match cli.command {
        Commands::Rewards(args) => rewards(args, config).await,
        Commands::Simulate(args) => simulate(args, &config),
        Commands::Emission(args) => emission(args, &config),
    }
}

fn init_logging(level_str: &str, format: LogFormat) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init(),
    }
}

fn build_simulator(
    flags: &SimulationFlags,
    config: &CalculatorConfig,
) -> MomentumAllocationSimulator {
    let sim = MomentumAllocationSimulator::new(flags.days.unwrap_or(config.simulation_days))
        .with_rule(flags.rule);
    match flags.seed.or(config.seed) {
        Some(seed) => sim.with_seed(seed),
        None => sim,
    }
}

fn load_schedule(flags: &ScheduleFlags, config: &CalculatorConfig) -> Result<(TableSchedule, u64)> {
    let schedule = match flags.schedule.as_ref().or(config.schedule_path.as_ref()) {
        Some(path) => TableSchedule::from_json_file(path)
            .with_context(|| format!("Failed to load emission schedule: {}", path.display()))?,
        None => TableSchedule::default(),
    };
    let elapsed_days = match flags.elapsed_days {
        Some(days) => days,
        None => elapsed_days_since_genesis(chrono::Utc::now()).context("Clock is before genesis")?,
    };
    Ok((schedule, elapsed_days))
}

/// Fetch, allocate, print and persist the reward table.
async fn rewards(args: RewardsArgs, config: CalculatorConfig) -> Result<()> {
    let balance = args.balance.unwrap_or(config.holder_balance);
    let current_pillar =
        args.current_pillar.clone().unwrap_or_else(|| config.current_pillar.clone());
    if balance < 0.0 {
        bail!("Balance must not be negative");
    }

    let producers = match &args.snapshot {
        Some(path) => StaticDirectory::from_json_file(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?
            .fetch_all()
            .await?,
        None => {
            let endpoint = args.rpc_endpoint.clone().unwrap_or_else(|| config.rpc_endpoint.clone());
            JsonRpcDirectory::new(&endpoint, config.page_size, config.request_timeout())?
                .fetch_all()
                .await
                .with_context(|| format!("Failed to fetch pillars from {endpoint}"))?
        }
    };
    info!(pillars = producers.len(), "pillar snapshot loaded");

    let (schedule, elapsed_days) = load_schedule(&args.schedule, &config)?;
    let simulator = build_simulator(&args.simulation, &config);
    let allocator = RewardAllocator::new(simulator, schedule, elapsed_days);

    let table = allocator
        .allocate_table(&producers, balance, &current_pillar)
        .context("Reward allocation failed")?;

    ConsoleReport::stdout(args.top).write(&table)?;

    let output = args.output.unwrap_or_else(|| match args.format {
        ReportFormat::Csv => config.report_path.clone(),
        ReportFormat::Json => config.report_path.with_extension("json"),
    });
    let written = match args.format {
        ReportFormat::Csv => CsvReportSink::new(&output).write(&table),
        ReportFormat::Json => JsonReportSink::new(&output).write(&table),
    };
    written.with_context(|| format!("Failed to write report: {}", output.display()))?;

    println!("\nReport written to: {}", output.display());
    Ok(())
}

/// Print simulated tier win rates next to the closed form.
fn simulate(args: SimulateArgs, config: &CalculatorConfig) -> Result<()> {
    let sim = build_simulator(&args.simulation, config);
    let result = sim.simulate(args.producers).context("Simulation failed")?;
    let expected = expected_daily_wins(sim.rule(), args.producers)?;

    println!("Active pillars: {}", args.producers);
    println!("Rule: {}  Days: {}", sim.rule(), sim.days());
    println!(
        "Top 30:  simulated {:>4}  closed form {:>8.2}",
        result.top_tier_daily_momentums, expected.top
    );
    println!(
        "Others:  simulated {:>4}  closed form {:>8.2}",
        result.other_tier_daily_momentums, expected.other
    );
    Ok(())
}

/// Print the emission period for the chosen day.
fn emission(args: EmissionArgs, config: &CalculatorConfig) -> Result<()> {
    let (schedule, elapsed_days) = load_schedule(&args.schedule, config)?;
    let daily = schedule.daily_emission(elapsed_days)?;

    println!("Days since genesis: {elapsed_days}");
    println!("Period: {} of {}", period_index(elapsed_days), schedule.periods());
    println!("Daily emission: {daily} ZNN");
    match schedule.days_until_next_period(elapsed_days) {
        Some(days) => println!("Next period in: {days} days"),
        None => println!("Next period: beyond the configured schedule"),
    }
    Ok(())
}
