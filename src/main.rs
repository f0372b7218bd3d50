//! Portfolio Projection CLI
//!
//! Command-line interface for running portfolio projections

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use portfolio_projection::portfolio::{load_allocation, load_assets};
use portfolio_projection::projection::{
    blended_return, write_comparison_csv, write_projection_csv, ProjectionSummary,
};
use portfolio_projection::{
    compute_risk, AssetClass, PortfolioAllocation, ProjectionConfig, ProjectionReport,
    ScenarioRunner,
};

/// Year-by-year portfolio projections with rebalancing and a single-rate baseline
#[derive(Parser)]
#[command(name = "portfolio-projection", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a portfolio year by year
    Project(ProjectArgs),
    /// Weighted risk score and blended return of an asset mix
    Risk(AssetArgs),
    /// Run the same portfolio under several rebalancing frequencies
    CompareRebalancing(CompareArgs),
    /// Print the default projection request as JSON
    Defaults,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Args)]
struct AssetArgs {
    /// CSV file with columns id,name,expected_return,allocation,risk
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Args)]
struct PortfolioArgs {
    /// JSON projection request; flags below override its fields
    #[arg(long)]
    input: Option<PathBuf>,

    #[command(flatten)]
    assets: AssetArgs,

    /// Initial investment
    #[arg(long)]
    initial: Option<f64>,

    /// Contribution added every year
    #[arg(long)]
    annual: Option<f64>,

    /// Number of years to project
    #[arg(long)]
    duration: Option<u32>,

    /// Rebalance every N years (0 = never)
    #[arg(long)]
    rebalance: Option<u32>,
}

#[derive(Args)]
struct ProjectArgs {
    #[command(flatten)]
    portfolio: PortfolioArgs,

    /// Write yearly per-asset results to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the baseline series to this CSV file
    #[arg(long)]
    comparison_output: Option<PathBuf>,

    /// Skip the single-rate baseline
    #[arg(long)]
    no_comparison: bool,
}

#[derive(Args)]
struct CompareArgs {
    #[command(flatten)]
    portfolio: PortfolioArgs,

    /// Rebalancing frequencies to compare
    #[arg(long, value_delimiter = ',', default_value = "0,1,3,5")]
    frequencies: Vec<u32>,
}

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize> Envelope<T> {
    fn new(body: T) -> Self {
        Self {
            generated_at: Utc::now(),
            body,
        }
    }
}

#[derive(Serialize)]
struct RiskOutput {
    risk_score: f64,
    blended_return: f64,
    total_allocation: f64,
}

#[derive(Serialize)]
struct ComparisonOutput {
    scenarios: Vec<ScenarioOutput>,
}

#[derive(Serialize)]
struct ScenarioOutput {
    rebalancing_frequency: u32,
    summary: ProjectionSummary,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Project(args) => run_project(args, cli.format),
        Commands::Risk(args) => run_risk(args, cli.format),
        Commands::CompareRebalancing(args) => run_compare(args, cli.format),
        Commands::Defaults => {
            println!("{}", serde_json::to_string_pretty(&PortfolioAllocation::default())?);
            Ok(())
        }
    }
}

fn resolve_assets(args: &AssetArgs) -> Result<Option<Vec<AssetClass>>> {
    args.assets
        .as_ref()
        .map(|path| load_assets(path).with_context(|| format!("loading assets from {}", path.display())))
        .transpose()
}

fn resolve_allocation(args: &PortfolioArgs) -> Result<PortfolioAllocation> {
    let mut allocation = match &args.input {
        Some(path) => load_allocation(path)
            .with_context(|| format!("loading projection request from {}", path.display()))?,
        None => PortfolioAllocation::default(),
    };

    if let Some(assets) = resolve_assets(&args.assets)? {
        allocation.assets = assets;
    }
    if let Some(initial) = args.initial {
        allocation.initial_investment = initial;
    }
    if let Some(annual) = args.annual {
        allocation.annual_investment = annual;
    }
    if let Some(duration) = args.duration {
        allocation.duration = duration;
    }
    if let Some(rebalance) = args.rebalance {
        allocation.rebalancing_frequency = rebalance;
    }

    Ok(allocation)
}

fn run_project(args: ProjectArgs, format: OutputFormat) -> Result<()> {
    let allocation = resolve_allocation(&args.portfolio)?;
    let runner = ScenarioRunner::with_config(ProjectionConfig {
        include_comparison: !args.no_comparison,
        ..Default::default()
    });

    let report = runner.run(&allocation).context("projection failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&Envelope::new(&report))?),
        OutputFormat::Table => print_report(&allocation, &report),
    }

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_projection_csv(&report.years, BufWriter::new(file))?;
        eprintln!("Yearly results written to: {}", path.display());
    }
    if let Some(path) = &args.comparison_output {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_comparison_csv(&report.comparison, BufWriter::new(file))?;
        eprintln!("Baseline written to: {}", path.display());
    }

    Ok(())
}

fn run_risk(args: AssetArgs, format: OutputFormat) -> Result<()> {
    let assets = resolve_assets(&args)?.unwrap_or_else(AssetClass::defaults);
    let output = RiskOutput {
        risk_score: compute_risk(&assets),
        blended_return: blended_return(&assets),
        total_allocation: assets.iter().map(|a| a.allocation).sum(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&Envelope::new(&output))?),
        OutputFormat::Table => {
            println!("{:<16} {:>10} {:>10} {:>6}", "Asset", "Alloc %", "Return %", "Risk");
            println!("{}", "-".repeat(45));
            for asset in &assets {
                println!(
                    "{:<16} {:>10.2} {:>10.2} {:>6.1}",
                    asset.name, asset.allocation, asset.expected_return, asset.risk
                );
            }
            println!();
            println!("  Total Allocation: {:.2}%", output.total_allocation);
            println!("  Risk Score: {:.1}", output.risk_score);
            println!("  Blended Return: {:.2}%", output.blended_return);
        }
    }

    Ok(())
}

fn run_compare(args: CompareArgs, format: OutputFormat) -> Result<()> {
    let allocation = resolve_allocation(&args.portfolio)?;
    let runner = ScenarioRunner::new();

    let scenarios = runner
        .run_rebalancing_scenarios(&allocation, &args.frequencies)
        .context("projection failed")?;
    let outputs: Vec<ScenarioOutput> = scenarios
        .iter()
        .map(|s| ScenarioOutput {
            rebalancing_frequency: s.rebalancing_frequency,
            summary: s.report.summary(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let body = ComparisonOutput { scenarios: outputs };
            println!("{}", serde_json::to_string_pretty(&Envelope::new(&body))?);
        }
        OutputFormat::Table => {
            println!(
                "{:>10} {:>14} {:>14} {:>14} {:>10}",
                "Rebalance", "Final Value", "Total Gain", "vs Baseline", "Rebalances"
            );
            println!("{}", "-".repeat(66));
            for output in &outputs {
                let label = match output.rebalancing_frequency {
                    0 => "never".to_string(),
                    n => format!("{}y", n),
                };
                println!(
                    "{:>10} {:>14.2} {:>14.2} {:>14.2} {:>10}",
                    label,
                    output.summary.final_value,
                    output.summary.total_gain,
                    output.summary.difference_vs_comparison.unwrap_or(0.0),
                    output.summary.rebalance_count,
                );
            }
        }
    }

    Ok(())
}

fn print_report(allocation: &PortfolioAllocation, report: &ProjectionReport) {
    println!("Portfolio Projection");
    println!("====================\n");
    println!("  Initial Investment: ${:.2}", allocation.initial_investment);
    println!("  Annual Investment: ${:.2}", allocation.annual_investment);
    println!("  Duration: {} years", allocation.duration);
    match allocation.rebalancing_frequency {
        0 => println!("  Rebalancing: never"),
        n => println!("  Rebalancing: every {} years", n),
    }
    println!("  Risk Score: {:.1}", report.risk_score);
    println!("  Blended Return: {:.2}%", report.blended_return);
    println!();

    println!(
        "{:>4} {:>14} {:>12} {:>14} {:>14} {:>4}",
        "Year", "Total Value", "Interest", "Invested", "Baseline", "Reb"
    );
    println!("{}", "-".repeat(68));
    for (i, row) in report.years.iter().enumerate() {
        let baseline = report
            .comparison
            .get(i)
            .map(|c| format!("{:.2}", c.value_end_of_year))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4} {:>14.2} {:>12.2} {:>14.2} {:>14} {:>4}",
            row.year,
            row.total_value,
            row.total_interest,
            row.total_amount_invested,
            baseline,
            if row.rebalanced { "*" } else { "" },
        );
    }

    if let Some(last) = report.years.last() {
        println!("\nFinal Allocation:");
        for asset in &last.asset_values {
            println!(
                "  {:<16} ${:>12.2} {:>7.2}%",
                asset.asset_name, asset.value, asset.allocation
            );
        }
    }

    let summary = report.summary();
    println!("\nSummary:");
    println!("  Final Value: ${:.2}", summary.final_value);
    println!("  Total Invested: ${:.2}", summary.total_invested);
    println!("  Total Gain: ${:.2}", summary.total_gain);
    println!("  Rebalances: {}", summary.rebalance_count);
    if let Some(diff) = summary.difference_vs_comparison {
        println!("  Difference vs Baseline: ${:.2}", diff);
    }
}
