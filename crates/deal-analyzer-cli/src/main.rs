mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analyze::AnalyzeArgs;
use commands::grade::GradeArgs;
use commands::metrics::MetricsArgs;
use commands::scenario::ScenarioArgs;
use commands::sensitivity::SensitivityArgs;

/// Commercial real estate deal underwriting
#[derive(Parser)]
#[command(
    name = "dealcalc",
    version,
    about = "Commercial real estate deal underwriting",
    long_about = "Computes acquisition metrics for an income property with decimal \
                  precision: NOI, cap rates, cash-on-cash, DSCR, equity multiple and \
                  hold-period return. Also runs one-factor sensitivity sweeps, what-if \
                  scenarios and a graded investment advisory."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is unset (e.g. "info", "debug")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the financial metrics for a deal
    Metrics(MetricsArgs),
    /// Sweep one input across a range of values
    Sensitivity(SensitivityArgs),
    /// Grade a deal and produce an investment recommendation
    Grade(GradeArgs),
    /// Metrics, exit cap sensitivity and advisory in one report
    Analyze(AnalyzeArgs),
    /// Apply what-if shocks to a deal and compare against the base case
    Scenario(ScenarioArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Metrics(args) => commands::metrics::run_metrics(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Grade(args) => commands::grade::run_grade(args),
        Commands::Analyze(args) => commands::analyze::run_analyze(args),
        Commands::Scenario(args) => commands::scenario::run_scenario(args),
        Commands::Version => {
            println!("dealcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
