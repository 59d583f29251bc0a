use clap::Args;
use serde_json::Value;

use deal_analyzer_core::deal::{self, DealInput};

use crate::commands::log_warnings;
use crate::input;

/// Arguments for the metrics engine
#[derive(Args)]
pub struct MetricsArgs {
    /// Path to JSON deal file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal_input: DealInput = input::read_input(args.input.as_deref(), "deal metrics")?;
    tracing::info!(property_type = %deal_input.property_type, "computing deal metrics");

    let result = deal::calculate_metrics(&deal_input)?;
    log_warnings(&result.warnings);
    Ok(serde_json::to_value(result)?)
}
