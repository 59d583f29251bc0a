use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_analyzer_core::deal::DealInput;
use deal_analyzer_core::sensitivity::{self, ParameterPath, SensitivityInput};

use crate::commands::log_warnings;
use crate::input;

/// Arguments for sensitivity sweeps
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON deal file
    #[arg(long)]
    pub input: Option<String>,

    /// Input to sweep: purchasePrice, vacancyRate, exitCapRate, interestRate,
    /// ltv or holdPeriod. Omit for the exit cap pricing table.
    #[arg(long)]
    pub axis: Option<ParameterPath>,

    /// Comma-separated values for the axis (e.g. "5,6,7")
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, conflicts_with = "range")]
    pub values: Vec<Decimal>,

    /// Inclusive range in format min:max:step (e.g. "4:8:0.5")
    #[arg(long)]
    pub range: Option<String>,

    /// Second axis; produces a two-way grid
    #[arg(long, requires = "by_values")]
    pub by: Option<ParameterPath>,

    /// Comma-separated values for the second axis
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, requires = "by")]
    pub by_values: Vec<Decimal>,
}

fn parse_range(spec: &str) -> Result<Vec<Decimal>, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("Range must be min:max:step, got '{}'", spec).into());
    }
    let min: Decimal = parts[0].trim().parse()?;
    let max: Decimal = parts[1].trim().parse()?;
    let step: Decimal = parts[2].trim().parse()?;
    Ok(sensitivity::sweep_range(min, max, step)?)
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: DealInput = input::read_input(args.input.as_deref(), "sensitivity analysis")?;

    let Some(axis) = args.axis else {
        if !args.values.is_empty() || args.range.is_some() {
            return Err("--values and --range need an --axis to sweep".into());
        }
        tracing::info!("building exit cap pricing table");
        let table = sensitivity::exit_cap_rate_table(&deal)?;
        return Ok(serde_json::to_value(table)?);
    };

    let values = match args.range {
        Some(ref spec) => parse_range(spec)?,
        None => args.values,
    };
    if values.is_empty() {
        return Err(format!("--values <a,b,c> or --range <min:max:step> required for {axis}").into());
    }

    if let Some(by) = args.by {
        tracing::info!(%axis, %by, rows = values.len(), cols = args.by_values.len(), "sweeping grid");
        let grid = sensitivity::sweep_grid(&deal, axis, &values, by, &args.by_values)?;
        return Ok(serde_json::to_value(grid)?);
    }

    tracing::info!(%axis, points = values.len(), "sweeping");
    let result = sensitivity::run_sensitivity(&SensitivityInput {
        deal,
        axis: axis.to_string(),
        values,
    })?;
    log_warnings(&result.warnings);
    Ok(serde_json::to_value(result)?)
}
