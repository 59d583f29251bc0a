use clap::Args;
use serde_json::Value;

use deal_analyzer_core::analysis::{self, AnalysisInput};
use deal_analyzer_core::deal::DealInput;

use crate::commands::grade::load_grading_config;
use crate::commands::log_warnings;
use crate::input;

/// Arguments for the full deal report
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON deal file
    #[arg(long)]
    pub input: Option<String>,

    /// Grading rubric override (.json, .yaml or .yml)
    #[arg(long)]
    pub grading_config: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: DealInput = input::read_input(args.input.as_deref(), "deal analysis")?;
    let grading = load_grading_config(args.grading_config.as_deref())?;

    let result = analysis::analyze_deal(&AnalysisInput { deal, grading })?;
    log_warnings(&result.warnings);
    Ok(serde_json::to_value(result)?)
}
