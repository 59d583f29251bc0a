use clap::Args;
use serde_json::Value;

use deal_analyzer_core::advisory::{self, GradingConfig, GradingInput};
use deal_analyzer_core::deal::DealInput;

use crate::commands::log_warnings;
use crate::input;

/// Arguments for the graded advisory
#[derive(Args)]
pub struct GradeArgs {
    /// Path to JSON deal file
    #[arg(long)]
    pub input: Option<String>,

    /// Grading rubric override (.json, .yaml or .yml)
    #[arg(long)]
    pub grading_config: Option<String>,
}

/// Load a rubric override, if one was given.
pub(crate) fn load_grading_config(
    path: Option<&str>,
) -> Result<Option<GradingConfig>, Box<dyn std::error::Error>> {
    path.map(|p| {
        tracing::info!(path = p, "reading grading config");
        input::file::read_config(p)
    })
    .transpose()
}

pub fn run_grade(args: GradeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: DealInput = input::read_input(args.input.as_deref(), "deal grading")?;
    let config = load_grading_config(args.grading_config.as_deref())?;

    let result = advisory::run_grading(&GradingInput { deal, config })?;
    log_warnings(&result.warnings);
    tracing::info!(
        overall_grade = %result.result.overall_grade,
        recommendation = %result.result.recommendation,
        "deal graded"
    );
    Ok(serde_json::to_value(result)?)
}
