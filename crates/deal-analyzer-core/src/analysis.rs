use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::advisory::{self, Advisory, GradingConfig};
use crate::deal::input::DealInput;
use crate::deal::metrics::{run_engine, FinancialMetrics};
use crate::sensitivity::table::{exit_cap_rate_table, ExitCapSensitivityTable};
use crate::types::{with_metadata, ComputationOutput};
use crate::DealAnalyzerResult;

/// Full analyze-deal request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub deal: DealInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading: Option<GradingConfig>,
}

/// Everything a deal review needs in one payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealAnalysis {
    /// The submitted deal with engine-resolved loan amount and payment
    pub deal_input: DealInput,
    pub financial_metrics: FinancialMetrics,
    pub sensitivity_table: ExitCapSensitivityTable,
    pub advisory: Advisory,
}

/// Metrics, exit-cap sensitivity and advisory for one deal.
pub fn analyze_deal(input: &AnalysisInput) -> DealAnalyzerResult<ComputationOutput<DealAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let config = input.grading.clone().unwrap_or_default();
    config.validate()?;

    let (financial_metrics, resolved) = run_engine(&input.deal, &mut warnings)?;
    let sensitivity_table = exit_cap_rate_table(&input.deal)?;
    let advisory = advisory::grade(&input.deal, &financial_metrics, &config);

    let output = DealAnalysis {
        deal_input: input.deal.with_resolved_loan_terms(&resolved),
        financial_metrics,
        sensitivity_table,
        advisory,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deal Analysis (Metrics, Exit Cap Sensitivity, Graded Advisory)",
        &input.deal,
        warnings,
        elapsed,
        output,
    ))
}
