use napi::Result as NapiResult;
use napi_derive::napi;

use deal_analyzer_core::advisory::{GradingConfig, GradingInput};
use deal_analyzer_core::analysis::AnalysisInput;
use deal_analyzer_core::deal::DealInput;
use deal_analyzer_core::sensitivity::{ScenarioInput, SensitivityInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_metrics(deal_json: String) -> NapiResult<String> {
    let deal: DealInput = serde_json::from_str(&deal_json).map_err(to_napi_error)?;
    let output =
        deal_analyzer_core::deal::calculate_metrics(&deal).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

#[napi]
pub fn sweep_sensitivity(input_json: String) -> NapiResult<String> {
    let input: SensitivityInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        deal_analyzer_core::sensitivity::run_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn exit_cap_rate_table(deal_json: String) -> NapiResult<String> {
    let deal: DealInput = serde_json::from_str(&deal_json).map_err(to_napi_error)?;
    let table =
        deal_analyzer_core::sensitivity::exit_cap_rate_table(&deal).map_err(to_napi_error)?;
    serde_json::to_string(&table).map_err(to_napi_error)
}

#[napi]
pub fn run_scenario(input_json: String) -> NapiResult<String> {
    let input: ScenarioInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analyzer_core::sensitivity::run_scenario(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Advisory
// ---------------------------------------------------------------------------

#[napi]
pub fn grade_deal(input_json: String) -> NapiResult<String> {
    let input: GradingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analyzer_core::advisory::run_grading(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// The built-in rubric, as a starting point for overrides.
#[napi]
pub fn default_grading_config() -> NapiResult<String> {
    serde_json::to_string(&GradingConfig::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Full analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_deal(input_json: String) -> NapiResult<String> {
    let input: AnalysisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal_analyzer_core::analysis::analyze_deal(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
