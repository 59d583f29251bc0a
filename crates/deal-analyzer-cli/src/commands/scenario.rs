use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_analyzer_core::deal::DealInput;
use deal_analyzer_core::sensitivity::{self, ScenarioAdjustments, ScenarioInput};

use crate::commands::log_warnings;
use crate::input;

/// Arguments for what-if scenarios. Shocks left at zero are not applied.
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to JSON deal file
    #[arg(long)]
    pub input: Option<String>,

    /// Change in purchase price, percent
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub purchase_price_pct: Decimal,

    /// Change in every unit's monthly rent, percent
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub monthly_rent_pct: Decimal,

    /// Change in every operating expense category, percent
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub operating_expenses_pct: Decimal,

    /// Vacancy rate shift in points, clamped to 0-50%
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub vacancy_rate_pts: Decimal,

    /// Interest rate shift in points, clamped to 1-15%
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub interest_rate_pts: Decimal,

    /// Exit cap rate shift in points, clamped to 3-12%
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub exit_cap_rate_pts: Decimal,
}

pub fn run_scenario(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: DealInput = input::read_input(args.input.as_deref(), "scenario analysis")?;
    let adjustments = ScenarioAdjustments {
        purchase_price_pct: args.purchase_price_pct,
        monthly_rent_pct: args.monthly_rent_pct,
        operating_expenses_pct: args.operating_expenses_pct,
        vacancy_rate_pts: args.vacancy_rate_pts,
        interest_rate_pts: args.interest_rate_pts,
        exit_cap_rate_pts: args.exit_cap_rate_pts,
    };
    tracing::info!(?adjustments, "running scenario");

    let result = sensitivity::run_scenario(&ScenarioInput { deal, adjustments })?;
    log_warnings(&result.warnings);
    Ok(serde_json::to_value(result)?)
}
