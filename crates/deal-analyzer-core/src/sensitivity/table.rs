use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::deal::input::DealInput;
use crate::deal::policy::DEFAULT_EXIT_CAP_RATE;
use crate::sensitivity::sweep::{sweep, ParameterPath};
use crate::types::{Money, Percent};
use crate::DealAnalyzerResult;

/// Percentage-point offsets around the base exit cap rate.
pub const EXIT_CAP_OFFSETS: [Decimal; 5] = [dec!(-1.0), dec!(-0.5), dec!(0), dec!(0.5), dec!(1.0)];

/// Exit pricing sensitivity as parallel columns, one row per exit cap rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitCapSensitivityTable {
    pub base_exit_cap_rate: Percent,
    pub exit_cap_rates: Vec<Percent>,
    pub sale_prices: Vec<Money>,
    pub irrs: Vec<Percent>,
}

/// Sale price and approximate return at exit cap rates bracketing the deal's
/// own. Offsets that would take the cap rate to zero or below are skipped.
pub fn exit_cap_rate_table(deal: &DealInput) -> DealAnalyzerResult<ExitCapSensitivityTable> {
    deal.validate()?;
    let supplied = deal.exit_assumptions.exit_cap_rate;
    let base_exit_cap_rate = if supplied > Decimal::ZERO {
        supplied
    } else {
        (DEFAULT_EXIT_CAP_RATE * dec!(100)).normalize()
    };

    let rates: Vec<Percent> = EXIT_CAP_OFFSETS
        .iter()
        .map(|offset| base_exit_cap_rate + offset)
        .filter(|rate| *rate > Decimal::ZERO)
        .collect();

    let result = sweep(deal, ParameterPath::ExitCapRate, &rates)?;

    Ok(ExitCapSensitivityTable {
        base_exit_cap_rate,
        sale_prices: result.points.iter().map(|p| p.metrics.exit_sale_price).collect(),
        irrs: result.points.iter().map(|p| p.metrics.irr).collect(),
        exit_cap_rates: rates,
    })
}
