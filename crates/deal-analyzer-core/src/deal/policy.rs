//! Simplified underwriting policies.
//!
//! Each shortcut the engine takes when inputs are incomplete, or where it
//! deliberately avoids a full model, lives here under its own name so it can
//! be tested and replaced in isolation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::time_value::checked_safe_divide;
use crate::types::{Money, Percent, Years};

/// Assumed monthly rent per unit when the rent roll carries no income.
pub const ESTIMATED_MONTHLY_RENT_PER_UNIT: Money = dec!(1500);

/// Expense ratio assumed when no operating expenses are supplied.
pub const FALLBACK_EXPENSE_RATIO: Decimal = dec!(0.50);

/// Exit cap rate (decimal) used when none, or a non-positive one, is supplied.
pub const DEFAULT_EXIT_CAP_RATE: Decimal = dec!(0.065);

/// Share of the original loan assumed outstanding at exit, regardless of
/// hold period.
pub const EXIT_LOAN_BALANCE_FACTOR: Decimal = dec!(0.80);

/// DSCR reported when there is no debt service. Stands in for +inf and
/// compares above every coverage threshold.
pub const DSCR_NO_DEBT_SERVICE: Decimal = Decimal::MAX;

/// How `DSCR_NO_DEBT_SERVICE` appears in serialised output.
pub const DSCR_UNBOUNDED_LABEL: &str = "unbounded";

pub const MAX_HOLD_PERIOD_YEARS: Years = dec!(100);
pub const MAX_AMORTIZATION_YEARS: u32 = 100;

/// Largest amount accepted for any single money input ($1 quadrillion).
/// Sums and products of capped inputs stay inside the Decimal range.
pub const MAX_INPUT_AMOUNT: Money = dec!(1000000000000000);

/// Largest magnitude accepted for a percent-valued input or shock.
pub const MAX_INPUT_PERCENT: Percent = dec!(1000);

/// Monthly gross income estimate from unit count alone.
pub fn estimated_monthly_gross(number_of_units: u32) -> Money {
    Decimal::from(number_of_units) * ESTIMATED_MONTHLY_RENT_PER_UNIT
}

/// Operating expenses implied by the fallback expense ratio.
pub fn fallback_operating_expenses(effective_gross_income: Money) -> Money {
    effective_gross_income * FALLBACK_EXPENSE_RATIO
}

/// Exit cap rate as a decimal, or `None` when the default must be used.
pub fn supplied_exit_cap_rate(exit_cap_rate_pct: Percent) -> Option<Decimal> {
    if exit_cap_rate_pct > Decimal::ZERO {
        Some(exit_cap_rate_pct / dec!(100))
    } else {
        None
    }
}

/// Loan balance at sale under the fixed paydown heuristic.
pub fn remaining_loan_balance_at_exit(loan_amount: Money) -> Money {
    loan_amount * EXIT_LOAN_BALANCE_FACTOR
}

/// Number of whole annual periods in the projected cash-flow sequence.
pub fn projection_years(hold_period_years: Years) -> usize {
    use rust_decimal::prelude::ToPrimitive;

    hold_period_years
        .trunc()
        .to_usize()
        .unwrap_or(0)
        .max(1)
}

/// Average annual return on equity, in percent.
///
/// Reported as the deal's "IRR" but not a discounted-cash-flow root: total
/// nominal return over equity, spread evenly over the hold period. `None`
/// when a sliver of equity drives the ratio past the Decimal range.
pub fn approximate_annual_return(
    total_return: Money,
    down_payment: Money,
    hold_period_years: Years,
) -> Option<Percent> {
    let years = hold_period_years.max(Decimal::ONE);
    checked_safe_divide(total_return, down_payment, Decimal::ZERO)?
        .checked_div(years)?
        .checked_mul(dec!(100))
}

/// Serde adapter for DSCR-valued fields: `DSCR_NO_DEBT_SERVICE` travels as
/// `"unbounded"`, every other value as a plain Decimal.
pub mod dscr_serde {
    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::{DSCR_NO_DEBT_SERVICE, DSCR_UNBOUNDED_LABEL};

    pub fn serialize<S: Serializer>(dscr: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        if *dscr == DSCR_NO_DEBT_SERVICE {
            serializer.serialize_str(DSCR_UNBOUNDED_LABEL)
        } else {
            Serialize::serialize(dscr, serializer)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Value(Decimal),
            Label(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Value(value) => Ok(value),
            Wire::Label(label) if label == DSCR_UNBOUNDED_LABEL => Ok(DSCR_NO_DEBT_SERVICE),
            Wire::Label(label) => Err(de::Error::custom(format!(
                "expected a decimal or \"{DSCR_UNBOUNDED_LABEL}\", got \"{label}\""
            ))),
        }
    }
}
