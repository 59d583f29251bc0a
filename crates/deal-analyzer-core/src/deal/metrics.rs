use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::deal::input::DealInput;
use crate::deal::policy::{
    approximate_annual_return, estimated_monthly_gross, fallback_operating_expenses,
    projection_years, remaining_loan_balance_at_exit, supplied_exit_cap_rate,
    DEFAULT_EXIT_CAP_RATE, DSCR_NO_DEBT_SERVICE, ESTIMATED_MONTHLY_RENT_PER_UNIT,
};
use crate::error::DealAnalyzerError;
use crate::time_value::{checked_safe_divide, interest_only_payment, level_payment, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Multiple, Percent};
use crate::DealAnalyzerResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Canonical investment metrics for one deal snapshot.
///
/// Percent-valued fields are percentages (7.25 = 7.25%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    /// Net operating income (year 1)
    pub noi: Money,
    /// NOI / purchase price
    pub going_in_cap_rate: Percent,
    /// NOI / exit value
    pub reversion_cap_rate: Percent,
    /// Year 1 cash flow after debt service / down payment
    pub cash_on_cash_return: Percent,
    /// Equal to `cash_on_cash_return`: the model holds NOI flat
    pub stabilized_cash_on_cash: Percent,
    /// Approximate average annual return on equity, see
    /// [`approximate_annual_return`]. Not a discounted-cash-flow IRR.
    pub irr: Percent,
    /// (Exit value - remaining loan balance) / down payment
    pub equity_multiple: Multiple,
    /// Occupancy needed to cover expenses and debt service
    pub break_even_occupancy: Percent,
    /// NOI / annual debt service; `DSCR_NO_DEBT_SERVICE` when unlevered,
    /// serialised as `"unbounded"`
    #[serde(with = "crate::deal::policy::dscr_serde")]
    pub dscr: Multiple,
    pub exit_sale_price: Money,
    /// Sum of the projected annual cash flows including sale proceeds
    pub total_return: Money,
    pub annual_cash_flow: Money,
    pub exit_value: Money,
    pub annual_gross_income: Money,
    pub effective_gross_income: Money,
    pub total_operating_expenses: Money,
    pub annual_debt_service: Money,
    /// Equity invested at acquisition (purchase price - loan amount)
    pub down_payment: Money,
    pub remaining_loan_balance: Money,
    /// Annual cash flows over the hold; the final year includes net sale
    /// proceeds
    pub projected_cash_flows: Vec<Money>,
}

/// Loan fields as the engine resolved them, for callers that want to show
/// or feed back the derived values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLoanTerms {
    pub loan_amount: Money,
    pub monthly_payment: Money,
}

/// Enveloped engine result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsOutput {
    #[serde(flatten)]
    pub metrics: FinancialMetrics,
    pub resolved_loan_terms: ResolvedLoanTerms,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the metrics snapshot for a deal.
///
/// Pure: the caller's input is never modified; the resolved loan amount and
/// payment are returned alongside the metrics instead.
pub fn compute(deal: &DealInput) -> DealAnalyzerResult<(FinancialMetrics, ResolvedLoanTerms)> {
    let mut warnings = Vec::new();
    run_engine(deal, &mut warnings)
}

/// Compute the metrics snapshot wrapped in a `ComputationOutput` carrying
/// the policy warnings that fired.
pub fn calculate_metrics(deal: &DealInput) -> DealAnalyzerResult<ComputationOutput<MetricsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (metrics, resolved_loan_terms) = run_engine(deal, &mut warnings)?;

    let output = MetricsOutput {
        metrics,
        resolved_loan_terms,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deal Metrics (Direct Capitalisation, Simplified Hold-Period Return)",
        deal,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub(crate) fn run_engine(
    deal: &DealInput,
    warnings: &mut Vec<String>,
) -> DealAnalyzerResult<(FinancialMetrics, ResolvedLoanTerms)> {
    deal.validate()?;

    if deal.vacancy_rate < Decimal::ZERO || deal.vacancy_rate > dec!(100) {
        warnings.push(format!(
            "Vacancy rate {}% is outside 0-100%; income figures may not be meaningful",
            deal.vacancy_rate
        ));
    }

    // --- Income ---
    let mut monthly_gross = deal.monthly_rent_roll();
    if monthly_gross.is_zero() && deal.number_of_units > 0 {
        monthly_gross = estimated_monthly_gross(deal.number_of_units);
        warnings.push(format!(
            "Rent roll carries no income; estimated ${ESTIMATED_MONTHLY_RENT_PER_UNIT}/unit/month across {} units",
            deal.number_of_units
        ));
    }
    let annual_gross_income = monthly_gross * dec!(12);
    let effective_gross_income =
        annual_gross_income * (Decimal::ONE - deal.vacancy_rate / dec!(100));

    // --- Expenses ---
    let mut total_operating_expenses = deal.operating_expenses.total();
    if total_operating_expenses.is_zero() && effective_gross_income > Decimal::ZERO {
        total_operating_expenses = fallback_operating_expenses(effective_gross_income);
        warnings.push(
            "No operating expenses supplied; assumed 50% of effective gross income".into(),
        );
    }

    let noi = effective_gross_income - total_operating_expenses;
    let going_in_cap_rate = in_range(
        percent_of(noi, deal.purchase_price),
        "purchase_price",
        "Going-in cap rate",
    )?;

    // --- Financing ---
    let resolved = resolve_loan_terms(deal, warnings);
    let annual_debt_service = resolved.monthly_payment * dec!(12);

    let dscr = in_range(
        checked_safe_divide(noi, annual_debt_service, DSCR_NO_DEBT_SERVICE),
        "loan_terms",
        "DSCR",
    )?;
    if annual_debt_service.is_zero() {
        warnings.push("No debt service; DSCR reported as unbounded".into());
    }

    let down_payment = deal.purchase_price - resolved.loan_amount;
    let annual_cash_flow = noi - annual_debt_service;
    if annual_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Annual cash flow is negative ({annual_cash_flow:.0}); debt service exceeds NOI"
        ));
    }

    let cash_on_cash_return = if down_payment <= Decimal::ZERO {
        warnings.push(
            "Down payment is zero or negative; cash-on-cash reported as 0 and equity multiple as 1.0x"
                .into(),
        );
        Decimal::ZERO
    } else {
        in_range(
            percent_of(annual_cash_flow, down_payment),
            "loan_terms",
            "Cash-on-cash return",
        )?
    };

    // --- Exit ---
    let exit_cap_rate = supplied_exit_cap_rate(deal.exit_assumptions.exit_cap_rate)
        .unwrap_or_else(|| {
            warnings.push(format!(
                "Exit cap rate not supplied; defaulted to {}%",
                (DEFAULT_EXIT_CAP_RATE * dec!(100)).normalize()
            ));
            DEFAULT_EXIT_CAP_RATE
        });
    let exit_value = in_range(
        checked_safe_divide(noi, exit_cap_rate, deal.purchase_price),
        "exit_assumptions.exit_cap_rate",
        "Exit value",
    )?;
    let reversion_cap_rate = in_range(
        percent_of(noi, exit_value),
        "exit_assumptions.exit_cap_rate",
        "Reversion cap rate",
    )?;
    let remaining_loan_balance = remaining_loan_balance_at_exit(resolved.loan_amount);

    // --- Hold-period returns ---
    let hold = deal.exit_assumptions.hold_period_years;
    let mut projected_cash_flows = vec![annual_cash_flow; projection_years(hold)];
    if let Some(last) = projected_cash_flows.last_mut() {
        *last = in_range(
            annual_cash_flow
                .checked_add(exit_value)
                .and_then(|flow| flow.checked_sub(remaining_loan_balance)),
            "exit_assumptions.exit_cap_rate",
            "Final-year cash flow",
        )?;
    }
    let total_return: Money = in_range(
        projected_cash_flows
            .iter()
            .try_fold(Decimal::ZERO, |acc, flow| acc.checked_add(*flow)),
        "exit_assumptions.exit_cap_rate",
        "Total return",
    )?;
    let irr = in_range(
        approximate_annual_return(total_return, down_payment, hold),
        "loan_terms",
        "IRR",
    )?;

    let equity_multiple = if down_payment <= Decimal::ZERO {
        Decimal::ONE
    } else {
        in_range(
            exit_value
                .checked_sub(remaining_loan_balance)
                .and_then(|proceeds| proceeds.checked_div(down_payment)),
            "loan_terms",
            "Equity multiple",
        )?
    };

    let break_even_occupancy = in_range(
        percent_of(
            total_operating_expenses + annual_debt_service,
            annual_gross_income,
        ),
        "rent_roll",
        "Break-even occupancy",
    )?;

    let metrics = FinancialMetrics {
        noi,
        going_in_cap_rate,
        reversion_cap_rate,
        cash_on_cash_return,
        stabilized_cash_on_cash: cash_on_cash_return,
        irr,
        equity_multiple,
        break_even_occupancy,
        dscr,
        exit_sale_price: exit_value,
        total_return,
        annual_cash_flow,
        exit_value,
        annual_gross_income,
        effective_gross_income,
        total_operating_expenses,
        annual_debt_service,
        down_payment,
        remaining_loan_balance,
        projected_cash_flows,
    };

    Ok((metrics, resolved))
}

/// `numerator / denominator` as a percentage, zero on a zero denominator.
fn percent_of(numerator: Decimal, denominator: Decimal) -> Option<Percent> {
    checked_safe_divide(numerator, denominator, Decimal::ZERO)?.checked_mul(dec!(100))
}

/// A ratio whose denominator is a sliver of its numerator can leave the
/// Decimal range; report it against the input that drove it there.
fn in_range(value: Option<Decimal>, field: &str, metric: &str) -> DealAnalyzerResult<Decimal> {
    value.ok_or_else(|| {
        DealAnalyzerError::invalid(
            field,
            format!("{metric} is outside the representable range for these inputs"),
        )
    })
}

/// Use caller-supplied loan amount and payment where nonzero, derive the
/// rest from LTV and the amortisation terms.
fn resolve_loan_terms(deal: &DealInput, warnings: &mut Vec<String>) -> ResolvedLoanTerms {
    let terms = &deal.loan_terms;

    let loan_amount = if terms.loan_amount.is_zero() {
        deal.purchase_price * terms.ltv / dec!(100)
    } else {
        terms.loan_amount
    };

    let monthly_payment = if !terms.monthly_payment.is_zero() {
        terms.monthly_payment
    } else {
        let r = monthly_rate(terms.interest_rate);
        if terms.is_interest_only {
            warnings.push(format!(
                "Interest-only loan ({} IO months): debt service excludes principal for the whole hold",
                terms.interest_only_months
            ));
            interest_only_payment(loan_amount, r)
        } else {
            level_payment(loan_amount, r, terms.amortization_period_years * 12)
        }
    };

    ResolvedLoanTerms {
        loan_amount,
        monthly_payment,
    }
}
