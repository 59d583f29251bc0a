use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::deal::input::{check_percent_cap, DealInput};
use crate::deal::metrics::{compute, FinancialMetrics};
use crate::types::{with_metadata, ComputationOutput, Percent};
use crate::DealAnalyzerResult;

const VACANCY_BOUNDS: (Decimal, Decimal) = (dec!(0), dec!(50));
const INTEREST_RATE_BOUNDS: (Decimal, Decimal) = (dec!(1), dec!(15));
const EXIT_CAP_RATE_BOUNDS: (Decimal, Decimal) = (dec!(3), dec!(12));

/// Simultaneous what-if shocks applied to a base deal.
///
/// `*_pct` fields scale the underlying amounts by a percentage; `*_pts`
/// fields add percentage points to a rate and clamp it to a plausible band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioAdjustments {
    pub purchase_price_pct: Percent,
    pub monthly_rent_pct: Percent,
    pub operating_expenses_pct: Percent,
    pub vacancy_rate_pts: Percent,
    pub interest_rate_pts: Percent,
    pub exit_cap_rate_pts: Percent,
}

impl ScenarioAdjustments {
    /// Every shock must stay within `MAX_INPUT_PERCENT` in magnitude.
    pub fn validate(&self) -> DealAnalyzerResult<()> {
        check_percent_cap("adjustments.purchase_price_pct", self.purchase_price_pct)?;
        check_percent_cap("adjustments.monthly_rent_pct", self.monthly_rent_pct)?;
        check_percent_cap(
            "adjustments.operating_expenses_pct",
            self.operating_expenses_pct,
        )?;
        check_percent_cap("adjustments.vacancy_rate_pts", self.vacancy_rate_pts)?;
        check_percent_cap("adjustments.interest_rate_pts", self.interest_rate_pts)?;
        check_percent_cap("adjustments.exit_cap_rate_pts", self.exit_cap_rate_pts)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub deal: DealInput,
    #[serde(default)]
    pub adjustments: ScenarioAdjustments,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutput {
    pub adjusted_deal: DealInput,
    pub base_metrics: FinancialMetrics,
    pub adjusted_metrics: FinancialMetrics,
}

fn scale(pct: Percent) -> Decimal {
    Decimal::ONE + pct / dec!(100)
}

fn shift_clamped(value: Decimal, pts: Percent, (lo, hi): (Decimal, Decimal)) -> Decimal {
    (value + pts).max(lo).min(hi)
}

/// Copy of `deal` with every nonzero shock applied. Zero shocks leave their
/// field untouched, clamps included.
///
/// Price and rate shocks clear the engine-derived loan fields they feed.
/// Both the deal and the shocks are validated first; a shocked amount that
/// lands above the input cap is left for the engine to reject.
pub fn apply_adjustments(
    deal: &DealInput,
    adj: &ScenarioAdjustments,
) -> DealAnalyzerResult<DealInput> {
    deal.validate()?;
    adj.validate()?;
    let mut out = deal.clone();

    if !adj.purchase_price_pct.is_zero() {
        out.purchase_price *= scale(adj.purchase_price_pct);
        out.loan_terms.loan_amount = Decimal::ZERO;
        out.loan_terms.monthly_payment = Decimal::ZERO;
    }
    if !adj.monthly_rent_pct.is_zero() {
        let factor = scale(adj.monthly_rent_pct);
        for unit in &mut out.rent_roll {
            unit.monthly_rent *= factor;
        }
    }
    if !adj.operating_expenses_pct.is_zero() {
        out.operating_expenses = out
            .operating_expenses
            .scaled(scale(adj.operating_expenses_pct));
    }
    if !adj.vacancy_rate_pts.is_zero() {
        out.vacancy_rate = shift_clamped(out.vacancy_rate, adj.vacancy_rate_pts, VACANCY_BOUNDS);
    }
    if !adj.interest_rate_pts.is_zero() {
        out.loan_terms.interest_rate = shift_clamped(
            out.loan_terms.interest_rate,
            adj.interest_rate_pts,
            INTEREST_RATE_BOUNDS,
        );
        out.loan_terms.monthly_payment = Decimal::ZERO;
    }
    if !adj.exit_cap_rate_pts.is_zero() {
        out.exit_assumptions.exit_cap_rate = shift_clamped(
            out.exit_assumptions.exit_cap_rate,
            adj.exit_cap_rate_pts,
            EXIT_CAP_RATE_BOUNDS,
        );
    }

    Ok(out)
}

/// Base and shocked metrics side by side.
pub fn run_scenario(input: &ScenarioInput) -> DealAnalyzerResult<ComputationOutput<ScenarioOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let adj = &input.adjustments;
    let adjusted_deal = apply_adjustments(&input.deal, adj)?;

    let shifts = [
        (
            "Vacancy rate",
            input.deal.vacancy_rate,
            adj.vacancy_rate_pts,
            adjusted_deal.vacancy_rate,
        ),
        (
            "Interest rate",
            input.deal.loan_terms.interest_rate,
            adj.interest_rate_pts,
            adjusted_deal.loan_terms.interest_rate,
        ),
        (
            "Exit cap rate",
            input.deal.exit_assumptions.exit_cap_rate,
            adj.exit_cap_rate_pts,
            adjusted_deal.exit_assumptions.exit_cap_rate,
        ),
    ];
    for (name, base, pts, adjusted) in shifts {
        if !pts.is_zero() && adjusted != base + pts {
            warnings.push(format!(
                "{name} shift clamped: {base}% shifted {pts} pts gives {}%, used {adjusted}%",
                base + pts
            ));
        }
    }

    let (base_metrics, _) = compute(&input.deal)?;
    let (adjusted_metrics, _) = compute(&adjusted_deal)?;

    let output = ScenarioOutput {
        adjusted_deal,
        base_metrics,
        adjusted_metrics,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "What-If Scenario (Simultaneous Shocks)",
        adj,
        warnings,
        elapsed,
        output,
    ))
}
