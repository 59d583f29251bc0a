use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::deal::input::DealInput;
use crate::deal::metrics::{compute, FinancialMetrics};
use crate::error::DealAnalyzerError;
use crate::types::{with_metadata, ComputationOutput};
use crate::DealAnalyzerResult;

/// Upper bound on generated sweep points.
pub const MAX_SWEEP_POINTS: usize = 1000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A scalar deal field that can be swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterPath {
    PurchasePrice,
    VacancyRate,
    ExitCapRate,
    InterestRate,
    Ltv,
    HoldPeriod,
}

impl ParameterPath {
    pub const ALL: [ParameterPath; 6] = [
        ParameterPath::PurchasePrice,
        ParameterPath::VacancyRate,
        ParameterPath::ExitCapRate,
        ParameterPath::InterestRate,
        ParameterPath::Ltv,
        ParameterPath::HoldPeriod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterPath::PurchasePrice => "purchasePrice",
            ParameterPath::VacancyRate => "vacancyRate",
            ParameterPath::ExitCapRate => "exitCapRate",
            ParameterPath::InterestRate => "interestRate",
            ParameterPath::Ltv => "ltv",
            ParameterPath::HoldPeriod => "holdPeriod",
        }
    }

    /// Overwrite the targeted field on `deal`.
    ///
    /// Axes that feed the derived loan fields clear them, so the engine
    /// re-derives debt service for the new value: `purchasePrice` and `ltv`
    /// clear loan amount and payment, `interestRate` clears the payment.
    /// A deal carrying its resolved loan terms therefore sweeps exactly like
    /// the deal it was resolved from.
    pub fn apply(&self, deal: &mut DealInput, value: Decimal) {
        match self {
            ParameterPath::PurchasePrice => {
                deal.purchase_price = value;
                deal.loan_terms.loan_amount = Decimal::ZERO;
                deal.loan_terms.monthly_payment = Decimal::ZERO;
            }
            ParameterPath::VacancyRate => deal.vacancy_rate = value,
            ParameterPath::ExitCapRate => deal.exit_assumptions.exit_cap_rate = value,
            ParameterPath::InterestRate => {
                deal.loan_terms.interest_rate = value;
                deal.loan_terms.monthly_payment = Decimal::ZERO;
            }
            ParameterPath::Ltv => {
                deal.loan_terms.ltv = value;
                deal.loan_terms.loan_amount = Decimal::ZERO;
                deal.loan_terms.monthly_payment = Decimal::ZERO;
            }
            ParameterPath::HoldPeriod => deal.exit_assumptions.hold_period_years = value,
        }
    }

    /// Current value of the targeted field.
    pub fn read(&self, deal: &DealInput) -> Decimal {
        match self {
            ParameterPath::PurchasePrice => deal.purchase_price,
            ParameterPath::VacancyRate => deal.vacancy_rate,
            ParameterPath::ExitCapRate => deal.exit_assumptions.exit_cap_rate,
            ParameterPath::InterestRate => deal.loan_terms.interest_rate,
            ParameterPath::Ltv => deal.loan_terms.ltv,
            ParameterPath::HoldPeriod => deal.exit_assumptions.hold_period_years,
        }
    }
}

impl fmt::Display for ParameterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterPath {
    type Err = DealAnalyzerError;

    /// Accepts camelCase or snake_case names, optionally qualified by their
    /// section (`loanTerms.interestRate`, `exit_assumptions.exit_cap_rate`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let leaf = s.trim().rsplit('.').next().unwrap_or_default();
        let key: String = leaf
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "purchaseprice" => Ok(ParameterPath::PurchasePrice),
            "vacancyrate" => Ok(ParameterPath::VacancyRate),
            "exitcaprate" => Ok(ParameterPath::ExitCapRate),
            "interestrate" => Ok(ParameterPath::InterestRate),
            "ltv" => Ok(ParameterPath::Ltv),
            "holdperiod" | "holdperiodyears" => Ok(ParameterPath::HoldPeriod),
            _ => Err(DealAnalyzerError::UnknownSensitivityAxis(s.to_string())),
        }
    }
}

/// One scenario of a single-axis sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub value: Decimal,
    pub metrics: FinancialMetrics,
}

/// Metrics for each swept value, in the order the values were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub axis: ParameterPath,
    pub points: Vec<SensitivityPoint>,
}

/// Two sweeps composed: one single-axis sweep over `col_axis` for each value
/// of `row_axis`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityGrid {
    pub row_axis: ParameterPath,
    pub col_axis: ParameterPath,
    pub row_values: Vec<Decimal>,
    pub col_values: Vec<Decimal>,
    /// cells[i][j] = metrics at row_values[i], col_values[j]
    pub cells: Vec<Vec<FinancialMetrics>>,
}

/// Serialisable sweep request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub deal: DealInput,
    /// Parameter path, e.g. "exitCapRate"
    pub axis: String,
    pub values: Vec<Decimal>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Recompute the deal once per value with `axis` overwritten on a fresh
/// clone. Any failing scenario fails the whole sweep.
pub fn sweep(
    deal: &DealInput,
    axis: ParameterPath,
    values: &[Decimal],
) -> DealAnalyzerResult<SensitivityResult> {
    if values.is_empty() {
        return Err(DealAnalyzerError::EmptySweep(axis.to_string()));
    }

    let points = values
        .iter()
        .map(|&value| -> DealAnalyzerResult<SensitivityPoint> {
            let mut scenario = deal.clone();
            axis.apply(&mut scenario, value);
            let (metrics, _) = compute(&scenario)?;
            Ok(SensitivityPoint { value, metrics })
        })
        .collect::<DealAnalyzerResult<Vec<_>>>()?;

    Ok(SensitivityResult { axis, points })
}

/// Cross two single-axis sweeps.
pub fn sweep_grid(
    deal: &DealInput,
    row_axis: ParameterPath,
    row_values: &[Decimal],
    col_axis: ParameterPath,
    col_values: &[Decimal],
) -> DealAnalyzerResult<SensitivityGrid> {
    if row_values.is_empty() {
        return Err(DealAnalyzerError::EmptySweep(row_axis.to_string()));
    }

    let mut cells = Vec::with_capacity(row_values.len());
    for &row_value in row_values {
        let mut base = deal.clone();
        row_axis.apply(&mut base, row_value);
        let row = sweep(&base, col_axis, col_values)?;
        cells.push(row.points.into_iter().map(|p| p.metrics).collect());
    }

    Ok(SensitivityGrid {
        row_axis,
        col_axis,
        row_values: row_values.to_vec(),
        col_values: col_values.to_vec(),
        cells,
    })
}

/// Inclusive `min..=max` in `step` increments; `max` is appended when the
/// step does not land on it.
pub fn sweep_range(min: Decimal, max: Decimal, step: Decimal) -> DealAnalyzerResult<Vec<Decimal>> {
    if step <= Decimal::ZERO {
        return Err(DealAnalyzerError::invalid("step", "Step must be positive"));
    }
    if min > max {
        return Err(DealAnalyzerError::invalid("min", "Min must be <= max"));
    }

    let mut values = Vec::new();
    let mut current = min;
    while current <= max {
        if values.len() == MAX_SWEEP_POINTS {
            return Err(DealAnalyzerError::invalid(
                "step",
                format!("Range would produce more than {MAX_SWEEP_POINTS} points"),
            ));
        }
        values.push(current);
        current = match current.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    if let Some(&last) = values.last() {
        if last < max {
            values.push(max);
        }
    }

    Ok(values)
}

/// Enveloped sweep for serialised requests.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> DealAnalyzerResult<ComputationOutput<SensitivityResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let axis: ParameterPath = input.axis.parse()?;
    let base = axis.read(&input.deal);
    if !input.values.contains(&base) {
        warnings.push(format!(
            "Base case value {base} for {axis} is not among the swept values"
        ));
    }

    let result = sweep(&input.deal, axis, &input.values)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "One-Factor Sensitivity Sweep",
        &serde_json::json!({
            "axis": axis,
            "values": input.values,
        }),
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::input::{ExitAssumptions, LoanTerms, OperatingExpenses, RentRollUnit};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn deal() -> DealInput {
        DealInput {
            property_type: "multifamily".into(),
            purchase_price: dec!(2000000),
            number_of_units: 12,
            rent_roll: (0..12)
                .map(|i| RentRollUnit {
                    unit_number: format!("{}", i + 1),
                    unit_type: Some("2br".into()),
                    square_footage: None,
                    monthly_rent: dec!(1800),
                    occupied: true,
                })
                .collect(),
            vacancy_rate: dec!(5),
            operating_expenses: OperatingExpenses {
                property_tax: dec!(30000),
                insurance: dec!(12000),
                maintenance: dec!(20000),
                property_management: dec!(15000),
                ..Default::default()
            },
            capex_budget: Decimal::ZERO,
            loan_terms: LoanTerms::default(),
            exit_assumptions: ExitAssumptions::default(),
        }
    }

    #[test]
    fn test_sweep_preserves_order_and_length() {
        let base = deal();
        let result = sweep(
            &base,
            ParameterPath::ExitCapRate,
            &[dec!(5), dec!(6), dec!(7)],
        )
        .unwrap();
        assert_eq!(result.points.len(), 3);
        let values: Vec<_> = result.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(5), dec!(6), dec!(7)]);
        // Higher exit cap, lower exit value
        assert!(result.points[0].metrics.exit_value > result.points[2].metrics.exit_value);
    }

    #[test]
    fn test_sweep_matches_independent_compute() {
        let base = deal();
        let result = sweep(&base, ParameterPath::VacancyRate, &[dec!(10)]).unwrap();
        let mut manual = base.clone();
        manual.vacancy_rate = dec!(10);
        let (expected, _) = compute(&manual).unwrap();
        assert_eq!(result.points[0].metrics, expected);
    }

    #[test]
    fn test_sweep_does_not_mutate_input() {
        let base = deal();
        let before = base.clone();
        sweep(&base, ParameterPath::PurchasePrice, &[dec!(1), dec!(5000000)]).unwrap();
        assert_eq!(base, before);
    }

    #[test]
    fn test_no_dedup_or_sorting() {
        let result = sweep(
            &deal(),
            ParameterPath::VacancyRate,
            &[dec!(8), dec!(2), dec!(8)],
        )
        .unwrap();
        let values: Vec<_> = result.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(8), dec!(2), dec!(8)]);
        assert_eq!(result.points[0].metrics, result.points[2].metrics);
    }

    #[test]
    fn test_empty_sweep_is_error() {
        let err = sweep(&deal(), ParameterPath::Ltv, &[]).unwrap_err();
        assert!(matches!(err, DealAnalyzerError::EmptySweep(_)));
    }

    #[test]
    fn test_invalid_scenario_fails_whole_sweep() {
        let err = sweep(
            &deal(),
            ParameterPath::PurchasePrice,
            &[dec!(1000000), Decimal::ZERO],
        )
        .unwrap_err();
        assert!(matches!(err, DealAnalyzerError::InvalidInput { .. }));
    }

    #[test]
    fn test_interest_rate_sweep_rederives_payment() {
        let base = deal();
        let (_, loan) = compute(&base).unwrap();
        let resolved = base.with_resolved_loan_terms(&loan);
        let result = sweep(
            &resolved,
            ParameterPath::InterestRate,
            &[dec!(4), dec!(8)],
        )
        .unwrap();
        assert!(
            result.points[0].metrics.annual_debt_service
                < result.points[1].metrics.annual_debt_service
        );
    }

    #[test]
    fn test_ltv_sweep_rederives_loan() {
        let result = sweep(&deal(), ParameterPath::Ltv, &[Decimal::ZERO, dec!(80)]).unwrap();
        assert_eq!(result.points[0].metrics.down_payment, dec!(2000000));
        assert_eq!(result.points[1].metrics.down_payment, dec!(400000));
    }

    #[test]
    fn test_parse_parameter_paths() {
        assert_eq!(
            "exitCapRate".parse::<ParameterPath>().unwrap(),
            ParameterPath::ExitCapRate
        );
        assert_eq!(
            "exit_cap_rate".parse::<ParameterPath>().unwrap(),
            ParameterPath::ExitCapRate
        );
        assert_eq!(
            "loanTerms.interestRate".parse::<ParameterPath>().unwrap(),
            ParameterPath::InterestRate
        );
        assert_eq!(
            "hold_period_years".parse::<ParameterPath>().unwrap(),
            ParameterPath::HoldPeriod
        );
        for axis in ParameterPath::ALL {
            assert_eq!(axis.as_str().parse::<ParameterPath>().unwrap(), axis);
        }
    }

    #[test]
    fn test_unknown_axis() {
        let err = "capexBudget".parse::<ParameterPath>().unwrap_err();
        assert!(matches!(err, DealAnalyzerError::UnknownSensitivityAxis(ref s) if s == "capexBudget"));
    }

    #[test]
    fn test_sweep_range() {
        let vals = sweep_range(dec!(5), dec!(7), dec!(0.5)).unwrap();
        assert_eq!(vals, vec![dec!(5), dec!(5.5), dec!(6), dec!(6.5), dec!(7)]);

        let vals = sweep_range(dec!(0), dec!(1), dec!(0.3)).unwrap();
        assert_eq!(vals.len(), 5);
        assert_eq!(*vals.last().unwrap(), dec!(1));

        assert!(sweep_range(dec!(0), dec!(1), Decimal::ZERO).is_err());
        assert!(sweep_range(dec!(2), dec!(1), dec!(0.1)).is_err());
        assert!(sweep_range(dec!(0), dec!(1), dec!(0.0001)).is_err());
    }

    #[test]
    fn test_sweep_range_stops_at_decimal_ceiling() {
        let vals = sweep_range(Decimal::ZERO, Decimal::MAX, Decimal::MAX).unwrap();
        assert_eq!(vals, vec![Decimal::ZERO, Decimal::MAX]);

        let near_top = Decimal::MAX - dec!(10);
        let vals = sweep_range(near_top, Decimal::MAX, dec!(7)).unwrap();
        assert_eq!(vals, vec![near_top, near_top + dec!(7), Decimal::MAX]);
    }

    #[test]
    fn test_purchase_price_sweep_rederives_loan() {
        let base = deal();
        let (_, loan) = compute(&base).unwrap();
        let resolved = base.with_resolved_loan_terms(&loan);
        let values = [dec!(1500000), dec!(2200000)];

        let from_base = sweep(&base, ParameterPath::PurchasePrice, &values).unwrap();
        let from_resolved = sweep(&resolved, ParameterPath::PurchasePrice, &values).unwrap();
        assert_eq!(from_base, from_resolved);
        // 75% LTV follows the price
        assert_eq!(from_resolved.points[1].metrics.down_payment, dec!(550000));
    }

    #[test]
    fn test_grid_composes_sweeps() {
        let grid = sweep_grid(
            &deal(),
            ParameterPath::VacancyRate,
            &[dec!(0), dec!(10)],
            ParameterPath::ExitCapRate,
            &[dec!(6), dec!(7), dec!(8)],
        )
        .unwrap();
        assert_eq!(grid.cells.len(), 2);
        assert!(grid.cells.iter().all(|row| row.len() == 3));
        assert!(grid.cells[0][0].noi > grid.cells[1][0].noi);
    }

    #[test]
    fn test_run_sensitivity_parses_axis() {
        let input = SensitivityInput {
            deal: deal(),
            axis: "vacancy_rate".into(),
            values: vec![dec!(0), dec!(10)],
        };
        let out = run_sensitivity(&input).unwrap();
        assert_eq!(out.result.axis, ParameterPath::VacancyRate);
        assert!(out.warnings.iter().any(|w| w.contains("not among")));

        let bad = SensitivityInput {
            axis: "nope".into(),
            ..input
        };
        assert!(run_sensitivity(&bad).is_err());
    }
}
