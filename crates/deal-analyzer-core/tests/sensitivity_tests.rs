use deal_analyzer_core::deal::input::{DealInput, ExitAssumptions, LoanTerms, OperatingExpenses};
use deal_analyzer_core::deal::metrics::compute;
use deal_analyzer_core::sensitivity::{
    exit_cap_rate_table, run_scenario, sweep, sweep_range, ParameterPath, ScenarioAdjustments,
    ScenarioInput, SensitivityInput,
};
use deal_analyzer_core::DealAnalyzerError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn apartment() -> DealInput {
    DealInput {
        property_type: "multifamily".into(),
        purchase_price: dec!(3000000),
        number_of_units: 24,
        rent_roll: Vec::new(),
        vacancy_rate: dec!(5),
        operating_expenses: OperatingExpenses {
            property_tax: dec!(45000),
            insurance: dec!(18000),
            utilities: dec!(24000),
            maintenance: dec!(30000),
            property_management: dec!(25000),
            other: dec!(8000),
        },
        capex_budget: Decimal::ZERO,
        loan_terms: LoanTerms::default(),
        exit_assumptions: ExitAssumptions::default(),
    }
}

#[test]
fn test_exit_cap_sweep_three_points_in_order() {
    let deal = apartment();
    let result = sweep(&deal, ParameterPath::ExitCapRate, &[dec!(5), dec!(6), dec!(7)]).unwrap();

    assert_eq!(result.points.len(), 3);
    for (point, rate) in result.points.iter().zip([dec!(5), dec!(6), dec!(7)]) {
        assert_eq!(point.value, rate);
        let mut clone = deal.clone();
        clone.exit_assumptions.exit_cap_rate = rate;
        let (expected, _) = compute(&clone).unwrap();
        assert_eq!(point.metrics, expected);
    }
}

#[test]
fn test_purchase_price_sweep_moves_cap_rate_inversely() {
    let values = sweep_range(dec!(2500000), dec!(3500000), dec!(250000)).unwrap();
    let result = sweep(&apartment(), ParameterPath::PurchasePrice, &values).unwrap();
    assert_eq!(result.points.len(), 5);
    let caps: Vec<Decimal> = result
        .points
        .iter()
        .map(|p| p.metrics.going_in_cap_rate)
        .collect();
    assert!(caps.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_price_sweep_on_resolved_deal_agrees_with_price_shock() {
    let deal = apartment();
    let (_, loan) = compute(&deal).unwrap();
    let resolved = deal.with_resolved_loan_terms(&loan);

    let original = sweep(&deal, ParameterPath::PurchasePrice, &[dec!(3300000)]).unwrap();
    let fed_back = sweep(&resolved, ParameterPath::PurchasePrice, &[dec!(3300000)]).unwrap();
    let shocked = run_scenario(&ScenarioInput {
        deal: resolved,
        adjustments: ScenarioAdjustments {
            purchase_price_pct: dec!(10),
            ..Default::default()
        },
    })
    .unwrap();

    assert_eq!(original.points[0].metrics, fed_back.points[0].metrics);
    let shocked_ads = shocked.result.adjusted_metrics.annual_debt_service;
    assert!((fed_back.points[0].metrics.annual_debt_service - shocked_ads).abs() < dec!(0.000001));
    assert!(
        fed_back.points[0].metrics.annual_debt_service
            > shocked.result.base_metrics.annual_debt_service
    );
}

#[test]
fn test_range_reaching_decimal_ceiling_does_not_overflow() {
    let values = sweep_range(Decimal::ZERO, Decimal::MAX, Decimal::MAX).unwrap();
    assert_eq!(values, vec![Decimal::ZERO, Decimal::MAX]);
    let err = sweep(&apartment(), ParameterPath::PurchasePrice, &values).unwrap_err();
    assert!(matches!(err, DealAnalyzerError::InvalidInput { .. }));
}

#[test]
fn test_vacancy_sweep_lowers_noi() {
    let result = sweep(
        &apartment(),
        ParameterPath::VacancyRate,
        &[dec!(0), dec!(5), dec!(10), dec!(20)],
    )
    .unwrap();
    let nois: Vec<Decimal> = result.points.iter().map(|p| p.metrics.noi).collect();
    assert!(nois.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_hold_period_sweep_changes_projection_length() {
    let result = sweep(
        &apartment(),
        ParameterPath::HoldPeriod,
        &[dec!(3), dec!(10)],
    )
    .unwrap();
    assert_eq!(result.points[0].metrics.projected_cash_flows.len(), 3);
    assert_eq!(result.points[1].metrics.projected_cash_flows.len(), 10);
}

#[test]
fn test_unknown_axis_from_request() {
    let err = "parkingIncome".parse::<ParameterPath>().unwrap_err();
    assert!(matches!(err, DealAnalyzerError::UnknownSensitivityAxis(_)));
}

#[test]
fn test_request_round_trips_through_json() {
    let request = SensitivityInput {
        deal: apartment(),
        axis: "interestRate".into(),
        values: vec![dec!(4), dec!(5), dec!(6)],
    };
    let json = serde_json::to_string(&request).unwrap();
    let back: SensitivityInput = serde_json::from_str(&json).unwrap();
    let out = deal_analyzer_core::sensitivity::run_sensitivity(&back).unwrap();
    assert_eq!(out.result.points.len(), 3);
    assert_eq!(out.result.axis, ParameterPath::InterestRate);
}

#[test]
fn test_exit_cap_table_brackets_base() {
    let table = exit_cap_rate_table(&apartment()).unwrap();
    assert_eq!(
        table.exit_cap_rates,
        vec![dec!(5.5), dec!(6.0), dec!(6.5), dec!(7.0), dec!(7.5)]
    );
    assert!(table.sale_prices.windows(2).all(|w| w[0] > w[1]));
}
