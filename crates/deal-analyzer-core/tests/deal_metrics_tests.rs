use deal_analyzer_core::deal::input::{
    DealInput, ExitAssumptions, LoanTerms, OperatingExpenses, RentRollUnit,
};
use deal_analyzer_core::deal::metrics::{calculate_metrics, compute};
use deal_analyzer_core::deal::policy::DSCR_NO_DEBT_SERVICE;
use deal_analyzer_core::DealAnalyzerError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn suite(number: &str, rent: Decimal) -> RentRollUnit {
    RentRollUnit {
        unit_number: number.into(),
        unit_type: Some("office".into()),
        square_footage: None,
        monthly_rent: rent,
        occupied: true,
    }
}

/// $1M two-suite office building, 75% LTV at 5.5% over 30 years, 7% exit.
fn office_building() -> DealInput {
    DealInput {
        property_type: "office".into(),
        purchase_price: dec!(1000000),
        number_of_units: 2,
        rent_roll: vec![suite("Suite 100", dec!(5000)), suite("Suite 200", dec!(3000))],
        vacancy_rate: dec!(5),
        operating_expenses: OperatingExpenses {
            property_tax: dec!(15000),
            insurance: dec!(8000),
            utilities: dec!(12000),
            maintenance: dec!(10000),
            property_management: dec!(18000),
            other: dec!(5000),
        },
        capex_budget: dec!(25000),
        loan_terms: LoanTerms {
            ltv: dec!(75),
            interest_rate: dec!(5.5),
            amortization_period_years: 30,
            is_interest_only: false,
            interest_only_months: 0,
            loan_amount: Decimal::ZERO,
            monthly_payment: Decimal::ZERO,
        },
        exit_assumptions: ExitAssumptions {
            hold_period_years: dec!(5),
            exit_cap_rate: dec!(7),
            annual_appreciation: dec!(3),
            market_cap_rate: dec!(6),
        },
    }
}

// ===========================================================================
// End-to-end office scenario
// ===========================================================================

#[test]
fn test_office_building_headline_metrics() {
    let (m, loan) = compute(&office_building()).unwrap();

    // NOI = 8,000 * 12 * 0.95 - 68,000 = 23,200
    assert_eq!(m.noi, dec!(23200));
    assert_eq!(m.going_in_cap_rate, dec!(2.32));

    // 750k at 5.5%/30y ≈ 4,258.42 a month
    assert_eq!(loan.loan_amount, dec!(750000));
    assert!((loan.monthly_payment - dec!(4258.42)).abs() < dec!(0.01));

    // DSCR well under 1: NOI covers less than half of debt service
    assert!(m.dscr > dec!(0.45) && m.dscr < dec!(0.46), "dscr {}", m.dscr);
    assert!(m.annual_cash_flow < Decimal::ZERO);
    assert!(m.cash_on_cash_return < Decimal::ZERO);
}

#[test]
fn test_office_building_is_finite_everywhere() {
    let (m, _) = compute(&office_building()).unwrap();
    for v in [
        m.noi,
        m.going_in_cap_rate,
        m.reversion_cap_rate,
        m.cash_on_cash_return,
        m.stabilized_cash_on_cash,
        m.irr,
        m.equity_multiple,
        m.break_even_occupancy,
        m.dscr,
        m.exit_sale_price,
        m.total_return,
        m.annual_cash_flow,
        m.exit_value,
    ] {
        assert!(v != Decimal::MAX && v != Decimal::MIN);
    }
}

// ===========================================================================
// Loan derivation
// ===========================================================================

#[test]
fn test_amortising_payment_closed_form_6pct() {
    let mut deal = office_building();
    deal.loan_terms.interest_rate = dec!(6);
    deal.loan_terms.loan_amount = dec!(750000);
    let (_, loan) = compute(&deal).unwrap();
    // 750,000 * 0.005 * 1.005^360 / (1.005^360 - 1)
    assert!(
        (loan.monthly_payment - dec!(4496.63)).abs() < dec!(0.01),
        "payment {}",
        loan.monthly_payment
    );
}

#[test]
fn test_zero_rate_payment_exact() {
    let mut deal = office_building();
    deal.loan_terms.interest_rate = Decimal::ZERO;
    deal.loan_terms.amortization_period_years = 10;
    deal.loan_terms.loan_amount = dec!(120000);
    let (_, loan) = compute(&deal).unwrap();
    assert_eq!(loan.monthly_payment, dec!(1000));
}

#[test]
fn test_zero_rate_zero_term_payment_is_zero() {
    let mut deal = office_building();
    deal.loan_terms.interest_rate = Decimal::ZERO;
    deal.loan_terms.amortization_period_years = 0;
    let (m, loan) = compute(&deal).unwrap();
    assert_eq!(loan.monthly_payment, Decimal::ZERO);
    assert_eq!(m.dscr, DSCR_NO_DEBT_SERVICE);
}

#[test]
fn test_feeding_back_resolved_terms_is_idempotent() {
    let deal = office_building();
    let (first, loan) = compute(&deal).unwrap();
    let (second, _) = compute(&deal.with_resolved_loan_terms(&loan)).unwrap();
    assert_eq!(first, second);
}

// ===========================================================================
// Fallback policies
// ===========================================================================

#[test]
fn test_unit_count_fallback_noi() {
    let deal = DealInput {
        property_type: "multifamily".into(),
        purchase_price: dec!(1200000),
        number_of_units: 10,
        rent_roll: Vec::new(),
        vacancy_rate: Decimal::ZERO,
        operating_expenses: OperatingExpenses::default(),
        capex_budget: Decimal::ZERO,
        loan_terms: LoanTerms::default(),
        exit_assumptions: ExitAssumptions::default(),
    };
    let (m, _) = compute(&deal).unwrap();
    // 10 * 1,500 * 12 * 0.5
    assert_eq!(m.noi, dec!(90000));
}

#[test]
fn test_unlevered_deal_reports_sentinel_dscr() {
    let mut deal = office_building();
    deal.loan_terms.ltv = Decimal::ZERO;
    let out = calculate_metrics(&deal).unwrap();
    assert_eq!(out.result.metrics.dscr, DSCR_NO_DEBT_SERVICE);
    assert_eq!(out.result.metrics.down_payment, dec!(1000000));
    assert!(out.warnings.iter().any(|w| w.contains("DSCR")));
}

// ===========================================================================
// Validation
// ===========================================================================

fn assert_rejects(mutate: impl FnOnce(&mut DealInput), expected: &str) {
    let mut deal = office_building();
    mutate(&mut deal);
    match compute(&deal) {
        Err(DealAnalyzerError::InvalidInput { field, .. }) => assert_eq!(field, expected),
        other => panic!("expected InvalidInput for {expected}, got {other:?}"),
    }
}

#[test]
fn test_validation_names_offending_field() {
    assert_rejects(|d| d.purchase_price = Decimal::ZERO, "purchase_price");
    assert_rejects(
        |d| d.rent_roll[1].monthly_rent = dec!(-1),
        "rent_roll[1].monthly_rent",
    );
    assert_rejects(
        |d| d.operating_expenses.utilities = dec!(-5),
        "operating_expenses.utilities",
    );
    assert_rejects(
        |d| d.exit_assumptions.hold_period_years = dec!(-2),
        "exit_assumptions.hold_period_years",
    );
    assert_rejects(
        |d| d.loan_terms.interest_rate = dec!(-1),
        "loan_terms.interest_rate",
    );
    assert_rejects(|d| d.loan_terms.ltv = dec!(-10), "loan_terms.ltv");
}

#[test]
fn test_extreme_magnitudes_are_rejected_not_overflowed() {
    let ten_pow = |exp: u32| Decimal::from_i128_with_scale(10i128.pow(exp), 0);
    assert_rejects(|d| d.vacancy_rate = ten_pow(25), "vacancy_rate");
    assert_rejects(|d| d.loan_terms.ltv = ten_pow(24), "loan_terms.ltv");
    assert_rejects(|d| d.purchase_price = Decimal::MAX, "purchase_price");
    assert_rejects(
        |d| d.rent_roll[0].monthly_rent = Decimal::MAX,
        "rent_roll[0].monthly_rent",
    );
}

#[test]
fn test_sliver_denominators_are_rejected_not_overflowed() {
    // 23,200 of NOI over a 1e-27 price
    assert_rejects(|d| d.purchase_price = Decimal::new(1, 27), "purchase_price");
    // ... and capitalised at 1e-25 percent
    assert_rejects(
        |d| d.exit_assumptions.exit_cap_rate = Decimal::new(1, 25),
        "exit_assumptions.exit_cap_rate",
    );
}

#[test]
fn test_large_but_capped_deal_computes() {
    let mut deal = office_building();
    deal.vacancy_rate = dec!(-1000);
    deal.loan_terms.ltv = dec!(1000);
    deal.loan_terms.interest_rate = dec!(1000);
    let out = calculate_metrics(&deal).unwrap();
    assert!(out.warnings.iter().any(|w| w.contains("outside 0-100%")));
    assert!(out.result.metrics.down_payment < Decimal::ZERO);
}

#[test]
fn test_deal_from_json() {
    let json = r#"{
        "property_type": "retail",
        "purchase_price": 2500000,
        "number_of_units": 5,
        "rent_roll": [
            {"unit_number": "A", "monthly_rent": 9000},
            {"unit_number": "B", "monthly_rent": 7000, "occupied": false}
        ],
        "vacancy_rate": 8,
        "operating_expenses": {"property_tax": 40000, "insurance": 12000},
        "loan_terms": {"ltv": 65, "interest_rate": 6.25, "amortization_period_years": 25},
        "exit_assumptions": {"hold_period_years": 7, "exit_cap_rate": 7.5}
    }"#;
    let deal: DealInput = serde_json::from_str(json).unwrap();
    let (m, loan) = compute(&deal).unwrap();
    assert_eq!(m.annual_gross_income, dec!(192000));
    assert_eq!(loan.loan_amount, dec!(1625000));
    assert_eq!(m.projected_cash_flows.len(), 7);
}
