use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::deal::metrics::ResolvedLoanTerms;
use crate::deal::policy::{
    MAX_AMORTIZATION_YEARS, MAX_HOLD_PERIOD_YEARS, MAX_INPUT_AMOUNT, MAX_INPUT_PERCENT,
};
use crate::error::DealAnalyzerError;
use crate::types::{Money, Percent, Years};
use crate::DealAnalyzerResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single leasable unit on the rent roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentRollUnit {
    /// Unit or suite identifier
    #[serde(default)]
    pub unit_number: String,
    /// Free-text unit classifier (e.g. "2br", "office")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_footage: Option<Decimal>,
    /// Contract rent per month; counts toward gross income whether or not
    /// the unit is currently occupied
    pub monthly_rent: Money,
    #[serde(default = "default_occupied")]
    pub occupied: bool,
}

fn default_occupied() -> bool {
    true
}

/// Annual operating expenses by category. All default to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingExpenses {
    pub property_tax: Money,
    pub insurance: Money,
    pub utilities: Money,
    pub maintenance: Money,
    pub property_management: Money,
    pub other: Money,
}

impl OperatingExpenses {
    /// Named categories, in reporting order.
    pub fn categories(&self) -> [(&'static str, Money); 6] {
        [
            ("property_tax", self.property_tax),
            ("insurance", self.insurance),
            ("utilities", self.utilities),
            ("maintenance", self.maintenance),
            ("property_management", self.property_management),
            ("other", self.other),
        ]
    }

    pub fn total(&self) -> Money {
        self.categories().iter().map(|(_, v)| *v).sum()
    }

    /// Every category multiplied by `factor`.
    pub fn scaled(&self, factor: Decimal) -> Self {
        OperatingExpenses {
            property_tax: self.property_tax * factor,
            insurance: self.insurance * factor,
            utilities: self.utilities * factor,
            maintenance: self.maintenance * factor,
            property_management: self.property_management * factor,
            other: self.other * factor,
        }
    }
}

/// Acquisition financing terms.
///
/// `loan_amount` and `monthly_payment` are optional overrides: leave them at
/// zero and the engine derives them from LTV and the amortisation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanTerms {
    /// Loan-to-value, percent of purchase price
    pub ltv: Percent,
    /// Nominal annual interest rate, percent
    pub interest_rate: Percent,
    pub amortization_period_years: u32,
    pub is_interest_only: bool,
    /// Length of the interest-only period; informational, the engine treats
    /// an interest-only loan as interest-only for the whole analysis
    pub interest_only_months: u32,
    pub loan_amount: Money,
    pub monthly_payment: Money,
}

impl Default for LoanTerms {
    fn default() -> Self {
        LoanTerms {
            ltv: dec!(75),
            interest_rate: dec!(5.5),
            amortization_period_years: 30,
            is_interest_only: false,
            interest_only_months: 0,
            loan_amount: Decimal::ZERO,
            monthly_payment: Decimal::ZERO,
        }
    }
}

/// Disposition assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitAssumptions {
    pub hold_period_years: Years,
    /// Cap rate applied to NOI at sale, percent
    pub exit_cap_rate: Percent,
    /// Reported only; exit value is NOI capitalised at the exit cap rate
    pub annual_appreciation: Percent,
    /// Reported only
    pub market_cap_rate: Percent,
}

impl Default for ExitAssumptions {
    fn default() -> Self {
        ExitAssumptions {
            hold_period_years: dec!(5),
            exit_cap_rate: dec!(6.5),
            annual_appreciation: dec!(3),
            market_cap_rate: dec!(6),
        }
    }
}

/// Everything the engine needs to underwrite one acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealInput {
    /// Free-text classifier ("multifamily", "office", ...), used for reporting
    pub property_type: String,
    pub purchase_price: Money,
    #[serde(default)]
    pub number_of_units: u32,
    #[serde(default)]
    pub rent_roll: Vec<RentRollUnit>,
    /// Vacancy and collection loss, percent of gross rent
    #[serde(default)]
    pub vacancy_rate: Percent,
    #[serde(default)]
    pub operating_expenses: OperatingExpenses,
    /// Planned capital expenditure; carried for reporting
    #[serde(default)]
    pub capex_budget: Money,
    #[serde(default)]
    pub loan_terms: LoanTerms,
    #[serde(default)]
    pub exit_assumptions: ExitAssumptions,
}

impl DealInput {
    /// Copy of this deal with the engine-resolved loan fields filled in.
    pub fn with_resolved_loan_terms(&self, resolved: &ResolvedLoanTerms) -> DealInput {
        let mut deal = self.clone();
        deal.loan_terms.loan_amount = resolved.loan_amount;
        deal.loan_terms.monthly_payment = resolved.monthly_payment;
        deal
    }

    /// Sum of contract monthly rent across the rent roll.
    pub fn monthly_rent_roll(&self) -> Money {
        self.rent_roll.iter().map(|u| u.monthly_rent).sum()
    }

    /// Reject inputs that would make a ratio meaningless.
    ///
    /// Degenerate-but-valid structures (no debt, no units, all-debt
    /// financing) pass; the engine resolves those with safe division.
    /// Amounts above `MAX_INPUT_AMOUNT` and percentages beyond
    /// `MAX_INPUT_PERCENT` are rejected so the engine's arithmetic stays in
    /// range.
    pub fn validate(&self) -> DealAnalyzerResult<()> {
        if self.purchase_price <= Decimal::ZERO {
            return Err(DealAnalyzerError::invalid(
                "purchase_price",
                "Purchase price must be positive",
            ));
        }
        check_amount_cap("purchase_price", self.purchase_price)?;

        for (i, unit) in self.rent_roll.iter().enumerate() {
            let field = format!("rent_roll[{i}].monthly_rent");
            if unit.monthly_rent < Decimal::ZERO {
                return Err(DealAnalyzerError::invalid(
                    &field,
                    "Monthly rent cannot be negative",
                ));
            }
            check_amount_cap(&field, unit.monthly_rent)?;
        }

        for (name, amount) in self.operating_expenses.categories() {
            let field = format!("operating_expenses.{name}");
            if amount < Decimal::ZERO {
                return Err(DealAnalyzerError::invalid(
                    &field,
                    "Operating expenses cannot be negative",
                ));
            }
            check_amount_cap(&field, amount)?;
        }

        // Out-of-range vacancy only warns; an absurd magnitude is an error
        check_percent_cap("vacancy_rate", self.vacancy_rate)?;

        let loan = &self.loan_terms;
        if loan.ltv < Decimal::ZERO {
            return Err(DealAnalyzerError::invalid(
                "loan_terms.ltv",
                "LTV cannot be negative",
            ));
        }
        check_percent_cap("loan_terms.ltv", loan.ltv)?;
        if loan.interest_rate < Decimal::ZERO {
            return Err(DealAnalyzerError::invalid(
                "loan_terms.interest_rate",
                "Interest rate cannot be negative",
            ));
        }
        check_percent_cap("loan_terms.interest_rate", loan.interest_rate)?;
        if loan.amortization_period_years > MAX_AMORTIZATION_YEARS {
            return Err(DealAnalyzerError::invalid(
                "loan_terms.amortization_period_years",
                format!("Amortization period cannot exceed {MAX_AMORTIZATION_YEARS} years"),
            ));
        }
        if loan.loan_amount < Decimal::ZERO {
            return Err(DealAnalyzerError::invalid(
                "loan_terms.loan_amount",
                "Loan amount cannot be negative",
            ));
        }
        check_amount_cap("loan_terms.loan_amount", loan.loan_amount)?;
        if loan.monthly_payment < Decimal::ZERO {
            return Err(DealAnalyzerError::invalid(
                "loan_terms.monthly_payment",
                "Monthly payment cannot be negative",
            ));
        }
        check_amount_cap("loan_terms.monthly_payment", loan.monthly_payment)?;

        check_percent_cap(
            "exit_assumptions.exit_cap_rate",
            self.exit_assumptions.exit_cap_rate,
        )?;

        let hold = self.exit_assumptions.hold_period_years;
        if hold < Decimal::ZERO {
            return Err(DealAnalyzerError::invalid(
                "exit_assumptions.hold_period_years",
                "Hold period cannot be negative",
            ));
        }
        if hold > MAX_HOLD_PERIOD_YEARS {
            return Err(DealAnalyzerError::invalid(
                "exit_assumptions.hold_period_years",
                format!("Hold period cannot exceed {MAX_HOLD_PERIOD_YEARS} years"),
            ));
        }

        Ok(())
    }
}

fn check_amount_cap(field: &str, amount: Money) -> DealAnalyzerResult<()> {
    if amount > MAX_INPUT_AMOUNT {
        return Err(DealAnalyzerError::invalid(
            field,
            format!("Amount cannot exceed {MAX_INPUT_AMOUNT}"),
        ));
    }
    Ok(())
}

pub(crate) fn check_percent_cap(field: &str, pct: Percent) -> DealAnalyzerResult<()> {
    if pct.abs() > MAX_INPUT_PERCENT {
        return Err(DealAnalyzerError::invalid(
            field,
            format!("Magnitude cannot exceed {MAX_INPUT_PERCENT}%"),
        ));
    }
    Ok(())
}
