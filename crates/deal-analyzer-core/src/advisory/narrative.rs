use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::advisory::config::NarrativeThresholds;
use crate::advisory::grading::{MetricGrades, OverallGrade};
use crate::deal::input::DealInput;
use crate::deal::metrics::FinancialMetrics;
use crate::deal::policy::DSCR_NO_DEBT_SERVICE;

pub const NEUTRAL_NOTE: &str = "This deal shows moderate returns with standard risk profile";

/// Rule-based findings, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Findings {
    pub red_flags: Vec<String>,
    pub recommendations: Vec<String>,
    /// Strengths worth calling out; the neutral note when none fired
    pub positive_notes: Vec<String>,
}

/// Evaluate each narrative rule independently against the base case.
pub fn evaluate_findings(
    deal: &DealInput,
    metrics: &FinancialMetrics,
    limits: &NarrativeThresholds,
) -> Findings {
    let mut f = Findings::default();

    if metrics.going_in_cap_rate < limits.min_cap_rate {
        f.red_flags.push(format!(
            "Going-in cap rate is below {}%, indicating potentially overpriced property",
            limits.min_cap_rate
        ));
        f.recommendations
            .push("Consider negotiating a lower purchase price".into());
    } else if metrics.going_in_cap_rate > limits.strong_cap_rate {
        f.positive_notes
            .push("Strong going-in cap rate suggests good value".into());
    }

    if metrics.dscr < limits.min_dscr {
        f.red_flags.push(format!(
            "DSCR below {} indicates high leverage risk",
            limits.min_dscr
        ));
        f.recommendations
            .push("Consider reducing loan amount or improving NOI".into());
    } else if metrics.dscr > limits.strong_dscr {
        f.positive_notes
            .push("Strong debt service coverage provides good safety margin".into());
    }

    if metrics.cash_on_cash_return < limits.min_cash_on_cash {
        f.red_flags.push(format!(
            "Cash-on-cash return below {}% may not meet investor requirements",
            limits.min_cash_on_cash
        ));
        f.recommendations
            .push("Look for ways to increase NOI or reduce expenses".into());
    } else if metrics.cash_on_cash_return > limits.strong_cash_on_cash {
        f.positive_notes
            .push("Excellent cash-on-cash return indicates strong cash flow".into());
    }

    if deal.vacancy_rate > limits.max_vacancy_rate {
        f.red_flags
            .push("High vacancy rate may indicate market or property issues".into());
        f.recommendations
            .push("Investigate market conditions and property management".into());
    }

    if f.positive_notes.is_empty() {
        f.positive_notes.push(NEUTRAL_NOTE.into());
    }

    f
}

fn format_dscr(dscr: Decimal) -> String {
    if dscr == DSCR_NO_DEBT_SERVICE {
        "no debt service".to_string()
    } else {
        format!("{dscr:.2}x")
    }
}

/// Deterministic templated summary of the advisory.
pub fn render_summary(
    deal: &DealInput,
    metrics: &FinancialMetrics,
    grades: &MetricGrades,
    overall: OverallGrade,
    findings: &Findings,
) -> String {
    let recommendation = overall.recommendation();
    format!(
        "This {} property with {} units shows a {:.1}% cap rate and {:.1}% cash-on-cash return. \
         Overall grade: {} ({}). {} \
         Metric grades: cap rate {} ({:.2}%), cash-on-cash {} ({:.2}%), DSCR {} ({}), \
         IRR {} ({:.2}%), equity multiple {} ({:.2}x), NOI/unit/month {} (${:.0}). \
         {}.",
        deal.property_type,
        deal.number_of_units,
        metrics.going_in_cap_rate,
        metrics.cash_on_cash_return,
        overall,
        recommendation,
        recommendation.rationale(),
        grades.cap_rate.grade,
        grades.cap_rate.value,
        grades.cash_on_cash.grade,
        grades.cash_on_cash.value,
        grades.dscr.grade,
        format_dscr(grades.dscr.value),
        grades.irr.grade,
        grades.irr.value,
        grades.equity_multiple.grade,
        grades.equity_multiple.value,
        grades.noi_per_unit_month.grade,
        grades.noi_per_unit_month.value,
        findings.positive_notes.join(". "),
    )
}
