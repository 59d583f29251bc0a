use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::advisory::config::{GradeThresholds, GradeWeights, GradingConfig};
use crate::deal::input::DealInput;
use crate::deal::metrics::FinancialMetrics;
use crate::time_value::safe_divide;
use crate::types::Money;

/// Per-metric letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
}

impl LetterGrade {
    /// Grade points on the 4.3 scale.
    pub fn points(&self) -> Decimal {
        match self {
            LetterGrade::APlus => dec!(4.3),
            LetterGrade::A => dec!(4.0),
            LetterGrade::B => dec!(3.0),
            LetterGrade::C => dec!(2.0),
            LetterGrade::D => dec!(1.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deal-level grade derived from the weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    C,
    D,
}

impl OverallGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallGrade::APlus => "A+",
            OverallGrade::A => "A",
            OverallGrade::BPlus => "B+",
            OverallGrade::B => "B",
            OverallGrade::C => "C",
            OverallGrade::D => "D",
        }
    }

    pub fn recommendation(&self) -> Recommendation {
        match self {
            OverallGrade::APlus => Recommendation::StrongBuy,
            OverallGrade::A | OverallGrade::BPlus => Recommendation::Buy,
            OverallGrade::B => Recommendation::HoldConsider,
            OverallGrade::C | OverallGrade::D => Recommendation::Avoid,
        }
    }
}

impl fmt::Display for OverallGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Investment recommendation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD/CONSIDER")]
    HoldConsider,
    #[serde(rename = "AVOID")]
    Avoid,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG BUY",
            Recommendation::Buy => "BUY",
            Recommendation::HoldConsider => "HOLD/CONSIDER",
            Recommendation::Avoid => "AVOID",
        }
    }

    /// Fixed explanation attached to each tier in the summary.
    pub fn rationale(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => {
                "Returns and coverage are strong across the board; the deal merits priority pursuit."
            }
            Recommendation::Buy => {
                "Fundamentals are solid with acceptable risk; proceed with standard due diligence."
            }
            Recommendation::HoldConsider => {
                "Results are mixed; consider the deal only with improved terms or further diligence."
            }
            Recommendation::Avoid => {
                "Returns do not compensate for the risk at the current price and financing."
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A graded metric and the value it was graded on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricGrade {
    /// Only a DSCR can hold the no-debt-service sentinel, which serialises
    /// as `"unbounded"`
    #[serde(with = "crate::deal::policy::dscr_serde")]
    pub value: Decimal,
    pub grade: LetterGrade,
    /// Grade points of `grade`
    pub points: Decimal,
}

impl MetricGrade {
    pub fn new(value: Decimal, grade: LetterGrade) -> Self {
        MetricGrade {
            value,
            grade,
            points: grade.points(),
        }
    }
}

/// Letter grades for the six headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricGrades {
    pub cap_rate: MetricGrade,
    pub cash_on_cash: MetricGrade,
    pub dscr: MetricGrade,
    pub irr: MetricGrade,
    pub equity_multiple: MetricGrade,
    pub noi_per_unit_month: MetricGrade,
}

/// Monthly NOI per unit; zero when the deal has no units.
pub fn noi_per_unit_month(noi: Money, number_of_units: u32) -> Money {
    safe_divide(noi, Decimal::from(number_of_units), Decimal::ZERO) / dec!(12)
}

pub fn grade_metrics(
    deal: &DealInput,
    metrics: &FinancialMetrics,
    config: &GradingConfig,
) -> MetricGrades {
    let graded =
        |value: Decimal, table: &GradeThresholds| MetricGrade::new(value, table.grade(value));

    MetricGrades {
        cap_rate: graded(metrics.going_in_cap_rate, &config.cap_rate),
        cash_on_cash: graded(metrics.cash_on_cash_return, &config.cash_on_cash),
        dscr: graded(metrics.dscr, &config.dscr),
        irr: graded(metrics.irr, &config.irr),
        equity_multiple: graded(metrics.equity_multiple, &config.equity_multiple),
        noi_per_unit_month: graded(
            noi_per_unit_month(metrics.noi, deal.number_of_units),
            &config.noi_per_unit_month,
        ),
    }
}

/// Weighted grade-point score. NOI per unit is excluded.
pub fn weighted_score(grades: &MetricGrades, weights: &GradeWeights) -> Decimal {
    grades.cap_rate.points * weights.cap_rate
        + grades.cash_on_cash.points * weights.cash_on_cash
        + grades.irr.points * weights.irr
        + grades.dscr.points * weights.dscr
        + grades.equity_multiple.points * weights.equity_multiple
}
