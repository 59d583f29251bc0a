use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::advisory::grading::{LetterGrade, OverallGrade};
use crate::error::DealAnalyzerError;
use crate::DealAnalyzerResult;

/// Largest weight accepted for any one metric.
const MAX_WEIGHT: Decimal = dec!(1000);

/// Inclusive lower bounds for each letter tier of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    pub a_plus: Decimal,
    pub a: Decimal,
    pub b: Decimal,
    pub c: Decimal,
}

impl GradeThresholds {
    pub const fn new(a_plus: Decimal, a: Decimal, b: Decimal, c: Decimal) -> Self {
        GradeThresholds { a_plus, a, b, c }
    }

    /// Highest tier whose lower bound `value` reaches; `D` otherwise.
    pub fn grade(&self, value: Decimal) -> LetterGrade {
        if value >= self.a_plus {
            LetterGrade::APlus
        } else if value >= self.a {
            LetterGrade::A
        } else if value >= self.b {
            LetterGrade::B
        } else if value >= self.c {
            LetterGrade::C
        } else {
            LetterGrade::D
        }
    }

    fn is_monotonic(&self) -> bool {
        self.a_plus >= self.a && self.a >= self.b && self.b >= self.c
    }
}

/// Weights of the per-metric grade points in the overall score. NOI per unit
/// is graded but carries no weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeWeights {
    pub cap_rate: Decimal,
    pub cash_on_cash: Decimal,
    pub irr: Decimal,
    pub dscr: Decimal,
    pub equity_multiple: Decimal,
}

impl Default for GradeWeights {
    fn default() -> Self {
        GradeWeights {
            cap_rate: dec!(0.25),
            cash_on_cash: dec!(0.25),
            irr: dec!(0.25),
            dscr: dec!(0.15),
            equity_multiple: dec!(0.10),
        }
    }
}

/// Weighted-score lower bounds for each overall grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallCutoffs {
    pub a_plus: Decimal,
    pub a: Decimal,
    pub b_plus: Decimal,
    pub b: Decimal,
    pub c: Decimal,
}

impl Default for OverallCutoffs {
    fn default() -> Self {
        OverallCutoffs {
            a_plus: dec!(4.0),
            a: dec!(3.5),
            b_plus: dec!(3.0),
            b: dec!(2.5),
            c: dec!(2.0),
        }
    }
}

impl OverallCutoffs {
    pub fn grade(&self, score: Decimal) -> OverallGrade {
        if score >= self.a_plus {
            OverallGrade::APlus
        } else if score >= self.a {
            OverallGrade::A
        } else if score >= self.b_plus {
            OverallGrade::BPlus
        } else if score >= self.b {
            OverallGrade::B
        } else if score >= self.c {
            OverallGrade::C
        } else {
            OverallGrade::D
        }
    }
}

/// Levels at which the narrative raises red flags or positive notes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NarrativeThresholds {
    /// Cap rate (%) below which the price looks rich
    pub min_cap_rate: Decimal,
    pub strong_cap_rate: Decimal,
    pub min_dscr: Decimal,
    pub strong_dscr: Decimal,
    /// Cash-on-cash (%) below typical investor hurdles
    pub min_cash_on_cash: Decimal,
    pub strong_cash_on_cash: Decimal,
    /// Vacancy (%) above which market or management risk is flagged
    pub max_vacancy_rate: Decimal,
}

impl Default for NarrativeThresholds {
    fn default() -> Self {
        NarrativeThresholds {
            min_cap_rate: dec!(5),
            strong_cap_rate: dec!(8),
            min_dscr: dec!(1.2),
            strong_dscr: dec!(1.5),
            min_cash_on_cash: dec!(6),
            strong_cash_on_cash: dec!(10),
            max_vacancy_rate: dec!(10),
        }
    }
}

/// Immutable grading rubric handed to the grader on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// Going-in cap rate, percent
    pub cap_rate: GradeThresholds,
    /// Cash-on-cash return, percent
    pub cash_on_cash: GradeThresholds,
    /// Debt service coverage, multiple
    pub dscr: GradeThresholds,
    /// Approximate annual return, percent
    pub irr: GradeThresholds,
    pub equity_multiple: GradeThresholds,
    /// NOI per unit per month, dollars
    pub noi_per_unit_month: GradeThresholds,
    pub weights: GradeWeights,
    pub overall: OverallCutoffs,
    pub narrative: NarrativeThresholds,
}

impl Default for GradingConfig {
    fn default() -> Self {
        GradingConfig {
            cap_rate: GradeThresholds::new(dec!(8.0), dec!(7.0), dec!(6.0), dec!(5.0)),
            cash_on_cash: GradeThresholds::new(dec!(12), dec!(10), dec!(8), dec!(6)),
            dscr: GradeThresholds::new(dec!(1.5), dec!(1.35), dec!(1.25), dec!(1.15)),
            irr: GradeThresholds::new(dec!(15), dec!(12), dec!(10), dec!(8)),
            equity_multiple: GradeThresholds::new(dec!(2.5), dec!(2.0), dec!(1.75), dec!(1.5)),
            noi_per_unit_month: GradeThresholds::new(dec!(150), dec!(125), dec!(100), dec!(75)),
            weights: GradeWeights::default(),
            overall: OverallCutoffs::default(),
            narrative: NarrativeThresholds::default(),
        }
    }
}

impl GradingConfig {
    /// Reject rubrics whose tiers overlap or whose weights are negative.
    pub fn validate(&self) -> DealAnalyzerResult<()> {
        let tables = [
            ("cap_rate", &self.cap_rate),
            ("cash_on_cash", &self.cash_on_cash),
            ("dscr", &self.dscr),
            ("irr", &self.irr),
            ("equity_multiple", &self.equity_multiple),
            ("noi_per_unit_month", &self.noi_per_unit_month),
        ];
        for (name, table) in tables {
            if !table.is_monotonic() {
                return Err(DealAnalyzerError::InvalidInput {
                    field: format!("grading.{name}"),
                    reason: "Tier thresholds must satisfy a_plus >= a >= b >= c".into(),
                });
            }
        }

        let w = &self.weights;
        for (name, weight) in [
            ("cap_rate", w.cap_rate),
            ("cash_on_cash", w.cash_on_cash),
            ("irr", w.irr),
            ("dscr", w.dscr),
            ("equity_multiple", w.equity_multiple),
        ] {
            if weight < Decimal::ZERO {
                return Err(DealAnalyzerError::InvalidInput {
                    field: format!("grading.weights.{name}"),
                    reason: "Weights cannot be negative".into(),
                });
            }
            if weight > MAX_WEIGHT {
                return Err(DealAnalyzerError::InvalidInput {
                    field: format!("grading.weights.{name}"),
                    reason: format!("Weights cannot exceed {MAX_WEIGHT}"),
                });
            }
        }

        let o = &self.overall;
        if !(o.a_plus >= o.a && o.a >= o.b_plus && o.b_plus >= o.b && o.b >= o.c) {
            return Err(DealAnalyzerError::invalid(
                "grading.overall",
                "Overall cutoffs must be non-increasing from a_plus to c",
            ));
        }

        Ok(())
    }
}
