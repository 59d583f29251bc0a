pub mod config;
pub mod grading;
pub mod narrative;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::deal::input::DealInput;
use crate::deal::metrics::{compute, FinancialMetrics};
use crate::types::{with_metadata, ComputationOutput};
use crate::DealAnalyzerResult;

pub use config::{GradeThresholds, GradeWeights, GradingConfig, NarrativeThresholds, OverallCutoffs};
pub use grading::{LetterGrade, MetricGrade, MetricGrades, OverallGrade, Recommendation};
pub use narrative::Findings;

/// Graded investment assessment of one deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub metric_grades: MetricGrades,
    /// Weighted grade points, 1.0 to 4.3 under the default weights
    pub weighted_score: Decimal,
    pub overall_grade: OverallGrade,
    pub recommendation: Recommendation,
    pub summary: String,
    pub red_flags: Vec<String>,
    pub recommendations: Vec<String>,
    pub positive_notes: Vec<String>,
}

/// Grade a computed metrics snapshot against `config`.
///
/// Reads vacancy, property type and unit count from `deal`; everything else
/// comes from `metrics`.
pub fn grade(deal: &DealInput, metrics: &FinancialMetrics, config: &GradingConfig) -> Advisory {
    let metric_grades = grading::grade_metrics(deal, metrics, config);
    let weighted_score = grading::weighted_score(&metric_grades, &config.weights);
    let overall_grade = config.overall.grade(weighted_score);
    let findings = narrative::evaluate_findings(deal, metrics, &config.narrative);
    let summary =
        narrative::render_summary(deal, metrics, &metric_grades, overall_grade, &findings);

    Advisory {
        metric_grades,
        weighted_score,
        overall_grade,
        recommendation: overall_grade.recommendation(),
        summary,
        red_flags: findings.red_flags,
        recommendations: findings.recommendations,
        positive_notes: findings.positive_notes,
    }
}

/// Serialisable grading request: a deal plus an optional rubric override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingInput {
    pub deal: DealInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GradingConfig>,
}

/// Compute the deal's metrics and grade them.
pub fn run_grading(input: &GradingInput) -> DealAnalyzerResult<ComputationOutput<Advisory>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let config = input.config.clone().unwrap_or_default();
    config.validate()?;
    if input.deal.number_of_units == 0 {
        warnings.push("Unit count is zero; NOI per unit graded on 0".into());
    }

    let (metrics, _) = compute(&input.deal)?;
    let advisory = grade(&input.deal, &metrics, &config);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Weighted Letter-Grade Advisory",
        &config,
        warnings,
        elapsed,
        advisory,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::input::{ExitAssumptions, LoanTerms, OperatingExpenses, RentRollUnit};
    use rust_decimal_macros::dec;

    /// 20-unit garden apartment bought at a 9% cap with light leverage.
    fn strong_deal() -> DealInput {
        DealInput {
            property_type: "multifamily".into(),
            purchase_price: dec!(2000000),
            number_of_units: 20,
            rent_roll: (0..20)
                .map(|i| RentRollUnit {
                    unit_number: format!("{}", 100 + i),
                    unit_type: Some("2br".into()),
                    square_footage: Some(dec!(900)),
                    monthly_rent: dec!(1500),
                    occupied: true,
                })
                .collect(),
            vacancy_rate: Decimal::ZERO,
            operating_expenses: OperatingExpenses {
                property_tax: dec!(90000),
                insurance: dec!(30000),
                ..Default::default()
            },
            capex_budget: Decimal::ZERO,
            loan_terms: LoanTerms {
                ltv: dec!(50),
                interest_rate: dec!(5),
                amortization_period_years: 30,
                ..Default::default()
            },
            exit_assumptions: ExitAssumptions {
                hold_period_years: dec!(5),
                exit_cap_rate: dec!(6),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_strong_deal_grades_highly() {
        let deal = strong_deal();
        let (m, _) = compute(&deal).unwrap();
        // 20 * 1,500 * 12 = 360,000 - 120,000 = 240,000 NOI; 12% cap
        assert_eq!(m.noi, dec!(240000));
        let advisory = grade(&deal, &m, &GradingConfig::default());
        assert_eq!(advisory.metric_grades.cap_rate.grade, LetterGrade::APlus);
        assert_eq!(advisory.metric_grades.noi_per_unit_month.grade, LetterGrade::APlus);
        assert_eq!(advisory.metric_grades.noi_per_unit_month.value, dec!(1000));
        assert!(advisory.red_flags.is_empty());
        assert_eq!(advisory.overall_grade, OverallGrade::APlus);
        assert_eq!(advisory.recommendation, Recommendation::StrongBuy);
        assert!(advisory.summary.starts_with("This multifamily property with 20 units"));
        assert!(advisory.summary.contains("Overall grade: A+ (STRONG BUY)"));
    }

    #[test]
    fn test_grade_is_deterministic() {
        let deal = strong_deal();
        let (m, _) = compute(&deal).unwrap();
        let cfg = GradingConfig::default();
        assert_eq!(grade(&deal, &m, &cfg), grade(&deal, &m, &cfg));
    }

    #[test]
    fn test_custom_rubric_changes_outcome() {
        let deal = strong_deal();
        let (m, _) = compute(&deal).unwrap();
        let mut strict = GradingConfig::default();
        strict.cap_rate = GradeThresholds::new(dec!(20), dec!(18), dec!(16), dec!(14));
        let advisory = grade(&deal, &m, &strict);
        assert_eq!(advisory.metric_grades.cap_rate.grade, LetterGrade::D);
    }

    #[test]
    fn test_run_grading_rejects_invalid_rubric() {
        let mut cfg = GradingConfig::default();
        cfg.overall.c = dec!(5);
        let input = GradingInput {
            deal: strong_deal(),
            config: Some(cfg),
        };
        assert!(run_grading(&input).is_err());
    }

    #[test]
    fn test_run_grading_zero_units_warns() {
        let mut deal = strong_deal();
        deal.number_of_units = 0;
        let out = run_grading(&GradingInput { deal, config: None }).unwrap();
        assert_eq!(out.result.metric_grades.noi_per_unit_month.value, Decimal::ZERO);
        assert!(!out.warnings.is_empty());
    }
}
