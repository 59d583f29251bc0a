pub mod input;
pub mod metrics;
pub mod policy;

pub use input::{DealInput, ExitAssumptions, LoanTerms, OperatingExpenses, RentRollUnit};
pub use metrics::{calculate_metrics, compute, FinancialMetrics, MetricsOutput, ResolvedLoanTerms};
