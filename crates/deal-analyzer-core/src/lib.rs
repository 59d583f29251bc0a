pub mod deal;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

#[cfg(feature = "advisory")]
pub mod advisory;

#[cfg(feature = "analysis")]
pub mod analysis;

pub use deal::{compute, DealInput, FinancialMetrics, ResolvedLoanTerms};
pub use error::DealAnalyzerError;
pub use types::*;

/// Standard result type for all deal-analyzer operations
pub type DealAnalyzerResult<T> = Result<T, DealAnalyzerError>;
