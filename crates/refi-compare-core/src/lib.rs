pub mod amortization;
pub mod comparison;
pub mod error;
pub mod scenarios;
pub mod types;

#[cfg(feature = "snapshot")]
pub mod snapshot;

#[cfg(feature = "views")]
pub mod views;

pub use amortization::{compute_schedule, AmortizationPoint, LoanInputs, MortgageResult};
pub use comparison::{analyze_scenarios, compare_scenarios, ComparisonInput, ComparisonView};
pub use error::RefiCompareError;
pub use scenarios::{evaluate_scenarios, ScenarioInput, ScenarioResult, ScenarioSet};
pub use types::*;

/// Standard result type for all refi-compare operations
pub type RefiCompareResult<T> = Result<T, RefiCompareError>;
