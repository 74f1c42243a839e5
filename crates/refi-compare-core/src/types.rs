use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency amounts. Always Decimal, never f64.
pub type Money = Decimal;

/// Periodic rate as a fraction (0.005 = 0.5% per month).
pub type Rate = Decimal;

/// Rate as a borrower enters it (6.35 = 6.35% per year).
pub type Percent = Decimal;

/// Analysis result together with the inputs it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    /// The caller's input, echoed back as JSON.
    pub assumptions: serde_json::Value,
    /// Non-fatal notes: clamped inputs, loans that never amortize, and so on.
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

impl<T: Serialize> ComputationOutput<T> {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Wrap `result` in the output envelope, timing from `started`.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    started: Instant,
    result: T,
) -> ComputationOutput<T> {
    let assumptions = serde_json::to_value(assumptions).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "assumptions not serializable");
        serde_json::Value::Null
    });
    ComputationOutput {
        result,
        methodology: methodology.to_owned(),
        assumptions,
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_owned(),
            computation_time_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            precision: "rust_decimal_128bit".to_owned(),
        },
    }
}
