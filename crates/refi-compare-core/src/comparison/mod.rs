//! Cross-scenario comparison: lowest-value flags, break-even against the
//! baseline (first) scenario and the running saving series.

pub mod break_even;
pub mod flags;

use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::LoanInputs;
use crate::error::RefiCompareError;
use crate::scenarios::{evaluate_scenarios, ScenarioInput, ScenarioResult, ScenarioSet};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::RefiCompareResult;

pub use break_even::{analyze_break_even, BreakEven, SavingPoint};
pub use flags::{lowest_value_flags, ScenarioFlags};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonView {
    pub baseline_id: String,
    /// One entry per scenario, in input order.
    pub flags: Vec<ScenarioFlags>,
    /// One entry per scenario, in input order; the baseline compares with
    /// itself.
    pub break_even: Vec<BreakEven>,
}

impl ComparisonView {
    pub fn flags_for(&self, id: &str) -> Option<&ScenarioFlags> {
        self.flags.iter().find(|f| f.id == id)
    }

    pub fn break_even_for(&self, id: &str) -> Option<&BreakEven> {
        self.break_even.iter().find(|b| b.scenario_id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    /// Principal shared by every scenario.
    pub loan_amount: Money,
    pub scenarios: Vec<ScenarioInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub loan_amount: Money,
    pub scenarios: Vec<ScenarioResult>,
    pub comparison: ComparisonView,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive flags and break-even views from evaluated scenarios. The first
/// result is the baseline.
pub fn compare_scenarios(results: &[ScenarioResult]) -> RefiCompareResult<ComparisonView> {
    let baseline = results.first().ok_or_else(|| {
        RefiCompareError::InsufficientData("Comparison requires at least one scenario".into())
    })?;

    Ok(ComparisonView {
        baseline_id: baseline.id.clone(),
        flags: lowest_value_flags(results),
        break_even: results
            .iter()
            .map(|r| analyze_break_even(baseline, r))
            .collect(),
    })
}

/// Evaluate and compare a scenario list against one loan amount.
pub fn analyze_scenarios(
    input: &ComparisonInput,
) -> RefiCompareResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let set = ScenarioSet::try_from(input.scenarios.clone())?;
    let (output, warnings) = run_comparison(input.loan_amount, &set)?;
    let out = with_metadata(
        "Fixed-rate amortization with baseline break-even comparison",
        input,
        warnings,
        start,
        output,
    );

    tracing::debug!(
        scenarios = set.len(),
        warnings = out.warnings.len(),
        elapsed_us = out.metadata.computation_time_us,
        "scenario comparison complete"
    );
    Ok(out)
}

/// Same as [`analyze_scenarios`] for an already validated set.
pub fn analyze_scenario_set(
    loan_amount: Money,
    set: &ScenarioSet,
) -> RefiCompareResult<ComputationOutput<ComparisonOutput>> {
    analyze_scenarios(&ComparisonInput {
        loan_amount,
        scenarios: set.as_slice().to_vec(),
    })
}

fn run_comparison(
    loan_amount: Money,
    set: &ScenarioSet,
) -> RefiCompareResult<(ComparisonOutput, Vec<String>)> {
    let results = evaluate_scenarios(loan_amount, set);
    let comparison = compare_scenarios(&results)?;
    let warnings = collect_warnings(loan_amount, set, &results, &comparison);

    Ok((
        ComparisonOutput {
            loan_amount,
            scenarios: results,
            comparison,
        },
        warnings,
    ))
}

fn collect_warnings(
    loan_amount: Money,
    set: &ScenarioSet,
    results: &[ScenarioResult],
    comparison: &ComparisonView,
) -> Vec<String> {
    let mut warnings = Vec::new();

    for (scenario, result) in set.iter().zip(results) {
        let inputs = LoanInputs::new(loan_amount, scenario.rate, scenario.term_years);
        for note in inputs.adjustments() {
            warnings.push(format!("{}: {}", scenario.label, note));
        }
        if result.result.shortfall_months > 0 {
            warnings.push(format!(
                "{}: payment does not cover accrued interest in {} of {} months; balance is not reduced",
                scenario.label, result.result.shortfall_months, result.result.total_months
            ));
        }
    }

    for (scenario, be) in set.iter().zip(&comparison.break_even).skip(1) {
        if be.cost_delta > Decimal::ZERO && be.break_even_month.is_none() {
            warnings.push(format!(
                "{}: additional closing costs of {} are not recovered within the comparison horizon",
                scenario.label, be.cost_delta
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn refi_input() -> ComparisonInput {
        ComparisonInput {
            loan_amount: dec!(300_000),
            scenarios: vec![
                ScenarioInput::new("current", "Current", dec!(7), 30),
                ScenarioInput::new("refi", "Refi", dec!(6), 30).with_closing_costs(dec!(4000)),
            ],
        }
    }

    #[test]
    fn test_empty_results_rejected() {
        assert!(matches!(
            compare_scenarios(&[]),
            Err(RefiCompareError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_analyze_envelope() {
        let out = analyze_scenarios(&refi_input()).unwrap();
        assert_eq!(out.result.scenarios.len(), 2);
        assert_eq!(out.result.comparison.baseline_id, "current");
        assert!(!out.has_warnings(), "{:?}", out.warnings);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");

        let refi = out.result.comparison.break_even_for("refi").unwrap();
        assert!(refi.break_even_month.is_some());
        assert!(out.result.comparison.flags_for("refi").unwrap().is_lowest_payment);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut input = refi_input();
        input.scenarios[1].id = "current".into();
        assert!(matches!(
            analyze_scenarios(&input),
            Err(RefiCompareError::DuplicateScenario(_))
        ));
    }

    #[test]
    fn test_empty_scenarios_rejected() {
        let input = ComparisonInput {
            loan_amount: dec!(100_000),
            scenarios: Vec::new(),
        };
        assert!(analyze_scenarios(&input).is_err());
    }

    #[test]
    fn test_warnings_for_clamped_and_unrecovered() {
        let input = ComparisonInput {
            loan_amount: dec!(300_000),
            scenarios: vec![
                ScenarioInput::new("a", "A", dec!(6), 30),
                ScenarioInput::new("b", "B", dec!(-1), 0).with_closing_costs(dec!(1_000_000)),
            ],
        };
        let out = analyze_scenarios(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("clamped to 0%")));
        assert!(out.warnings.iter().any(|w| w.contains("adjusted to 1 years")));
        // Zero-rate one-year loan cannot make up a million in closing costs.
        assert!(out.warnings.iter().any(|w| w.contains("not recovered")));
        assert_eq!(out.result.scenarios[1].result.monthly_rate, Decimal::ZERO);
    }
}
