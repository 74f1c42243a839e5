//! Scenario inputs, the keyed scenario collection and per-scenario
//! evaluation against a shared loan amount.

pub mod aggregate;
pub mod collection;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

pub use aggregate::{evaluate_scenario, evaluate_scenarios, ScenarioResult};
pub use collection::ScenarioSet;

/// Rate of the scenario seeded when nothing else is known.
pub const DEFAULT_RATE_PERCENT: Decimal = dec!(6.35);

pub const DEFAULT_TERM_YEARS: u32 = 30;

/// One candidate combination of rate, term and closing costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    pub id: String,
    pub label: String,
    /// Annual rate in percent (e.g., 6.35 = 6.35%).
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Percent,
    pub term_years: u32,
    /// Upfront costs; negative values are lender credits.
    #[serde(with = "rust_decimal::serde::float")]
    pub closing_costs: Money,
}

impl ScenarioInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>, rate: Percent, term_years: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            rate,
            term_years,
            closing_costs: Decimal::ZERO,
        }
    }

    pub fn with_closing_costs(mut self, closing_costs: Money) -> Self {
        self.closing_costs = closing_costs;
        self
    }

    /// Default scenario for position `index` (1-based): `scenario-N` /
    /// `Scenario N` at the default rate and term with no closing costs.
    pub fn placeholder(index: usize) -> Self {
        Self::new(
            scenario_id(index),
            scenario_label(index),
            DEFAULT_RATE_PERCENT,
            DEFAULT_TERM_YEARS,
        )
    }
}

impl Default for ScenarioInput {
    fn default() -> Self {
        Self::placeholder(1)
    }
}

pub(crate) fn scenario_id(index: usize) -> String {
    format!("scenario-{index}")
}

pub(crate) fn scenario_label(index: usize) -> String {
    format!("Scenario {index}")
}
