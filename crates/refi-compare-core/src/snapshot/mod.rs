//! Versioned snapshot of the comparison workspace.
//!
//! Storage hands back whatever it has; [`load_snapshot`] turns it into a
//! usable snapshot without ever failing. Fields that fail their shape check
//! fall back to their own default, and the legacy single-term shape
//! (`baseRate` / `extraRates` / shared `termYears` / shared `closingCosts`)
//! is migrated into per-scenario records.

mod load;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::comparison::{analyze_scenarios, ComparisonInput, ComparisonOutput};
use crate::scenarios::ScenarioSet;
use crate::types::{ComputationOutput, Money};
use crate::RefiCompareResult;

pub use load::{load_snapshot, load_snapshot_value};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Version written by [`save_snapshot`]. Version 1 is the legacy shape.
pub const SNAPSHOT_VERSION: u32 = 2;

pub const DEFAULT_HOME_PRICE: Decimal = dec!(550_000);
pub const DEFAULT_DOWN_PAYMENT_PERCENT: Decimal = dec!(20);
pub const DEFAULT_CURRENT_BALANCE: Decimal = dec!(320_000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanMode {
    #[default]
    Purchase,
    Refinance,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownPaymentType {
    #[default]
    Percent,
    Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageSnapshot {
    pub version: u32,
    pub mode: LoanMode,
    #[serde(with = "rust_decimal::serde::float")]
    pub home_price: Money,
    pub down_payment_type: DownPaymentType,
    /// Percent of the home price or an absolute amount, per
    /// `down_payment_type`.
    #[serde(with = "rust_decimal::serde::float")]
    pub down_payment_value: Decimal,
    /// Outstanding balance being refinanced.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_balance: Money,
    pub scenarios: ScenarioSet,
    pub selected_scenario_id: String,
}

impl Default for MortgageSnapshot {
    fn default() -> Self {
        let scenarios = ScenarioSet::default();
        let selected_scenario_id = scenarios.baseline().id.clone();
        Self {
            version: SNAPSHOT_VERSION,
            mode: LoanMode::default(),
            home_price: DEFAULT_HOME_PRICE,
            down_payment_type: DownPaymentType::default(),
            down_payment_value: DEFAULT_DOWN_PAYMENT_PERCENT,
            current_balance: DEFAULT_CURRENT_BALANCE,
            scenarios,
            selected_scenario_id,
        }
    }
}

impl MortgageSnapshot {
    pub fn down_payment_amount(&self) -> Money {
        match self.down_payment_type {
            DownPaymentType::Percent => {
                self.home_price.saturating_mul(self.down_payment_value) / dec!(100)
            }
            DownPaymentType::Amount => self.down_payment_value,
        }
    }

    /// Principal shared by every scenario: price less down payment when
    /// buying, the current balance when refinancing. Never negative.
    pub fn loan_amount(&self) -> Money {
        let amount = match self.mode {
            LoanMode::Purchase => self.home_price.saturating_sub(self.down_payment_amount()),
            LoanMode::Refinance => self.current_balance,
        };
        amount.max(Decimal::ZERO)
    }

    /// The selected scenario id, or the baseline's if it no longer exists.
    pub fn selected_scenario(&self) -> &str {
        self.scenarios.resolve_selection(&self.selected_scenario_id)
    }

    pub fn comparison_input(&self) -> ComparisonInput {
        ComparisonInput {
            loan_amount: self.loan_amount(),
            scenarios: self.scenarios.as_slice().to_vec(),
        }
    }

    pub fn analyze(&self) -> RefiCompareResult<ComputationOutput<ComparisonOutput>> {
        analyze_scenarios(&self.comparison_input())
    }
}

/// Serialize a snapshot at the current version.
pub fn save_snapshot(snapshot: &MortgageSnapshot) -> RefiCompareResult<String> {
    let mut current = snapshot.clone();
    current.version = SNAPSHOT_VERSION;
    current.selected_scenario_id = snapshot.selected_scenario().to_string();
    Ok(serde_json::to_string(&current)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::ScenarioInput;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_loan_amount() {
        // 550k less 20% down
        assert_eq!(MortgageSnapshot::default().loan_amount(), dec!(440_000));
    }

    #[test]
    fn test_amount_down_payment() {
        let snap = MortgageSnapshot {
            down_payment_type: DownPaymentType::Amount,
            down_payment_value: dec!(50_000),
            ..MortgageSnapshot::default()
        };
        assert_eq!(snap.loan_amount(), dec!(500_000));
    }

    #[test]
    fn test_down_payment_exceeding_price_floors_at_zero() {
        let snap = MortgageSnapshot {
            down_payment_type: DownPaymentType::Amount,
            down_payment_value: dec!(600_000),
            ..MortgageSnapshot::default()
        };
        assert_eq!(snap.loan_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_extreme_price_saturates() {
        let snap = load_snapshot(r#"{"homePrice": 7e28, "downPaymentValue": 20}"#);
        assert_eq!(snap.home_price, dec!(70_000_000_000_000_000_000_000_000_000));
        assert_eq!(snap.down_payment_amount(), Decimal::MAX / dec!(100));
        assert_eq!(
            snap.loan_amount(),
            snap.home_price - Decimal::MAX / dec!(100)
        );

        let snap = MortgageSnapshot {
            home_price: dec!(-70_000_000_000_000_000_000_000_000_000),
            down_payment_type: DownPaymentType::Amount,
            down_payment_value: dec!(70_000_000_000_000_000_000_000_000_000),
            ..MortgageSnapshot::default()
        };
        assert_eq!(snap.loan_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_refinance_uses_current_balance() {
        let snap = MortgageSnapshot {
            mode: LoanMode::Refinance,
            ..MortgageSnapshot::default()
        };
        assert_eq!(snap.loan_amount(), dec!(320_000));
    }

    #[test]
    fn test_save_writes_numbers_and_current_version() {
        let mut snap = MortgageSnapshot {
            version: 1,
            ..MortgageSnapshot::default()
        };
        snap.scenarios
            .push(ScenarioInput::new("alt", "Alt", dec!(5.5), 15).with_closing_costs(dec!(3000)))
            .unwrap();
        snap.selected_scenario_id = "removed".into();

        let raw = save_snapshot(&snap).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["mode"], "purchase");
        assert!(value["homePrice"].is_number());
        assert!(value["scenarios"][1]["closingCosts"].is_number());
        assert_eq!(value["scenarios"][1]["termYears"], 15);
        assert_eq!(value["selectedScenarioId"], "scenario-1");
    }

    #[test]
    fn test_analyze_uses_loan_amount() {
        let out = MortgageSnapshot::default().analyze().unwrap();
        assert_eq!(out.result.loan_amount, dec!(440_000));
        assert_eq!(out.result.scenarios[0].result.principal, dec!(440_000));
    }
}
