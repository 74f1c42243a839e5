use serde::{Deserialize, Serialize};

use super::ScenarioInput;
use crate::amortization::{compute_schedule, LoanInputs, MortgageResult};
use crate::types::{Money, Percent};

/// A scenario together with its amortization result and all-in cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub id: String,
    pub label: String,
    pub rate: Percent,
    pub term_years: u32,
    pub closing_costs: Money,
    pub result: MortgageResult,
    /// `result.total_paid + closing_costs`.
    pub total_cost: Money,
}

impl ScenarioResult {
    pub fn monthly_payment(&self) -> Money {
        self.result.monthly_payment
    }

    pub fn total_interest(&self) -> Money {
        self.result.total_interest
    }
}

/// Loan inputs used for `scenario` against the shared loan amount.
pub fn scenario_loan_inputs(loan_amount: Money, scenario: &ScenarioInput) -> LoanInputs {
    LoanInputs::new(loan_amount, scenario.rate, scenario.term_years)
}

pub fn evaluate_scenario(loan_amount: Money, scenario: &ScenarioInput) -> ScenarioResult {
    let result = compute_schedule(&scenario_loan_inputs(loan_amount, scenario));
    let total_cost = result.total_paid.saturating_add(scenario.closing_costs);
    ScenarioResult {
        id: scenario.id.clone(),
        label: scenario.label.clone(),
        rate: scenario.rate,
        term_years: scenario.term_years,
        closing_costs: scenario.closing_costs,
        result,
        total_cost,
    }
}

/// Evaluate every scenario against the same loan amount, preserving order.
///
/// Every call recomputes every schedule in full; there is no cache.
pub fn evaluate_scenarios<'a, I>(loan_amount: Money, scenarios: I) -> Vec<ScenarioResult>
where
    I: IntoIterator<Item = &'a ScenarioInput>,
{
    scenarios
        .into_iter()
        .map(|s| evaluate_scenario(loan_amount, s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::ScenarioSet;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_cost_includes_closing_costs() {
        let s = ScenarioInput::new("a", "A", dec!(6), 30).with_closing_costs(dec!(5000));
        let r = evaluate_scenario(dec!(300_000), &s);
        assert_eq!(r.total_cost, r.result.total_paid + dec!(5000));
        assert_eq!(r.id, "a");
    }

    #[test]
    fn test_negative_closing_costs_are_credits() {
        let s = ScenarioInput::new("a", "A", dec!(6), 30).with_closing_costs(dec!(-2500));
        let r = evaluate_scenario(dec!(300_000), &s);
        assert!(r.total_cost < r.result.total_paid);
    }

    #[test]
    fn test_order_and_ids_preserved() {
        let mut set = ScenarioSet::default();
        set.add_next();
        set.add_next();
        let results = evaluate_scenarios(dec!(250_000), &set);
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["scenario-1", "scenario-2", "scenario-3"]);
        assert!(results[0].monthly_payment() < results[2].monthly_payment());
    }

    #[test]
    fn test_term_drives_schedule_length() {
        let s = ScenarioInput::new("short", "15y", dec!(5.5), 15);
        let r = evaluate_scenario(dec!(200_000), &s);
        assert_eq!(r.result.schedule.len(), 180);
        assert!(r.total_interest() > Decimal::ZERO);
    }
}
