//! Break-even timing of a scenario against the baseline.
//!
//! The running saving at month `m` is
//! `(baseline_balance(m) - scenario_balance(m)) + (baseline_payment - scenario_payment) * m`,
//! i.e. faster equity build-up plus cumulative payment difference. Month 0
//! holds the shared loan amount on both sides. A scenario breaks even in the
//! first month whose saving reaches its extra closing costs.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::MortgageResult;
use crate::scenarios::ScenarioResult;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingPoint {
    pub month: u32,
    /// Signed amount the scenario is ahead of the baseline.
    pub saving: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEven {
    pub scenario_id: String,
    pub is_baseline: bool,
    /// `scenario.closing_costs - baseline.closing_costs`.
    pub cost_delta: Money,
    /// `baseline payment - scenario payment`.
    pub monthly_saving: Money,
    pub break_even_month: Option<u32>,
    /// Months of payment savings needed to recover `cost_delta`, ignoring
    /// balances.
    pub simple_payback_months: Option<u32>,
    pub saving_series: Vec<SavingPoint>,
}

/// Running saving of `scenario` over `baseline` for months
/// `0..=min(baseline months, scenario months)`.
pub fn saving_series(baseline: &MortgageResult, scenario: &MortgageResult) -> Vec<SavingPoint> {
    let horizon = baseline.total_months.min(scenario.total_months);
    let payment_delta = baseline.monthly_payment - scenario.monthly_payment;

    (0..=horizon)
        .map(|month| {
            let equity = baseline.balance_at(month) - scenario.balance_at(month);
            let payments = payment_delta.saturating_mul(Decimal::from(month));
            SavingPoint {
                month,
                saving: equity.saturating_add(payments),
            }
        })
        .collect()
}

/// First month whose saving covers `cost_delta`. None when there is nothing
/// to recover or the series never gets there.
pub fn break_even_month(series: &[SavingPoint], cost_delta: Money) -> Option<u32> {
    if cost_delta <= Decimal::ZERO {
        return None;
    }
    series
        .iter()
        .find(|p| p.month >= 1 && p.saving >= cost_delta)
        .map(|p| p.month)
}

pub fn simple_payback_months(cost_delta: Money, monthly_saving: Money) -> Option<u32> {
    if cost_delta <= Decimal::ZERO || monthly_saving <= Decimal::ZERO {
        return None;
    }
    cost_delta
        .checked_div(monthly_saving)
        .and_then(|months| months.ceil().to_u32())
}

pub fn analyze_break_even(baseline: &ScenarioResult, scenario: &ScenarioResult) -> BreakEven {
    let cost_delta = scenario.closing_costs.saturating_sub(baseline.closing_costs);
    let monthly_saving = baseline.result.monthly_payment - scenario.result.monthly_payment;
    let series = saving_series(&baseline.result, &scenario.result);

    BreakEven {
        scenario_id: scenario.id.clone(),
        is_baseline: scenario.id == baseline.id,
        cost_delta,
        monthly_saving,
        break_even_month: break_even_month(&series, cost_delta),
        simple_payback_months: simple_payback_months(cost_delta, monthly_saving),
        saving_series: series,
    }
}
