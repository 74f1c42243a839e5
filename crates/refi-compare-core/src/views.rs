//! Read-only projections of scenario results for tables and charts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::amortization::MortgageResult;
use crate::scenarios::ScenarioResult;
use crate::types::Money;

/// Rows shown by default in a payment schedule preview (month 0 excluded).
pub const SCHEDULE_PREVIEW_ROWS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub interest_paid: Money,
    pub ending_balance: Money,
    pub principal_paid: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBar {
    pub id: String,
    pub label: String,
    pub total_paid: Money,
    pub total_interest: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub month: u32,
    pub principal: Money,
    pub interest: Money,
}

/// Month 0 (nothing paid, full principal outstanding) followed by the first
/// `rows` months of the schedule.
pub fn schedule_preview(result: &MortgageResult, rows: usize) -> Vec<ScheduleRow> {
    let opening = ScheduleRow {
        month: 0,
        interest_paid: Decimal::ZERO,
        ending_balance: result.principal,
        principal_paid: Decimal::ZERO,
    };
    std::iter::once(opening)
        .chain(result.schedule.iter().take(rows).map(|p| ScheduleRow {
            month: p.month,
            interest_paid: p.interest_paid,
            ending_balance: p.ending_balance,
            principal_paid: p.principal_paid,
        }))
        .collect()
}

/// Life-of-loan totals per scenario, rounded to whole currency units.
pub fn cost_bars(results: &[ScenarioResult]) -> Vec<CostBar> {
    results
        .iter()
        .map(|r| CostBar {
            id: r.id.clone(),
            label: r.label.clone(),
            total_paid: round_whole(r.result.total_paid),
            total_interest: round_whole(r.result.total_interest),
        })
        .collect()
}

/// Principal and interest portions of every payment, rounded to whole units.
pub fn payment_breakdown(result: &MortgageResult) -> Vec<PaymentSplit> {
    result
        .schedule
        .iter()
        .map(|p| PaymentSplit {
            month: p.month,
            principal: round_whole(p.principal_paid),
            interest: round_whole(p.interest_paid),
        })
        .collect()
}

/// The result with id `selected`, falling back to the baseline.
pub fn select_scenario<'a>(
    results: &'a [ScenarioResult],
    selected: &str,
) -> Option<&'a ScenarioResult> {
    results
        .iter()
        .find(|r| r.id == selected)
        .or_else(|| results.first())
}

fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
