use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::scenarios::ScenarioResult;

/// Which headline metrics a scenario is (jointly) lowest on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFlags {
    pub id: String,
    pub is_lowest_payment: bool,
    pub is_lowest_total_interest: bool,
    pub is_lowest_total_cost: bool,
}

/// Mark every value equal to the minimum. Ties are all marked; equality is
/// exact.
pub fn flag_minimums(values: &[Decimal]) -> Vec<bool> {
    match values.iter().min() {
        Some(min) => values.iter().map(|v| v == min).collect(),
        None => Vec::new(),
    }
}

pub fn lowest_value_flags(results: &[ScenarioResult]) -> Vec<ScenarioFlags> {
    let payments: Vec<Decimal> = results.iter().map(|r| r.result.monthly_payment).collect();
    let interest: Vec<Decimal> = results.iter().map(|r| r.result.total_interest).collect();
    let cost: Vec<Decimal> = results.iter().map(|r| r.total_cost).collect();

    let lowest_payment = flag_minimums(&payments);
    let lowest_interest = flag_minimums(&interest);
    let lowest_cost = flag_minimums(&cost);

    results
        .iter()
        .enumerate()
        .map(|(i, r)| ScenarioFlags {
            id: r.id.clone(),
            is_lowest_payment: lowest_payment[i],
            is_lowest_total_interest: lowest_interest[i],
            is_lowest_total_cost: lowest_cost[i],
        })
        .collect()
}
