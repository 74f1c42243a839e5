use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Number, Value};

use super::{DownPaymentType, LoanMode, MortgageSnapshot, SNAPSHOT_VERSION};
use crate::amortization::MAX_TERM_YEARS;
use crate::scenarios::{
    scenario_id, scenario_label, ScenarioInput, ScenarioSet, DEFAULT_RATE_PERCENT,
    DEFAULT_TERM_YEARS,
};

type Record = Map<String, Value>;

/// Parse stored snapshot text. Unreadable input yields the default snapshot.
pub fn load_snapshot(raw: &str) -> MortgageSnapshot {
    if raw.trim().is_empty() {
        return MortgageSnapshot::default();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => load_snapshot_value(&value),
        Err(e) => {
            tracing::warn!(error = %e, "unreadable snapshot; using defaults");
            MortgageSnapshot::default()
        }
    }
}

pub fn load_snapshot_value(value: &Value) -> MortgageSnapshot {
    let Some(record) = value.as_object() else {
        tracing::warn!("snapshot is not an object; using defaults");
        return MortgageSnapshot::default();
    };

    let scenarios = if is_legacy(record) {
        migrate_legacy_scenarios(record)
    } else {
        parse_scenarios(record.get("scenarios"))
    };
    let mut snapshot = parse_shared_fields(record, scenarios);
    snapshot.selected_scenario_id = snapshot.selected_scenario().to_string();
    snapshot
}

// ---------------------------------------------------------------------------
// Shape detection and migration
// ---------------------------------------------------------------------------

fn is_legacy(record: &Record) -> bool {
    let versioned = record
        .get("version")
        .and_then(Value::as_u64)
        .is_some_and(|v| v >= u64::from(SNAPSHOT_VERSION));
    if versioned {
        return false;
    }
    record.get("baseRate").and_then(number).is_some()
        || record
            .get("extraRates")
            .and_then(Value::as_array)
            .is_some_and(|rates| !rates.is_empty())
        || record.get("termYears").and_then(number).is_some()
}

/// One scenario per legacy rate, all sharing the legacy term. Closing costs
/// belong to the first (baseline) scenario only.
fn migrate_legacy_scenarios(record: &Record) -> ScenarioSet {
    let base_rate = record
        .get("baseRate")
        .and_then(number)
        .unwrap_or(DEFAULT_RATE_PERCENT);
    let term_years = record
        .get("termYears")
        .and_then(number)
        .map_or(DEFAULT_TERM_YEARS, round_term);
    let closing_costs = record
        .get("closingCosts")
        .and_then(number)
        .unwrap_or(Decimal::ZERO);
    let extra_rates: Vec<Decimal> = record
        .get("extraRates")
        .and_then(Value::as_array)
        .map(|rates| rates.iter().filter_map(number).collect())
        .unwrap_or_default();

    let mut scenarios = Vec::with_capacity(extra_rates.len() + 1);
    scenarios.push(
        ScenarioInput::new(scenario_id(1), scenario_label(1), base_rate, term_years)
            .with_closing_costs(closing_costs),
    );
    for (i, rate) in extra_rates.into_iter().enumerate() {
        scenarios.push(ScenarioInput::new(
            scenario_id(i + 2),
            scenario_label(i + 2),
            rate,
            term_years,
        ));
    }

    tracing::info!(scenarios = scenarios.len(), "migrated legacy snapshot");
    ScenarioSet::normalized(scenarios)
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

fn parse_shared_fields(record: &Record, scenarios: ScenarioSet) -> MortgageSnapshot {
    let defaults = MortgageSnapshot::default();
    MortgageSnapshot {
        version: SNAPSHOT_VERSION,
        mode: field_or(record, "mode", parse_mode, defaults.mode),
        home_price: field_or(record, "homePrice", number, defaults.home_price),
        down_payment_type: field_or(
            record,
            "downPaymentType",
            parse_down_payment_type,
            defaults.down_payment_type,
        ),
        down_payment_value: field_or(
            record,
            "downPaymentValue",
            number,
            defaults.down_payment_value,
        ),
        current_balance: field_or(record, "currentBalance", number, defaults.current_balance),
        scenarios,
        selected_scenario_id: field_or(
            record,
            "selectedScenarioId",
            |v| v.as_str().map(str::to_string),
            defaults.selected_scenario_id,
        ),
    }
}

fn field_or<T>(record: &Record, key: &str, parse: impl Fn(&Value) -> Option<T>, default: T) -> T {
    match record.get(key) {
        None => default,
        Some(value) => parse(value).unwrap_or_else(|| {
            tracing::debug!(field = key, "malformed snapshot field; using default");
            default
        }),
    }
}

fn parse_scenarios(value: Option<&Value>) -> ScenarioSet {
    let Some(items) = value.and_then(Value::as_array).filter(|a| !a.is_empty()) else {
        return ScenarioSet::default();
    };
    let inputs = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            parse_scenario(item, i + 1).unwrap_or_else(|| {
                tracing::debug!(index = i, "malformed scenario; using placeholder");
                ScenarioInput::placeholder(i + 1)
            })
        })
        .collect();
    ScenarioSet::normalized(inputs)
}

fn parse_scenario(item: &Value, index: usize) -> Option<ScenarioInput> {
    let o = item.as_object()?;
    let id = o.get("id")?.as_str()?;
    let label = o.get("label")?.as_str()?;
    let rate = number(o.get("rate")?)?;
    let term_years = number(o.get("termYears")?)?;
    let closing_costs = number(o.get("closingCosts")?)?;

    Some(ScenarioInput {
        id: non_empty_or(id, || scenario_id(index)),
        label: non_empty_or(label, || scenario_label(index)),
        rate,
        term_years: round_term(term_years),
        closing_costs,
    })
}

fn parse_mode(value: &Value) -> Option<LoanMode> {
    match value.as_str()? {
        "purchase" => Some(LoanMode::Purchase),
        "refinance" => Some(LoanMode::Refinance),
        _ => None,
    }
}

fn parse_down_payment_type(value: &Value) -> Option<DownPaymentType> {
    match value.as_str()? {
        "percent" => Some(DownPaymentType::Percent),
        "amount" => Some(DownPaymentType::Amount),
        _ => None,
    }
}

/// A JSON number as a Decimal. Strings, booleans and numbers outside the
/// Decimal range do not count.
fn number(value: &Value) -> Option<Decimal> {
    value.as_number().and_then(number_to_decimal)
}

fn number_to_decimal(n: &Number) -> Option<Decimal> {
    let text = n.to_string();
    text.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&text).ok())
        .or_else(|| n.as_f64().and_then(Decimal::from_f64))
}

/// Whole years, rounded half away from zero, at least 1.
fn round_term(years: Decimal) -> u32 {
    let rounded = years.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if rounded < Decimal::ONE {
        return 1;
    }
    rounded
        .to_u32()
        .map_or(MAX_TERM_YEARS, |y| y.min(MAX_TERM_YEARS))
}

fn non_empty_or(s: &str, fallback: impl FnOnce() -> String) -> String {
    if s.is_empty() {
        fallback()
    } else {
        s.to_string()
    }
}
