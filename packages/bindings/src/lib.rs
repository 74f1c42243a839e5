use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use refi_compare_core::amortization::{compute_schedule as amortize, LoanInputs};
use refi_compare_core::comparison::{analyze_scenarios as analyze, ComparisonInput};
use refi_compare_core::snapshot::{self, MortgageSnapshot};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Plain numbers as typed into the form; non-finite values are clamped by
/// the engine.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRequest {
    principal: f64,
    annual_rate: f64,
    term_years: f64,
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_schedule(input_json: String) -> NapiResult<String> {
    let req: ScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let inputs = LoanInputs::from_f64(req.principal, req.annual_rate, req.term_years);
    serde_json::to_string(&amortize(&inputs)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_scenarios(input_json: String) -> NapiResult<String> {
    let input: ComparisonInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analyze(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Never fails: unreadable storage yields the default snapshot.
#[napi]
pub fn load_snapshot(raw: String) -> NapiResult<String> {
    serde_json::to_string(&snapshot::load_snapshot(&raw)).map_err(to_napi_error)
}

#[napi]
pub fn save_snapshot(snapshot_json: String) -> NapiResult<String> {
    let snap: MortgageSnapshot = serde_json::from_str(&snapshot_json).map_err(to_napi_error)?;
    snapshot::save_snapshot(&snap).map_err(to_napi_error)
}

#[napi]
pub fn snapshot_loan_amount(snapshot_json: String) -> NapiResult<String> {
    let snap = snapshot::load_snapshot(&snapshot_json);
    let amount: Decimal = snap.loan_amount();
    Ok(amount.to_string())
}
