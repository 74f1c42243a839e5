use refi_compare_core::comparison::break_even::{break_even_month, saving_series};
use refi_compare_core::comparison::{
    analyze_scenario_set, analyze_scenarios, compare_scenarios, ComparisonInput,
};
use refi_compare_core::scenarios::{evaluate_scenarios, ScenarioInput, ScenarioSet};
use refi_compare_core::RefiCompareError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn refinance_pair() -> Vec<ScenarioInput> {
    vec![
        ScenarioInput::new("baseline", "Keep 7%", dec!(7), 30),
        ScenarioInput::new("refi", "Refi 6%", dec!(6), 30).with_closing_costs(dec!(4000)),
    ]
}

/// Independent floating-point rendition of the running saving, used as a
/// reference for the decimal engine.
fn reference_break_even(principal: f64, base_rate: f64, alt_rate: f64, years: u32, cost: f64) -> Option<u32> {
    fn payment(p: f64, r: f64, n: i32) -> f64 {
        let f = (1.0 + r).powi(n);
        p * r * f / (f - 1.0)
    }
    let n = (years * 12) as i32;
    let (rb, ra) = (base_rate / 1200.0, alt_rate / 1200.0);
    let (pb, pa) = (payment(principal, rb, n), payment(principal, ra, n));
    let (mut bb, mut ba) = (principal, principal);
    for month in 1..=n as u32 {
        bb = (bb - (pb - bb * rb).max(0.0)).max(0.0);
        ba = (ba - (pa - ba * ra).max(0.0)).max(0.0);
        let saving = (bb - ba) + (pb - pa) * month as f64;
        if saving >= cost {
            return Some(month);
        }
    }
    None
}

// ===========================================================================
// Break-even
// ===========================================================================

#[test]
fn test_break_even_matches_reference() {
    let results = evaluate_scenarios(dec!(300_000), &refinance_pair());
    let view = compare_scenarios(&results).unwrap();
    let refi = view.break_even_for("refi").unwrap();

    assert_eq!(refi.cost_delta, dec!(4000));
    let month = refi.break_even_month.expect("6% refi should break even");
    let reference = reference_break_even(300_000.0, 7.0, 6.0, 30, 4000.0).unwrap();
    assert!(
        month.abs_diff(reference) <= 1,
        "engine {} vs reference {}",
        month,
        reference
    );
}

#[test]
fn test_baseline_entry_is_flat() {
    let results = evaluate_scenarios(dec!(300_000), &refinance_pair());
    let view = compare_scenarios(&results).unwrap();
    let base = view.break_even_for("baseline").unwrap();
    assert!(base.is_baseline);
    assert_eq!(base.cost_delta, Decimal::ZERO);
    assert_eq!(base.break_even_month, None);
    assert!(base.saving_series.iter().all(|p| p.saving.is_zero()));
}

#[test]
fn test_saving_series_helpers_agree_with_view() {
    let results = evaluate_scenarios(dec!(300_000), &refinance_pair());
    let series = saving_series(&results[0].result, &results[1].result);
    let view = compare_scenarios(&results).unwrap();
    assert_eq!(series, view.break_even[1].saving_series);
    assert_eq!(
        break_even_month(&series, dec!(4000)),
        view.break_even[1].break_even_month
    );
    assert_eq!(break_even_month(&series, Decimal::ZERO), None);
    assert_eq!(break_even_month(&series, dec!(-100)), None);
}

#[test]
fn test_unreachable_cost_has_no_break_even() {
    let results = evaluate_scenarios(dec!(300_000), &refinance_pair());
    let series = saving_series(&results[0].result, &results[1].result);
    assert_eq!(break_even_month(&series, dec!(10_000_000)), None);
}

// ===========================================================================
// Flags
// ===========================================================================

#[test]
fn test_identical_scenarios_tie_on_every_flag() {
    let scenarios = vec![
        ScenarioInput::new("a", "A", dec!(6.5), 30),
        ScenarioInput::new("b", "B", dec!(6.5), 30),
        ScenarioInput::new("c", "C", dec!(7.25), 30),
    ];
    let results = evaluate_scenarios(dec!(400_000), &scenarios);
    let view = compare_scenarios(&results).unwrap();

    for id in ["a", "b"] {
        let f = view.flags_for(id).unwrap();
        assert!(f.is_lowest_payment && f.is_lowest_total_interest && f.is_lowest_total_cost);
    }
    let c = view.flags_for("c").unwrap();
    assert!(!c.is_lowest_payment && !c.is_lowest_total_interest && !c.is_lowest_total_cost);
}

// ===========================================================================
// End to end
// ===========================================================================

#[test]
fn test_recompute_after_replace_preserves_ids() {
    let mut set = ScenarioSet::try_from(refinance_pair()).unwrap();
    let before = analyze_scenario_set(dec!(300_000), &set).unwrap();

    let mut refi = set.get("refi").unwrap().clone();
    refi.rate = dec!(5.5);
    set.replace("refi", refi).unwrap();

    let after = analyze_scenario_set(dec!(300_000), &set).unwrap();

    assert_eq!(after.result.scenarios[1].id, "refi");
    let m_before = before.result.comparison.break_even[1].break_even_month.unwrap();
    let m_after = after.result.comparison.break_even[1].break_even_month.unwrap();
    assert!(m_after < m_before);
}

#[test]
fn test_empty_scenarios_is_an_error() {
    let err = analyze_scenarios(&ComparisonInput {
        loan_amount: dec!(300_000),
        scenarios: Vec::new(),
    })
    .unwrap_err();
    assert!(matches!(err, RefiCompareError::InsufficientData(_)));
}

#[test]
fn test_output_serializes() {
    let out = analyze_scenarios(&ComparisonInput {
        loan_amount: dec!(300_000),
        scenarios: refinance_pair(),
    })
    .unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["comparison"]["baseline_id"], "baseline");
    assert_eq!(
        json["result"]["scenarios"][0]["result"]["schedule"]
            .as_array()
            .map(Vec::len),
        Some(360)
    );
}
