use std::collections::HashSet;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{scenario_id, scenario_label, ScenarioInput, DEFAULT_TERM_YEARS};
use crate::error::RefiCompareError;
use crate::RefiCompareResult;

/// Rate increment applied to the last scenario when a new one is added.
const NEXT_RATE_STEP: Decimal = dec!(0.5);

/// Ordered, non-empty collection of scenarios keyed by id.
///
/// The first scenario is the baseline for every comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScenarioInput>", into = "Vec<ScenarioInput>")]
pub struct ScenarioSet {
    scenarios: Vec<ScenarioInput>,
}

impl ScenarioSet {
    pub fn new(first: ScenarioInput) -> Self {
        Self {
            scenarios: vec![first],
        }
    }

    /// Build a set from untrusted input without failing: an empty list yields
    /// the default set. Only repeated ids move; each is reassigned to a free
    /// `scenario-N` id that no other input scenario uses.
    pub fn normalized(inputs: Vec<ScenarioInput>) -> Self {
        if inputs.is_empty() {
            return Self::default();
        }
        let mut reserved: HashSet<String> = inputs.iter().map(|s| s.id.clone()).collect();
        let mut set = Self {
            scenarios: Vec::with_capacity(inputs.len()),
        };
        for mut scenario in inputs {
            if set.contains(&scenario.id) {
                let (id, _) = set.free_slot(&reserved);
                tracing::debug!(from = %scenario.id, to = %id, "reassigning duplicate scenario id");
                reserved.insert(id.clone());
                scenario.id = id;
            }
            set.scenarios.push(scenario);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// A set holds at least one scenario, so this is false.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScenarioInput> {
        self.scenarios.iter()
    }

    pub fn as_slice(&self) -> &[ScenarioInput] {
        &self.scenarios
    }

    pub fn baseline(&self) -> &ScenarioInput {
        &self.scenarios[0]
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioInput> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.scenarios.iter().position(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Append a scenario. Fails if its id is already taken.
    pub fn push(&mut self, scenario: ScenarioInput) -> RefiCompareResult<()> {
        if self.contains(&scenario.id) {
            return Err(RefiCompareError::DuplicateScenario(scenario.id));
        }
        self.scenarios.push(scenario);
        Ok(())
    }

    /// Append the next default scenario: half a point above the last rate,
    /// 30 years, no closing costs.
    pub fn add_next(&mut self) -> &ScenarioInput {
        let rate = self.scenarios.last().map_or(super::DEFAULT_RATE_PERCENT, |last| {
            last.rate
                .saturating_add(NEXT_RATE_STEP)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        });
        let (id, label) = self.next_free_slot();
        self.scenarios
            .push(ScenarioInput::new(id, label, rate, DEFAULT_TERM_YEARS));
        &self.scenarios[self.scenarios.len() - 1]
    }

    /// Replace the scenario stored under `id`, keeping its position.
    /// Returns the previous record.
    pub fn replace(
        &mut self,
        id: &str,
        replacement: ScenarioInput,
    ) -> RefiCompareResult<ScenarioInput> {
        let index = self
            .position(id)
            .ok_or_else(|| RefiCompareError::ScenarioNotFound(id.to_string()))?;
        if replacement.id != id && self.contains(&replacement.id) {
            return Err(RefiCompareError::DuplicateScenario(replacement.id));
        }
        Ok(std::mem::replace(&mut self.scenarios[index], replacement))
    }

    /// Remove the scenario stored under `id`. The last scenario cannot be
    /// removed.
    pub fn remove(&mut self, id: &str) -> RefiCompareResult<ScenarioInput> {
        let index = self
            .position(id)
            .ok_or_else(|| RefiCompareError::ScenarioNotFound(id.to_string()))?;
        if self.scenarios.len() == 1 {
            return Err(RefiCompareError::InvalidInput {
                field: "scenarios".into(),
                reason: "At least one scenario must remain".into(),
            });
        }
        Ok(self.scenarios.remove(index))
    }

    /// The selected id if it names a scenario in the set, else the baseline id.
    pub fn resolve_selection<'a>(&'a self, selected: &'a str) -> &'a str {
        if self.contains(selected) {
            selected
        } else {
            &self.baseline().id
        }
    }

    /// Smallest `N >= len + 1` whose `scenario-N` id is unused.
    fn next_free_slot(&self) -> (String, String) {
        self.free_slot(&HashSet::new())
    }

    /// Smallest `N >= len + 1` whose `scenario-N` id is neither in the set
    /// nor in `reserved`.
    fn free_slot(&self, reserved: &HashSet<String>) -> (String, String) {
        let mut n = self.scenarios.len() + 1;
        loop {
            let id = scenario_id(n);
            if !self.contains(&id) && !reserved.contains(&id) {
                return (id, scenario_label(n));
            }
            n += 1;
        }
    }
}

impl Default for ScenarioSet {
    fn default() -> Self {
        Self::new(ScenarioInput::default())
    }
}

impl TryFrom<Vec<ScenarioInput>> for ScenarioSet {
    type Error = RefiCompareError;

    fn try_from(scenarios: Vec<ScenarioInput>) -> Result<Self, Self::Error> {
        if scenarios.is_empty() {
            return Err(RefiCompareError::InsufficientData(
                "At least one scenario is required".into(),
            ));
        }
        let mut seen = HashSet::with_capacity(scenarios.len());
        for s in &scenarios {
            if !seen.insert(s.id.as_str()) {
                return Err(RefiCompareError::DuplicateScenario(s.id.clone()));
            }
        }
        Ok(Self { scenarios })
    }
}

impl From<ScenarioSet> for Vec<ScenarioInput> {
    fn from(set: ScenarioSet) -> Self {
        set.scenarios
    }
}

impl<'a> IntoIterator for &'a ScenarioSet {
    type Item = &'a ScenarioInput;
    type IntoIter = std::slice::Iter<'a, ScenarioInput>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}
