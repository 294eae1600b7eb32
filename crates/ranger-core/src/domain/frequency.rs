//! Frequency assignment map: per-hand weighted action entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::ModelError;
use super::hand::{COMBO_COUNT, Hand};
use super::ids::ActionId;

/// Integer weight in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Weight(u8);

impl Weight {
    pub const FULL: Weight = Weight(100);
    pub const ZERO: Weight = Weight(0);

    pub fn new(value: u32) -> Result<Self, ModelError> {
        if value > 100 {
            return Err(ModelError::WeightOutOfRange(value));
        }
        Ok(Weight(value as u8))
    }

    pub fn get(self) -> u32 {
        u32::from(self.0)
    }

    /// `100 - self`.
    pub fn complement(self) -> Weight {
        Weight(100 - self.0)
    }
}

impl TryFrom<u32> for Weight {
    type Error = ModelError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Weight::new(value)
    }
}

impl From<Weight> for u32 {
    fn from(weight: Weight) -> Self {
        weight.get()
    }
}

/// One weighted action on a hand. `action_id` is a weak reference,
/// resolved against the registry at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    #[serde(rename = "actionId")]
    pub action_id: ActionId,
    #[serde(rename = "frequency")]
    pub weight: Weight,
}

impl FrequencyEntry {
    pub fn new(action_id: ActionId, weight: Weight) -> Self {
        Self { action_id, weight }
    }

    pub fn full(action_id: ActionId) -> Self {
        Self::new(action_id, Weight::FULL)
    }
}

/// Hand -> ordered entries. A hand absent from the map has no decision.
///
/// Invariants:
/// - stored lists are never empty
/// - weights per hand sum to at most 100
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandFrequencies {
    hands: BTreeMap<Hand, Vec<FrequencyEntry>>,
}

impl HandFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hand: Hand) -> Option<&[FrequencyEntry]> {
        self.hands.get(&hand).map(Vec::as_slice)
    }

    /// Entries as the grid reads them: an absent hand is the fallback at 100.
    pub fn effective_entries(&self, hand: Hand) -> Vec<FrequencyEntry> {
        match self.hands.get(&hand) {
            Some(entries) => entries.clone(),
            None => vec![FrequencyEntry::full(ActionId::FALLBACK)],
        }
    }

    pub fn contains(&self, hand: Hand) -> bool {
        self.hands.contains_key(&hand)
    }

    /// Replaces the hand's entries. An empty list removes the hand.
    pub fn set(&mut self, hand: Hand, entries: Vec<FrequencyEntry>) -> Result<(), ModelError> {
        let total: u32 = entries.iter().map(|e| e.weight.get()).sum();
        if total > 100 {
            return Err(ModelError::WeightOverflow {
                hand: hand.to_string(),
                total,
            });
        }
        if entries.is_empty() {
            self.hands.remove(&hand);
        } else {
            self.hands.insert(hand, entries);
        }
        Ok(())
    }

    /// Removes the hand. Returns the entries it had.
    pub fn clear(&mut self, hand: Hand) -> Option<Vec<FrequencyEntry>> {
        self.hands.remove(&hand)
    }

    /// Clears every hand.
    pub fn reset(&mut self) {
        self.hands.clear();
    }

    /// True when the hand holds an entry equal to one of `entries`.
    pub fn carries(&self, hand: Hand, entries: &[FrequencyEntry]) -> bool {
        self.hands
            .get(&hand)
            .is_some_and(|current| current.iter().any(|e| entries.contains(e)))
    }

    /// Drops every entry referencing `action_id`; hands left empty are removed.
    /// Returns how many hands changed.
    pub fn purge_action(&mut self, action_id: ActionId) -> usize {
        let mut touched = 0;
        self.hands.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|e| e.action_id != action_id);
            if entries.len() != before {
                touched += 1;
            }
            !entries.is_empty()
        });
        touched
    }

    /// Share of all 1326 combos played as `action_id`, in percent.
    ///
    /// Absent hands count toward the fallback action.
    pub fn coverage(&self, action_id: ActionId) -> f64 {
        let weighted: u32 = Hand::all()
            .map(|hand| {
                let weight: u32 = self
                    .effective_entries(hand)
                    .iter()
                    .filter(|e| e.action_id == action_id)
                    .map(|e| e.weight.get())
                    .sum();
                weight * hand.combos()
            })
            .sum();
        f64::from(weighted) / f64::from(COMBO_COUNT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Hand, &[FrequencyEntry])> {
        self.hands.iter().map(|(hand, entries)| (*hand, entries.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}

impl FromIterator<(Hand, Vec<FrequencyEntry>)> for HandFrequencies {
    /// Collects without validation beyond dropping empty lists; use `set`
    /// for checked writes.
    fn from_iter<I: IntoIterator<Item = (Hand, Vec<FrequencyEntry>)>>(iter: I) -> Self {
        Self {
            hands: iter
                .into_iter()
                .filter(|(_, entries)| !entries.is_empty())
                .collect(),
        }
    }
}
