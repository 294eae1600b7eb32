//! Action mixes and the active brush.

use serde::{Deserialize, Serialize};

use super::frequency::{FrequencyEntry, Weight};
use super::ids::{ActionId, MixId};

/// A weighted pairing of one or two actions.
///
/// `weight` is the share of `first`; `second` implicitly gets `100 - weight`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMix {
    pub id: MixId,
    pub first: ActionId,
    pub second: Option<ActionId>,
    pub weight: Weight,
}

impl ActionMix {
    pub fn new(id: MixId, first: ActionId) -> Self {
        Self {
            id,
            first,
            second: None,
            weight: Weight::FULL,
        }
    }

    /// Entries this mix paints onto a hand.
    ///
    /// With a single reference the stored weight is ignored and the action
    /// gets the full 100.
    pub fn entries(&self) -> Vec<FrequencyEntry> {
        match self.second {
            None => vec![FrequencyEntry::full(self.first)],
            Some(second) => {
                let mut entries = vec![FrequencyEntry::new(self.first, self.weight)];
                if self.weight < Weight::FULL {
                    entries.push(FrequencyEntry::new(second, self.weight.complement()));
                }
                entries
            }
        }
    }

    pub fn references(&self, action_id: ActionId) -> bool {
        self.first == action_id || self.second == Some(action_id)
    }

    /// Drops references to `action_id`, promoting `second` when `first` goes.
    /// Returns false when no reference is left.
    pub fn forget_action(&mut self, action_id: ActionId) -> bool {
        if self.second == Some(action_id) {
            self.second = None;
        }
        if self.first == action_id {
            match self.second.take() {
                Some(second) => {
                    self.first = second;
                    self.weight = Weight::FULL;
                }
                None => return false,
            }
        }
        true
    }
}

/// Partial update for a mix. `second: Some(None)` removes the second action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixPatch {
    pub first: Option<ActionId>,
    pub second: Option<Option<ActionId>>,
    pub weight: Option<Weight>,
}

/// The currently selected paint source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Brush {
    Simple(ActionId),
    Mix(MixId),
}
