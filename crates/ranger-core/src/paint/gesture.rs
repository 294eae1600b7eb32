//! Paint gesture: the pointer-drag state machine.
//!
//! ```text
//!   Idle --down(brush)--> Dragging --up--> Idle
//!                          |    ^
//!                          +move+
//! ```
//!
//! The mode is fixed once, from the first hand touched, and each hand is
//! mutated at most once per gesture. A gesture that never enters a second
//! hand is a click and resolves with `Toggle` instead of the drag mode.

use std::collections::BTreeSet;

use tracing::debug;

use super::engine::{PaintMode, apply_brush_to_hand, drag_mode_for};
use crate::domain::{FrequencyEntry, Hand, HandFrequencies, ModelError};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Drag {
    /// Brush entries resolved at pointer-down.
    entries: Vec<FrequencyEntry>,
    mode: PaintMode,
    origin: Hand,
    /// The first hand's entries before the gesture touched it.
    origin_before: Option<Vec<FrequencyEntry>>,
    processed: BTreeSet<Hand>,
    entered_other_hand: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum GestureState {
    #[default]
    Idle,
    Dragging(Drag),
}

/// What a finished gesture did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureSummary {
    pub hands: Vec<Hand>,
    pub mode: PaintMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaintGesture {
    state: GestureState,
}

impl PaintGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    /// Fixed mode of the running gesture.
    pub fn mode(&self) -> Option<PaintMode> {
        match &self.state {
            GestureState::Dragging(drag) => Some(drag.mode),
            GestureState::Idle => None,
        }
    }

    /// Hands touched so far in the running gesture.
    pub fn highlighted(&self) -> impl Iterator<Item = Hand> + '_ {
        let processed = match &self.state {
            GestureState::Dragging(drag) => Some(drag.processed.iter().copied()),
            GestureState::Idle => None,
        };
        processed.into_iter().flatten()
    }

    /// Starts a gesture on `hand`. `entries` is the resolved brush; `None`
    /// (no active brush) leaves the gesture idle.
    pub fn pointer_down(
        &mut self,
        freqs: &mut HandFrequencies,
        hand: Hand,
        entries: Option<Vec<FrequencyEntry>>,
    ) -> Result<bool, ModelError> {
        if self.is_dragging() {
            // pointer-up was lost (left the surface without an event)
            self.pointer_up(freqs)?;
        }
        let Some(entries) = entries else {
            return Ok(false);
        };

        let mode = drag_mode_for(freqs, hand, &entries);
        let origin_before = freqs.get(hand).map(<[FrequencyEntry]>::to_vec);
        apply_brush_to_hand(freqs, hand, &entries, mode)?;
        debug!(%hand, ?mode, "paint gesture started");

        self.state = GestureState::Dragging(Drag {
            entries,
            mode,
            origin: hand,
            origin_before,
            processed: BTreeSet::from([hand]),
            entered_other_hand: false,
        });
        Ok(true)
    }

    /// Applies the fixed mode to `hand` if this gesture has not touched it yet.
    pub fn pointer_move(&mut self, freqs: &mut HandFrequencies, hand: Hand) -> Result<bool, ModelError> {
        let GestureState::Dragging(drag) = &mut self.state else {
            return Ok(false);
        };
        if drag.processed.contains(&hand) {
            return Ok(false);
        }
        apply_brush_to_hand(freqs, hand, &drag.entries, drag.mode)?;
        drag.processed.insert(hand);
        drag.entered_other_hand = true;
        Ok(true)
    }

    /// Ends the gesture. Returns `None` if no gesture was running.
    pub fn pointer_up(&mut self, freqs: &mut HandFrequencies) -> Result<Option<GestureSummary>, ModelError> {
        let GestureState::Dragging(drag) = std::mem::take(&mut self.state) else {
            return Ok(None);
        };

        if !drag.entered_other_hand {
            // click: undo the drag-mode write and toggle exactly once instead
            freqs.set(drag.origin, drag.origin_before.unwrap_or_default())?;
            apply_brush_to_hand(freqs, drag.origin, &drag.entries, PaintMode::Toggle)?;
            debug!(hand = %drag.origin, "paint click");
            return Ok(Some(GestureSummary {
                hands: vec![drag.origin],
                mode: PaintMode::Toggle,
            }));
        }

        debug!(hands = drag.processed.len(), mode = ?drag.mode, "paint gesture finished");
        Ok(Some(GestureSummary {
            hands: drag.processed.into_iter().collect(),
            mode: drag.mode,
        }))
    }
}
