//! Status - セッションの集計ビュー

use serde::Serialize;

use super::session::EditorSession;
use crate::domain::ActionId;
use crate::ports::{Clock, KeyValueStore};

/// Per-action share of the combo space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionCoverage {
    pub id: ActionId,
    pub name: String,
    /// Percent of the 1326 combos, weighted by frequency.
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStatus {
    pub actions: usize,
    pub mixes: usize,
    pub painted_hands: usize,
    pub folders: usize,
    pub leaves: usize,
    pub coverage: Vec<ActionCoverage>,
    pub warnings: usize,
}

impl SessionStatus {
    pub(crate) fn collect<S: KeyValueStore, C: Clock>(session: &EditorSession<S, C>) -> Self {
        let tree = session.tree();
        let leaves = tree.leaves().count();
        let freqs = session.frequencies();
        // absent hands are implicitly folded, so the fallback is reported too
        let coverage = session
            .actions()
            .iter()
            .map(|action| ActionCoverage {
                id: action.id,
                name: action.name.clone(),
                percent: freqs.coverage(action.id),
            })
            .collect();

        Self {
            actions: session.actions().len(),
            mixes: session.mixes().len(),
            painted_hands: freqs.len(),
            folders: tree.ids().len() - leaves,
            leaves,
            coverage,
            warnings: session.warnings().len(),
        }
    }

    pub fn coverage_of(&self, id: ActionId) -> Option<f64> {
        self.coverage.iter().find(|c| c.id == id).map(|c| c.percent)
    }
}
