//! EditorSession - 1 つの編集セッションが持つ全状態
//!
//! Registry / Mix / Brush / 頻度マップ / ライブラリツリーはすべてこの
//! セッションが排他的に所有する。UI（グリッド、パネル）は読み取りと、
//! ここに定義された操作の呼び出しだけを行う。
//!
//! # モデル境界
//! 各操作は `Option<T>` / `bool` を返し、エラーは外に出さない:
//! - Reference: debug ログのみ（完全な no-op）
//! - Validation / Invariant / Persistence: ログ + ユーザー向け警告
//!
//! # 永続化
//! in-memory の変更が完了した後にだけストアへ書く。
//! - 読み込みに失敗した blob は、次の変更まで書き戻さない
//! - leaf から読み込んだ action 一覧はデフォルト一覧として保存しない

use tracing::{debug, info, warn};

use super::status::SessionStatus;
use crate::config::EditorConfig;
use crate::domain::{
    ActionId, ActionMix, ActionPatch, ActionRegistry, Brush, ErrorKind, Hand, HandFrequencies,
    MixId, MixPatch, ModelError, NodeId,
};
use crate::library::{LeafSnapshot, LibraryTree, encode_actions, encode_tree};
use crate::paint::{
    GestureSummary, PaintGesture, PaintMode, apply_brush_to_hand, resolve_brush_to_entries,
};
use crate::ports::{ACTIONS_KEY, Clock, IdGenerator, KeyValueStore, LIBRARY_KEY, SystemClock, UlidGenerator};

use super::builder::SessionBuilder;

/// User-visible notice produced by a rejected or partially failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: ErrorKind,
    pub message: String,
}

/// Blobs whose last write did not reach the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Unsaved {
    pub(crate) actions: bool,
    pub(crate) tree: bool,
}

pub struct EditorSession<S, C = SystemClock> {
    pub(crate) config: EditorConfig,
    pub(crate) store: S,
    pub(crate) ids: UlidGenerator<C>,
    pub(crate) registry: ActionRegistry,
    pub(crate) mixes: Vec<ActionMix>,
    pub(crate) brush: Option<Brush>,
    pub(crate) frequencies: HandFrequencies,
    pub(crate) gesture: PaintGesture,
    pub(crate) tree: LibraryTree,
    pub(crate) selected: Option<NodeId>,
    pub(crate) loaded: Option<NodeId>,
    /// The registry holds a leaf's actions, not the stored defaults.
    pub(crate) leaf_actions: bool,
    pub(crate) unsaved: Unsaved,
    pub(crate) warnings: Vec<Warning>,
}

impl<S: KeyValueStore> EditorSession<S, SystemClock> {
    pub fn builder(store: S) -> SessionBuilder<S, SystemClock> {
        SessionBuilder::new(store)
    }
}

impl<S: KeyValueStore, C: Clock> EditorSession<S, C> {
    // ========================================
    // 読み取り
    // ========================================

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn mixes(&self) -> &[ActionMix] {
        &self.mixes
    }

    pub fn active_brush(&self) -> Option<Brush> {
        self.brush
    }

    pub fn frequencies(&self) -> &HandFrequencies {
        &self.frequencies
    }

    pub fn tree(&self) -> &LibraryTree {
        &self.tree
    }

    /// Default insertion parent for new library nodes.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Leaf whose snapshot is currently loaded, if any.
    pub fn loaded(&self) -> Option<NodeId> {
        self.loaded
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// Hands touched by the running gesture.
    pub fn highlighted(&self) -> Vec<Hand> {
        self.gesture.highlighted().collect()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus::collect(self)
    }

    // ========================================
    // Action registry
    // ========================================

    /// Creates an action with the configured default name and color.
    pub fn add_action(&mut self) -> ActionId {
        let id = self.ids.generate_action_id();
        let template = &self.config.new_action;
        self.registry.add(id, template.name.clone(), template.color.clone());
        debug!(%id, "action added");
        self.persist_actions();
        id
    }

    pub fn update_action(&mut self, id: ActionId, patch: ActionPatch) -> bool {
        let result = self.registry.update(id, patch);
        if self.settle("update_action", result).is_none() {
            return false;
        }
        self.persist_actions();
        true
    }

    /// Deletes the action and every reference to it.
    ///
    /// Hands left without entries disappear from the map, mixes forget the
    /// action (a mix left empty is deleted) and a brush pointing at either
    /// is cleared.
    pub fn delete_action(&mut self, id: ActionId) -> bool {
        let result = self.registry.remove(id);
        let Some(removed) = self.settle("delete_action", result) else {
            return false;
        };

        let hands = self.frequencies.purge_action(id);
        let mut dropped = Vec::new();
        self.mixes.retain_mut(|mix| {
            let keep = mix.forget_action(id);
            if !keep {
                dropped.push(mix.id);
            }
            keep
        });
        match self.brush {
            Some(Brush::Simple(action)) if action == id => self.brush = None,
            Some(Brush::Mix(mix)) if dropped.contains(&mix) => self.brush = None,
            _ => {}
        }
        info!(%id, name = %removed.name, hands, mixes = dropped.len(), "action deleted");
        self.persist_actions();
        true
    }

    // ========================================
    // Mixes and brush
    // ========================================

    /// New single-action mix on the first user action (or the fallback).
    pub fn add_mix(&mut self) -> MixId {
        let first = self
            .registry
            .iter()
            .find(|a| !a.id.is_fallback())
            .unwrap_or_else(|| self.registry.fallback())
            .id;
        let id = self.ids.generate_mix_id();
        self.mixes.push(ActionMix::new(id, first));
        id
    }

    pub fn update_mix(&mut self, id: MixId, patch: MixPatch) -> bool {
        let result = self.check_mix_patch(id, &patch);
        if self.settle("update_mix", result).is_none() {
            return false;
        }
        if let Some(mix) = self.mixes.iter_mut().find(|m| m.id == id) {
            if let Some(first) = patch.first {
                mix.first = first;
            }
            if let Some(second) = patch.second {
                mix.second = second;
            }
            if let Some(weight) = patch.weight {
                mix.weight = weight;
            }
        }
        true
    }

    fn check_mix_patch(&self, id: MixId, patch: &MixPatch) -> Result<(), ModelError> {
        if !self.mixes.iter().any(|m| m.id == id) {
            return Err(ModelError::mix_not_found(id));
        }
        let referenced = patch.first.into_iter().chain(patch.second.flatten());
        for action in referenced {
            if !self.registry.contains(action) {
                return Err(ModelError::action_not_found(action));
            }
        }
        Ok(())
    }

    pub fn delete_mix(&mut self, id: MixId) -> bool {
        let Some(index) = self.mixes.iter().position(|m| m.id == id) else {
            self.settle::<()>("delete_mix", Err(ModelError::mix_not_found(id)));
            return false;
        };
        self.mixes.remove(index);
        if self.brush == Some(Brush::Mix(id)) {
            self.brush = None;
        }
        true
    }

    /// Selects the paint source; `None` disables painting.
    pub fn set_active_brush(&mut self, brush: Option<Brush>) -> bool {
        let result = match brush {
            Some(Brush::Simple(id)) if !self.registry.contains(id) => Err(ModelError::action_not_found(id)),
            Some(Brush::Mix(id)) if !self.mixes.iter().any(|m| m.id == id) => {
                Err(ModelError::mix_not_found(id))
            }
            _ => Ok(()),
        };
        if self.settle("set_active_brush", result).is_none() {
            return false;
        }
        self.brush = brush;
        true
    }

    // ========================================
    // Painting
    // ========================================

    fn resolved_brush(&self) -> Option<Vec<crate::domain::FrequencyEntry>> {
        self.brush
            .and_then(|brush| resolve_brush_to_entries(brush, &self.mixes))
    }

    /// Pointer pressed on `hand`. Ignored without an active brush.
    pub fn pointer_down(&mut self, hand: Hand) -> bool {
        let entries = self.resolved_brush();
        let result = self.gesture.pointer_down(&mut self.frequencies, hand, entries);
        self.settle("pointer_down", result).unwrap_or(false)
    }

    /// Pointer entered `hand` while pressed.
    pub fn pointer_move(&mut self, hand: Hand) -> bool {
        let result = self.gesture.pointer_move(&mut self.frequencies, hand);
        self.settle("pointer_move", result).unwrap_or(false)
    }

    /// Pointer released, anywhere (including outside the grid).
    pub fn pointer_up(&mut self) -> Option<GestureSummary> {
        let result = self.gesture.pointer_up(&mut self.frequencies);
        self.settle("pointer_up", result).flatten()
    }

    /// Discrete click: toggles exactly one hand.
    pub fn click(&mut self, hand: Hand) -> bool {
        self.pointer_down(hand) && self.pointer_up().is_some()
    }

    /// Paints one hand outside any gesture.
    pub fn paint(&mut self, hand: Hand, mode: PaintMode) -> bool {
        let Some(entries) = self.resolved_brush() else {
            return false;
        };
        let result = apply_brush_to_hand(&mut self.frequencies, hand, &entries, mode);
        self.settle("paint", result).unwrap_or(false)
    }

    /// Clears every hand and drops a running gesture.
    pub fn reset_grid(&mut self) {
        self.gesture = PaintGesture::new();
        self.frequencies.reset();
    }

    // ========================================
    // Library
    // ========================================

    /// Selects the default insertion parent. `None` selects root.
    pub fn select(&mut self, id: Option<NodeId>) -> bool {
        if let Some(id) = id {
            if !self.tree.contains(id) {
                self.settle::<()>("select", Err(ModelError::node_not_found(id)));
                return false;
            }
        }
        self.selected = id;
        true
    }

    /// Creates a folder under the selected node.
    pub fn create_folder(&mut self, name: &str) -> Option<NodeId> {
        self.create_folder_in(name, self.selected)
    }

    pub fn create_folder_in(&mut self, name: &str, parent: Option<NodeId>) -> Option<NodeId> {
        let id = self.ids.generate_node_id();
        let result = self.tree.create_folder(id, name, parent);
        let id = self.settle("create_folder", result)?;
        self.persist_tree();
        Some(id)
    }

    /// Saves the current map and actions as a leaf under the selected node.
    pub fn create_leaf(&mut self, name: &str) -> Option<NodeId> {
        self.create_leaf_in(name, self.selected)
    }

    pub fn create_leaf_in(&mut self, name: &str, parent: Option<NodeId>) -> Option<NodeId> {
        let id = self.ids.generate_node_id();
        let snapshot = LeafSnapshot {
            frequencies: self.frequencies.clone(),
            actions: self.registry.to_vec(),
        };
        let created_at = self.ids.clock().now();
        let result = self.tree.create_leaf(id, name, parent, snapshot, created_at);
        let id = self.settle("create_leaf", result)?;
        info!(%id, hands = self.frequencies.len(), "decision set saved");
        self.persist_tree();
        Some(id)
    }

    pub fn rename(&mut self, id: NodeId, name: &str) -> bool {
        let result = self.tree.rename(id, name);
        if self.settle("rename", result).is_none() {
            return false;
        }
        self.persist_tree();
        true
    }

    /// Deletes the node (recursively for folders).
    pub fn delete(&mut self, id: NodeId) -> bool {
        let result = self.tree.delete(id);
        let Some(removed) = self.settle("delete", result) else {
            return false;
        };
        let gone = removed.subtree_ids();
        if self.loaded.is_some_and(|loaded| gone.contains(&loaded)) {
            self.loaded = None;
        }
        if self.selected.is_some_and(|selected| gone.contains(&selected)) {
            self.selected = None;
        }
        self.persist_tree();
        true
    }

    /// Drag-and-drop in the library; see [`LibraryTree::move_node`].
    pub fn move_node(&mut self, active: NodeId, over: Option<NodeId>) -> bool {
        let result = self.tree.move_node(active, over);
        if self.settle("move_node", result).is_none() {
            return false;
        }
        self.persist_tree();
        true
    }

    /// Replaces the live map and actions with a copy of the leaf's snapshot.
    pub fn load_leaf(&mut self, id: NodeId) -> bool {
        let result = self
            .tree
            .leaf(id)
            .map(|leaf| (leaf.frequencies.clone(), leaf.actions.clone()))
            .ok_or(ModelError::node_not_found(id));
        let Some((frequencies, actions)) = self.settle("load_leaf", result) else {
            return false;
        };

        self.registry = ActionRegistry::from_actions(actions, &self.registry);
        self.frequencies = frequencies;
        self.gesture = PaintGesture::new();
        self.drop_dangling_references();
        self.loaded = Some(id);
        self.leaf_actions = true;
        info!(%id, hands = self.frequencies.len(), "decision set loaded");
        true
    }

    /// Mixes and brush may point at actions the loaded registry lacks.
    fn drop_dangling_references(&mut self) {
        let registry = &self.registry;
        let mut dropped = Vec::new();
        self.mixes.retain_mut(|mix| {
            let missing: Vec<ActionId> = [Some(mix.first), mix.second]
                .into_iter()
                .flatten()
                .filter(|id| !registry.contains(*id))
                .collect();
            let keep = missing.into_iter().all(|id| mix.forget_action(id));
            if !keep {
                dropped.push(mix.id);
            }
            keep
        });
        let stale = match self.brush {
            Some(Brush::Simple(id)) => !self.registry.contains(id),
            Some(Brush::Mix(id)) => dropped.contains(&id),
            None => false,
        };
        if stale {
            self.brush = None;
        }
    }

    // ========================================
    // Lifecycle
    // ========================================

    /// Retries writes that failed earlier and hands the store back.
    ///
    /// Blobs that were never changed are not written, so a blob that failed
    /// to load stays in the store as it was.
    pub fn close(mut self) -> S {
        if self.unsaved.actions {
            self.persist_actions();
        }
        if self.unsaved.tree {
            self.persist_tree();
        }
        info!(unsaved = ?self.unsaved, "editor session closed");
        self.store
    }

    /// Hands the store back without writing.
    pub fn into_store(self) -> S {
        self.store
    }

    // ========================================
    // 内部
    // ========================================

    fn persist_actions(&mut self) {
        if self.leaf_actions {
            debug!("registry comes from a leaf, default actions left as stored");
            self.unsaved.actions = false;
            return;
        }
        let result = encode_actions(&self.registry.to_vec())
            .map_err(ModelError::from)
            .and_then(|text| Ok(self.store.set(ACTIONS_KEY, &text)?));
        self.unsaved.actions = self.settle("persist_actions", result).is_none();
    }

    fn persist_tree(&mut self) {
        let result = encode_tree(&self.tree)
            .map_err(ModelError::from)
            .and_then(|text| Ok(self.store.set(LIBRARY_KEY, &text)?));
        self.unsaved.tree = self.settle("persist_tree", result).is_none();
    }

    /// Converts a model error into a log line and, unless it is a plain
    /// reference miss, a user-visible warning.
    fn settle<T>(&mut self, op: &'static str, result: Result<T, ModelError>) -> Option<T> {
        let error = match result {
            Ok(value) => return Some(value),
            Err(error) => error,
        };
        match error.kind() {
            ErrorKind::Reference => {
                debug!(op, %error, "ignored");
                return None;
            }
            ErrorKind::Validation => info!(op, %error, "rejected"),
            ErrorKind::Invariant | ErrorKind::Persistence => warn!(op, %error, "rejected"),
        }
        self.warnings.push(Warning::from_error(&error));
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Color, FrequencyEntry, Weight};
    use crate::impls::InMemoryStore;
    use crate::library::{TreeNode, decode_tree};
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    type TestSession = EditorSession<InMemoryStore, FixedClock>;

    fn session() -> TestSession {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        EditorSession::builder(InMemoryStore::new())
            .clock(clock)
            .open()
            .unwrap()
    }

    fn hand(label: &str) -> Hand {
        label.parse().unwrap()
    }

    fn named_action(s: &mut TestSession, name: &str) -> ActionId {
        let id = s.add_action();
        assert!(s.update_action(id, ActionPatch::name(name)));
        id
    }

    #[test]
    fn add_action_uses_template_and_persists() {
        let mut s = session();
        let id = s.add_action();
        let action = s.actions().get(id).unwrap();
        assert_eq!(action.name, "New Action");
        assert_eq!(action.color.as_str(), "#aabbcc");

        let store = s.into_store();
        assert!(store.raw(ACTIONS_KEY).unwrap().contains(&id.as_ulid().to_string()));
    }

    #[test]
    fn delete_fallback_is_rejected_with_warning() {
        let mut s = session();
        let before = s.actions().clone();
        assert!(!s.delete_action(ActionId::FALLBACK));
        assert_eq!(s.actions(), &before);
        assert_eq!(s.take_warnings()[0].kind, ErrorKind::Invariant);
    }

    #[test]
    fn delete_unknown_action_is_silent() {
        let mut s = session();
        let other = ActionId::from_ulid(ulid::Ulid::new());
        assert!(!s.delete_action(other));
        assert!(s.warnings().is_empty());
    }

    #[test]
    fn delete_action_purges_hands_mixes_and_brush() {
        let mut s = session();
        let raise = named_action(&mut s, "Raise");
        let call = named_action(&mut s, "Call");

        let mix = s.add_mix();
        s.update_mix(mix, MixPatch {
            first: Some(raise),
            second: Some(Some(call)),
            weight: Some(Weight::new(70).unwrap()),
        });
        s.set_active_brush(Some(Brush::Mix(mix)));
        s.click(hand("AKs"));
        s.set_active_brush(Some(Brush::Simple(raise)));
        s.click(hand("AA"));

        assert!(s.delete_action(raise));

        assert!(!s.actions().contains(raise));
        assert!(!s.frequencies().contains(hand("AA")));
        assert_eq!(
            s.frequencies().get(hand("AKs")),
            Some(&[FrequencyEntry::new(call, Weight::new(30).unwrap())][..])
        );
        assert_eq!(s.active_brush(), None);
        assert_eq!(s.mixes()[0].first, call);
        assert_eq!(s.mixes()[0].second, None);
    }

    #[test]
    fn deleting_the_only_action_of_an_active_mix_drops_both() {
        let mut s = session();
        let raise = named_action(&mut s, "Raise");
        let mix = s.add_mix();
        assert_eq!(s.mixes()[0].first, raise);
        s.set_active_brush(Some(Brush::Mix(mix)));

        s.delete_action(raise);

        assert!(s.mixes().is_empty());
        assert_eq!(s.active_brush(), None);
    }

    #[test]
    fn brush_must_reference_something_that_exists() {
        let mut s = session();
        assert!(!s.set_active_brush(Some(Brush::Mix(MixId::from_ulid(ulid::Ulid::new())))));
        assert_eq!(s.active_brush(), None);
        assert!(s.set_active_brush(Some(Brush::Simple(ActionId::FALLBACK))));
        assert!(s.set_active_brush(None));
    }

    #[test]
    fn update_mix_rejects_unknown_actions() {
        let mut s = session();
        let mix = s.add_mix();
        let before = s.mixes().to_vec();
        let ghost = ActionId::from_ulid(ulid::Ulid::new());
        assert!(!s.update_mix(mix, MixPatch {
            first: Some(ghost),
            ..MixPatch::default()
        }));
        assert_eq!(s.mixes(), &before[..]);
    }

    #[test]
    fn delete_mix_clears_active_brush() {
        let mut s = session();
        let mix = s.add_mix();
        s.set_active_brush(Some(Brush::Mix(mix)));
        assert!(s.delete_mix(mix));
        assert_eq!(s.active_brush(), None);
        assert!(!s.delete_mix(mix));
    }

    #[test]
    fn painting_without_brush_does_nothing() {
        let mut s = session();
        assert!(!s.pointer_down(hand("AA")));
        assert!(!s.is_dragging());
        assert!(!s.click(hand("AA")));
        assert!(s.frequencies().is_empty());
    }

    #[test]
    fn leaf_snapshot_is_decoupled_from_session() {
        let mut s = session();
        let raise = named_action(&mut s, "Raise");
        s.set_active_brush(Some(Brush::Simple(raise)));
        s.click(hand("AA"));

        let leaf = s.create_leaf("BTN").unwrap();
        s.click(hand("KK"));
        s.update_action(raise, ActionPatch::color("#000000".parse::<Color>().unwrap()));

        let saved = s.tree().leaf(leaf).unwrap();
        assert_eq!(saved.frequencies.len(), 1);
        assert_eq!(saved.actions[1].color.as_str(), "#aabbcc");
        assert_eq!(saved.created_at, Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn load_leaf_replaces_session_state_with_a_copy() {
        let mut s = session();
        let raise = named_action(&mut s, "Raise");
        s.set_active_brush(Some(Brush::Simple(raise)));
        s.click(hand("AA"));
        let leaf = s.create_leaf("BTN").unwrap();

        s.reset_grid();
        s.delete_action(raise);
        assert!(s.load_leaf(leaf));

        assert_eq!(s.loaded(), Some(leaf));
        assert!(s.actions().contains(raise));
        assert_eq!(s.frequencies().get(hand("AA")), Some(&[FrequencyEntry::full(raise)][..]));

        // editing after load leaves the tree untouched
        s.set_active_brush(Some(Brush::Simple(raise)));
        s.click(hand("AA"));
        assert!(!s.frequencies().contains(hand("AA")));
        assert!(s.tree().leaf(leaf).unwrap().frequencies.contains(hand("AA")));
    }

    #[test]
    fn load_leaf_drops_a_brush_the_snapshot_cannot_resolve() {
        let mut s = session();
        let leaf = s.create_leaf("empty").unwrap();
        let raise = named_action(&mut s, "Raise");
        s.set_active_brush(Some(Brush::Simple(raise)));

        s.load_leaf(leaf);

        assert!(!s.actions().contains(raise));
        assert_eq!(s.active_brush(), None);
    }

    #[test]
    fn load_folder_is_a_reference_miss() {
        let mut s = session();
        let folder = s.create_folder("Cash").unwrap();
        assert!(!s.load_leaf(folder));
        assert_eq!(s.loaded(), None);
    }

    #[test]
    fn create_uses_selected_node_as_parent() {
        let mut s = session();
        let folder = s.create_folder("Cash").unwrap();
        s.select(Some(folder));
        let leaf = s.create_leaf("CO").unwrap();
        assert_eq!(s.tree().position_of(leaf).unwrap().parent, Some(folder));

        s.select(None);
        let top = s.create_folder("MTT").unwrap();
        assert_eq!(s.tree().position_of(top).unwrap().parent, None);
    }

    #[test]
    fn blank_name_is_rejected_before_mutation() {
        let mut s = session();
        assert_eq!(s.create_folder("   "), None);
        assert!(s.tree().is_empty());
        assert_eq!(s.take_warnings()[0].kind, ErrorKind::Validation);
        assert_eq!(s.into_store().raw(LIBRARY_KEY), None);
    }

    #[test]
    fn delete_clears_loaded_and_selected_inside_subtree() {
        let mut s = session();
        let folder = s.create_folder("Cash").unwrap();
        let leaf = s.create_leaf_in("CO", Some(folder)).unwrap();
        s.load_leaf(leaf);
        s.select(Some(leaf));

        assert!(s.delete(folder));

        assert_eq!(s.loaded(), None);
        assert_eq!(s.selected(), None);
        assert!(s.tree().is_empty());
    }

    #[test]
    fn tree_is_persisted_after_each_change() {
        let mut s = session();
        let a = s.create_folder("A").unwrap();
        let b = s.create_folder("B").unwrap();
        s.move_node(b, Some(a));
        s.rename(a, "Renamed");

        let store = s.into_store();
        let stored = decode_tree(store.raw(LIBRARY_KEY).unwrap()).unwrap();
        let TreeNode::Folder(root) = &stored.roots()[0] else {
            panic!("expected folder");
        };
        assert_eq!(root.name, "Renamed");
        assert_eq!(root.children[0].id(), b);
    }

    #[test]
    fn failed_write_warns_and_keeps_previous_blob() {
        let mut s = session();
        s.create_folder("A").unwrap();
        let good = s.store.raw(LIBRARY_KEY).unwrap().to_string();

        s.store.fail_writes(true);
        let b = s.create_folder("B");

        // in-memory change applied, store untouched
        assert!(b.is_some());
        assert_eq!(s.tree().roots().len(), 2);
        assert!(s.take_warnings()[0].is_persistence());
        assert_eq!(s.store.raw(LIBRARY_KEY), Some(good.as_str()));
    }

    #[test]
    fn close_flushes_and_reopen_restores() {
        let mut s = session();
        let raise = named_action(&mut s, "Raise");
        let folder = s.create_folder("Cash").unwrap();
        let store = s.close();

        let reopened = EditorSession::builder(store).open().unwrap();
        assert!(reopened.actions().contains(raise));
        assert!(reopened.tree().contains(folder));
    }

    #[test]
    fn close_leaves_an_undecodable_library_untouched() {
        let raise = ulid::Ulid::from_parts(5, 1).to_string();
        let corrupt = serde_json::json!([
            {"type": "folder", "id": ulid::Ulid::from_parts(4, 1).to_string(), "name": "Cash", "children": [
                {"type": "leaf", "id": ulid::Ulid::from_parts(4, 2).to_string(), "name": "BTN",
                 "handFrequencies": {"dataType": "Map", "value": [
                     ["AA", [{"actionId": raise, "frequency": 80}, {"actionId": raise, "frequency": 80}]]
                 ]},
                 "customActions": [], "createdAt": 0}
            ]}
        ])
        .to_string();
        let store = InMemoryStore::with_value(LIBRARY_KEY, &corrupt);

        let s = EditorSession::builder(store).open().unwrap();
        assert!(s.warnings()[0].is_persistence());
        let store = s.close();

        assert_eq!(store.raw(LIBRARY_KEY), Some(corrupt.as_str()));
        assert_eq!(store.raw(ACTIONS_KEY), None);
    }

    #[test]
    fn close_retries_a_failed_write() {
        let mut s = session();
        s.store.fail_writes(true);
        let folder = s.create_folder("Cash").unwrap();
        assert_eq!(s.store.raw(LIBRARY_KEY), None);

        s.store.fail_writes(false);
        let store = s.close();

        let stored = decode_tree(store.raw(LIBRARY_KEY).unwrap()).unwrap();
        assert!(stored.contains(folder));
    }

    #[test]
    fn loaded_leaf_actions_never_replace_the_defaults() {
        let mut s = session();
        let raise = named_action(&mut s, "Raise");
        let leaf = s.create_leaf("BTN").unwrap();
        let call = named_action(&mut s, "Call");
        let store = s.close();

        let mut s = EditorSession::builder(store).open().unwrap();
        assert!(s.load_leaf(leaf));
        assert!(!s.actions().contains(call));
        s.add_action();
        s.update_action(raise, ActionPatch::name("Open"));
        let store = s.close();

        let defaults = crate::library::decode_actions(store.raw(ACTIONS_KEY).unwrap()).unwrap();
        let names: Vec<&str> = defaults.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Fold", "Raise", "Call"]);
    }

    #[test]
    fn reset_ends_a_running_gesture() {
        let mut s = session();
        let raise = named_action(&mut s, "Raise");
        s.set_active_brush(Some(Brush::Simple(raise)));

        s.pointer_down(hand("AA"));
        assert!(s.is_dragging());
        s.reset_grid();

        assert!(!s.is_dragging());
        assert_eq!(s.pointer_up(), None);
        assert!(s.frequencies().is_empty());
    }
}
