//! SessionBuilder - EditorSession の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - 設定（action テンプレートの名前）は open() 時に検証する
//! - ストアの読み込み失敗は致命的ではない: デフォルトで起動して警告を積む

use tracing::{info, warn};

use super::session::{EditorSession, Unsaved, Warning};
use crate::config::EditorConfig;
use crate::domain::errors::validate_name;
use crate::domain::{ActionRegistry, ErrorKind, HandFrequencies, ModelError};
use crate::library::{LibraryTree, decode_actions, decode_tree};
use crate::paint::PaintGesture;
use crate::ports::{ACTIONS_KEY, Clock, KeyValueStore, LIBRARY_KEY, SystemClock, UlidGenerator};

/// # 使用例
/// ```ignore
/// let session = EditorSession::builder(FileStore::open(dir)?)
///     .config(config)
///     .open()?;
/// ```
pub struct SessionBuilder<S, C = SystemClock> {
    store: S,
    config: EditorConfig,
    clock: C,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("config: {which} action name must not be blank")]
    BlankTemplateName { which: &'static str },
}

impl<S: KeyValueStore> SessionBuilder<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: EditorConfig::default(),
            clock: SystemClock,
        }
    }
}

impl<S: KeyValueStore, C: Clock> SessionBuilder<S, C> {
    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the clock (tests pin it with `FixedClock`).
    pub fn clock<C2: Clock>(self, clock: C2) -> SessionBuilder<S, C2> {
        SessionBuilder {
            store: self.store,
            config: self.config,
            clock,
        }
    }

    /// Validates the config, then loads both stored blobs.
    pub fn open(self) -> Result<EditorSession<S, C>, BuildError> {
        let fallback_name = validate_name(&self.config.fallback_action.name)
            .map_err(|_| BuildError::BlankTemplateName { which: "fallback" })?;
        validate_name(&self.config.new_action.name)
            .map_err(|_| BuildError::BlankTemplateName { which: "new" })?;

        let mut warnings = Vec::new();
        let template = ActionRegistry::new(fallback_name, self.config.fallback_action.color.clone());

        let registry = match load(&self.store, ACTIONS_KEY, |text| Ok(decode_actions(text)?)) {
            Ok(Some(actions)) => ActionRegistry::from_actions(actions, &template),
            Ok(None) => template,
            Err(e) => {
                warn!(key = ACTIONS_KEY, error = %e, "starting with default actions");
                warnings.push(Warning::from_error(&e));
                template
            }
        };

        let tree = match load(&self.store, LIBRARY_KEY, |text| Ok(decode_tree(text)?)) {
            Ok(Some(tree)) => tree,
            Ok(None) => LibraryTree::new(),
            Err(e) => {
                warn!(key = LIBRARY_KEY, error = %e, "starting with an empty library");
                warnings.push(Warning::from_error(&e));
                LibraryTree::new()
            }
        };

        info!(
            actions = registry.len(),
            nodes = tree.ids().len(),
            "editor session opened"
        );

        Ok(EditorSession {
            config: self.config,
            store: self.store,
            ids: UlidGenerator::new(self.clock),
            registry,
            mixes: Vec::new(),
            brush: None,
            frequencies: HandFrequencies::new(),
            gesture: PaintGesture::new(),
            tree,
            selected: None,
            loaded: None,
            leaf_actions: false,
            unsaved: Unsaved::default(),
            warnings,
        })
    }
}

fn load<S: KeyValueStore, T>(
    store: &S,
    key: &str,
    decode: impl FnOnce(&str) -> Result<T, ModelError>,
) -> Result<Option<T>, ModelError> {
    match store.get(key)? {
        Some(text) => decode(&text).map(Some),
        None => Ok(None),
    }
}

impl Warning {
    pub(crate) fn from_error(error: &ModelError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn is_persistence(&self) -> bool {
        self.kind == ErrorKind::Persistence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActionTemplate;
    use crate::impls::InMemoryStore;

    #[test]
    fn open_with_empty_store_gives_defaults() {
        let session = SessionBuilder::new(InMemoryStore::new()).open().unwrap();
        assert_eq!(session.actions().len(), 1);
        assert_eq!(session.actions().fallback().name, "Fold");
        assert!(session.tree().is_empty());
        assert!(session.warnings().is_empty());
    }

    #[test]
    fn blank_template_name_fails_fast() {
        let mut config = EditorConfig::default();
        config.new_action = ActionTemplate {
            name: " ".into(),
            color: config.new_action.color.clone(),
        };
        let result = SessionBuilder::new(InMemoryStore::new()).config(config).open();
        assert!(matches!(result, Err(BuildError::BlankTemplateName { which: "new" })));
    }

    #[test]
    fn corrupt_blobs_open_with_warnings_and_are_left_alone() {
        let mut store = InMemoryStore::with_value(LIBRARY_KEY, "{not json");
        store.set(ACTIONS_KEY, "[1,2,3]").unwrap();

        let session = SessionBuilder::new(store).open().unwrap();
        assert_eq!(session.warnings().len(), 2);
        assert!(session.warnings().iter().all(Warning::is_persistence));
        assert!(session.tree().is_empty());

        let store = session.into_store();
        assert_eq!(store.raw(LIBRARY_KEY), Some("{not json"));
    }

    #[test]
    fn stored_actions_without_fallback_get_one() {
        let store = InMemoryStore::with_value(
            ACTIONS_KEY,
            r##"[{"id":"01HV0000000000000000000001","name":"Raise","color":"#ff0000"}]"##,
        );
        let session = SessionBuilder::new(store).open().unwrap();
        let names: Vec<&str> = session.actions().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Fold", "Raise"]);
    }
}
