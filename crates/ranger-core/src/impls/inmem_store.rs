//! InMemoryStore - 開発・テスト用の KeyValueStore
//!
//! `fail_writes(true)` で書き込み失敗を再現できる（PersistenceError のテスト用）。

use std::collections::HashMap;

use crate::ports::{KeyValueStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の値を持った状態で作成
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable(format!("writes disabled for '{key}'")));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
