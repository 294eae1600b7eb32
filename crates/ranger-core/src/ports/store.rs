//! KeyValueStore port - 永続化ストア
//!
//! 論理ストアごとに 1 つのテキスト blob を固定キーで保存する。
//! 値は `library::codec` のエンコード結果。
//!
//! # 設計原則
//! - 書き込みは in-memory の変更が終わった後にだけ行う
//! - 書き込みに失敗しても、以前の正しい値を壊さない

/// Key of the action-defaults blob.
pub const ACTIONS_KEY: &str = "defaultCustomActions";

/// Key of the library tree blob.
pub const LIBRARY_KEY: &str = "rangeTree";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("io error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

pub trait KeyValueStore {
    /// `Ok(None)` when nothing was stored under `key` yet.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value. On error the previous value stays intact.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}
