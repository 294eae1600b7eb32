//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryStore**: テスト・開発用の KeyValueStore
//! - **FileStore**: ディレクトリ内にキーごとに 1 ファイルで保存する KeyValueStore

pub mod file_store;
pub mod inmem_store;

pub use self::file_store::FileStore;
pub use self::inmem_store::InMemoryStore;
