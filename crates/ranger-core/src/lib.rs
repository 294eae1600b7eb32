//! ranger-core
//!
//! Core building blocks for the Ranger preflop decision-set editor.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（hand, ids, action, frequency, mix, errors）
//! - **paint**: ブラシ適用とペイントジェスチャ（状態機械）
//! - **library**: 保存済み decision set のツリーと永続化コーデック
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, KeyValueStore）
//! - **impls**: 実装（InMemoryStore, FileStore）
//! - **app**: EditorSession とその構築
//! - **config**: TOML 設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod library;
pub mod paint;
pub mod ports;

pub use app::{EditorSession, SessionBuilder, SessionStatus, Warning};
pub use config::EditorConfig;
