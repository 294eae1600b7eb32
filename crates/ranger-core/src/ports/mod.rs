//! Ports - 抽象化レイヤー
//!
//! 外部（時刻・ID 生成・永続化ストア）へのインターフェース。
//! 実装は `impls` に置く。

pub mod clock;
pub mod id_generator;
pub mod store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::store::{ACTIONS_KEY, KeyValueStore, LIBRARY_KEY, StoreError};
