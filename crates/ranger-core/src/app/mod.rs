//! App - アプリケーション層
//!
//! domain / paint / library を ports と組み合わせて、1 つの編集セッションにまとめる。
//!
//! # 主要コンポーネント
//! - **SessionBuilder**: 設定とストアの読み込み、セッションの構築
//! - **EditorSession**: すべての編集操作の入口（状態の唯一の所有者）
//! - **SessionStatus**: 集計ビュー

pub mod builder;
pub mod session;
pub mod status;

pub use self::builder::{BuildError, SessionBuilder};
pub use self::session::{EditorSession, Warning};
pub use self::status::{ActionCoverage, SessionStatus};
