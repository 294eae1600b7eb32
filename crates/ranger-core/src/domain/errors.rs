//! Errors - エラー型と分類
//!
//! モデル境界の内側では `Result<_, ModelError>` で伝播し、
//! `EditorSession` が分類（ErrorKind）に応じて
//! ログ / ユーザー向け警告に変換する。境界の外には出さない。

use crate::domain::ids::{ActionId, MixId, NodeId};

/// ErrorKind は ModelError の分類
///
/// - Validation: 空の名前など、変更前に弾く入力エラー
/// - Reference: 対象 ID が存在しない（ログのみ、完全な no-op）
/// - Invariant: fallback action の削除、循環する move など（警告）
/// - Persistence: ストアの読み書き失敗（警告）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Reference,
    Invariant,
    Persistence,
}

/// 参照切れになった ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRef {
    Action(ActionId),
    Mix(MixId),
    Node(NodeId),
}

impl std::fmt::Display for MissingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingRef::Action(id) => write!(f, "{id}"),
            MissingRef::Mix(id) => write!(f, "{id}"),
            MissingRef::Node(id) => write!(f, "{id}"),
        }
    }
}

/// ModelError はドメインエラー
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("name must not be blank")]
    BlankName,

    #[error("weight {0} is outside 0..=100")]
    WeightOutOfRange(u32),

    #[error("weights for {hand} sum to {total}, above 100")]
    WeightOverflow { hand: String, total: u32 },

    #[error("{0} not found")]
    NotFound(MissingRef),

    #[error("the fallback action cannot be deleted")]
    FallbackAction,

    #[error("cannot move {active} onto itself")]
    MoveOntoSelf { active: NodeId },

    #[error("cannot move {active} into its own descendant {over}")]
    MoveIntoDescendant { active: NodeId, over: NodeId },

    #[error("persistence failed: {0}")]
    Persistence(#[from] crate::ports::StoreError),

    #[error("stored data could not be decoded: {0}")]
    Codec(#[from] crate::library::CodecError),
}

impl ModelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::BlankName
            | ModelError::WeightOutOfRange(_)
            | ModelError::WeightOverflow { .. } => ErrorKind::Validation,
            ModelError::NotFound(_) => ErrorKind::Reference,
            ModelError::FallbackAction
            | ModelError::MoveOntoSelf { .. }
            | ModelError::MoveIntoDescendant { .. } => ErrorKind::Invariant,
            ModelError::Persistence(_) | ModelError::Codec(_) => ErrorKind::Persistence,
        }
    }

    pub fn action_not_found(id: ActionId) -> Self {
        ModelError::NotFound(MissingRef::Action(id))
    }

    pub fn mix_not_found(id: MixId) -> Self {
        ModelError::NotFound(MissingRef::Mix(id))
    }

    pub fn node_not_found(id: NodeId) -> Self {
        ModelError::NotFound(MissingRef::Node(id))
    }
}

/// 名前を trim して、空なら BlankName
pub fn validate_name(name: &str) -> Result<String, ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelError::BlankName);
    }
    Ok(trimmed.to_string())
}
