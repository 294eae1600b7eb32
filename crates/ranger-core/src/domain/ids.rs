//! Domain identifiers (strongly-typed IDs).
//!
//! # ULID ベースの ID + Phantom type
//! Action / Mix / ツリーノードはそれぞれ別の ID 型を持ちます。
//! 実体はどれも ULID（128-bit、生成順でソート可能）で、
//! `T` はコンパイル時にだけ使うマーカー型です。
//!
//! - ActionId と NodeId は混同できない
//! - 永続化形式は ULID 文字列そのもの（プレフィックスは Display のみ）

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"action-", "mix-", "node-"）を提供します。
pub trait IdMarker: 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// # 例
/// ```ignore
/// let action: ActionId = Id::from(Ulid::new());
/// let node: NodeId = Id::from(Ulid::new());
/// // action と node は異なる型なので、混同できない
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub const fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Accepts both the bare ULID and the prefixed Display form.
impl<T: IdMarker> FromStr for Id<T> {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix(T::prefix()).unwrap_or(s);
        Ulid::from_string(raw).map(Self::from_ulid)
    }
}

// ========================================
// マーカー型の定義
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {}

impl IdMarker for Action {
    fn prefix() -> &'static str {
        "action-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mix {}

impl IdMarker for Mix {
    fn prefix() -> &'static str {
        "mix-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {}

impl IdMarker for Node {
    fn prefix() -> &'static str {
        "node-"
    }
}

/// Identifier of an Action (a named, colored decision outcome).
pub type ActionId = Id<Action>;

/// Identifier of an ActionMix.
pub type MixId = Id<Mix>;

/// Identifier of a library tree node (Folder or Leaf).
pub type NodeId = Id<Node>;

impl ActionId {
    /// 暗黙のフォールバック action（"no decision"）の予約 ID。
    ///
    /// nil ULID は生成器が返すことがないので衝突しない。
    pub const FALLBACK: ActionId = Id::from_ulid(Ulid::nil());

    pub fn is_fallback(&self) -> bool {
        *self == Self::FALLBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_marker_prefix() {
        let action = ActionId::from_ulid(Ulid::new());
        let mix = MixId::from_ulid(Ulid::new());
        let node = NodeId::from_ulid(Ulid::new());

        assert!(action.to_string().starts_with("action-"));
        assert!(mix.to_string().starts_with("mix-"));
        assert!(node.to_string().starts_with("node-"));
        // let _: ActionId = node; // <- does not compile
    }

    #[test]
    fn serializes_as_bare_ulid_string() {
        let ulid = Ulid::new();
        let node = NodeId::from_ulid(ulid);

        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, format!("\"{ulid}\""));

        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn parses_prefixed_and_bare_forms() {
        let node = NodeId::from_ulid(Ulid::new());
        assert_eq!(node.to_string().parse::<NodeId>().unwrap(), node);
        assert_eq!(node.as_ulid().to_string().parse::<NodeId>().unwrap(), node);
        assert!("node-not-a-ulid".parse::<NodeId>().is_err());
    }

    #[test]
    fn fallback_is_the_nil_ulid() {
        assert!(ActionId::FALLBACK.is_fallback());
        assert_eq!(ActionId::FALLBACK.as_ulid(), Ulid::nil());
        assert!(!ActionId::from_ulid(Ulid::new()).is_fallback());
    }
}
