//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（Clock + rand）

use crate::domain::ids::{ActionId, MixId, NodeId};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は session 内で一意な ID を生成
pub trait IdGenerator {
    fn generate_action_id(&self) -> ActionId;

    fn generate_mix_id(&self) -> MixId;

    fn generate_node_id(&self) -> NodeId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って timestamp 部分を作るので、FixedClock を渡すと
/// timestamp が固定された ID が得られる（ランダム部分は毎回異なる）。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        // 0 は ActionId::FALLBACK（nil ULID）と衝突するので避ける
        let random = rand::random::<u128>() | 1;
        Ulid::from_parts(timestamp_ms, random)
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_action_id(&self) -> ActionId {
        ActionId::from(self.next_ulid())
    }

    fn generate_mix_id(&self) -> MixId {
        MixId::from(self.next_ulid())
    }

    fn generate_node_id(&self) -> NodeId {
        NodeId::from(self.next_ulid())
    }
}
