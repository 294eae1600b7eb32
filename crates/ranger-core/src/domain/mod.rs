//! Domain model (hands, actions, frequencies, mixes, ids, errors).

pub mod action;
pub mod errors;
pub mod frequency;
pub mod hand;
pub mod ids;
pub mod mix;

pub use action::{Action, ActionPatch, ActionRegistry, Color, EMPTY_HAND_COLOR, ParseColorError};
pub use errors::{ErrorKind, MissingRef, ModelError};
pub use frequency::{FrequencyEntry, HandFrequencies, Weight};
pub use hand::{COMBO_COUNT, HAND_COUNT, Hand, HandKind, ParseHandError, Rank};
pub use ids::{ActionId, MixId, NodeId};
pub use mix::{ActionMix, Brush, MixPatch};
