//! Persistence codec: library tree and action list <-> JSON text.
//!
//! JSON has no map type with non-string keys that keeps its entries'
//! order, so a leaf's `HandFrequencies` is written as a tagged value:
//!
//! ```text
//! {"dataType":"Map","value":[["AA",[{"actionId":"…","frequency":100}]], …]}
//! ```
//!
//! and only that shape decodes back into a map.

use std::collections::HashSet;

use crate::domain::{Action, NodeId};

use super::tree::LibraryTree;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate node id {0}")]
    DuplicateId(NodeId),
}

pub fn encode_tree(tree: &LibraryTree) -> Result<String, CodecError> {
    Ok(serde_json::to_string(tree)?)
}

/// Decodes and checks that node ids are unique across the whole tree.
pub fn decode_tree(text: &str) -> Result<LibraryTree, CodecError> {
    let tree: LibraryTree = serde_json::from_str(text)?;
    let mut seen = HashSet::new();
    for id in tree.ids() {
        if !seen.insert(id) {
            return Err(CodecError::DuplicateId(id));
        }
    }
    Ok(tree)
}

pub fn encode_actions(actions: &[Action]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(actions)?)
}

pub fn decode_actions(text: &str) -> Result<Vec<Action>, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// `#[serde(with = "tagged_map")]` for `HandFrequencies` fields.
pub mod tagged_map {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::domain::{FrequencyEntry, Hand, HandFrequencies};

    pub const MAP_TAG: &str = "Map";

    #[derive(Serialize)]
    struct TaggedRef<'a> {
        #[serde(rename = "dataType")]
        data_type: &'static str,
        value: Vec<(Hand, &'a [FrequencyEntry])>,
    }

    #[derive(Deserialize)]
    struct Tagged {
        #[serde(rename = "dataType")]
        data_type: String,
        value: Vec<(Hand, Vec<FrequencyEntry>)>,
    }

    pub fn serialize<S: Serializer>(freqs: &HandFrequencies, serializer: S) -> Result<S::Ok, S::Error> {
        TaggedRef {
            data_type: MAP_TAG,
            value: freqs.iter().collect(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HandFrequencies, D::Error> {
        let tagged = Tagged::deserialize(deserializer)?;
        if tagged.data_type != MAP_TAG {
            return Err(D::Error::custom(format!(
                "expected dataType \"{MAP_TAG}\", found \"{}\"",
                tagged.data_type
            )));
        }
        let mut freqs = HandFrequencies::new();
        for (hand, entries) in tagged.value {
            if freqs.contains(hand) {
                return Err(D::Error::custom(format!("hand {hand} listed twice")));
            }
            freqs.set(hand, entries).map_err(D::Error::custom)?;
        }
        Ok(freqs)
    }
}
