//! Library: the saved decision-set tree and its persistence codec.

pub mod codec;
pub mod tree;

pub use codec::{CodecError, decode_actions, decode_tree, encode_actions, encode_tree};
pub use tree::{Folder, Leaf, LeafSnapshot, LibraryTree, Position, TreeNode};
