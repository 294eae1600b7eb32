//! Library tree: folders and saved decision-set leaves.
//!
//! # 不変条件
//! - ID はツリー全体で一意
//! - Folder の children の順序に意味がある
//! - 循環なし（move_node でチェック）
//!
//! 全ての変更操作は「完全に適用」か「完全な no-op」のどちらか。
//! 検証は変更より先に全部済ませる。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::validate_name;
use crate::domain::{Action, HandFrequencies, ModelError, NodeId};

/// An organizational container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

/// A saved decision set: deep copies of the session's map and actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "handFrequencies", with = "super::codec::tagged_map")]
    pub frequencies: HandFrequencies,
    #[serde(rename = "customActions")]
    pub actions: Vec<Action>,
    #[serde(rename = "createdAt", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Snapshot handed to `create_leaf`. Owned, so the leaf never aliases the
/// live session.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafSnapshot {
    pub frequencies: HandFrequencies,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Folder(Folder),
    Leaf(Leaf),
}

impl TreeNode {
    pub fn id(&self) -> NodeId {
        match self {
            TreeNode::Folder(folder) => folder.id,
            TreeNode::Leaf(leaf) => leaf.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TreeNode::Folder(folder) => &folder.name,
            TreeNode::Leaf(leaf) => &leaf.name,
        }
    }

    fn set_name(&mut self, name: String) {
        match self {
            TreeNode::Folder(folder) => folder.name = name,
            TreeNode::Leaf(leaf) => leaf.name = name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TreeNode::Folder(_))
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Folder(folder) => &folder.children,
            TreeNode::Leaf(_) => &[],
        }
    }

    /// Ids of this node and everything below it, pre-order.
    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = vec![self.id()];
        for child in self.children() {
            ids.extend(child.subtree_ids());
        }
        ids
    }
}

/// Where a node sits: its parent folder (`None` for root) and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub parent: Option<NodeId>,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryTree {
    roots: Vec<TreeNode>,
}

impl LibraryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roots(roots: Vec<TreeNode>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        find_in(&self.roots, id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    pub fn leaf(&self, id: NodeId) -> Option<&Leaf> {
        match self.find(id)? {
            TreeNode::Leaf(leaf) => Some(leaf),
            TreeNode::Folder(_) => None,
        }
    }

    pub fn position_of(&self, id: NodeId) -> Option<Position> {
        locate(&self.roots, None, id)
    }

    /// True when `id` lies strictly below `ancestor`.
    pub fn is_descendant(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.find(ancestor)
            .is_some_and(|node| find_in(node.children(), id).is_some())
    }

    /// Depth-first walk: (depth, node), parents before children.
    pub fn walk(&self) -> Vec<(usize, &TreeNode)> {
        let mut out = Vec::new();
        walk_into(&self.roots, 0, &mut out);
        out
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.walk().into_iter().filter_map(|(_, node)| match node {
            TreeNode::Leaf(leaf) => Some(leaf),
            TreeNode::Folder(_) => None,
        })
    }

    /// All ids in walk order (used to check uniqueness after decoding).
    pub fn ids(&self) -> Vec<NodeId> {
        self.roots.iter().flat_map(TreeNode::subtree_ids).collect()
    }

    pub fn create_folder(
        &mut self,
        id: NodeId,
        name: &str,
        parent: Option<NodeId>,
    ) -> Result<NodeId, ModelError> {
        let name = validate_name(name)?;
        self.insert(
            TreeNode::Folder(Folder {
                id,
                name,
                children: Vec::new(),
            }),
            parent,
        )
    }

    pub fn create_leaf(
        &mut self,
        id: NodeId,
        name: &str,
        parent: Option<NodeId>,
        snapshot: LeafSnapshot,
        created_at: DateTime<Utc>,
    ) -> Result<NodeId, ModelError> {
        let name = validate_name(name)?;
        self.insert(
            TreeNode::Leaf(Leaf {
                id,
                name,
                frequencies: snapshot.frequencies,
                actions: snapshot.actions,
                created_at,
            }),
            parent,
        )
    }

    /// Appends `node` as the last child of `parent`.
    ///
    /// `None` appends at root; a leaf id appends next to that leaf's
    /// siblings (i.e. into its containing folder).
    fn insert(&mut self, node: TreeNode, parent: Option<NodeId>) -> Result<NodeId, ModelError> {
        let target = match parent {
            None => None,
            Some(parent_id) => match self.find(parent_id) {
                None => return Err(ModelError::node_not_found(parent_id)),
                Some(TreeNode::Folder(_)) => Some(parent_id),
                Some(TreeNode::Leaf(_)) => self.position_of(parent_id).and_then(|p| p.parent),
            },
        };
        let id = node.id();
        let siblings = self
            .children_mut(target)
            .ok_or(ModelError::node_not_found(id))?;
        siblings.push(node);
        Ok(id)
    }

    pub fn rename(&mut self, id: NodeId, name: &str) -> Result<(), ModelError> {
        let name = validate_name(name)?;
        let node = find_in_mut(&mut self.roots, id).ok_or(ModelError::node_not_found(id))?;
        node.set_name(name);
        Ok(())
    }

    /// Removes the node and (for folders) all descendants.
    pub fn delete(&mut self, id: NodeId) -> Result<TreeNode, ModelError> {
        detach(&mut self.roots, id).ok_or(ModelError::node_not_found(id))
    }

    /// Reparents / reorders `active`.
    ///
    /// - `over == None`: last root child
    /// - `over` is a folder: its last child
    /// - otherwise: immediately before `over` among its siblings
    ///
    /// Moving a node onto itself or into its own subtree is rejected.
    pub fn move_node(&mut self, active: NodeId, over: Option<NodeId>) -> Result<(), ModelError> {
        if over == Some(active) {
            return Err(ModelError::MoveOntoSelf { active });
        }
        if !self.contains(active) {
            return Err(ModelError::node_not_found(active));
        }
        if let Some(over) = over {
            if !self.contains(over) {
                return Err(ModelError::node_not_found(over));
            }
            if self.is_descendant(active, over) {
                return Err(ModelError::MoveIntoDescendant { active, over });
            }
        }

        let detached = detach(&mut self.roots, active).ok_or(ModelError::node_not_found(active))?;
        let Some(over) = over else {
            self.roots.push(detached);
            return Ok(());
        };

        if let Some(TreeNode::Folder(folder)) = find_in_mut(&mut self.roots, over) {
            folder.children.push(detached);
            return Ok(());
        }

        // validated above, and `over` is outside the detached subtree
        let Position { parent, index } = self
            .position_of(over)
            .ok_or(ModelError::node_not_found(over))?;
        let siblings = self
            .children_mut(parent)
            .ok_or(ModelError::node_not_found(over))?;
        siblings.insert(index, detached);
        Ok(())
    }

    fn children_mut(&mut self, parent: Option<NodeId>) -> Option<&mut Vec<TreeNode>> {
        match parent {
            None => Some(&mut self.roots),
            Some(id) => match find_in_mut(&mut self.roots, id)? {
                TreeNode::Folder(folder) => Some(&mut folder.children),
                TreeNode::Leaf(_) => None,
            },
        }
    }
}

fn find_in(nodes: &[TreeNode], id: NodeId) -> Option<&TreeNode> {
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_in(node.children(), id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut(nodes: &mut [TreeNode], id: NodeId) -> Option<&mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.id() == id {
            return Some(node);
        }
        if let TreeNode::Folder(folder) = node {
            if let Some(found) = find_in_mut(&mut folder.children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn locate(nodes: &[TreeNode], parent: Option<NodeId>, id: NodeId) -> Option<Position> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id() == id {
            return Some(Position { parent, index });
        }
        if let Some(found) = locate(node.children(), Some(node.id()), id) {
            return Some(found);
        }
    }
    None
}

fn detach(nodes: &mut Vec<TreeNode>, id: NodeId) -> Option<TreeNode> {
    if let Some(index) = nodes.iter().position(|n| n.id() == id) {
        return Some(nodes.remove(index));
    }
    nodes.iter_mut().find_map(|node| match node {
        TreeNode::Folder(folder) => detach(&mut folder.children, id),
        TreeNode::Leaf(_) => None,
    })
}

fn walk_into<'a>(nodes: &'a [TreeNode], depth: usize, out: &mut Vec<(usize, &'a TreeNode)>) {
    for node in nodes {
        out.push((depth, node));
        walk_into(node.children(), depth + 1, out);
    }
}
