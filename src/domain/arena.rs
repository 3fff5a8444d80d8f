use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::scalar::Scalar;

/// Which child slot of a binary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Visiting order for children: left before right.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Container name used for this side in tree files.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary tree node in the arena.
#[derive(Debug, Default)]
pub struct TreeNode {
    /// Scalar payload, None until the builder assigns one
    pub value: Option<Scalar>,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    pub left: Option<Index>,
    pub right: Option<Index>,
}

impl TreeNode {
    pub fn child(&self, side: Side) -> Option<Index> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn child_slot(&mut self, side: Side) -> &mut Option<Index> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Arena-based binary tree.
///
/// Nodes are addressed by generational indices, so handles to removed nodes
/// never alias a newer node. Ownership stays strictly hierarchical: every
/// node except the root has exactly one parent slot pointing at it.
#[derive(Debug)]
pub struct BinaryTree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for BinaryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Place the root node, replacing any previous tree.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_root(&mut self, value: Option<Scalar>) -> Index {
        self.arena.clear();
        let idx = self.arena.insert(TreeNode {
            value,
            ..TreeNode::default()
        });
        self.root = Some(idx);
        idx
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_child(
        &mut self,
        parent: Index,
        side: Side,
        value: Option<Scalar>,
    ) -> DomainResult<Index> {
        let parent_node = self.arena.get(parent).ok_or(DomainError::NodeNotFound)?;
        if parent_node.child(side).is_some() {
            return Err(DomainError::ChildExists(side));
        }

        let idx = self.arena.insert(TreeNode {
            value,
            parent: Some(parent),
            ..TreeNode::default()
        });
        if let Some(parent_node) = self.arena.get_mut(parent) {
            *parent_node.child_slot(side) = Some(idx);
        }
        Ok(idx)
    }

    pub fn set_value(&mut self, idx: Index, value: Scalar) -> DomainResult<()> {
        let node = self.arena.get_mut(idx).ok_or(DomainError::NodeNotFound)?;
        node.value = Some(value);
        Ok(())
    }

    /// Remove a leaf and clear the parent's slot pointing at it.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_leaf(&mut self, idx: Index) -> DomainResult<()> {
        let node = self.arena.get(idx).ok_or(DomainError::NodeNotFound)?;
        if !node.is_leaf() {
            return Err(DomainError::NotALeaf);
        }
        let parent = node.parent;
        self.arena.remove(idx);

        match parent {
            Some(parent_idx) => {
                if let Some(parent_node) = self.arena.get_mut(parent_idx) {
                    for side in Side::BOTH {
                        if parent_node.child(side) == Some(idx) {
                            *parent_node.child_slot(side) = None;
                        }
                    }
                }
            }
            None => self.root = None,
        }
        Ok(())
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    /// Number of levels, 0 for an empty tree.
    pub fn depth(&self) -> usize {
        match self.root {
            Some(root) => self.calculate_depth(root),
            None => 0,
        }
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        match self.get_node(idx) {
            Some(node) => {
                1 + Side::BOTH
                    .iter()
                    .filter_map(|&side| node.child(side))
                    .map(|child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// Node values in pre-order, absent values skipped.
    pub fn values(&self) -> Vec<Scalar> {
        self.iter()
            .filter_map(|(_, node)| node.value.clone())
            .collect()
    }
}

/// Pre-order (node, left, right) iterator using an explicit stack.
pub struct PreOrderIterator<'a> {
    tree: &'a BinaryTree,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a BinaryTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Right first so left pops first
                for side in Side::BOTH.iter().rev() {
                    if let Some(child) = node.child(*side) {
                        self.stack.push(child);
                    }
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
