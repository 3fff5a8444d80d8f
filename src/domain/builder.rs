//! Breadth-first tree construction.

use std::collections::VecDeque;

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{BinaryTree, Side};
use crate::domain::error::DomainError;
use crate::domain::sources::NodeSource;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs binary trees in level order from a [`NodeSource`].
///
/// The root counts as the first node as soon as it is placed, so a target of
/// `n` yields exactly `n` nodes unless the source declines children or runs
/// dry.
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder {
    target: usize,
}

impl TreeBuilder {
    pub fn new(target: usize) -> Self {
        Self { target }
    }

    #[instrument(level = "debug", skip(self, source), fields(target = self.target))]
    pub fn build(&self, source: &mut dyn NodeSource) -> TreeResult<BinaryTree> {
        if self.target == 0 {
            return Err(DomainError::ZeroNodes);
        }
        if let Some(limit) = source.node_limit() {
            if self.target > limit {
                return Err(DomainError::NodeLimitExceeded {
                    requested: self.target,
                    limit,
                });
            }
        }

        let mut tree = BinaryTree::new();
        let root = tree.insert_root(None);
        let mut queue: VecDeque<(Index, usize)> = VecDeque::from([(root, 0)]);
        let mut created = 1;
        let mut ordinal = 0;

        while let Some((current, depth)) = queue.pop_front() {
            ordinal += 1;
            let Some(value) = source.next_value(ordinal)? else {
                debug!(ordinal, "source exhausted, truncating tree");
                Self::truncate(&mut tree, current, queue)?;
                break;
            };
            trace!(ordinal, depth, %value, "assign value");
            tree.set_value(current, value)?;

            for side in Side::BOTH {
                if created < self.target && source.wants_child(ordinal, side)? {
                    let child = tree.insert_child(current, side, None)?;
                    queue.push_back((child, depth + 1));
                    created += 1;
                }
            }
        }

        debug!(nodes = tree.len(), depth = tree.depth(), "tree built");
        Ok(tree)
    }

    /// Drop the valueless node that hit the exhausted source and everything
    /// still queued. All of them are leaves: children are only created after
    /// their parent received a value. A valueless root is kept.
    fn truncate(
        tree: &mut BinaryTree,
        current: Index,
        queue: VecDeque<(Index, usize)>,
    ) -> TreeResult<()> {
        if Some(current) != tree.root() {
            tree.remove_leaf(current)?;
        }
        for (pending, _) in queue {
            tree.remove_leaf(pending)?;
        }
        Ok(())
    }
}
