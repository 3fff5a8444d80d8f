//! Depth-first algorithms over an open tree file.
//!
//! All of them are tolerant readers: nodes without a value and nodes with
//! non-numeric values never fail a traversal.

use termtree::Tree;
use tracing::instrument;

use crate::application::encoding::TreeFile;
use crate::domain::Scalar;
use crate::infrastructure::GroupId;

/// Shown instead of a value for nodes that carry none.
pub const EMPTY_PLACEHOLDER: &str = "(empty)";

/// Render the tree with box-drawing connectors.
///
/// Children are visited left then right. The last present child at a level
/// gets `└── `, earlier siblings `├── `. The connector column is the
/// indentation of depth 1: the root sits at column 0 and its children start
/// there with their connector, each deeper level adds a `│   ` or blank
/// four-column prefix.
pub fn render(tree: &TreeFile) -> Tree<String> {
    render_node(tree, tree.root())
}

fn render_node(tree: &TreeFile, node: GroupId) -> Tree<String> {
    let label = tree
        .value(node)
        .map(|v| v.to_string())
        .unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string());

    let leaves: Vec<_> = tree
        .children(node)
        .into_iter()
        .map(|child| render_node(tree, child))
        .collect();

    Tree::new(label).with_leaves(leaves)
}

/// Multi-line rendering, one node per line, newline terminated.
#[instrument(level = "debug", skip(tree))]
pub fn display(tree: &TreeFile) -> String {
    render(tree).to_string()
}

/// Maximum numeric value among internal nodes (nodes with at least one child).
///
/// Leaves never contribute. Returns negative infinity when no internal node
/// carries a numeric value.
#[instrument(level = "debug", skip(tree))]
pub fn max_internal(tree: &TreeFile) -> f64 {
    max_internal_from(tree, tree.root())
}

fn max_internal_from(tree: &TreeFile, node: GroupId) -> f64 {
    if !tree.is_internal(node) {
        return f64::NEG_INFINITY;
    }

    let own = tree
        .value(node)
        .and_then(Scalar::as_f64)
        .unwrap_or(f64::NEG_INFINITY);

    tree.children(node)
        .into_iter()
        .map(|child| max_internal_from(tree, child))
        .fold(own, f64::max)
}

/// Total number of nodes, leaves and internal.
#[instrument(level = "debug", skip(tree))]
pub fn count_nodes(tree: &TreeFile) -> usize {
    count_from(tree, tree.root())
}

fn count_from(tree: &TreeFile, node: GroupId) -> usize {
    1 + tree
        .children(node)
        .into_iter()
        .map(|child| count_from(tree, child))
        .sum::<usize>()
}

/// Every present value in pre-order (node, left subtree, right subtree).
#[instrument(level = "debug", skip(tree))]
pub fn collect_values(tree: &TreeFile) -> Vec<Scalar> {
    let mut values = Vec::new();
    let mut stack = vec![tree.root()];

    while let Some(node) = stack.pop() {
        if let Some(value) = tree.value(node) {
            values.push(value.clone());
        }
        // Push in reverse so left is visited first
        for child in tree.children(node).into_iter().rev() {
            stack.push(child);
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;
    use crate::infrastructure::traits::{FileSystem, RealFileSystem};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn fs() -> Arc<dyn FileSystem> {
        Arc::new(RealFileSystem)
    }

    /// Write `content`, reopen read-only.
    fn open_toml(dir: &Path, content: &str) -> TreeFile {
        let path = dir.join("tree.toml");
        std::fs::write(&path, content).unwrap();
        TreeFile::open(fs(), &path).unwrap()
    }

    fn three_nodes(dir: &Path, root: i64, left: i64, right: i64) -> TreeFile {
        let path = dir.join("three.toml");
        let mut file = TreeFile::create(fs(), &path).unwrap();
        let r = file.root();
        let l = file.create_node(r, Side::Left).unwrap();
        let rr = file.create_node(r, Side::Right).unwrap();
        file.set_value(r, Scalar::Int(root)).unwrap();
        file.set_value(l, Scalar::Int(left)).unwrap();
        file.set_value(rr, Scalar::Int(right)).unwrap();
        file.close().unwrap();
        TreeFile::open(fs(), &path).unwrap()
    }

    #[test]
    fn given_single_node_when_max_internal_then_negative_infinity() {
        let temp = TempDir::new().unwrap();
        let tree = open_toml(temp.path(), "[root]\nvalue = 42\n");

        assert_eq!(max_internal(&tree), f64::NEG_INFINITY);
        assert_eq!(count_nodes(&tree), 1);
    }

    #[test]
    fn given_larger_leaves_when_max_internal_then_only_root_counts() {
        let temp = TempDir::new().unwrap();
        let tree = three_nodes(temp.path(), 5, 9, 3);

        assert_eq!(max_internal(&tree), 5.0);
    }

    #[test]
    fn given_mixed_values_when_max_internal_then_skips_non_numeric() {
        //      "a"
        //     /
        //   7.5
        //   /  \
        //  2   (empty)
        //       /
        //     100
        let temp = TempDir::new().unwrap();
        let tree = open_toml(
            temp.path(),
            r#"
[root]
value = "a"

[root.left]
value = 7.5

[root.left.left]
value = 2

[root.left.right.left]
value = 100
"#,
        );

        assert_eq!(max_internal(&tree), 7.5);
        assert_eq!(count_nodes(&tree), 5);
    }

    #[test]
    fn given_three_nodes_when_displaying_then_three_lines_with_connectors() {
        let temp = TempDir::new().unwrap();
        let tree = three_nodes(temp.path(), 1, 2, 3);

        let output = display(&tree);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines, vec!["1", "├── 2", "└── 3"]);
    }

    #[test]
    fn given_only_right_child_when_displaying_then_it_is_last() {
        let temp = TempDir::new().unwrap();
        let tree = open_toml(temp.path(), "[root]\nvalue = 1\n\n[root.right]\nvalue = 3\n");

        let lines: Vec<String> = display(&tree).lines().map(String::from).collect();

        assert_eq!(lines, vec!["1".to_string(), "└── 3".to_string()]);
    }

    #[test]
    fn given_valueless_node_when_displaying_then_shows_placeholder() {
        let temp = TempDir::new().unwrap();
        let tree = open_toml(
            temp.path(),
            "[root]\nvalue = 1\n\n[root.left]\n\n[root.left.left]\nvalue = 4\n",
        );

        let output = display(&tree);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], format!("└── {}", EMPTY_PLACEHOLDER));
        assert!(lines[2].ends_with("└── 4"));
        assert!(lines[2].len() > "└── 4".len());
    }

    #[test]
    fn given_tree_when_collecting_then_pre_order_with_duplicates() {
        let temp = TempDir::new().unwrap();
        let tree = open_toml(
            temp.path(),
            r#"
[root]
value = 1

[root.left]
value = 2

[root.left.left]
value = 4

[root.left.right]
value = 2

[root.right]
value = 3
"#,
        );

        let values: Vec<String> = collect_values(&tree).iter().map(|v| v.to_string()).collect();

        assert_eq!(values, vec!["1", "2", "4", "2", "3"]);
    }
}
