//! Binary trees on top of container files.
//!
//! Every tree node is a group. The root group is named `root` and sits
//! directly under the top level; a node's value is its `value` attribute and
//! its children are the groups `left` and `right`.

use std::path::Path;
use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{BinaryTree, Scalar, Side};
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{ContainerFile, GroupId, Mode};

pub const ROOT_GROUP: &str = "root";
pub const VALUE_ATTR: &str = "value";

/// An open tree file. Nodes are addressed by [`GroupId`] handles.
#[derive(Debug)]
pub struct TreeFile {
    file: ContainerFile,
    root: GroupId,
}

impl TreeFile {
    /// Fresh tree file in write mode holding an empty `root` node.
    pub fn create(fs: Arc<dyn FileSystem>, path: &Path) -> ApplicationResult<Self> {
        let mut file = ContainerFile::create(fs, path)?;
        let top = file.top();
        let root = file.create_group(top, ROOT_GROUP)?;
        Ok(Self { file, root })
    }

    /// Existing tree file in read mode.
    pub fn open(fs: Arc<dyn FileSystem>, path: &Path) -> ApplicationResult<Self> {
        let file = ContainerFile::open(fs, path)?;
        let root = file
            .group(file.top(), ROOT_GROUP)
            .ok_or_else(|| ApplicationError::CorruptTree {
                path: path.to_path_buf(),
            })?;
        Ok(Self { file, root })
    }

    pub fn root(&self) -> GroupId {
        self.root
    }

    pub fn mode(&self) -> Mode {
        self.file.mode()
    }

    pub fn create_node(&mut self, parent: GroupId, side: Side) -> ApplicationResult<GroupId> {
        Ok(self.file.create_group(parent, side.as_str())?)
    }

    pub fn set_value(&mut self, node: GroupId, value: Scalar) -> ApplicationResult<()> {
        Ok(self.file.set_attr(node, VALUE_ATTR, value)?)
    }

    pub fn has_value(&self, node: GroupId) -> bool {
        self.file.has_attr(node, VALUE_ATTR)
    }

    /// Fails with a missing attribute error if the node carries no value.
    pub fn get_value(&self, node: GroupId) -> ApplicationResult<&Scalar> {
        Ok(self.file.get_attr(node, VALUE_ATTR)?)
    }

    /// The value if present; tolerant readers use this instead of `get_value`.
    pub fn value(&self, node: GroupId) -> Option<&Scalar> {
        self.file.attr(node, VALUE_ATTR)
    }

    pub fn has_child(&self, node: GroupId, side: Side) -> bool {
        self.file.has_group(node, side.as_str())
    }

    pub fn child(&self, node: GroupId, side: Side) -> Option<GroupId> {
        self.file.group(node, side.as_str())
    }

    /// Present children in visiting order (left, then right).
    pub fn children(&self, node: GroupId) -> Vec<GroupId> {
        Side::BOTH
            .iter()
            .filter_map(|&side| self.child(node, side))
            .collect()
    }

    pub fn is_internal(&self, node: GroupId) -> bool {
        Side::BOTH.iter().any(|&side| self.has_child(node, side))
    }

    /// Persist (write mode) or release (read mode) the file.
    pub fn close(self) -> ApplicationResult<()> {
        Ok(self.file.close()?)
    }
}

/// Write an in-memory tree to `path`, returning the number of nodes stored.
#[instrument(level = "debug", skip(fs, tree), fields(nodes = tree.len()))]
pub fn save(fs: Arc<dyn FileSystem>, path: &Path, tree: &BinaryTree) -> ApplicationResult<usize> {
    let mut file = TreeFile::create(fs, path)?;
    let mut written = 0;

    if let Some(root) = tree.root() {
        let mut stack: Vec<(Index, GroupId)> = vec![(root, file.root())];
        while let Some((idx, group)) = stack.pop() {
            let Some(node) = tree.get_node(idx) else {
                continue;
            };
            if let Some(value) = &node.value {
                file.set_value(group, value.clone())?;
            }
            written += 1;
            for side in Side::BOTH {
                if let Some(child) = node.child(side) {
                    let child_group = file.create_node(group, side)?;
                    stack.push((child, child_group));
                }
            }
        }
    }

    file.close()?;
    debug!(written, path = %path.display(), "tree saved");
    Ok(written)
}

/// Decode a tree file into an in-memory tree.
#[instrument(level = "debug", skip(fs))]
pub fn load(fs: Arc<dyn FileSystem>, path: &Path) -> ApplicationResult<BinaryTree> {
    let file = TreeFile::open(fs, path)?;
    let mut tree = BinaryTree::new();
    let root = tree.insert_root(file.value(file.root()).cloned());

    let mut stack: Vec<(GroupId, Index)> = vec![(file.root(), root)];
    while let Some((group, idx)) = stack.pop() {
        for side in Side::BOTH {
            if let Some(child_group) = file.child(group, side) {
                let child = tree.insert_child(idx, side, file.value(child_group).cloned())?;
                stack.push((child_group, child));
            }
        }
    }

    file.close()?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;
    use crate::infrastructure::StoreError;
    use tempfile::TempDir;

    fn fs() -> Arc<dyn FileSystem> {
        Arc::new(RealFileSystem)
    }

    #[test]
    fn given_nodes_when_written_then_file_uses_root_value_left_right_names() {
        // Arrange
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tree.toml");
        let mut file = TreeFile::create(fs(), &path).unwrap();
        let root = file.root();
        let left = file.create_node(root, Side::Left).unwrap();
        file.set_value(root, Scalar::Int(5)).unwrap();
        file.set_value(left, Scalar::Int(9)).unwrap();

        // Act
        file.close().unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: toml::Table = toml::from_str(&content).unwrap();

        // Assert
        let root = parsed["root"].as_table().unwrap();
        assert_eq!(root["value"].as_integer(), Some(5));
        assert_eq!(root["left"].as_table().unwrap()["value"].as_integer(), Some(9));
        assert!(!root.contains_key("right"));
    }

    #[test]
    fn given_existing_child_when_creating_node_then_storage_error() {
        let temp = TempDir::new().unwrap();
        let mut file = TreeFile::create(fs(), &temp.path().join("t.toml")).unwrap();
        let root = file.root();
        file.create_node(root, Side::Right).unwrap();

        let result = file.create_node(root, Side::Right);

        assert!(matches!(
            result,
            Err(ApplicationError::Store(StoreError::Storage { .. }))
        ));
    }

    #[test]
    fn given_node_without_value_when_getting_value_then_missing_value() {
        let temp = TempDir::new().unwrap();
        let file = TreeFile::create(fs(), &temp.path().join("t.toml")).unwrap();

        let result = file.get_value(file.root());

        assert!(matches!(
            result,
            Err(ApplicationError::Store(StoreError::MissingAttribute { .. }))
        ));
        assert!(!file.has_value(file.root()));
        assert!(file.value(file.root()).is_none());
    }

    #[test]
    fn given_file_without_root_when_opening_then_corrupt_tree() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("t.toml");
        std::fs::write(&path, "[trunk]\nvalue = 1\n").unwrap();

        let result = TreeFile::open(fs(), &path);

        assert!(matches!(result, Err(ApplicationError::CorruptTree { .. })));
    }

    #[test]
    fn given_opened_file_when_creating_node_then_read_only_storage_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("t.toml");
        std::fs::write(&path, "[root]\nvalue = 1\n").unwrap();
        let mut file = TreeFile::open(fs(), &path).unwrap();
        let root = file.root();

        assert_eq!(file.mode(), Mode::Read);
        assert!(file.create_node(root, Side::Left).is_err());
        assert!(file.set_value(root, Scalar::Int(3)).is_err());
    }

    #[test]
    fn given_tree_when_saving_and_loading_then_shape_and_values_match() {
        // Arrange
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("t.toml");
        let mut tree = BinaryTree::new();
        let root = tree.insert_root(Some(Scalar::Int(1)));
        let left = tree.insert_child(root, Side::Left, Some(Scalar::Float(2.5))).unwrap();
        tree.insert_child(left, Side::Right, None).unwrap();
        tree.insert_child(root, Side::Right, Some(Scalar::Int(3))).unwrap();

        // Act
        let written = save(fs(), &path, &tree).unwrap();
        let loaded = load(fs(), &path).unwrap();

        // Assert
        assert_eq!(written, 4);
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.depth(), 3);
        assert_eq!(loaded.values(), tree.values());
        let loaded_left = loaded.get_node(loaded.root().unwrap()).unwrap().left.unwrap();
        assert!(loaded.get_node(loaded_left).unwrap().left.is_none());
    }
}
