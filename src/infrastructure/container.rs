//! Hierarchical container files.
//!
//! A container file is a tree of named groups. Every group may carry scalar
//! attributes and nested groups; attribute and group names share one
//! namespace per group. On disk a group is a TOML table and an attribute a
//! non-table entry:
//!
//! ```toml
//! [root]
//! value = 5
//!
//! [root.left]
//! value = 9
//! ```
//!
//! Files are read completely on [`ContainerFile::open`]. Writers buffer in
//! memory and persist on [`ContainerFile::close`]; a writer dropped without
//! closing leaves nothing on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::Scalar;
use crate::infrastructure::error::{StoreError, StoreResult};
use crate::infrastructure::traits::FileSystem;

/// Access mode of an open container file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

/// Handle to a group inside one [`ContainerFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(Index);

#[derive(Debug)]
struct Group {
    name: String,
    parent: Option<Index>,
    attrs: BTreeMap<String, Scalar>,
    children: BTreeMap<String, Index>,
}

impl Group {
    fn new(name: &str, parent: Option<Index>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            attrs: BTreeMap::new(),
            children: BTreeMap::new(),
        }
    }
}

pub struct ContainerFile {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    mode: Mode,
    groups: Arena<Group>,
    top: Index,
}

impl std::fmt::Debug for ContainerFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerFile")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("groups", &self.groups.len())
            .finish()
    }
}

impl ContainerFile {
    /// New, empty file in write mode. Replaces `path` on close.
    #[instrument(level = "debug", skip(fs))]
    pub fn create(fs: Arc<dyn FileSystem>, path: &Path) -> StoreResult<Self> {
        let mut groups = Arena::new();
        let top = groups.insert(Group::new("", None));
        Ok(Self {
            fs,
            path: path.to_path_buf(),
            mode: Mode::Write,
            groups,
            top,
        })
    }

    /// Existing file in read mode.
    #[instrument(level = "debug", skip(fs))]
    pub fn open(fs: Arc<dyn FileSystem>, path: &Path) -> StoreResult<Self> {
        let content = fs
            .read_to_string(path)
            .map_err(|e| StoreError::io(format!("read {}", path.display()), e))?;
        let table: toml::Table = toml::from_str(&content).map_err(|e| StoreError::Format {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut groups = Arena::new();
        let top = groups.insert(Group::new("", None));
        load_table(&mut groups, top, table);
        debug!(groups = groups.len(), "container opened");

        Ok(Self {
            fs,
            path: path.to_path_buf(),
            mode: Mode::Read,
            groups,
            top,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The unnamed top-level group.
    pub fn top(&self) -> GroupId {
        GroupId(self.top)
    }

    /// Slash-separated location of a group, e.g. `/root/left`.
    pub fn group_path(&self, group: GroupId) -> String {
        let mut names = Vec::new();
        let mut current = Some(group.0);
        while let Some(idx) = current {
            match self.groups.get(idx) {
                Some(g) if g.parent.is_some() => {
                    names.push(g.name.as_str());
                    current = g.parent;
                }
                _ => break,
            }
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    fn get(&self, group: GroupId) -> StoreResult<&Group> {
        self.groups
            .get(group.0)
            .ok_or_else(|| StoreError::storage(format!("{:?}", group), "stale group handle"))
    }

    fn writable(&mut self, group: GroupId) -> StoreResult<&mut Group> {
        if self.mode != Mode::Write {
            return Err(StoreError::storage(
                self.group_path(group),
                format!("{} is open read-only", self.path.display()),
            ));
        }
        let location = self.group_path(group);
        self.groups
            .get_mut(group.0)
            .ok_or_else(|| StoreError::storage(location, "stale group handle"))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn create_group(&mut self, parent: GroupId, name: &str) -> StoreResult<GroupId> {
        let location = format!("{}/{}", self.group_path(parent).trim_end_matches('/'), name);
        if name.is_empty() || name.contains(&['.', '/'][..]) {
            return Err(StoreError::storage(location, "invalid group name"));
        }
        let group = self.writable(parent)?;
        if group.children.contains_key(name) || group.attrs.contains_key(name) {
            return Err(StoreError::storage(location, "name already exists"));
        }

        let idx = self.groups.insert(Group::new(name, Some(parent.0)));
        if let Some(group) = self.groups.get_mut(parent.0) {
            group.children.insert(name.to_string(), idx);
        }
        Ok(GroupId(idx))
    }

    pub fn group(&self, parent: GroupId, name: &str) -> Option<GroupId> {
        self.groups
            .get(parent.0)
            .and_then(|g| g.children.get(name))
            .map(|&idx| GroupId(idx))
    }

    pub fn has_group(&self, parent: GroupId, name: &str) -> bool {
        self.group(parent, name).is_some()
    }

    /// Attach or overwrite a scalar attribute.
    pub fn set_attr(&mut self, group: GroupId, name: &str, value: Scalar) -> StoreResult<()> {
        let location = self.group_path(group);
        let g = self.writable(group)?;
        if g.children.contains_key(name) {
            return Err(StoreError::storage(
                location,
                format!("'{}' is a group, not an attribute", name),
            ));
        }
        g.attrs.insert(name.to_string(), value);
        Ok(())
    }

    pub fn attr(&self, group: GroupId, name: &str) -> Option<&Scalar> {
        self.groups.get(group.0).and_then(|g| g.attrs.get(name))
    }

    pub fn has_attr(&self, group: GroupId, name: &str) -> bool {
        self.attr(group, name).is_some()
    }

    pub fn get_attr(&self, group: GroupId, name: &str) -> StoreResult<&Scalar> {
        self.get(group)?
            .attrs
            .get(name)
            .ok_or_else(|| StoreError::MissingAttribute {
                group: self.group_path(group),
                name: name.to_string(),
            })
    }

    /// Persist a write-mode file; read-mode files just release their data.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn close(self) -> StoreResult<()> {
        if self.mode == Mode::Read {
            return Ok(());
        }
        let table = self.to_table(self.top);
        let content = toml::to_string(&table).map_err(|e| StoreError::Format {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        self.fs
            .ensure_parent(&self.path)
            .map_err(|e| StoreError::write(&self.path, e))?;
        self.fs
            .write(&self.path, &content)
            .map_err(|e| StoreError::write(&self.path, e))?;
        debug!(groups = self.groups.len(), "container written");
        Ok(())
    }

    fn to_table(&self, idx: Index) -> toml::Table {
        let mut table = toml::Table::new();
        if let Some(group) = self.groups.get(idx) {
            for (name, value) in &group.attrs {
                table.insert(name.clone(), to_toml(value));
            }
            for (name, &child) in &group.children {
                table.insert(name.clone(), toml::Value::Table(self.to_table(child)));
            }
        }
        table
    }
}

fn load_table(groups: &mut Arena<Group>, parent: Index, table: toml::Table) {
    for (name, value) in table {
        match value {
            toml::Value::Table(inner) => {
                let idx = groups.insert(Group::new(&name, Some(parent)));
                if let Some(g) = groups.get_mut(parent) {
                    g.children.insert(name, idx);
                }
                load_table(groups, idx, inner);
            }
            other => {
                if let Some(g) = groups.get_mut(parent) {
                    g.attrs.insert(name, from_toml(other));
                }
            }
        }
    }
}

fn to_toml(value: &Scalar) -> toml::Value {
    match value {
        Scalar::Int(i) => toml::Value::Integer(*i),
        Scalar::Float(f) => toml::Value::Float(*f),
        Scalar::Bool(b) => toml::Value::Boolean(*b),
        Scalar::Text(s) => toml::Value::String(s.clone()),
    }
}

fn from_toml(value: toml::Value) -> Scalar {
    match value {
        toml::Value::Integer(i) => Scalar::Int(i),
        toml::Value::Float(f) => Scalar::Float(f),
        toml::Value::Boolean(b) => Scalar::Bool(b),
        toml::Value::String(s) => Scalar::Text(s),
        // arrays and datetimes are kept in their textual form
        other => Scalar::Text(other.to_string()),
    }
}
