//! Tree file service
//!
//! Builds trees from value sources and persists them, inspects and converts
//! existing tree files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::convert::{format_lines, parse_lines};
use crate::application::encoding::{self, TreeFile};
use crate::application::traversal;
use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{NodeSource, RandomSource, Scalar, TreeBuilder};
use crate::infrastructure::traits::FileSystem;

/// Outcome of a build: what was asked for and what got persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub path: PathBuf,
    pub requested: usize,
    pub nodes: usize,
}

impl BuildReport {
    /// The source ran dry before the requested count was reached.
    pub fn is_truncated(&self) -> bool {
        self.nodes < self.requested
    }
}

/// Summary of a tree file for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub nodes: usize,
    pub max_internal: f64,
    /// Full rendering, None when the tree exceeds the display limit
    pub rendering: Option<String>,
}

/// Service for building, inspecting and converting tree files.
pub struct TreeService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl TreeService {
    /// Create a new tree service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Build a tree of `nodes` random values and save it to `path`.
    pub fn generate_random(&self, nodes: usize, path: &Path) -> ApplicationResult<BuildReport> {
        let range = self.settings.random.min..=self.settings.random.max;
        let mut source = RandomSource::new(range);
        self.build(nodes, &mut source, path)
    }

    /// Build a tree from any value source and save it to `path`.
    ///
    /// Nothing is written if construction fails.
    #[instrument(level = "debug", skip(self, source))]
    pub fn build(
        &self,
        nodes: usize,
        source: &mut dyn NodeSource,
        path: &Path,
    ) -> ApplicationResult<BuildReport> {
        let tree = TreeBuilder::new(nodes).build(source)?;
        let written = encoding::save(Arc::clone(&self.fs), path, &tree)?;
        info!(requested = nodes, written, path = %path.display(), "tree built");
        Ok(BuildReport {
            path: path.to_path_buf(),
            requested: nodes,
            nodes: written,
        })
    }

    /// Read values for a flat-list build from a text export.
    pub fn import_values(&self, txt_path: &Path) -> ApplicationResult<Vec<Scalar>> {
        let content = self
            .fs
            .read_to_string(txt_path)
            .with_path_context("read value list", txt_path)?;
        Ok(parse_lines(&content)?)
    }

    fn open(&self, path: &Path) -> ApplicationResult<TreeFile> {
        TreeFile::open(Arc::clone(&self.fs), path)
    }

    /// Node count, max of internal nodes and, for small trees, the rendering.
    #[instrument(level = "debug", skip(self))]
    pub fn inspect(&self, path: &Path) -> ApplicationResult<Inspection> {
        let tree = self.open(path)?;
        let nodes = traversal::count_nodes(&tree);
        let max_internal = traversal::max_internal(&tree);
        let rendering = if nodes <= self.settings.display_limit {
            Some(traversal::display(&tree))
        } else {
            debug!(nodes, limit = self.settings.display_limit, "tree too large to render");
            None
        };
        tree.close()?;
        Ok(Inspection {
            nodes,
            max_internal,
            rendering,
        })
    }

    pub fn max_internal(&self, path: &Path) -> ApplicationResult<f64> {
        let tree = self.open(path)?;
        let max = traversal::max_internal(&tree);
        tree.close()?;
        Ok(max)
    }

    pub fn count_nodes(&self, path: &Path) -> ApplicationResult<usize> {
        let tree = self.open(path)?;
        let count = traversal::count_nodes(&tree);
        tree.close()?;
        Ok(count)
    }

    /// Pre-order values of a tree file.
    pub fn values(&self, path: &Path) -> ApplicationResult<Vec<Scalar>> {
        let tree = self.open(path)?;
        let values = traversal::collect_values(&tree);
        tree.close()?;
        Ok(values)
    }

    /// Export all values of `tree_path` to `txt_path`, returning the line count.
    #[instrument(level = "debug", skip(self))]
    pub fn convert(&self, tree_path: &Path, txt_path: &Path) -> ApplicationResult<usize> {
        let values = self.values(tree_path)?;
        self.fs
            .ensure_parent(txt_path)
            .with_path_context("create parent directory", txt_path)?;
        self.fs
            .write(txt_path, &format_lines(&values))
            .with_path_context("write text export", txt_path)?;
        info!(lines = values.len(), from = %tree_path.display(), to = %txt_path.display(), "converted");
        Ok(values.len())
    }
}
