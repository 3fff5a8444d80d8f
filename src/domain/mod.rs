//! Domain layer: binary tree model, value sources and construction
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod scalar;
pub mod sources;

pub use arena::{BinaryTree, Side, TreeNode};
pub use builder::TreeBuilder;
pub use error::{DomainError, DomainResult};
pub use scalar::Scalar;
pub use sources::{ListSource, NodeSource, RandomSource};
