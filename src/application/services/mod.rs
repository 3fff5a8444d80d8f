//! Application services
//!
//! Services contain the use-case logic and depend on I/O traits.

pub mod tree;

pub use tree::{BuildReport, Inspection, TreeService};
