//! bintree: binary trees persisted in hierarchical container files
//!
//! Layers, innermost first:
//! - `domain`: arena tree, value sources and the level-order builder
//! - `infrastructure`: filesystem seam and the TOML-backed container file
//! - `application`: tree encoding, traversals and the tree service
//! - `cli`: argument parsing, console, menu and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
