//! Infrastructure layer: container files, I/O traits and DI container
//!
//! This layer implements the on-disk container format and wires up services.

pub mod container;
pub mod di;
pub mod error;
pub mod traits;

pub use container::{ContainerFile, GroupId, Mode};
pub use error::{StoreError, StoreResult};
