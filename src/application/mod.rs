//! Application layer: tree encoding, traversal algorithms and services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod convert;
pub mod encoding;
pub mod error;
pub mod error_ext;
pub mod services;
pub mod traversal;

pub use encoding::{TreeFile, ROOT_GROUP, VALUE_ATTR};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
