//! Utility functions

pub mod path_resolver;

pub use path_resolver::{package_name, resolve_entry};
