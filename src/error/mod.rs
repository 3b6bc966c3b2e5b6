//! Error handling for declcheck
//!
//! Error types, result aliases, and error context utilities.

pub mod context;
pub mod types;

pub use context::{IoResultExt, ResultExt};
pub use types::{DeclCheckError, ErrorSeverity, Result};
