//! declcheck - checks TypeScript declarations against JavaScript modules
//!
//! A check extracts the shape a `.d.ts` file declares, the shape the
//! JavaScript module really exports at runtime, and reports every structural
//! disagreement as a positioned [`Diagnostic`].

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{compare, ActualShapeExtractor, CheckInput, CheckReport, Checker, Comparator};
pub use error::{DeclCheckError, ErrorSeverity, Result, ResultExt};
pub use models::{
    config::Settings,
    diagnostic::{Diagnostic, ErrorKind, Position},
    module::{LoadedModule, RuntimeValue, SourceText},
    registry::{CheckMode, RegistryInfo},
    shape::Shape,
};
pub use parsers::DeclarationParser as DeclaredShapeExtractor;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
