//! Parsing functionality for declaration and JavaScript sources
//!
//! Declarations are parsed with OXC into a declared shape; JavaScript sources
//! are either scanned for default-export markers or statically evaluated
//! when no runtime is available.

pub mod declaration;
pub mod header;
pub mod module_evaluator;
pub mod source_markers;

pub use declaration::DeclarationParser;
pub use header::{parse_header, DeclarationHeader};
pub use module_evaluator::ModuleEvaluator;
pub use source_markers::{DefaultExportEvidence, SourceMarkers};
