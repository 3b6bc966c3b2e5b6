//! Loader that evaluates module exports statically

use super::{read_source, ModuleLoader};
use crate::error::{DeclCheckError, Result};
use crate::models::module::{LoadedModule, SourceText};
use crate::parsers::module_evaluator::ModuleEvaluator;
use std::path::Path;

/// Reads the file and evaluates its top-level export assignments without
/// running it
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLoader;

impl StaticLoader {
    pub fn load_source(&self, path: &Path, source: String) -> Result<LoadedModule> {
        let exports = ModuleEvaluator::evaluate(&source).map_err(|errors| {
            DeclCheckError::module_load_error(
                path,
                errors
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "source could not be parsed".to_string()),
            )
        })?;
        Ok(LoadedModule::new(exports, SourceText::Available(source)))
    }
}

impl ModuleLoader for StaticLoader {
    fn load(&self, path: &Path) -> Result<LoadedModule> {
        tracing::debug!(path = %path.display(), "evaluating module statically");
        let source = read_source(path)?;
        self.load_source(path, source)
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
