//! Loading JavaScript modules into runtime value snapshots
//!
//! A loader turns a JavaScript file into a [`LoadedModule`]: the value its
//! `module.exports` ends up holding, plus the source text for marker scans.

pub mod node;
pub mod snapshot;
pub mod static_loader;

use crate::error::{IoResultExt, Result};
use crate::models::config::{LoaderKind, Settings};
use crate::models::module::LoadedModule;
use std::fs;
use std::path::Path;

pub use node::NodeLoader;
pub use static_loader::StaticLoader;

/// Strategy for obtaining a module's exported value
pub trait ModuleLoader {
    fn load(&self, path: &Path) -> Result<LoadedModule>;

    fn name(&self) -> &'static str;
}

/// Tries node first and falls back to static evaluation
pub struct AutoLoader {
    node: NodeLoader,
    fallback: StaticLoader,
}

impl AutoLoader {
    pub fn new(node: NodeLoader) -> Self {
        Self {
            node,
            fallback: StaticLoader,
        }
    }
}

impl ModuleLoader for AutoLoader {
    fn load(&self, path: &Path) -> Result<LoadedModule> {
        match self.node.load(path) {
            Ok(module) => Ok(module),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "node loader failed, falling back to static evaluation"
                );
                self.fallback.load(path)
            }
        }
    }

    fn name(&self) -> &'static str {
        "auto"
    }
}

/// Create the loader selected by the settings
pub fn create_loader(settings: &Settings) -> Box<dyn ModuleLoader> {
    match settings.loader {
        LoaderKind::Node => Box::new(NodeLoader::new(settings.node_binary.clone())),
        LoaderKind::Static => Box::new(StaticLoader),
        LoaderKind::Auto => Box::new(AutoLoader::new(NodeLoader::new(settings.node_binary.clone()))),
    }
}

/// Read a module's source text
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_path(path)
}
