//! Configuration file and environment sources

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{DeclCheckError, Result};
use crate::models::config::PartialSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".declcheck.toml";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Source reading the default file in the current directory
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20,
        }
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default configuration template at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(DeclCheckError::ConfigNotFound {
                path: self.path.clone(),
            });
        }
        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable configuration source
///
/// List values are comma separated. Allow-lists take plain package names,
/// each of which is enabled.
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

const ENV_KEYS: [&str; 8] = [
    "OUTPUT_FORMAT",
    "LOADER",
    "NODE",
    "MODE",
    "DISABLE",
    "IGNORE_PROPERTIES",
    "NO_DEFAULT_EXPORT_EXEMPT",
    "SQUAT_EXEMPT",
];

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 10,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.var(key).map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect()
        })
    }

    fn allow_list(&self, key: &str) -> Option<BTreeMap<String, bool>> {
        self.list(key)
            .map(|names| names.into_iter().map(|name| (name, true)).collect())
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        if let Some(format) = self.var("OUTPUT_FORMAT") {
            settings.output_format = Some(format.parse().map_err(DeclCheckError::config_error)?);
        }
        if let Some(loader) = self.var("LOADER") {
            settings.loader = Some(loader.parse().map_err(DeclCheckError::config_error)?);
        }
        if let Some(node) = self.var("NODE") {
            settings.node_binary = Some(PathBuf::from(node));
        }
        if let Some(mode) = self.var("MODE") {
            settings.mode = Some(mode.parse().map_err(DeclCheckError::config_error)?);
        }
        settings.disabled_kinds = self.list("DISABLE");
        settings.ignored_properties = self.list("IGNORE_PROPERTIES");
        settings.no_default_export_exemptions = self.allow_list("NO_DEFAULT_EXPORT_EXEMPT");
        settings.squat_exemptions = self.allow_list("SQUAT_EXEMPT");

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
