//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeclCheckError, Result};
use crate::models::config::PartialSettings;
use crate::models::diagnostic::ErrorKind;

use super::file::DEFAULT_CONFIG_FILE;

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DeclCheckError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| DeclCheckError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| DeclCheckError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Validate partial settings for obvious errors
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(kinds) = &settings.disabled_kinds {
        for kind in kinds {
            if ErrorKind::parse(kind).is_none() {
                return Err(DeclCheckError::config_error(format!(
                    "Unknown diagnostic kind '{}' in disabled_kinds of {}",
                    kind,
                    path.display()
                )));
            }
        }
    }

    if let Some(properties) = &settings.ignored_properties {
        if properties.iter().any(|p| p.trim().is_empty()) {
            return Err(DeclCheckError::config_error(format!(
                "Empty name in ignored_properties of {}",
                path.display()
            )));
        }
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return Err(DeclCheckError::config_error(format!(
                "Invalid empty output_file in config file: {}",
                path.display()
            )));
        }
    }

    if let Some(node_binary) = &settings.node_binary {
        if node_binary.as_os_str().is_empty() {
            return Err(DeclCheckError::config_error(format!(
                "Invalid empty node_binary in config file: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Candidate config locations, in lookup order
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
    if let Some(home_dir) = dirs::home_dir() {
        locations.push(home_dir.join(DEFAULT_CONFIG_FILE));
    }
    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("declcheck").join("config.toml"));
    }
    locations
}

/// Find and load configuration from the first default location that exists
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    for location in default_config_locations() {
        if location.is_file() {
            tracing::debug!(path = %location.display(), "using default config file");
            return Ok(Some(parse_config_file(location)?));
        }
    }
    Ok(None)
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(DeclCheckError::io_error)?;
        }
    }

    let default_config = include_str!("default_config.toml");
    fs::write(path, default_config).map_err(|e| DeclCheckError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
