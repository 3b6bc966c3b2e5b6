//! Pre-computed inputs read from JSON files

use crate::error::{DeclCheckError, IoResultExt, Result};
use crate::models::module::RuntimeValue;
use crate::models::registry::RegistryInfo;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).with_path(path)?;
    serde_json::from_str(&content).map_err(|e| DeclCheckError::json_parse_error(path, e))
}

/// A runtime value snapshot captured elsewhere, in the node loader's format
pub fn load_snapshot(path: &Path) -> Result<RuntimeValue> {
    let value: RuntimeValue = read_json(path)?;
    tracing::debug!(path = %path.display(), kind = ?value.kind, "loaded exports snapshot");
    Ok(value)
}

/// Registry data for the package: `{"exists": true, "versions": ["1.0.0"]}`
pub fn load_registry_info(path: &Path) -> Result<RegistryInfo> {
    read_json(path)
}
