//! Module path resolution utilities

use crate::error::{DeclCheckError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const EXTENSIONS: [&str; 3] = ["js", "cjs", "mjs"];

/// Resolve the file a `--js` argument refers to.
///
/// Files are used as given. A package directory resolves through the `main`
/// field of its `package.json`, then `index.js`.
pub fn resolve_entry(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        if let Some(candidate) = with_extensions(path) {
            return Ok(candidate);
        }
        return Err(DeclCheckError::InvalidPath {
            path: path.to_path_buf(),
        });
    }

    if let Some(main) = read_package_json(path).and_then(|json| string_field(&json, "main")) {
        let target = path.join(&main);
        if target.is_file() {
            return Ok(target);
        }
        if let Some(candidate) = with_extensions(&target) {
            return Ok(candidate);
        }
        let index = target.join("index.js");
        if index.is_file() {
            return Ok(index);
        }
        tracing::warn!(main = %main, "package.json main does not resolve, trying index.js");
    }

    let index = path.join("index.js");
    if index.is_file() {
        Ok(index)
    } else {
        Err(DeclCheckError::InvalidPath {
            path: path.to_path_buf(),
        })
    }
}

/// Package name from the `package.json` of `dir`, if any
pub fn package_name(dir: &Path) -> Option<String> {
    read_package_json(dir).and_then(|json| string_field(&json, "name"))
}

fn with_extensions(path: &Path) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| {
            let mut candidate = path.as_os_str().to_owned();
            candidate.push(".");
            candidate.push(ext);
            PathBuf::from(candidate)
        })
        .find(|candidate| candidate.is_file())
}

fn read_package_json(dir: &Path) -> Option<Value> {
    let content = fs::read_to_string(dir.join("package.json")).ok()?;
    serde_json::from_str(&content).ok()
}

fn string_field(json: &Value, field: &str) -> Option<String> {
    json.get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}
