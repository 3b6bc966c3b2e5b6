//! Loader that requires the module under node and snapshots its exports

use super::{read_source, ModuleLoader};
use crate::error::{DeclCheckError, Result};
use crate::models::module::{LoadedModule, RuntimeValue, SourceText};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Introspection script run with `node -e`; the module path is `argv[1]`
const INTROSPECT_SCRIPT: &str = r#"
const path = require('path');
const value = require(path.resolve(process.argv[1]));
function describe(value) {
  if (value === null) return { kind: 'null' };
  const type = typeof value;
  if (type === 'undefined') return { kind: 'undefined' };
  if (type !== 'object' && type !== 'function') return { kind: 'primitive' };
  const keys = Object.getOwnPropertyNames(value).map((name) => ({
    name,
    enumerable: Object.prototype.propertyIsEnumerable.call(value, name),
  }));
  let kind = Array.isArray(value) ? 'array' : 'object';
  let constructible = false;
  if (type === 'function') {
    const isClass = /^class[\s{]/.test(Function.prototype.toString.call(value));
    kind = isClass ? 'class' : 'function';
    constructible = isClass || value.prototype !== undefined;
  }
  return { kind, constructible, keys, esModule: value.__esModule === true };
}
process.stdout.write(JSON.stringify(describe(value)));
"#;

/// Runs node to evaluate the module for real
#[derive(Debug, Clone)]
pub struct NodeLoader {
    node_binary: PathBuf,
}

impl NodeLoader {
    pub fn new(node_binary: impl Into<PathBuf>) -> Self {
        Self {
            node_binary: node_binary.into(),
        }
    }

    /// Parse the JSON printed by the introspection script
    pub fn parse_snapshot(path: &Path, output: &str) -> Result<RuntimeValue> {
        serde_json::from_str(output.trim()).map_err(|e| {
            DeclCheckError::module_load_error(path, format!("unexpected introspection output: {}", e))
        })
    }
}

impl ModuleLoader for NodeLoader {
    fn load(&self, path: &Path) -> Result<LoadedModule> {
        let source = read_source(path)?;

        tracing::debug!(
            path = %path.display(),
            node = %self.node_binary.display(),
            "loading module with node"
        );
        let output = Command::new(&self.node_binary)
            .arg("-e")
            .arg(INTROSPECT_SCRIPT)
            .arg(path)
            .output()
            .map_err(|e| {
                DeclCheckError::module_load_error(
                    path,
                    format!("could not run {}: {}", self.node_binary.display(), e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .map(str::trim)
                .rfind(|line| !line.is_empty() && !line.starts_with("at "))
                .unwrap_or("module threw during evaluation")
                .to_string();
            return Err(DeclCheckError::module_load_error(path, reason));
        }

        let exports = Self::parse_snapshot(path, &String::from_utf8_lossy(&output.stdout))?;
        Ok(LoadedModule::new(exports, SourceText::Available(source)))
    }

    fn name(&self) -> &'static str {
        "node"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::module::ValueKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_snapshot() {
        let value = NodeLoader::parse_snapshot(
            Path::new("index.js"),
            r#"{"kind":"function","constructible":true,"keys":[{"name":"length","enumerable":false},{"name":"sync","enumerable":true}],"esModule":false}"#,
        )
        .unwrap();
        assert_eq!(value.kind, ValueKind::Function);
        assert!(value.is_constructible());
        assert_eq!(value.enumerable_keys().collect::<Vec<_>>(), vec!["sync"]);
    }

    #[test]
    fn test_parse_snapshot_minimal() {
        let value = NodeLoader::parse_snapshot(Path::new("index.js"), "{\"kind\":\"primitive\"}\n").unwrap();
        assert_eq!(value.kind, ValueKind::Primitive);
        assert!(value.keys.is_empty());
    }

    #[test]
    fn test_parse_snapshot_garbage() {
        let err = NodeLoader::parse_snapshot(Path::new("index.js"), "warning: something").unwrap_err();
        assert!(matches!(err, DeclCheckError::ModuleLoad { .. }));
    }

    #[test]
    fn test_missing_binary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.js");
        fs::write(&path, "module.exports = 1;").unwrap();

        let err = NodeLoader::new("/nonexistent/declcheck-node").load(&path).unwrap_err();
        assert!(err.to_string().contains("could not run"));
    }
}
