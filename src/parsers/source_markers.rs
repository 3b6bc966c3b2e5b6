//! Text-level scanning of declaration and JavaScript sources
//!
//! Some default-export conventions are invisible to runtime introspection
//! (Babel interop, relay modules, shim plugins). These are recognised from the
//! raw source text instead.

use crate::models::diagnostic::Position;
use crate::models::module::SourceText;
use regex::Regex;

/// Export-style statements found by a line scan of declaration text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationTextScan {
    pub export_equals: Option<Position>,
    pub export_default: Option<Position>,
    pub has_ambient_wrapper: bool,
}

/// Line-based scan for `export =`, `export default` and ambient module
/// wrappers, used when the declaration does not parse
pub fn scan_declaration_text(text: &str) -> DeclarationTextScan {
    let mut scan = DeclarationTextScan::default();
    let mut offset = 0usize;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        let trimmed = content.trim_start();
        let start = offset + (content.len() - trimmed.len());
        let trimmed = trimmed.trim_end();
        let position = Position::new(start as u32, trimmed.len() as u32);

        if scan.export_equals.is_none() && is_export_equals_line(trimmed) {
            scan.export_equals = Some(position);
        }
        if scan.export_default.is_none() && trimmed.starts_with("export default") {
            scan.export_default = Some(position);
        }
        if trimmed.starts_with("declare module \"") || trimmed.starts_with("declare module '") {
            scan.has_ambient_wrapper = true;
        }

        offset += line.len();
    }
    scan
}

fn is_export_equals_line(line: &str) -> bool {
    line.strip_prefix("export")
        .map(str::trim_start)
        .is_some_and(|rest| rest.starts_with('=') && !rest.starts_with("=="))
}

/// Convention found in a JavaScript source that implies a default export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultExportMarker {
    /// A literal `default` token
    DefaultToken,
    /// The `__esModule` interop flag
    EsModuleFlag,
    /// A known default-export shim package
    Shim(String),
    /// `module.exports = require(...)`
    RequireRelay,
}

/// What the raw source says about default exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultExportEvidence {
    /// The source could not be retrieved; nothing can be concluded
    SourceUnavailable,
    Marker(DefaultExportMarker),
    /// The source was inspected and carries no default-export convention
    NoMarker,
}

impl DefaultExportEvidence {
    /// Whether a missing-default-export finding must be suppressed
    pub fn suppresses(&self) -> bool {
        !matches!(self, DefaultExportEvidence::NoMarker)
    }
}

/// Compiled marker patterns plus the configured shim names and fetch-failure
/// sentinels
#[derive(Debug, Clone)]
pub struct SourceMarkers {
    default_token: Regex,
    require_relay: Regex,
    shims: Vec<String>,
    sentinels: Vec<String>,
}

impl SourceMarkers {
    pub fn new(shims: Vec<String>, sentinels: Vec<String>) -> Self {
        Self {
            default_token: Regex::new(r"\bdefault\b").expect("default token pattern is valid"),
            require_relay: Regex::new(r"module\.exports\s*=\s*require\s*\(")
                .expect("relay pattern is valid"),
            shims,
            sentinels,
        }
    }

    /// Whether `text` is a placeholder the fetch layer substituted for a source
    /// it could not retrieve
    pub fn is_fetch_failure(&self, text: &str) -> bool {
        let text = text.trim();
        text.is_empty()
            || self
                .sentinels
                .iter()
                .any(|sentinel| !sentinel.is_empty() && text.starts_with(sentinel.as_str()))
    }

    /// First default-export marker found in `text`
    pub fn find_default_marker(&self, text: &str) -> Option<DefaultExportMarker> {
        if self.default_token.is_match(text) {
            return Some(DefaultExportMarker::DefaultToken);
        }
        if text.contains("__esModule") {
            return Some(DefaultExportMarker::EsModuleFlag);
        }
        if let Some(shim) = self.shims.iter().find(|shim| text.contains(shim.as_str())) {
            return Some(DefaultExportMarker::Shim(shim.clone()));
        }
        if self.require_relay.is_match(text) {
            return Some(DefaultExportMarker::RequireRelay);
        }
        None
    }

    /// Classify the raw source for the default-export check
    pub fn default_export_evidence(&self, source: &SourceText) -> DefaultExportEvidence {
        match source.as_str() {
            None => DefaultExportEvidence::SourceUnavailable,
            Some(text) if self.is_fetch_failure(text) => DefaultExportEvidence::SourceUnavailable,
            Some(text) => match self.find_default_marker(text) {
                Some(marker) => DefaultExportEvidence::Marker(marker),
                None => DefaultExportEvidence::NoMarker,
            },
        }
    }
}

impl Default for SourceMarkers {
    fn default() -> Self {
        Self::new(
            crate::models::config::default_export_shims(),
            crate::models::config::default_fetch_failure_sentinels(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence(text: &str) -> DefaultExportEvidence {
        SourceMarkers::default().default_export_evidence(&SourceText::Available(text.to_string()))
    }

    #[test]
    fn test_scan_declaration_text() {
        let text = "// header\n  export = foo;\nexport default bar;\n";
        let scan = scan_declaration_text(text);

        let equals = scan.export_equals.unwrap();
        assert_eq!(&text[equals.start as usize..equals.end() as usize], "export = foo;");
        let default = scan.export_default.unwrap();
        assert_eq!(&text[default.start as usize..default.end() as usize], "export default bar;");
        assert!(!scan.has_ambient_wrapper);
    }

    #[test]
    fn test_scan_detects_ambient_wrapper() {
        let scan = scan_declaration_text("declare module 'pkg' {\n  export default x;\n}\n");
        assert!(scan.has_ambient_wrapper);
        assert!(scan.export_default.is_some());
    }

    #[test]
    fn test_export_equals_line() {
        assert!(is_export_equals_line("export = x;"));
        assert!(is_export_equals_line("export=x;"));
        assert!(!is_export_equals_line("export const x = 1;"));
        assert!(!is_export_equals_line("exports.x = 1;"));
    }

    #[test]
    fn test_default_token() {
        assert_eq!(
            evidence("exports.default = main;"),
            DefaultExportEvidence::Marker(DefaultExportMarker::DefaultToken)
        );
        assert_eq!(evidence("var defaults = {};\nmodule.exports = defaults;"), DefaultExportEvidence::NoMarker);
    }

    #[test]
    fn test_interop_flag() {
        assert_eq!(
            evidence("Object.defineProperty(exports, \"__esModule\", { value: true });"),
            DefaultExportEvidence::Marker(DefaultExportMarker::EsModuleFlag)
        );
    }

    #[test]
    fn test_shim_name() {
        assert_eq!(
            evidence("// built with babel-plugin-add-module-exports\nmodule.exports = main;"),
            DefaultExportEvidence::Marker(DefaultExportMarker::Shim(
                "babel-plugin-add-module-exports".to_string()
            ))
        );
    }

    #[test]
    fn test_require_relay() {
        assert_eq!(
            evidence("module.exports  =\n  require('./lib/main');"),
            DefaultExportEvidence::Marker(DefaultExportMarker::RequireRelay)
        );
    }

    #[test]
    fn test_fetch_failures_are_unavailable() {
        assert_eq!(evidence("Too Many Requests"), DefaultExportEvidence::SourceUnavailable);
        assert_eq!(evidence("  Error: Request timed out after 30s"), DefaultExportEvidence::SourceUnavailable);
        assert_eq!(evidence(""), DefaultExportEvidence::SourceUnavailable);
        assert_eq!(
            SourceMarkers::default().default_export_evidence(&SourceText::Unavailable),
            DefaultExportEvidence::SourceUnavailable
        );
    }

    #[test]
    fn test_suppresses() {
        assert!(DefaultExportEvidence::SourceUnavailable.suppresses());
        assert!(DefaultExportEvidence::Marker(DefaultExportMarker::RequireRelay).suppresses());
        assert!(!DefaultExportEvidence::NoMarker.suppresses());
    }
}
