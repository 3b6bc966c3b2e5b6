//! Configuration-related data structures

use crate::models::registry::CheckMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration settings for declcheck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show debug logging
    pub verbose: bool,

    /// How JavaScript modules are loaded
    pub loader: LoaderKind,

    /// Node executable used by the node loader
    pub node_binary: PathBuf,

    /// Check mode; derived from the declaration header when unset
    pub mode: Option<CheckMode>,

    /// Diagnostic kinds that are never reported (case-insensitive names)
    pub disabled_kinds: Vec<String>,

    /// Property names that never take part in the comparison
    pub ignored_properties: Vec<String>,

    /// Package names whose presence in a source marks a default-export shim
    pub default_export_shims: Vec<String>,

    /// Placeholder texts the fetch layer substitutes for unreachable sources
    pub fetch_failure_sentinels: Vec<String>,

    /// Packages exempt from the missing-default-export finding
    pub no_default_export_exemptions: BTreeMap<String, bool>,

    /// Non-npm packages allowed to share a name with a published package
    pub squat_exemptions: BTreeMap<String, bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Text,
            output_file: None,
            use_colors: true,
            quiet: false,
            verbose: false,
            loader: LoaderKind::Auto,
            node_binary: PathBuf::from("node"),
            mode: None,
            disabled_kinds: Vec::new(),
            ignored_properties: default_ignored_properties(),
            default_export_shims: default_export_shims(),
            fetch_failure_sentinels: default_fetch_failure_sentinels(),
            no_default_export_exemptions: BTreeMap::new(),
            squat_exemptions: BTreeMap::new(),
        }
    }
}

/// Interop plumbing that never counts as an exported property
pub fn default_ignored_properties() -> Vec<String> {
    ["default", "__esModule", "prototype"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn default_export_shims() -> Vec<String> {
    vec!["babel-plugin-add-module-exports".to_string()]
}

pub fn default_fetch_failure_sentinels() -> Vec<String> {
    [
        "Error: Request timed out",
        "ETIMEDOUT",
        "Too Many Requests",
        "Internal Server Error",
        "Bad Gateway",
        "Service Unavailable",
        "Gateway Timeout",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Strategy used to turn a JavaScript file into a runtime snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    /// Evaluate the module with node
    Node,
    /// Approximate the exports from the source text
    Static,
    /// Node when available, static otherwise
    Auto,
}

impl std::str::FromStr for LoaderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "node" => Ok(LoaderKind::Node),
            "static" => Ok(LoaderKind::Static),
            "auto" => Ok(LoaderKind::Auto),
            _ => Err(format!("Invalid loader: {}", s)),
        }
    }
}

impl std::fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderKind::Node => write!(f, "node"),
            LoaderKind::Static => write!(f, "static"),
            LoaderKind::Auto => write!(f, "auto"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSettings {
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub use_colors: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub loader: Option<LoaderKind>,
    pub node_binary: Option<PathBuf>,
    pub mode: Option<CheckMode>,
    pub disabled_kinds: Option<Vec<String>>,
    pub ignored_properties: Option<Vec<String>>,
    pub default_export_shims: Option<Vec<String>>,
    pub fetch_failure_sentinels: Option<Vec<String>>,
    pub no_default_export_exemptions: Option<BTreeMap<String, bool>>,
    pub squat_exemptions: Option<BTreeMap<String, bool>>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.loader.is_some() {
            self.loader = other.loader;
        }
        if other.node_binary.is_some() {
            self.node_binary = other.node_binary;
        }
        if other.mode.is_some() {
            self.mode = other.mode;
        }
        if other.disabled_kinds.is_some() {
            self.disabled_kinds = other.disabled_kinds;
        }
        if other.ignored_properties.is_some() {
            self.ignored_properties = other.ignored_properties;
        }
        if other.default_export_shims.is_some() {
            self.default_export_shims = other.default_export_shims;
        }
        if other.fetch_failure_sentinels.is_some() {
            self.fetch_failure_sentinels = other.fetch_failure_sentinels;
        }
        // Allow-lists accumulate across sources; later sources override per name
        if let Some(exemptions) = other.no_default_export_exemptions {
            self.no_default_export_exemptions
                .get_or_insert_with(BTreeMap::new)
                .extend(exemptions);
        }
        if let Some(exemptions) = other.squat_exemptions {
            self.squat_exemptions
                .get_or_insert_with(BTreeMap::new)
                .extend(exemptions);
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(loader) = self.loader {
            settings.loader = loader;
        }
        if let Some(node_binary) = &self.node_binary {
            settings.node_binary = node_binary.clone();
        }
        if let Some(mode) = self.mode {
            settings.mode = Some(mode);
        }
        if let Some(disabled_kinds) = &self.disabled_kinds {
            settings.disabled_kinds = disabled_kinds.clone();
        }
        if let Some(ignored_properties) = &self.ignored_properties {
            settings.ignored_properties = ignored_properties.clone();
        }
        if let Some(shims) = &self.default_export_shims {
            settings.default_export_shims = shims.clone();
        }
        if let Some(sentinels) = &self.fetch_failure_sentinels {
            settings.fetch_failure_sentinels = sentinels.clone();
        }
        if let Some(exemptions) = &self.no_default_export_exemptions {
            settings.no_default_export_exemptions = exemptions.clone();
        }
        if let Some(exemptions) = &self.squat_exemptions {
            settings.squat_exemptions = exemptions.clone();
        }

        settings
    }
}
