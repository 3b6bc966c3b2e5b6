//! One compatibility check from inputs to an ordered diagnostic list

use crate::core::actual::ActualShapeExtractor;
use crate::core::comparator::Comparator;
use crate::core::registry::registry_diagnostics;
use crate::error::{DeclCheckError, Result};
use crate::models::config::Settings;
use crate::models::diagnostic::{Diagnostic, ErrorKind};
use crate::models::module::LoadedModule;
use crate::models::registry::{CheckMode, RegistryInfo};
use crate::parsers::declaration::DeclarationParser;
use crate::parsers::header::parse_header;
use crate::parsers::source_markers::SourceMarkers;
use serde::Serialize;
use std::collections::BTreeSet;

/// Everything one check needs, already acquired by the caller
#[derive(Debug, Clone, Default)]
pub struct CheckInput {
    pub module_name: String,
    pub declaration: Option<String>,
    pub module: Option<LoadedModule>,
    /// Overrides the mode named in the declaration header
    pub mode: Option<CheckMode>,
    /// Registry data; registry rules are skipped when absent
    pub registry: Option<RegistryInfo>,
    pub squat_exempt: bool,
}

impl CheckInput {
    pub fn new(module_name: impl Into<String>, declaration: impl Into<String>, module: LoadedModule) -> Self {
        Self {
            module_name: module_name.into(),
            declaration: Some(declaration.into()),
            module: Some(module),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: CheckMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_registry(mut self, registry: RegistryInfo, squat_exempt: bool) -> Self {
        self.registry = Some(registry);
        self.squat_exempt = squat_exempt;
        self
    }
}

/// Result of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub module_name: String,
    pub mode: CheckMode,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Runs checks with one configuration
pub struct Checker {
    declared: DeclarationParser,
    actual: ActualShapeExtractor,
    comparator: Comparator,
    markers: SourceMarkers,
    disabled: BTreeSet<ErrorKind>,
}

impl Checker {
    /// Build a checker from settings; fails on disabled kind names that do
    /// not resolve
    pub fn new(settings: &Settings) -> Result<Self> {
        let disabled = settings
            .disabled_kinds
            .iter()
            .map(|name| {
                ErrorKind::parse(name).ok_or_else(|| DeclCheckError::UnknownErrorKind {
                    name: name.clone(),
                })
            })
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(Self {
            declared: DeclarationParser::new(settings.ignored_properties.iter().cloned()),
            actual: ActualShapeExtractor::new(settings.ignored_properties.iter().cloned()),
            comparator: Comparator::new(settings.no_default_export_exemptions.clone()),
            markers: SourceMarkers::new(
                settings.default_export_shims.clone(),
                settings.fetch_failure_sentinels.clone(),
            ),
            disabled,
        })
    }

    pub fn check(&self, input: &CheckInput) -> Result<CheckReport> {
        let declaration = input
            .declaration
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| DeclCheckError::missing_input("declaration text"))?;
        let module = input
            .module
            .as_ref()
            .ok_or_else(|| DeclCheckError::missing_input("JavaScript module value"))?;
        if input.module_name.trim().is_empty() {
            return Err(DeclCheckError::missing_input("module name"));
        }
        let name = input.module_name.as_str();

        let header = parse_header(declaration);
        let mode = input
            .mode
            .or_else(|| header.as_ref().map(|header| header.mode()))
            .unwrap_or(CheckMode::Npm);
        tracing::info!(module = name, %mode, "checking declaration");

        let declared = self.declared.extract(name, declaration);
        let actual = self.actual.extract(name, module);
        let evidence = self.markers.default_export_evidence(&module.source);

        let mut diagnostics = match &input.registry {
            Some(info) => registry_diagnostics(name, mode, header.as_ref(), info, input.squat_exempt),
            None => Vec::new(),
        };
        diagnostics.extend(
            self.comparator
                .compare(name, &declared, &actual, &evidence, mode),
        );
        diagnostics.retain(|diagnostic| !self.disabled.contains(&diagnostic.kind));

        tracing::info!(module = name, count = diagnostics.len(), "check finished");
        Ok(CheckReport {
            module_name: name.to_string(),
            mode,
            diagnostics,
        })
    }
}

impl Default for Checker {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            declared: DeclarationParser::new(settings.ignored_properties.iter().cloned()),
            actual: ActualShapeExtractor::new(settings.ignored_properties.iter().cloned()),
            comparator: Comparator::default(),
            markers: SourceMarkers::default(),
            disabled: BTreeSet::new(),
        }
    }
}
