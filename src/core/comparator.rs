//! Structural comparison of a declared shape against an actual shape
//!
//! Every check runs on every comparison and findings are appended in a fixed
//! order, so the same pair of shapes always yields the same list.

use crate::models::diagnostic::{Diagnostic, ErrorKind};
use crate::models::registry::CheckMode;
use crate::models::shape::Shape;
use crate::parsers::source_markers::DefaultExportEvidence;
use std::collections::BTreeMap;

const EXPORT_EQUALS_GUIDANCE: &str = "\n\nThe most common way to resolve this is to use 'export =' syntax in the declaration, \
so that the exported value itself can be called or constructed.";

/// Opening line shared by every structural finding
pub fn mismatch_prefix(module_name: &str) -> String {
    format!(
        "The declaration doesn't match the JavaScript module '{}'. Reason:\n",
        module_name
    )
}

/// Compares shapes and reports mismatches as diagnostics
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    no_default_export_exemptions: BTreeMap<String, bool>,
}

impl Comparator {
    pub fn new(no_default_export_exemptions: BTreeMap<String, bool>) -> Self {
        Self {
            no_default_export_exemptions,
        }
    }

    fn is_default_exempt(&self, module_name: &str) -> bool {
        self.no_default_export_exemptions
            .get(module_name)
            .copied()
            .unwrap_or(false)
    }

    /// Compare `declared` against `actual`.
    ///
    /// `evidence` is what the raw JavaScript source says about default
    /// exports. `mode` does not influence the structural checks.
    pub fn compare(
        &self,
        module_name: &str,
        declared: &Shape,
        actual: &Shape,
        evidence: &DefaultExportEvidence,
        mode: CheckMode,
    ) -> Vec<Diagnostic> {
        let prefix = mismatch_prefix(module_name);
        let mut diagnostics = Vec::new();

        for property in declared.properties() {
            if !actual.has_property(&property.name) {
                diagnostics.push(
                    Diagnostic::new(
                        ErrorKind::DtsPropertyNotInJs,
                        format!(
                            "{}The declaration module exports a property named '{}', which is missing from the JavaScript module.",
                            prefix, property.name
                        ),
                    )
                    .with_position(property.position),
                );
            }
        }

        for property in actual.properties() {
            if !declared.has_property(&property.name) {
                diagnostics.push(Diagnostic::new(
                    ErrorKind::JsPropertyNotInDts,
                    format!(
                        "{}The JavaScript module exports a property named '{}', which is missing from the declaration module.",
                        prefix, property.name
                    ),
                ));
            }
        }

        if actual.is_invocable() && !declared.is_invocable() {
            let mut message = format!(
                "{}The JavaScript module can be called or constructed, but the declaration module cannot.",
                prefix
            );
            if !declared.uses_export_equals {
                message.push_str(EXPORT_EQUALS_GUIDANCE);
            }
            diagnostics.push(Diagnostic::new(ErrorKind::JsCallable, message));
        }

        if declared.is_invocable() && !actual.is_invocable() {
            diagnostics.push(Diagnostic::new(
                ErrorKind::DtsCallable,
                format!(
                    "{}The declaration module can be called or constructed, but the JavaScript module cannot.",
                    prefix
                ),
            ));
        }

        if actual.uses_module_exports_assignment
            && actual.is_invocable()
            && !declared.uses_export_equals
        {
            diagnostics.push(Diagnostic::new(
                ErrorKind::NeedsExportEquals,
                format!(
                    "{}The declaration should use 'export =' syntax because the JavaScript source assigns a callable value to 'module.exports'.",
                    prefix
                ),
            ));
        }

        if declared.has_default_export_marker && !declared.uses_export_equals {
            if self.is_default_exempt(module_name) {
                tracing::debug!(module = module_name, "default export allow-listed");
            } else if evidence.suppresses() {
                tracing::debug!(module = module_name, ?evidence, "default export finding suppressed");
            } else {
                diagnostics.push(
                    Diagnostic::new(
                        ErrorKind::NoDefaultExport,
                        format!(
                            "{}The declaration specifies 'export default' but the JavaScript source does not mention 'default' anywhere.\n\n\
                             The most common way to resolve this is to use 'export =' syntax instead of 'export default'.",
                            prefix
                        ),
                    )
                    .with_position(declared.default_export_position),
                );
            }
        }

        tracing::debug!(
            module = module_name,
            %mode,
            count = diagnostics.len(),
            "structural comparison finished"
        );
        diagnostics
    }
}

/// Compare with no allow-list entries
pub fn compare(
    module_name: &str,
    declared: &Shape,
    actual: &Shape,
    evidence: &DefaultExportEvidence,
    mode: CheckMode,
) -> Vec<Diagnostic> {
    Comparator::default().compare(module_name, declared, actual, evidence, mode)
}
