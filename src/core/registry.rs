//! Registry rules over already-fetched package data

use crate::models::config::Settings;
use crate::models::diagnostic::{Diagnostic, ErrorKind};
use crate::models::registry::{CheckMode, RegistryInfo};
use crate::parsers::header::DeclarationHeader;

/// Whether `module_name` may share its name with a published package even
/// though its declaration is marked non-npm
pub fn is_squat_exempt(settings: &Settings, module_name: &str) -> bool {
    settings
        .squat_exemptions
        .get(module_name)
        .copied()
        .unwrap_or(false)
}

/// Findings about the relationship between a declaration and the registry
pub fn registry_diagnostics(
    module_name: &str,
    mode: CheckMode,
    header: Option<&DeclarationHeader>,
    info: &RegistryInfo,
    squat_exempt: bool,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    match mode {
        CheckMode::Npm => {
            if !info.exists {
                diagnostics.push(Diagnostic::new(
                    ErrorKind::NoMatchingNpmPackage,
                    format!(
                        "Declaration file must have a matching npm package, but '{}' is not published.\n\
                         Either rename the declaration to match a published package, or mark it with a \
                         '// Type definitions for non-npm package {}' header.",
                        module_name, module_name
                    ),
                ));
            } else if let Some(version) = header.and_then(|header| header.version) {
                if !info
                    .versions
                    .iter()
                    .any(|published| version.matches_published(published))
                {
                    diagnostics.push(Diagnostic::new(
                        ErrorKind::NoMatchingNpmVersion,
                        format!(
                            "The declaration describes version {} of '{}', but no published version matches it.\n\
                             Published versions: {}",
                            version,
                            module_name,
                            if info.versions.is_empty() {
                                "(none)".to_string()
                            } else {
                                info.versions.join(", ")
                            }
                        ),
                    ));
                }
            }
        }
        CheckMode::NonNpm => {
            if info.exists && !squat_exempt {
                diagnostics.push(Diagnostic::new(
                    ErrorKind::NonNpmHasMatchingPackage,
                    format!(
                        "The non-npm declaration '{}' has the same name as a published npm package.\n\
                         Rename the declaration (for example '{}-browser'), or check it against the published package instead.",
                        module_name, module_name
                    ),
                ));
            }
        }
    }

    tracing::debug!(module = module_name, %mode, count = diagnostics.len(), "registry rules applied");
    diagnostics
}
