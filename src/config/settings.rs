//! Validation of fully merged settings

use std::path::Path;

use crate::error::{DeclCheckError, Result};
use crate::models::config::Settings;
use crate::models::diagnostic::ErrorKind;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        for kind in &settings.disabled_kinds {
            if ErrorKind::parse(kind).is_none() {
                return Err(DeclCheckError::UnknownErrorKind { name: kind.clone() });
            }
        }

        if settings.quiet && settings.verbose {
            return Err(DeclCheckError::config_error(
                "quiet and verbose cannot both be enabled",
            ));
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// The parent directory of the output file must exist
    fn validate_output_path(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(DeclCheckError::InvalidPath {
                    path: parent.to_path_buf(),
                })
            }
            _ => Ok(()),
        }
    }
}
