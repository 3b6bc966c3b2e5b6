//! Registry-side inputs supplied by the collaborator layer

use serde::{Deserialize, Serialize};

/// Whether the declaration is governed by npm registry rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckMode {
    /// The declaration describes a published npm package
    Npm,
    /// The declaration describes a package that is not on npm
    NonNpm,
}

impl std::str::FromStr for CheckMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(CheckMode::Npm),
            "non-npm" | "nonnpm" | "non_npm" => Ok(CheckMode::NonNpm),
            _ => Err(format!("Invalid check mode: {}", s)),
        }
    }
}

impl std::fmt::Display for CheckMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckMode::Npm => write!(f, "npm"),
            CheckMode::NonNpm => write!(f, "non-npm"),
        }
    }
}

/// What the registry knows about a package name, fetched ahead of the check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryInfo {
    pub exists: bool,
    #[serde(default)]
    pub versions: Vec<String>,
}

impl RegistryInfo {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn published(versions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            exists: true,
            versions: versions.into_iter().map(Into::into).collect(),
        }
    }
}
