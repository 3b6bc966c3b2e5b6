//! Declaration header parsing
//!
//! Declarations published alongside a registry package open with a comment
//! header naming the package and the version they describe:
//!
//! ```text
//! // Type definitions for left-pad 1.3
//! // Type definitions for non-npm package left-pad-browser 1.3
//! ```

use crate::models::registry::CheckMode;
use std::fmt;

const HEADER_PREFIX: &str = "// Type definitions for ";
const NON_NPM_PREFIX: &str = "non-npm package ";

/// `major.minor` version named in a header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderVersion {
    pub major: u64,
    pub minor: u64,
}

impl HeaderVersion {
    /// Parse `1`, `1.2` or `1.2.3` (patch ignored)
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().trim_start_matches('v').split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = match parts.next() {
            Some(minor) if minor == "x" => 0,
            Some(minor) => minor.parse().ok()?,
            None => 0,
        };
        Some(Self { major, minor })
    }

    /// Whether a published `major.minor.patch` version string falls in this
    /// header version
    pub fn matches_published(&self, published: &str) -> bool {
        let core = published.split(['-', '+']).next().unwrap_or(published);
        let mut parts = core.split('.');
        let major = parts.next().and_then(|p| p.parse::<u64>().ok());
        let minor = parts.next().and_then(|p| p.parse::<u64>().ok());
        major == Some(self.major) && minor == Some(self.minor)
    }
}

impl fmt::Display for HeaderVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Parsed declaration header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationHeader {
    pub library_name: String,
    pub non_npm: bool,
    pub version: Option<HeaderVersion>,
}

impl DeclarationHeader {
    pub fn mode(&self) -> CheckMode {
        if self.non_npm {
            CheckMode::NonNpm
        } else {
            CheckMode::Npm
        }
    }
}

/// Find and parse the header in the leading comment block of `text`
pub fn parse_header(text: &str) -> Option<DeclarationHeader> {
    let line = text
        .lines()
        .map(str::trim)
        .take_while(|line| line.is_empty() || line.starts_with("//"))
        .find_map(|line| line.strip_prefix(HEADER_PREFIX))?;

    let (non_npm, rest) = match line.strip_prefix(NON_NPM_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let rest = rest.trim();

    let (library_name, version) = match rest.rsplit_once(' ') {
        Some((name, last)) => match HeaderVersion::parse(last) {
            Some(version) => (name.trim(), Some(version)),
            None => (rest, None),
        },
        None => (rest, None),
    };
    if library_name.is_empty() {
        return None;
    }

    Some(DeclarationHeader {
        library_name: library_name.to_string(),
        non_npm,
        version,
    })
}
