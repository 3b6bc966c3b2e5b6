//! Diagnostic vocabulary shared by the comparator, the registry rules and
//! every consumer of a check (CLI, library callers, tests).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Byte span into the declaration source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub start: u32,
    pub length: u32,
}

impl Position {
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    /// Build a position from an oxc span
    pub fn from_span(span: oxc_span::Span) -> Self {
        Self {
            start: span.start,
            length: span.size(),
        }
    }

    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    /// Resolve the start offset to a 1-based `(line, column)` pair in `text`.
    /// The column counts characters, not bytes.
    pub fn line_col(&self, text: &str) -> (usize, usize) {
        let mut offset = (self.start as usize).min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &text[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}

/// Closed set of finding kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Declaration claims an npm package that the registry does not know
    NoMatchingNpmPackage,
    /// Declaration header version has no published counterpart
    NoMatchingNpmVersion,
    /// Non-npm declaration shadows a published package name
    NonNpmHasMatchingPackage,
    DtsPropertyNotInJs,
    JsPropertyNotInDts,
    DtsCallable,
    JsCallable,
    NeedsExportEquals,
    NoDefaultExport,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::NoMatchingNpmPackage,
        ErrorKind::NoMatchingNpmVersion,
        ErrorKind::NonNpmHasMatchingPackage,
        ErrorKind::DtsPropertyNotInJs,
        ErrorKind::JsPropertyNotInDts,
        ErrorKind::DtsCallable,
        ErrorKind::JsCallable,
        ErrorKind::NeedsExportEquals,
        ErrorKind::NoDefaultExport,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NoMatchingNpmPackage => "NoMatchingNpmPackage",
            ErrorKind::NoMatchingNpmVersion => "NoMatchingNpmVersion",
            ErrorKind::NonNpmHasMatchingPackage => "NonNpmHasMatchingPackage",
            ErrorKind::DtsPropertyNotInJs => "DtsPropertyNotInJs",
            ErrorKind::JsPropertyNotInDts => "JsPropertyNotInDts",
            ErrorKind::DtsCallable => "DtsCallable",
            ErrorKind::JsCallable => "JsCallable",
            ErrorKind::NeedsExportEquals => "NeedsExportEquals",
            ErrorKind::NoDefaultExport => "NoDefaultExport",
        }
    }

    /// Case-insensitive lookup of a kind by name
    pub fn parse(name: &str) -> Option<ErrorKind> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::parse(s).ok_or_else(|| format!("Unknown error kind: {}", s))
    }
}

/// One finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
        }
    }

    pub fn with_position(mut self, position: Option<Position>) -> Self {
        self.position = position;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(position) = self.position {
            write!(f, "[{}] ({}..{}) ", self.kind, position.start, position.end())?;
        } else {
            write!(f, "[{}] ", self.kind)?;
        }
        f.write_str(&self.message)
    }
}
