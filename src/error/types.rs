//! Error types and definitions for declcheck
//!
//! Mismatches between a declaration and its module are diagnostics, not
//! errors. The variants here cover the precondition and I/O failures that
//! stop a single check from running at all.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for declcheck operations
#[derive(Debug, Error)]
pub enum DeclCheckError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Reading an input file failed
    #[error("Error reading {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing errors with file context
    #[error("JSON parsing error in {file}: {source}")]
    JsonParse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// CSV serialization error
    #[error("CSV serialization error: {source}")]
    CsvSerialize {
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A required input of the check is missing; the check cannot be evaluated
    #[error("Cannot evaluate check: missing {what}")]
    MissingInput { what: String },

    /// Loading or evaluating the JavaScript module failed
    #[error("Failed to load JavaScript module {path}: {message}")]
    ModuleLoad { path: PathBuf, message: String },

    /// A diagnostic kind name did not resolve
    #[error("Unknown diagnostic kind: {name}")]
    UnknownErrorKind { name: String },

    /// Generic context-wrapped failure
    #[error("{message}")]
    Context { message: String },
}

impl DeclCheckError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical errors - process should terminate
            DeclCheckError::Config { .. } => ErrorSeverity::Critical,
            DeclCheckError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            DeclCheckError::ConfigRead { .. } => ErrorSeverity::Critical,
            DeclCheckError::ConfigParse { .. } => ErrorSeverity::Critical,
            DeclCheckError::UnknownErrorKind { .. } => ErrorSeverity::Critical,
            DeclCheckError::StdoutWrite { .. } => ErrorSeverity::Critical,

            // Regular errors - the current check fails
            _ => ErrorSeverity::Error,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            DeclCheckError::IoRead { path, source } => {
                format!("Cannot read '{}': {}. Check that the file exists and is readable.", path.display(), source)
            }
            DeclCheckError::JsonParse { file, source } => {
                format!("Invalid JSON in '{}': {}. Please check the file format.", file.display(), source)
            }
            DeclCheckError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create a config file with --init or use command line options.", path.display())
            }
            DeclCheckError::MissingInput { what } => {
                format!("The check cannot be evaluated because the {} is missing.", what)
            }
            DeclCheckError::ModuleLoad { path, message } => {
                format!("Could not load '{}': {}. Try --loader static if node is unavailable.", path.display(), message)
            }
            DeclCheckError::UnknownErrorKind { name } => {
                format!("'{}' is not a diagnostic kind. Known kinds: {}.", name, crate::models::diagnostic::ErrorKind::ALL.map(|k| k.as_str()).join(", "))
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        DeclCheckError::Io { source }
    }

    /// Create a read error for an input file
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeclCheckError::IoRead {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON parse error with file context
    pub fn json_parse_error(file: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        DeclCheckError::JsonParse {
            file: file.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        DeclCheckError::Config {
            message: message.into(),
        }
    }

    /// Create a missing-input error
    pub fn missing_input(what: impl Into<String>) -> Self {
        DeclCheckError::MissingInput { what: what.into() }
    }

    /// Create a module load error
    pub fn module_load_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DeclCheckError::ModuleLoad {
            path: path.into(),
            message: message.into(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for DeclCheckError {
    fn from(err: std::io::Error) -> Self {
        DeclCheckError::io_error(err)
    }
}

impl From<csv::Error> for DeclCheckError {
    fn from(err: csv::Error) -> Self {
        DeclCheckError::Csv { source: err }
    }
}

impl From<serde_json::Error> for DeclCheckError {
    fn from(err: serde_json::Error) -> Self {
        DeclCheckError::JsonSerialize { source: err }
    }
}

/// Result type alias for declcheck operations
pub type Result<T> = std::result::Result<T, DeclCheckError>;
