//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// declcheck - checks a TypeScript declaration against the JavaScript module it describes
#[derive(Parser, Debug)]
#[command(name = "declcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check that a .d.ts declaration matches the runtime shape of its JavaScript module")]
#[command(long_about = "declcheck compares the exports a TypeScript declaration file claims with the \
exports its JavaScript module really has at runtime. Missing and extra properties, callability \
mismatches, missing `export =` and unbacked default exports are reported with positions in the \
declaration file.")]
#[command(after_help = "EXAMPLES:

Basic Usage:
    # Check a declaration against a package directory
    declcheck --dts types/foo/index.d.ts --js node_modules/foo

    # Check against a single file without running node
    declcheck --dts index.d.ts --js lib/index.js --loader static

    # Use a snapshot of the module value captured elsewhere
    declcheck --dts index.d.ts --js lib/index.js --snapshot foo.snapshot.json

Registry Rules:
    # Apply npm name/version rules using registry data fetched ahead of time
    declcheck --dts index.d.ts --js lib --registry foo.registry.json

    # Treat the package as one that is not published to npm
    declcheck --dts index.d.ts --js lib --mode non-npm --registry foo.registry.json

Output Options:
    declcheck --dts index.d.ts --js lib --output json
    declcheck --dts index.d.ts --js lib --output csv --output-file report.csv

Configuration:
    # Create a default .declcheck.toml in the current directory
    declcheck --init

    # Never report a diagnostic kind
    declcheck --dts index.d.ts --js lib --disable NoDefaultExport

EXIT STATUS:
    0  the declaration matches the module
    1  one or more diagnostics were reported
    2  the check could not be evaluated
")]
pub struct Args {
    /// Declaration file to check
    #[arg(long, value_name = "FILE", required_unless_present = "init")]
    pub dts: Option<PathBuf>,

    /// JavaScript module: a file or a package directory
    #[arg(long, value_name = "PATH", required_unless_present_any = ["init", "snapshot"])]
    pub js: Option<PathBuf>,

    /// Module name used in messages and registry rules (defaults to the package name)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Check mode (defaults to what the declaration header says)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// JSON snapshot of the module value, used instead of loading the module
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// JSON registry data for the package: {"exists": bool, "versions": [..]}
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Allow a non-npm package to share its name with a published package
    #[arg(long)]
    pub squat_exempt: bool,

    /// How the JavaScript module is loaded
    #[arg(long, value_enum)]
    pub loader: Option<LoaderArg>,

    /// Node executable used by the node loader
    #[arg(long, value_name = "PATH")]
    pub node: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormatArg>,

    /// Write the report to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Diagnostic kind to suppress (can be specified multiple times)
    #[arg(long, value_name = "KIND")]
    pub disable: Vec<String>,

    /// Configuration file (defaults to .declcheck.toml lookup)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Create a default configuration file in the current directory
    #[arg(long)]
    pub init: bool,

    /// Only print the one-line outcome
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show debug logging and extra report detail
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_colors: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Text,
    Json,
    Csv,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LoaderArg {
    Node,
    Static,
    Auto,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Npm,
    NonNpm,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
