//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::{Args, LoaderArg, ModeArg, OutputFormatArg};
use crate::error::Result;
use crate::models::config::{LoaderKind, OutputFormat, PartialSettings};
use crate::models::registry::CheckMode;

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Settings-relevant subset of the command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub loader: Option<LoaderKind>,
    pub node_binary: Option<PathBuf>,
    pub mode: Option<CheckMode>,
    pub disabled_kinds: Vec<String>,
    pub quiet: bool,
    pub verbose: bool,
    pub no_colors: bool,
    pub config: Option<PathBuf>,
}

impl CliConfig {
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    /// Create a CLI configuration source from parsed arguments
    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from(args))
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        Self {
            output_format: args.output.map(|format| match format {
                OutputFormatArg::Text => OutputFormat::Text,
                OutputFormatArg::Json => OutputFormat::Json,
                OutputFormatArg::Csv => OutputFormat::Csv,
            }),
            output_file: args.output_file.clone(),
            loader: args.loader.map(|loader| match loader {
                LoaderArg::Node => LoaderKind::Node,
                LoaderArg::Static => LoaderKind::Static,
                LoaderArg::Auto => LoaderKind::Auto,
            }),
            node_binary: args.node.clone(),
            mode: args.mode.map(|mode| match mode {
                ModeArg::Npm => CheckMode::Npm,
                ModeArg::NonNpm => CheckMode::NonNpm,
            }),
            disabled_kinds: args.disable.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
            no_colors: args.no_colors,
            config: args.config.clone(),
        }
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        if let Some(format) = self.args.output_format {
            settings.output_format = Some(format);
        }
        if let Some(output_file) = &self.args.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(loader) = self.args.loader {
            settings.loader = Some(loader);
        }
        if let Some(node_binary) = &self.args.node_binary {
            settings.node_binary = Some(node_binary.clone());
        }
        if let Some(mode) = self.args.mode {
            settings.mode = Some(mode);
        }
        if !self.args.disabled_kinds.is_empty() {
            settings.disabled_kinds = Some(self.args.disabled_kinds.clone());
        }

        // Boolean flags only ever switch away from the defaults
        if self.args.quiet {
            settings.quiet = Some(true);
        }
        if self.args.verbose {
            settings.verbose = Some(true);
        }
        if self.args.no_colors {
            settings.use_colors = Some(false);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_config_source() {
        let args = CliArgs {
            output_format: Some(OutputFormat::Json),
            mode: Some(CheckMode::NonNpm),
            disabled_kinds: vec!["NoDefaultExport".to_string()],
            verbose: true,
            ..Default::default()
        };

        let cli_config = CliConfig::new(args);
        assert!(cli_config.is_available());
        assert_eq!(cli_config.priority(), 30);

        let settings = cli_config.load().unwrap();
        assert_eq!(settings.output_format, Some(OutputFormat::Json));
        assert_eq!(settings.mode, Some(CheckMode::NonNpm));
        assert_eq!(settings.disabled_kinds, Some(vec!["NoDefaultExport".to_string()]));
        assert_eq!(settings.verbose, Some(true));
        assert_eq!(settings.quiet, None);
        assert_eq!(settings.use_colors, None);
    }

    #[test]
    fn test_from_args() {
        let args = Args::try_parse_from([
            "declcheck",
            "--dts",
            "index.d.ts",
            "--js",
            "index.js",
            "--output",
            "csv",
            "--output-file",
            "report.csv",
            "--loader",
            "static",
            "--mode",
            "non-npm",
            "--disable",
            "JsCallable",
            "--disable",
            "DtsCallable",
            "--no-colors",
            "--quiet",
        ])
        .unwrap();

        let settings = CliConfig::from_args(&args).load().unwrap();
        assert_eq!(settings.output_format, Some(OutputFormat::Csv));
        assert_eq!(settings.output_file, Some(PathBuf::from("report.csv")));
        assert_eq!(settings.loader, Some(LoaderKind::Static));
        assert_eq!(settings.mode, Some(CheckMode::NonNpm));
        assert_eq!(
            settings.disabled_kinds,
            Some(vec!["JsCallable".to_string(), "DtsCallable".to_string()])
        );
        assert_eq!(settings.use_colors, Some(false));
        assert_eq!(settings.quiet, Some(true));
        assert_eq!(settings.verbose, None);
    }

    #[test]
    fn test_unset_flags_leave_file_values() {
        let args = Args::try_parse_from(["declcheck", "--dts", "a.d.ts", "--js", "a.js"]).unwrap();
        let settings = CliConfig::from_args(&args).load().unwrap();
        assert_eq!(settings, PartialSettings::default());
    }
}
