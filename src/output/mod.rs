//! Output formatting and writing functionality

mod formatters;
mod writers;

pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::core::CheckReport;
use crate::error::Result;
use crate::models::config::OutputFormat;

/// Trait for different output formatters
pub trait Formatter {
    /// Format a check report. `declaration` is the text the diagnostic
    /// positions point into.
    fn format(&self, report: &CheckReport, declaration: &str) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &CheckReport, declaration: &str) -> Result<String> {
        // Quiet mode keeps only the one-line outcome
        if self.quiet {
            return Ok(formatters::format_summary_text(report, self.use_colors));
        }

        let mut output = String::new();
        if self.verbose {
            output.push_str(&format!("Module: {} ({})\n\n", report.module_name, report.mode));
        }
        for diagnostic in &report.diagnostics {
            output.push_str(&formatters::format_diagnostic_text(
                &report.module_name,
                diagnostic,
                declaration,
                self.use_colors,
            ));
        }
        output.push_str(&formatters::format_summary_text(report, self.use_colors));
        Ok(output)
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, report: &CheckReport, _declaration: &str) -> Result<String> {
        formatters::format_report_json(report, self.pretty)
    }
}

/// CSV formatter, one row per diagnostic
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, report: &CheckReport, declaration: &str) -> Result<String> {
        formatters::format_report_csv(report, declaration)
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(
    format: OutputFormat,
    use_colors: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
    }
}
