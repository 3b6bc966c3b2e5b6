//! Rendering of check reports

use crate::core::CheckReport;
use crate::error::{DeclCheckError, Result, ResultExt};
use crate::models::diagnostic::Diagnostic;
use ansi_term::Colour::{Green, Red, Yellow};
use ansi_term::Style;

/// Format one diagnostic as `name:line:col [Kind]` followed by its message
pub fn format_diagnostic_text(
    module_name: &str,
    diagnostic: &Diagnostic,
    declaration: &str,
    use_colors: bool,
) -> String {
    let location = match diagnostic.position {
        Some(position) => {
            let (line, column) = position.line_col(declaration);
            format!("{}:{}:{}", module_name, line, column)
        }
        None => module_name.to_string(),
    };
    let kind = format!("[{}]", diagnostic.kind);

    let mut output = if use_colors {
        format!(
            "{} {}\n",
            Style::new().bold().paint(location),
            Red.bold().paint(kind)
        )
    } else {
        format!("{} {}\n", location, kind)
    };

    for line in diagnostic.message.lines() {
        output.push_str("    ");
        output.push_str(line);
        output.push('\n');
    }
    output.push('\n');
    output
}

/// One-line outcome of a check
pub fn format_summary_text(report: &CheckReport, use_colors: bool) -> String {
    let count = report.diagnostics.len();
    if count == 0 {
        let text = format!("{}: declaration matches the JavaScript module", report.module_name);
        if use_colors {
            format!("{}\n", Green.paint(text))
        } else {
            format!("{}\n", text)
        }
    } else {
        let text = format!(
            "{}: {} problem{} found",
            report.module_name,
            count,
            if count == 1 { "" } else { "s" }
        );
        if use_colors {
            format!("{}\n", Yellow.bold().paint(text))
        } else {
            format!("{}\n", text)
        }
    }
}

/// Format a report as JSON
pub fn format_report_json(report: &CheckReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    json.map_err(|e| DeclCheckError::JsonSerialize { source: e })
}

/// Format a report as CSV
pub fn format_report_csv(report: &CheckReport, declaration: &str) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record(["Module", "Kind", "Line", "Column", "Start", "Length", "Message"])?;

    for diagnostic in &report.diagnostics {
        let (line, column, start, length) = match diagnostic.position {
            Some(position) => {
                let (line, column) = position.line_col(declaration);
                (
                    line.to_string(),
                    column.to_string(),
                    position.start.to_string(),
                    position.length.to_string(),
                )
            }
            None => Default::default(),
        };

        writer.write_record([
            report.module_name.as_str(),
            diagnostic.kind.as_str(),
            line.as_str(),
            column.as_str(),
            start.as_str(),
            length.as_str(),
            diagnostic.message.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .with_context(|| "flushing CSV report")?;
    String::from_utf8(bytes).map_err(|e| DeclCheckError::CsvSerialize { source: e })
}
