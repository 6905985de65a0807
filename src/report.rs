//! Output formatting for inspection results.
//!
//! Supports three renderings of the same structured report:
//! - Pretty: colored terminal output for human readability
//! - JSON: the whole report for programmatic consumption
//! - HTML: a standalone styled document
//!
//! plus the tracking-data JSON artifact consumed by export collaborators.

use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::inspect::{Report, Severity};

// =============================================================================
// Pretty Format
// =============================================================================

/// Write the report in pretty (human-readable) format.
pub fn write_pretty(package: &str, report: &Report) {
    println!();
    print!("  ");
    print!("{}", "scormcheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Package: ".dimmed());
    println!("{}", package);
    println!();

    for diagnostic in &report.diagnostics {
        write_severity_tag(diagnostic.severity);
        println!(" {}", diagnostic.message);
        for detail in &diagnostic.details {
            println!("          └─ {}", detail.blue());
        }
    }
    println!();

    match &report.launch.path {
        Some(path) => {
            print!("  {}", "Launch:  ".dimmed());
            print!("{}", path.display().to_string().blue());
            println!("{}", format!(" ({})", report.launch.confidence).dimmed());
        }
        None => {
            println!("  {}{}", "Launch:  ".dimmed(), "none".red());
        }
    }

    print!("  {}", "Scanned: ".dimmed());
    print!("{} files", report.files_scanned);
    let errors = report.error_count();
    let warnings = report.warn_count();
    if errors > 0 {
        print!("  {}", format!("{} error(s)", errors).red());
    }
    if warnings > 0 {
        print!("  {}", format!("{} warning(s)", warnings).yellow());
    }
    println!();
    println!();
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::Ok => print!("    {}", "OK   ".green()),
        Severity::Warn => print!("    {}", "WARN ".yellow()),
        Severity::Error => print!("    {}", "ERROR".red()),
        Severity::Info => print!("    {}", "INFO ".blue()),
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Write the full report as pretty-printed JSON to stdout.
pub fn write_json(report: &Report) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Tracking-data artifact
// =============================================================================

/// The `scorm_data.json` artifact: matched tracking variables and their
/// file counts. Omitted entirely when nothing matched.
#[derive(Serialize)]
struct TrackingArtifact<'a> {
    scorm_variables_used: &'a BTreeMap<&'static str, usize>,
}

/// Write `scorm_data.json` if at least one tracking variable matched.
/// Returns whether the file was written.
pub fn write_tracking_json(report: &Report, path: &Path) -> anyhow::Result<bool> {
    if report.tracking.is_empty() {
        return Ok(false);
    }
    let artifact = TrackingArtifact {
        scorm_variables_used: &report.tracking,
    };
    let json = serde_json::to_string_pretty(&artifact)?;
    std::fs::write(path, json)?;
    Ok(true)
}

// =============================================================================
// HTML Format
// =============================================================================

/// Render the diagnostic sequence as a standalone styled document.
/// Severity maps to a visual class; detail lines nest under their parent.
pub fn render_html(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html><html><head><meta charset='utf-8'>");
    out.push_str("<title>SCORM Report</title>\n");
    out.push_str(
        "<style>
    body { font-family: monospace; padding: 20px; background: #f8f8f8; }
    .ok     { color: green; }
    .warn   { color: orange; }
    .err    { color: red; }
    .line   { margin-bottom: 4px; }
    .detail { margin-left: 24px; }
</style>\n</head><body>\n<h2>SCORM package report</h2>\n<hr>\n",
    );

    for diagnostic in &report.diagnostics {
        // Info is presentation-only and renders as an unstyled line.
        let class = match diagnostic.severity {
            Severity::Ok => "line ok",
            Severity::Warn => "line warn",
            Severity::Error => "line err",
            Severity::Info => "line",
        };
        out.push_str(&format!(
            "<div class='{}'>{}</div>\n",
            class,
            escape_html(&diagnostic.message)
        ));
        for detail in &diagnostic.details {
            out.push_str(&format!(
                "<div class='{} detail'>└─ {}</div>\n",
                class,
                escape_html(detail)
            ));
        }
    }

    out.push_str("</body></html>\n");
    out
}

/// Render and write the HTML report.
pub fn write_html(report: &Report, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, render_html(report))?;
    Ok(())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::Diagnostic;
    use tempfile::TempDir;

    fn sample_report() -> Report {
        let mut report = Report::aborted(vec![
            Diagnostic::ok("found imsmanifest.xml"),
            Diagnostic::warn("external network references found (internet dependency likely):")
                .with_details(vec!["https://cdn.example.com/x.js".to_string()]),
            Diagnostic::error("no SCORM API call found"),
            Diagnostic::info("no SCORM tracking variables found"),
        ]);
        report.tracking.insert("passed", 2);
        report
    }

    #[test]
    fn test_html_severity_classes() {
        let html = render_html(&sample_report());
        assert!(html.contains("<div class='line ok'>found imsmanifest.xml</div>"));
        assert!(html.contains("class='line warn'"));
        assert!(html.contains("class='line err'"));
        // Info lines carry no severity class.
        assert!(html.contains("<div class='line'>no SCORM tracking variables found</div>"));
        assert!(html.contains("line warn detail"));
    }

    #[test]
    fn test_html_escapes_markup() {
        let report = Report::aborted(vec![Diagnostic::error(
            "manifest declares no <resource> elements",
        )]);
        let html = render_html(&report);
        assert!(html.contains("no &lt;resource&gt; elements"));
        assert!(!html.contains("no <resource>"));
    }

    #[test]
    fn test_tracking_artifact_written_only_when_matched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scorm_data.json");

        let empty = Report::aborted(Vec::new());
        assert!(!write_tracking_json(&empty, &path).unwrap());
        assert!(!path.exists());

        assert!(write_tracking_json(&sample_report(), &path).unwrap());
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["scorm_variables_used"]["passed"], 2);
    }
}
