//! Command-line interface for scormcheck.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::inspect::Inspector;
use crate::report;

/// Exit codes.
pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// SCORM package conformance inspector.
///
/// Scormcheck unpacks a SCORM zip package, parses its manifest, resolves
/// the launch file and statically scans the content for runtime-API usage,
/// tracking variables and external network dependencies. It never executes
/// the course.
#[derive(Parser)]
#[command(name = "scormcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect a SCORM zip package and report conformance findings
    #[command(visible_alias = "check")]
    Inspect(InspectArgs),
}

/// Arguments for the inspect command.
#[derive(Parser)]
pub struct InspectArgs {
    /// Path to the SCORM zip package
    pub package: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Directory for artifacts (scorm_data.json, scorm_report.html)
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Also write a standalone HTML report
    #[arg(long)]
    pub html: bool,

    /// Keep the extraction scratch directory for debugging
    #[arg(long)]
    pub keep_workdir: bool,
}

static SCRATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// Per-invocation scratch directory under the results area. Uniquely named
/// so concurrent invocations never share extraction state.
fn scratch_dir(results_dir: &Path) -> PathBuf {
    let seq = SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed);
    results_dir.join(format!("work-{}-{}", std::process::id(), seq))
}

/// Run the inspect command.
pub fn run_inspect(args: &InspectArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    if !args.package.exists() {
        eprintln!("Error: no such file: {}", args.package.display());
        return Ok(EXIT_ERROR);
    }

    fs::create_dir_all(&args.results_dir)?;
    let workdir = scratch_dir(&args.results_dir);

    let inspector = Inspector::new(&workdir);
    let inspection = inspector.run(&args.package);

    let package = args.package.to_string_lossy().to_string();
    match args.format.as_str() {
        "json" => report::write_json(&inspection)?,
        _ => report::write_pretty(&package, &inspection),
    }

    if report::write_tracking_json(&inspection, &args.results_dir.join("scorm_data.json"))?
        && args.format == "pretty"
    {
        println!(
            "  Tracking data written to {}",
            args.results_dir.join("scorm_data.json").display()
        );
    }

    if args.html {
        let html_path = args.results_dir.join("scorm_report.html");
        report::write_html(&inspection, &html_path)?;
        if args.format == "pretty" {
            println!("  HTML report written to {}", html_path.display());
        }
    }

    if !args.keep_workdir {
        // Best effort; a leftover scratch dir is re-created cleanly anyway.
        let _ = fs::remove_dir_all(&workdir);
    }

    if inspection.has_errors() {
        Ok(EXIT_FINDINGS)
    } else {
        Ok(EXIT_CLEAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_dirs_are_unique() {
        let base = Path::new("results");
        let a = scratch_dir(base);
        let b = scratch_dir(base);
        assert_ne!(a, b);
        assert!(a.starts_with(base));
    }
}
