//! The inspection pipeline: extract → manifest → launch → scan → report.
//!
//! Stages run strictly in sequence; only extraction and manifest failures
//! are fatal and short-circuit into a partial report. The aggregation
//! order of the final sections is fixed and matches the pipeline's natural
//! production order.

use std::path::{Path, PathBuf};

use super::scan::{ScanOutcome, TRACKING_VOCABULARY};
use super::{
    extract_archive, parse_manifest, resolve_launch, scan_content, Diagnostic, LaunchResolution,
    Report,
};

/// One inspection run over one working directory.
///
/// The working directory is owned exclusively by this invocation and is
/// cleared before extraction; concurrent runs must use distinct
/// directories.
pub struct Inspector {
    workdir: PathBuf,
}

impl Inspector {
    pub fn new<P: AsRef<Path>>(workdir: P) -> Self {
        Self {
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run the full pipeline against a zip package.
    ///
    /// Never returns an error: fatal stages terminate into a report
    /// carrying the diagnostics accumulated so far and no launch path.
    pub fn run(&self, zip_path: &Path) -> Report {
        let mut diagnostics = Vec::new();

        if let Err(e) = extract_archive(zip_path, &self.workdir) {
            diagnostics.push(Diagnostic::error(e.to_string()));
            return Report::aborted(diagnostics);
        }

        let manifest = match parse_manifest(&self.workdir, &mut diagnostics) {
            Ok(manifest) => manifest,
            // The fatal diagnostic is already in the list.
            Err(_) => return Report::aborted(diagnostics),
        };

        let launch = resolve_launch(&self.workdir, &manifest.resources, &mut diagnostics);
        if launch.path.is_none() {
            diagnostics.push(Diagnostic::error(
                "no launch point found (no usable resource href or index.html)",
            ));
        }

        let outcome = scan_content(&self.workdir, &mut diagnostics);

        build_report(diagnostics, launch, outcome)
    }
}

/// Aggregate scan findings into the final ordered report.
fn build_report(
    mut diagnostics: Vec<Diagnostic>,
    launch: LaunchResolution,
    outcome: ScanOutcome,
) -> Report {
    // API-call section.
    if outcome.no_api_calls() {
        diagnostics.push(Diagnostic::error(
            "no SCORM API call found (LMSInitialize, LMSFinish, SetValue, Commit)",
        ));
    } else {
        for (token, files) in &outcome.api_calls {
            if !files.is_empty() {
                diagnostics.push(
                    Diagnostic::ok(format!("SCORM API call {token} found in:"))
                        .with_details(files.clone()),
                );
            }
        }
    }

    // Completion-method section.
    let completed_group =
        outcome.tracking.contains_key("completed") || outcome.tracking.contains_key("incomplete");
    let passed_group =
        outcome.tracking.contains_key("passed") || outcome.tracking.contains_key("failed");
    diagnostics.push(match (completed_group, passed_group) {
        (true, true) => Diagnostic::warn(
            "ambiguous completion method: both completed/incomplete and passed/failed are in use",
        ),
        (true, false) => Diagnostic::ok("completion method: completed/incomplete"),
        (false, true) => Diagnostic::ok("completion method: passed/failed"),
        (false, false) => Diagnostic::warn(
            "completion method undetermined (neither completed/incomplete nor passed/failed)",
        ),
    });

    // Overflow heuristic, strictly greater than 100.
    if outcome.set_value_count > 100 {
        diagnostics.push(Diagnostic::warn(format!(
            "more than 100 SetValue calls detected ({}); possible SCORM 1.2 buffer overflow",
            outcome.set_value_count
        )));
    }

    // External-URL section. BTreeSet iteration is already lexicographic.
    if outcome.external_urls.is_empty() {
        diagnostics.push(Diagnostic::ok(
            "no external network references; course should work offline",
        ));
    } else {
        diagnostics.push(
            Diagnostic::warn("external network references found (internet dependency likely):")
                .with_details(outcome.external_urls.iter().cloned().collect()),
        );
    }

    // Tracking-data summary, in vocabulary order.
    if outcome.tracking.is_empty() {
        diagnostics.push(Diagnostic::info("no SCORM tracking variables found"));
    } else {
        let details: Vec<String> = TRACKING_VOCABULARY
            .iter()
            .filter_map(|name| {
                outcome
                    .tracking
                    .get(name)
                    .map(|count| format!("{name} ({count} files)"))
            })
            .collect();
        diagnostics
            .push(Diagnostic::info("tracking data reported to the LMS:").with_details(details));
    }

    Report {
        diagnostics,
        launch,
        tracking: outcome.tracking,
        external_urls: outcome.external_urls,
        set_value_count: outcome.set_value_count,
        files_scanned: outcome.files_scanned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::Severity;
    use std::collections::{BTreeMap, BTreeSet};

    fn outcome_with(tracking: &[(&'static str, usize)], set_value_count: usize) -> ScanOutcome {
        ScanOutcome {
            api_calls: vec![("LMSInitialize", vec!["a.js".to_string()])],
            tracking: tracking.iter().cloned().collect::<BTreeMap<_, _>>(),
            set_value_count,
            external_urls: BTreeSet::new(),
            files_scanned: 1,
        }
    }

    fn report_for(outcome: ScanOutcome) -> Report {
        build_report(Vec::new(), LaunchResolution::none(), outcome)
    }

    #[test]
    fn test_no_api_calls_single_error() {
        let outcome = ScanOutcome {
            api_calls: vec![("LMSInitialize", Vec::new())],
            tracking: BTreeMap::new(),
            set_value_count: 0,
            external_urls: BTreeSet::new(),
            files_scanned: 0,
        };
        let report = report_for(outcome);
        let errors: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("no SCORM API call"));
    }

    #[test]
    fn test_completion_passed_only() {
        let report = report_for(outcome_with(&[("passed", 1)], 0));
        let line = report
            .diagnostics
            .iter()
            .find(|d| d.message.contains("completion method"))
            .unwrap();
        assert_eq!(line.severity, Severity::Ok);
        assert!(line.message.contains("passed/failed"));
    }

    #[test]
    fn test_completion_ambiguous() {
        let report = report_for(outcome_with(&[("completed", 1), ("passed", 2)], 0));
        let line = report
            .diagnostics
            .iter()
            .find(|d| d.message.contains("completion method"))
            .unwrap();
        assert_eq!(line.severity, Severity::Warn);
        assert!(line.message.contains("ambiguous"));
        assert!(!report
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Ok && d.message.contains("completion method:")));
    }

    #[test]
    fn test_completion_undetermined() {
        let report = report_for(outcome_with(&[("score.raw", 3)], 0));
        let line = report
            .diagnostics
            .iter()
            .find(|d| d.message.contains("completion method"))
            .unwrap();
        assert_eq!(line.severity, Severity::Warn);
        assert!(line.message.contains("undetermined"));
    }

    #[test]
    fn test_overflow_boundary() {
        let at_limit = report_for(outcome_with(&[], 100));
        assert!(!at_limit
            .diagnostics
            .iter()
            .any(|d| d.message.contains("buffer overflow")));

        let over_limit = report_for(outcome_with(&[], 101));
        let warning = over_limit
            .diagnostics
            .iter()
            .find(|d| d.message.contains("buffer overflow"))
            .unwrap();
        assert_eq!(warning.severity, Severity::Warn);
    }

    #[test]
    fn test_url_details_sorted() {
        let mut outcome = outcome_with(&[], 0);
        outcome.external_urls = ["https://b.example.com", "http://a.example.com"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let report = report_for(outcome);
        let line = report
            .diagnostics
            .iter()
            .find(|d| d.message.contains("external network"))
            .unwrap();
        assert_eq!(
            line.details,
            ["http://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_tracking_summary_in_vocabulary_order() {
        let report = report_for(outcome_with(&[("passed", 1), ("lesson_status", 2)], 0));
        let block = report
            .diagnostics
            .iter()
            .find(|d| d.severity == Severity::Info)
            .unwrap();
        // lesson_status precedes passed in the vocabulary table.
        assert_eq!(block.details, ["lesson_status (2 files)", "passed (1 files)"]);
    }
}
