//! Static content scanning: runtime-API call sites, call-volume counter,
//! tracking-variable usage, and external URLs.
//!
//! The fixed vocabularies are data, not control flow: one generic loop
//! consumes the rule tables below. Matching is plain substring containment,
//! the same heuristic the rest of the report is calibrated against.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use super::Diagnostic;

/// Runtime-API call tokens (SCORM 1.2 and 2004 flavors).
pub const API_CALL_TOKENS: [&str; 8] = [
    "LMSInitialize",
    "Initialize(",
    "LMSFinish",
    "Terminate(",
    "LMSSetValue",
    "SetValue(",
    "LMSCommit",
    "Commit(",
];

/// The closed tracking-variable vocabulary. Never extended dynamically.
pub const TRACKING_VOCABULARY: [&str; 12] = [
    "cmi.core.lesson_location",
    "cmi.suspend_data",
    "lesson_status",
    "success_status",
    "completed",
    "incomplete",
    "passed",
    "failed",
    "score.raw",
    "score.max",
    "score.min",
    "session_time",
];

const SCANNED_EXTENSIONS: [&str; 4] = ["js", "html", "htm", "xml"];

// http/https only; file:// URLs never match this pattern, but the exclusion
// below is kept as an explicit invariant.
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s'"<>]+"#).expect("valid URL pattern"));

/// Everything the scanner collects across the working directory.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Per API token (in table order), relative paths of files containing
    /// it, one entry per (token, file) pair.
    pub api_calls: Vec<(&'static str, Vec<String>)>,
    /// Matched tracking entries → count of distinct files mentioning them.
    pub tracking: BTreeMap<&'static str, usize>,
    /// Total `SetValue` substring occurrences across all files. A volume
    /// heuristic, intentionally overlapping with the token set above.
    pub set_value_count: usize,
    pub external_urls: BTreeSet<String>,
    pub files_scanned: usize,
}

impl ScanOutcome {
    fn new() -> Self {
        Self {
            api_calls: API_CALL_TOKENS
                .iter()
                .map(|token| (*token, Vec::new()))
                .collect(),
            tracking: BTreeMap::new(),
            set_value_count: 0,
            external_urls: BTreeSet::new(),
            files_scanned: 0,
        }
    }

    /// True when no API token matched in any file.
    pub fn no_api_calls(&self) -> bool {
        self.api_calls.iter().all(|(_, files)| files.is_empty())
    }
}

/// Walk all text-bearing files under `workdir` and apply the rule tables.
///
/// Files are decoded best-effort (invalid UTF-8 is substituted). A file
/// that cannot be read yields a warn diagnostic and the scan moves on;
/// scanning is never fatal. The walk is sorted, so diagnostic order and
/// match lists are reproducible.
pub fn scan_content(workdir: &Path, diagnostics: &mut Vec<Diagnostic>) -> ScanOutcome {
    let mut outcome = ScanOutcome::new();
    let mut tracking_files = [0usize; TRACKING_VOCABULARY.len()];

    for entry in WalkDir::new(workdir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() || !is_scannable(entry.path()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(workdir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");

        let bytes = match fs::read(entry.path()) {
            Ok(bytes) => bytes,
            Err(e) => {
                diagnostics.push(Diagnostic::warn(format!(
                    "could not read {relative}: {e}"
                )));
                continue;
            }
        };
        let content = String::from_utf8_lossy(&bytes);
        outcome.files_scanned += 1;

        for (token, files) in outcome.api_calls.iter_mut() {
            if content.contains(*token) {
                files.push(relative.clone());
            }
        }

        outcome.set_value_count += content.matches("SetValue").count();

        for (i, name) in TRACKING_VOCABULARY.iter().enumerate() {
            if content.contains(name) {
                tracking_files[i] += 1;
            }
        }

        for m in URL_PATTERN.find_iter(&content) {
            let url = m.as_str().trim();
            if !url.starts_with("file://") {
                outcome.external_urls.insert(url.to_string());
            }
        }
    }

    for (name, count) in TRACKING_VOCABULARY.iter().copied().zip(tracking_files) {
        if count > 0 {
            outcome.tracking.insert(name, count);
        }
    }

    outcome
}

fn is_scannable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            SCANNED_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}
