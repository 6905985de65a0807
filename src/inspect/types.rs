//! Core types for inspection results.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Severity levels for diagnostics.
///
/// `Info` carries purely informational blocks (the tracking-data summary);
/// it never affects the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warn,
    Error,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Ok => write!(f, "ok"),
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A single report line: severity, message, optional per-item detail lines.
///
/// Diagnostics are accumulated in pipeline order and never reordered or
/// deduplicated afterwards; order is an observable contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Diagnostic {
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(Severity::Ok, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Attach detail lines (for instance per-file match lists).
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// A `<resource>` entry declared in the manifest.
///
/// Identifiers are not required to be unique; declaration order is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub identifier: String,
    pub href: Option<String>,
}

/// Parsed fields of `imsmanifest.xml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub identifier: Option<String>,
    pub schema: Option<String>,
    pub schema_version: Option<String>,
    pub resources: Vec<Resource>,
}

/// How the launch file was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchConfidence {
    /// An existing href declared by a manifest resource.
    ManifestResource,
    /// `index.html` at the package root.
    RootIndex,
    /// `index.html` under `res/`.
    ResIndex,
    /// First `index.html` found in a lexicographic pre-order walk.
    RecursiveIndex,
    /// No launch point could be found.
    None,
}

impl LaunchConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchConfidence::ManifestResource => "manifest-resource",
            LaunchConfidence::RootIndex => "root-index",
            LaunchConfidence::ResIndex => "res-index",
            LaunchConfidence::RecursiveIndex => "recursive-index",
            LaunchConfidence::None => "none",
        }
    }
}

impl std::fmt::Display for LaunchConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The resolved launch point, handed to a course-player collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchResolution {
    pub path: Option<PathBuf>,
    pub confidence: LaunchConfidence,
}

impl LaunchResolution {
    pub fn none() -> Self {
        Self {
            path: None,
            confidence: LaunchConfidence::None,
        }
    }

    pub fn found(path: PathBuf, confidence: LaunchConfidence) -> Self {
        Self {
            path: Some(path),
            confidence,
        }
    }
}

/// The complete inspection result. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
    pub launch: LaunchResolution,
    /// Tracking-variable name → count of distinct files mentioning it.
    pub tracking: BTreeMap<&'static str, usize>,
    /// Distinct http/https URLs collected across all scanned files.
    pub external_urls: BTreeSet<String>,
    /// Total `SetValue` substring occurrences across all scanned files.
    pub set_value_count: usize,
    /// Number of content files scanned.
    pub files_scanned: usize,
}

impl Report {
    /// A report for a pipeline aborted at a fatal stage: only the
    /// diagnostics accumulated so far, no launch path.
    pub fn aborted(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            launch: LaunchResolution::none(),
            tracking: BTreeMap::new(),
            external_urls: BTreeSet::new(),
            set_value_count: 0,
            files_scanned: 0,
        }
    }

    /// Whether any error-severity diagnostic is present.
    ///
    /// Only `Error` counts here; `Info` (and `Ok`/`Warn`) lines are
    /// presentation-only as far as the exit code is concerned.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warn_count(&self) -> usize {
        self.count(Severity::Warn)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Warn).unwrap(), "\"warn\"");
        assert_eq!(serde_json::to_string(&Severity::Ok).unwrap(), "\"ok\"");
    }

    #[test]
    fn test_confidence_kebab_case() {
        assert_eq!(
            serde_json::to_string(&LaunchConfidence::RootIndex).unwrap(),
            "\"root-index\""
        );
        assert_eq!(LaunchConfidence::RecursiveIndex.as_str(), "recursive-index");
    }

    #[test]
    fn test_report_error_counting() {
        let report = Report::aborted(vec![
            Diagnostic::ok("fine"),
            Diagnostic::error("broken"),
            Diagnostic::warn("iffy"),
            Diagnostic::info("for the record"),
        ]);
        assert!(report.has_errors());
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warn_count(), 1);
        assert_eq!(report.launch.confidence, LaunchConfidence::None);

        let informational = Report::aborted(vec![Diagnostic::info("for the record")]);
        assert!(!informational.has_errors());
    }
}
