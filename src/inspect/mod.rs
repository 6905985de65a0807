//! The package-inspection pipeline.

mod archive;
mod error;
mod launch;
mod manifest;
mod pipeline;
mod scan;
mod types;

pub use archive::extract_archive;
pub use error::InspectError;
pub use launch::resolve_launch;
pub use manifest::parse_manifest;
pub use pipeline::Inspector;
pub use scan::{scan_content, ScanOutcome, API_CALL_TOKENS, TRACKING_VOCABULARY};
pub use types::{
    Diagnostic, LaunchConfidence, LaunchResolution, Manifest, Report, Resource, Severity,
};
