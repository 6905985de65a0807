//! Scormcheck - SCORM package conformance inspector.
//!
//! Scormcheck inspects an e-learning content package (a SCORM zip archive)
//! and produces a structured conformance/compatibility report without
//! executing or rendering the course: archive extraction, manifest parsing,
//! launch-resource resolution, and static content scanning for runtime-API
//! usage, tracking variables and external network dependencies.
//!
//! # Architecture
//!
//! The pipeline runs strictly in sequence:
//!
//! - `inspect::archive`: zip validation and extraction into a scratch dir
//! - `inspect::manifest`: `imsmanifest.xml` parsing, version classification
//!   and authoring-tool fingerprinting
//! - `inspect::launch`: launch-file resolution with a deterministic
//!   fallback chain
//! - `inspect::scan`: rule-table driven content scanning
//! - `inspect::pipeline`: orchestration and report aggregation
//! - `report`: output formatting (pretty, JSON, HTML, tracking artifact)
//!
//! Only extraction and manifest failures abort the pipeline; everything
//! else accumulates into the ordered diagnostic sequence.

pub mod cli;
pub mod inspect;
pub mod report;

pub use inspect::{
    Diagnostic, InspectError, Inspector, LaunchConfidence, LaunchResolution, Manifest, Report,
    Resource, Severity,
};
