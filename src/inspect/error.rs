//! The fatal-error taxonomy for the inspection pipeline.
//!
//! Only these four conditions abort the pipeline. Everything else
//! (missing resources, unreadable content files) is recorded as a
//! non-fatal diagnostic and scanning continues.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectError {
    /// The input path is not a valid zip container.
    #[error("file is not a zip archive")]
    NotAnArchive,

    /// Extraction could not complete.
    #[error("failed to unpack archive: {0}")]
    Extraction(#[source] std::io::Error),

    /// No `imsmanifest.xml` at the package root.
    #[error("imsmanifest.xml is missing")]
    ManifestMissing,

    /// The manifest exists but is not well-formed XML.
    #[error("failed to parse imsmanifest.xml: {0}")]
    ManifestParse(String),
}
