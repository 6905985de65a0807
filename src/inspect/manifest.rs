//! Parsing and classification of `imsmanifest.xml`.
//!
//! Element lookup is namespace-agnostic: SCORM packages declare the IMS
//! namespaces inconsistently, so matching is done on local names only.

use std::fs;
use std::path::Path;

use xmltree::{Element, XMLNode};

use super::{Diagnostic, InspectError, Manifest, Resource};

const MANIFEST_NAME: &str = "imsmanifest.xml";

/// Parse the package descriptor and emit classification diagnostics.
///
/// A missing or malformed manifest is fatal; the error diagnostic has
/// already been appended when `Err` is returned. All other findings
/// (missing identifier, odd versions, fingerprints, empty resource list)
/// are non-fatal diagnostics.
pub fn parse_manifest(
    workdir: &Path,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Manifest, InspectError> {
    let path = workdir.join(MANIFEST_NAME);
    if !path.exists() {
        diagnostics.push(Diagnostic::error("imsmanifest.xml is missing"));
        return Err(InspectError::ManifestMissing);
    }
    diagnostics.push(Diagnostic::ok("found imsmanifest.xml"));

    let root = match fs::read(&path) {
        Ok(bytes) => match Element::parse(bytes.as_slice()) {
            Ok(root) => root,
            Err(e) => {
                diagnostics.push(Diagnostic::error(format!(
                    "failed to parse imsmanifest.xml: {e}"
                )));
                return Err(InspectError::ManifestParse(e.to_string()));
            }
        },
        Err(e) => {
            diagnostics.push(Diagnostic::error(format!(
                "failed to parse imsmanifest.xml: {e}"
            )));
            return Err(InspectError::ManifestParse(e.to_string()));
        }
    };

    let manifest = Manifest {
        identifier: root.attributes.get("identifier").cloned(),
        schema: element_text(&root, "schema"),
        schema_version: element_text(&root, "schemaversion"),
        resources: collect_resources(&root),
    };

    if manifest.identifier.is_some() {
        diagnostics.push(Diagnostic::ok("manifest identifier is present"));
    } else {
        diagnostics.push(Diagnostic::error(
            "manifest is missing its 'identifier' attribute",
        ));
    }

    match &manifest.schema {
        Some(schema) if schema.contains("SCORM") => {
            diagnostics.push(Diagnostic::ok(format!("SCORM schema: {schema}")));
        }
        _ => {
            diagnostics.push(Diagnostic::warn(
                "SCORM schema is not declared or is non-standard",
            ));
        }
    }

    let version_warning = classify_version(manifest.schema_version.as_deref(), diagnostics);
    detect_authoring_tool(workdir, version_warning, diagnostics);

    if manifest.resources.is_empty() {
        diagnostics.push(Diagnostic::error(
            "manifest declares no <resource> elements",
        ));
    }

    Ok(manifest)
}

/// Version classification. Returns the `version_warning` flag, set only by
/// the SCORM 2004 branch and consumed by the iSpring fingerprint check.
fn classify_version(version: Option<&str>, diagnostics: &mut Vec<Diagnostic>) -> bool {
    match version {
        Some(version) => {
            diagnostics.push(Diagnostic::ok(format!("SCORM version: {version}")));
            if version == "1.2" {
                diagnostics.push(Diagnostic::ok("SCORM 1.2 is the recommended format"));
                false
            } else if version.starts_with("2004") {
                diagnostics.push(Diagnostic::warn(
                    "SCORM 2004 has limited platform support",
                ));
                true
            } else {
                diagnostics.push(Diagnostic::warn(format!(
                    "unknown or non-standard SCORM version: {version}"
                )));
                false
            }
        }
        None => {
            diagnostics.push(Diagnostic::warn(
                "SCORM version (schemaversion) is not specified",
            ));
            false
        }
    }
}

/// Authoring-tool fingerprints over the top-level entry names of the
/// working directory (non-recursive). Names are sorted so the diagnostic
/// order does not depend on filesystem enumeration order.
fn detect_authoring_tool(workdir: &Path, version_warning: bool, diagnostics: &mut Vec<Diagnostic>) {
    let mut names: Vec<String> = match fs::read_dir(workdir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => return,
    };
    names.sort();

    for name in &names {
        let lower = name.to_lowercase();
        if lower.starts_with("story") && lower.ends_with(".html") {
            diagnostics.push(Diagnostic::ok(
                "Articulate Storyline detected (recommended authoring tool)",
            ));
        }
        if lower.contains("ispring") {
            if version_warning {
                diagnostics.push(Diagnostic::error(
                    "SCORM 2004 produced by iSpring is not supported",
                ));
            } else {
                diagnostics.push(Diagnostic::warn(
                    "iSpring detected; only SCORM 1.2 is permitted",
                ));
            }
        }
    }
}

fn collect_resources(root: &Element) -> Vec<Resource> {
    let mut elements = Vec::new();
    collect_descendants(root, "resource", &mut elements);
    elements
        .into_iter()
        .map(|el| Resource {
            identifier: el.attributes.get("identifier").cloned().unwrap_or_default(),
            href: el.attributes.get("href").cloned(),
        })
        .collect()
}

/// Trimmed text of the first descendant with the given local name.
fn element_text(root: &Element, name: &str) -> Option<String> {
    find_descendant(root, name)
        .and_then(|el| el.get_text().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
}

fn find_descendant<'a>(el: &'a Element, name: &str) -> Option<&'a Element> {
    for node in &el.children {
        if let XMLNode::Element(child) = node {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = find_descendant(child, name) {
                return Some(found);
            }
        }
    }
    None
}

fn collect_descendants<'a>(el: &'a Element, name: &str, out: &mut Vec<&'a Element>) {
    for node in &el.children {
        if let XMLNode::Element(child) = node {
            if child.name == name {
                out.push(child);
            }
            collect_descendants(child, name, out);
        }
    }
}
