//! Launch-file resolution: manifest hrefs first, then a deterministic
//! fallback chain.

use std::path::Path;

use walkdir::WalkDir;

use super::{Diagnostic, LaunchConfidence, LaunchResolution, Resource};

/// Resolve the package's launch point.
///
/// Every declared resource produces a diagnostic: ok for an existing href,
/// error for a dangling one, warn for a resource without an href. The first
/// existing href becomes the candidate. When the manifest yields nothing,
/// the fallbacks apply in strict order, each tagged with its own warn line:
/// root `index.html`, `res/index.html`, then the first `index.html` found
/// in a lexicographic pre-order walk of the working directory.
pub fn resolve_launch(
    workdir: &Path,
    resources: &[Resource],
    diagnostics: &mut Vec<Diagnostic>,
) -> LaunchResolution {
    let mut candidate = None;

    for resource in resources {
        match resource.href.as_deref().filter(|href| !href.is_empty()) {
            Some(href) => {
                let path = workdir.join(href);
                if path.exists() {
                    diagnostics.push(Diagnostic::ok(format!("launch file found: {href}")));
                    if candidate.is_none() {
                        candidate = Some(path);
                    }
                } else {
                    diagnostics.push(Diagnostic::error(format!(
                        "declared launch file {href} is missing from the package"
                    )));
                }
            }
            None => {
                diagnostics.push(Diagnostic::warn(
                    "resource declares no href attribute (no launch file)",
                ));
            }
        }
    }

    if let Some(path) = candidate {
        return LaunchResolution::found(path, LaunchConfidence::ManifestResource);
    }

    let root_index = workdir.join("index.html");
    if root_index.exists() {
        diagnostics.push(Diagnostic::warn(
            "manifest has no working launch reference; using index.html at the package root",
        ));
        return LaunchResolution::found(root_index, LaunchConfidence::RootIndex);
    }

    let res_index = workdir.join("res").join("index.html");
    if res_index.exists() {
        diagnostics.push(Diagnostic::warn(
            "manifest has no working launch reference; using index.html under /res",
        ));
        return LaunchResolution::found(res_index, LaunchConfidence::ResIndex);
    }

    // Last resort: lexicographic pre-order walk. The walk order is part of
    // the contract; with multiple candidates the first hit wins.
    for entry in WalkDir::new(workdir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && entry.file_name() == "index.html" {
            let relative = entry
                .path()
                .strip_prefix(workdir)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            diagnostics.push(Diagnostic::warn(format!(
                "manifest has no working launch reference; using {relative}"
            )));
            return LaunchResolution::found(entry.into_path(), LaunchConfidence::RecursiveIndex);
        }
    }

    LaunchResolution::none()
}
