//! Archive validation and extraction into the working directory.

use std::fs;
use std::io;
use std::path::Path;

use super::InspectError;

/// Validate `zip_path` as a zip container and unpack it into `workdir`.
///
/// The working directory is cleared completely before extraction on every
/// run; stale files from a previous invocation must never leak into the
/// current report. On success `workdir` holds exactly the archive contents.
pub fn extract_archive(zip_path: &Path, workdir: &Path) -> Result<(), InspectError> {
    if workdir.exists() {
        fs::remove_dir_all(workdir).map_err(InspectError::Extraction)?;
    }
    fs::create_dir_all(workdir).map_err(InspectError::Extraction)?;

    let file = fs::File::open(zip_path).map_err(InspectError::Extraction)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|_| InspectError::NotAnArchive)?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| InspectError::Extraction(e.into()))?;

        // Reject entries that would escape the working directory (zip slip).
        let relative = entry.enclosed_name().ok_or_else(|| {
            InspectError::Extraction(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsafe entry name {:?}", entry.name()),
            ))
        })?;
        let target = workdir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(InspectError::Extraction)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(InspectError::Extraction)?;
        }
        let mut out = fs::File::create(&target).map_err(InspectError::Extraction)?;
        io::copy(&mut entry, &mut out).map_err(InspectError::Extraction)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn build_zip(path: &Path, files: &[(&str, &str)]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in files {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_unpacks_contents() {
        let temp = TempDir::new().unwrap();
        let zip_path = temp.path().join("course.zip");
        build_zip(
            &zip_path,
            &[
                ("imsmanifest.xml", "<manifest/>"),
                ("res/index.html", "<html></html>"),
            ],
        );

        let workdir = temp.path().join("work");
        extract_archive(&zip_path, &workdir).unwrap();

        assert!(workdir.join("imsmanifest.xml").exists());
        assert_eq!(
            fs::read_to_string(workdir.join("res/index.html")).unwrap(),
            "<html></html>"
        );
    }

    #[test]
    fn test_extract_clears_stale_workdir() {
        let temp = TempDir::new().unwrap();
        let zip_path = temp.path().join("course.zip");
        build_zip(&zip_path, &[("index.html", "fresh")]);

        let workdir = temp.path().join("work");
        fs::create_dir_all(&workdir).unwrap();
        fs::write(workdir.join("stale.js"), "LMSInitialize").unwrap();

        extract_archive(&zip_path, &workdir).unwrap();

        assert!(!workdir.join("stale.js").exists());
        assert!(workdir.join("index.html").exists());
    }

    #[test]
    fn test_not_a_zip() {
        let temp = TempDir::new().unwrap();
        let fake = temp.path().join("course.zip");
        fs::write(&fake, "this is not a zip file at all").unwrap();

        let workdir = temp.path().join("work");
        let err = extract_archive(&fake, &workdir).unwrap_err();
        assert!(matches!(err, InspectError::NotAnArchive));
    }

    #[test]
    fn test_missing_input_is_extraction_error() {
        let temp = TempDir::new().unwrap();
        let err = extract_archive(&temp.path().join("nope.zip"), &temp.path().join("work"))
            .unwrap_err();
        assert!(matches!(err, InspectError::Extraction(_)));
    }
}
