//! Reading and writing poms on disk
//!
//! Writes go to a temporary sibling file that is then renamed over the
//! target, so readers see either the previous or the new content.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::ManifestError;
use crate::manifest::Manifest;

/// Read and parse the pom at `path`, naming it by its path in errors
pub fn read_from_path(path: &Path) -> Result<Manifest, ManifestError> {
    debug!("Reading pom from: {:?}", path);
    let document = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| ManifestError::Parse {
        document: document.clone(),
        message: e.to_string(),
    })?;
    Manifest::parse(&text, &document)
}

/// Serialize `manifest` and atomically replace `path` with it
pub fn write_to_path(manifest: &Manifest, path: &Path) -> Result<(), ManifestError> {
    let xml = manifest.to_xml_string()?;
    write_atomic(path, xml.as_bytes())?;
    info!(
        "Pom written to {:?} ({} dependencies)",
        path,
        manifest.dependencies().len()
    );
    Ok(())
}

/// Write `contents` to a temp file next to `path`, then rename it into place.
///
/// The parent directory must exist.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let temp_path = temp_path_for(path);
    let result = (|| {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::builtin_template;
    use crate::types::Dependency;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_back() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("pom.xml");

        let mut manifest = builtin_template().unwrap();
        manifest.append_dependencies([Dependency::new("com.google.code.gson", "gson")]);

        assert!(write_to_path(&manifest, &path).is_ok(), "Failed to write pom");
        let loaded = read_from_path(&path).unwrap();
        assert_eq!(loaded, manifest);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Function.java");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_missing_directory_fails_cleanly() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent").join("pom.xml");
        assert!(write_atomic(&path, b"x").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_read_missing_is_parse_error_naming_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pom.xml");
        let err = read_from_path(&path).unwrap_err();
        assert_eq!(err.document(), Some(path.display().to_string().as_str()));
    }
}
