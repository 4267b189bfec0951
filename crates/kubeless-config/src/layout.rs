//! Path resolution for a handler project and its generated artifact
//!
//! Mirrors the Maven conventions the conversion relies on:
//! - handler sources under `<base>/src/main/java/io/kubeless`
//! - the project manifest at `<base>/pom.xml`
//! - generated output under `<base>/target/generated-sources/kubeless`

use std::path::{Path, PathBuf};

use crate::settings::Settings;

/// Default output directory, relative to the project base directory
pub const DEFAULT_OUTPUT_DIR: &[&str] = &["target", "generated-sources", "kubeless"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    base_dir: PathBuf,
    source_dir: PathBuf,
    extension: String,
    manifest_file_name: String,
}

impl ProjectLayout {
    pub fn new(base_dir: impl Into<PathBuf>, settings: &Settings) -> Self {
        let base_dir = base_dir.into();
        // Settings use '/' separators regardless of platform
        let source_dir = settings
            .source
            .directory
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(base_dir.clone(), |path, segment| path.join(segment));

        ProjectLayout {
            base_dir,
            source_dir,
            extension: settings.source.extension.clone(),
            manifest_file_name: settings.manifest.file_name.clone(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding handler sources
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Source file declaring `class_name`
    pub fn source_file(&self, class_name: &str) -> PathBuf {
        self.source_dir.join(self.source_file_name(class_name))
    }

    /// The project's own manifest
    pub fn manifest_file(&self) -> PathBuf {
        self.base_dir.join(&self.manifest_file_name)
    }

    pub fn default_output_dir(&self) -> PathBuf {
        DEFAULT_OUTPUT_DIR
            .iter()
            .fold(self.base_dir.clone(), |path, segment| path.join(segment))
    }

    /// Generated source file for `class_name` inside `output_dir`
    pub fn output_source_file(&self, output_dir: &Path, class_name: &str) -> PathBuf {
        output_dir.join(self.source_file_name(class_name))
    }

    /// Generated manifest inside `output_dir`
    pub fn output_manifest_file(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.manifest_file_name)
    }

    /// Class name a source path would declare, if it has the source extension
    pub fn class_name_of(&self, path: &Path) -> Option<String> {
        if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
            return None;
        }
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .map(|stem| stem.to_string())
    }

    fn source_file_name(&self, class_name: &str) -> String {
        format!("{}.{}", class_name, self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_paths() {
        let layout = ProjectLayout::new("/work/app", &Settings::default());

        assert_eq!(
            layout.source_file("AppFunction"),
            PathBuf::from("/work/app/src/main/java/io/kubeless/AppFunction.java")
        );
        assert_eq!(layout.manifest_file(), PathBuf::from("/work/app/pom.xml"));
        assert_eq!(
            layout.default_output_dir(),
            PathBuf::from("/work/app/target/generated-sources/kubeless")
        );
    }

    #[test]
    fn test_output_paths_use_output_name() {
        let layout = ProjectLayout::new("/work/app", &Settings::default());
        let out = Path::new("/tmp/out");

        assert_eq!(
            layout.output_source_file(out, "Renamed"),
            PathBuf::from("/tmp/out/Renamed.java")
        );
        assert_eq!(layout.output_manifest_file(out), PathBuf::from("/tmp/out/pom.xml"));
    }

    #[test]
    fn test_class_name_of_filters_extension() {
        let layout = ProjectLayout::new("/work/app", &Settings::default());

        assert_eq!(
            layout.class_name_of(Path::new("/x/Handler.java")).as_deref(),
            Some("Handler")
        );
        assert_eq!(layout.class_name_of(Path::new("/x/notes.txt")), None);
        assert_eq!(layout.class_name_of(Path::new("/x/Makefile")), None);
    }

    #[test]
    fn test_custom_source_directory() {
        let mut settings = Settings::default();
        settings.source.directory = "src/handlers/".to_string();
        let layout = ProjectLayout::new("/p", &settings);

        assert_eq!(layout.source_dir(), Path::new("/p/src/handlers"));
    }
}
