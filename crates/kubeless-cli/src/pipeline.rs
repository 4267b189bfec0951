//! The conversion pipeline
//!
//! A run moves through [`Stage`]s in a fixed order and stops at the first
//! failure:
//!
//! `Start -> InputsChecked -> DirectoryReady -> ClassWritten -> ManifestWritten -> Done`
//!
//! Nothing is written before `InputsChecked` succeeds. Each output file is
//! replaced atomically, but a run failing after `ClassWritten` leaves the new
//! class next to the previous pom; rerunning overwrites both.

use kubeless_ast::{
    transform, validate_handler, HandlerContract, MethodDeclaration, MethodSignature,
    SourceUnit, TypeName,
};
use kubeless_config::{ProjectLayout, Settings};
use kubeless_manifest::{
    filter_dependencies, load_template, read_from_path, write_atomic, write_to_path, ExclusionSet,
    Manifest,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::ConvertError;
use crate::logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Start,
    InputsChecked,
    DirectoryReady,
    ClassWritten,
    ManifestWritten,
    Done,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Start,
        Stage::InputsChecked,
        Stage::DirectoryReady,
        Stage::ClassWritten,
        Stage::ManifestWritten,
        Stage::Done,
    ];

    /// The stage after this one; `Done` is terminal
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::InputsChecked),
            Stage::InputsChecked => Some(Stage::DirectoryReady),
            Stage::DirectoryReady => Some(Stage::ClassWritten),
            Stage::ClassWritten => Some(Stage::ManifestWritten),
            Stage::ManifestWritten => Some(Stage::Done),
            Stage::Done => None,
        }
    }
}

/// What to convert and where to put it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub base_dir: PathBuf,
    pub class_name: String,
    /// Name of the generated class; the input name when `None`
    pub output_name: Option<String>,
    /// `<base>/target/generated-sources/kubeless` when `None`
    pub output_dir: Option<PathBuf>,
}

impl ConversionRequest {
    pub fn new(base_dir: impl Into<PathBuf>, class_name: impl Into<String>) -> Self {
        ConversionRequest {
            base_dir: base_dir.into(),
            class_name: class_name.into(),
            output_name: None,
            output_dir: None,
        }
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn output_name(&self) -> &str {
        self.output_name.as_deref().unwrap_or(&self.class_name)
    }

    fn resolve_output_dir(&self, layout: &ProjectLayout) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| layout.default_output_dir())
    }
}

/// Inputs that passed the `InputsChecked` stage
#[derive(Debug, Clone)]
pub struct CheckedInputs {
    pub source_path: PathBuf,
    pub manifest_path: PathBuf,
    pub unit: SourceUnit,
    pub handler: MethodDeclaration,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub class_name: String,
    pub output_name: String,
    pub source_file: PathBuf,
    pub output_dir: PathBuf,
    pub directory_created: bool,
    pub class_file: PathBuf,
    pub manifest_file: PathBuf,
    pub handler: String,
    pub handler_signature: MethodSignature,
    pub imports_added: Vec<String>,
    pub dependencies: Vec<String>,
    pub dependencies_skipped: usize,
    pub stages: Vec<Stage>,
    pub generated_at: String,
}

impl ConversionReport {
    pub fn final_stage(&self) -> Option<Stage> {
        self.stages.last().copied()
    }
}

/// Runs conversions against one immutable configuration.
///
/// The contract, exclusion set and template are built once and only read
/// afterwards, so one converter can serve several threads as long as their
/// output directories differ.
#[derive(Debug, Clone)]
pub struct Converter<'s> {
    settings: &'s Settings,
    contract: HandlerContract,
    exclusions: ExclusionSet,
    template: Manifest,
}

impl<'s> Converter<'s> {
    pub fn new(settings: &'s Settings) -> Result<Self, ConvertError> {
        let exclusions = ExclusionSet::from_coordinates(&settings.manifest.exclude)
            .map_err(|source| ConvertError::InvalidExclusion { source })?;
        let template = load_template(settings.manifest.template.as_deref())?;
        debug!(
            "Converter ready: package {}, {} excluded coordinates",
            settings.handler.package,
            exclusions.len()
        );
        Ok(Converter {
            settings,
            contract: contract_from_settings(settings),
            exclusions,
            template,
        })
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn contract(&self) -> &HandlerContract {
        &self.contract
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn layout(&self, base_dir: &Path) -> ProjectLayout {
        ProjectLayout::new(base_dir, self.settings)
    }

    /// Run every stage for `request`
    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionReport, ConvertError> {
        let layout = self.layout(&request.base_dir);
        let mut stages = vec![Stage::Start];

        let inputs = self.check(&layout, &request.class_name)?;
        stages.push(Stage::InputsChecked);

        let output_dir = request.resolve_output_dir(&layout);
        let directory_created = ensure_directory(&output_dir)?;
        stages.push(Stage::DirectoryReady);

        let output_name = request.output_name();
        let imports = self.settings.extra_imports();
        let class_file = layout.output_source_file(&output_dir, output_name);
        let transformed = transform(inputs.unit, &request.class_name, output_name, &imports);
        write_atomic(&class_file, transformed.to_source().as_bytes()).map_err(|source| {
            ConvertError::WriteFailed {
                path: class_file.clone(),
                source,
            }
        })?;
        logger::success(&format!("Created successfully file: {}", class_file.display()));
        stages.push(Stage::ClassWritten);

        let project = read_from_path(&inputs.manifest_path)?;
        let source_dependencies = project.dependencies();
        let kept = filter_dependencies(
            &source_dependencies,
            &self.exclusions,
            &self.settings.manifest.test_scope,
        );
        let mut merged = self.template.clone();
        merged.append_dependencies(kept.iter().cloned());
        let manifest_file = layout.output_manifest_file(&output_dir);
        write_to_path(&merged, &manifest_file).map_err(|source| {
            ConvertError::ManifestWriteFailed {
                path: manifest_file.clone(),
                source,
            }
        })?;
        logger::success(&format!(
            "Created successfully file: {}",
            manifest_file.display()
        ));
        stages.push(Stage::ManifestWritten);
        stages.push(Stage::Done);

        info!(
            "Converted {} into {} ({} dependencies)",
            request.class_name,
            class_file.display(),
            kept.len()
        );

        Ok(ConversionReport {
            class_name: request.class_name.clone(),
            output_name: output_name.to_string(),
            source_file: inputs.source_path,
            output_dir,
            directory_created,
            class_file,
            manifest_file,
            handler: inputs.handler.describe(),
            handler_signature: inputs.handler.signature(),
            imports_added: imports,
            dependencies: kept.iter().map(ToString::to_string).collect(),
            dependencies_skipped: source_dependencies.len() - kept.len(),
            stages,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// The `InputsChecked` stage alone; reads but never writes
    pub fn check(
        &self,
        layout: &ProjectLayout,
        class_name: &str,
    ) -> Result<CheckedInputs, ConvertError> {
        let source_path = layout.source_file(class_name);
        if !source_path.is_file() {
            return Err(ConvertError::SourceMissing {
                class: class_name.to_string(),
                directory: layout.source_dir().to_path_buf(),
            });
        }
        let source = fs::read_to_string(&source_path).map_err(|source| {
            ConvertError::SourceUnreadable {
                path: source_path.clone(),
                source,
            }
        })?;

        let unit = SourceUnit::parse(source).map_err(|source| ConvertError::Unparseable {
            path: source_path.clone(),
            source,
        })?;
        let handler = validate_handler(&unit, class_name, &self.contract)
            .map_err(|source| ConvertError::Invalid {
                path: source_path.clone(),
                source,
            })?
            .clone();
        debug!("{} declares handler {}", class_name, handler.describe());

        let manifest_path = layout.manifest_file();
        if !manifest_path.is_file() {
            return Err(ConvertError::ManifestMissing {
                file_name: self.settings.manifest.file_name.clone(),
                directory: layout.base_dir().to_path_buf(),
            });
        }

        Ok(CheckedInputs {
            source_path,
            manifest_path,
            unit,
            handler,
        })
    }
}

/// Build the handler contract named by `settings`
pub fn contract_from_settings(settings: &Settings) -> HandlerContract {
    let handler = &settings.handler;
    HandlerContract::new(
        handler.package.as_str(),
        TypeName::new(handler.return_type.as_str()),
        TypeName::new(handler.event_type.as_str()),
        TypeName::new(handler.context_type.as_str()),
    )
}

/// Create `dir` unless it is already a directory; true when it was created
fn ensure_directory(dir: &Path) -> Result<bool, ConvertError> {
    if dir.is_dir() {
        debug!("Output directory {} already exists", dir.display());
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|source| ConvertError::DirectoryCreateFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    logger::success(&format!("Created successfully directory: {}", dir.display()));
    Ok(true)
}
