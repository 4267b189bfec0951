//! Conversion settings
//!
//! Every field has a default matching the Kubeless JVM runtime, so an absent
//! config file yields a working configuration. The loaded [`Settings`] value
//! is never mutated afterwards; conversions borrow it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "KUBELESS_CONVERT_CONFIG";

const CONFIG_DIR_NAME: &str = "kubeless-convert";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Error type for loading settings
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// The config file could not be read
    Read { path: PathBuf, message: String },
    /// The config file is not valid TOML for [`Settings`]
    Parse { path: PathBuf, message: String },
    /// A value is present but unusable
    Invalid(String),
    /// Settings could not be rendered back to TOML
    Serialize(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, message } => {
                write!(f, "Unable to read config {}: {}", path.display(), message)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Unable to parse config {}: {}", path.display(), message)
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "Unable to serialize configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Names making up the handler contract
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct HandlerSettings {
    /// Package every handler class must be declared in
    pub package: String,
    /// Fully-qualified type of the first handler parameter
    pub event_type: String,
    /// Fully-qualified type of the second handler parameter
    pub context_type: String,
    /// Fully-qualified return type of the handler
    pub return_type: String,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        HandlerSettings {
            package: "io.kubeless".to_string(),
            event_type: "io.kubeless.Event".to_string(),
            context_type: "io.kubeless.Context".to_string(),
            return_type: "java.lang.String".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceSettings {
    /// Handler source directory, relative to the project base directory
    pub directory: String,
    /// Source file extension, without the dot
    pub extension: String,
    /// Append imports of the event and context types to the generated class
    pub inject_imports: bool,
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings {
            directory: "src/main/java/io/kubeless".to_string(),
            extension: "java".to_string(),
            inject_imports: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ManifestSettings {
    /// File name of both the project manifest and the generated one
    pub file_name: String,
    /// Dependencies with this scope are never propagated
    pub test_scope: String,
    /// `groupId:artifactId` coordinates never propagated
    pub exclude: Vec<String>,
    /// Replaces the built-in manifest template when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
}

impl Default for ManifestSettings {
    fn default() -> Self {
        ManifestSettings {
            file_name: "pom.xml".to_string(),
            test_scope: "test".to_string(),
            exclude: vec!["de.inoio.kubeless:jvm-runtime".to_string()],
            template: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub handler: HandlerSettings,
    pub source: SourceSettings,
    pub manifest: ManifestSettings,
}

impl Settings {
    /// Location of the config file
    ///
    /// `KUBELESS_CONVERT_CONFIG` wins when set and non-empty, otherwise the
    /// platform config directory is used.
    pub fn path() -> Option<PathBuf> {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }

        #[cfg(not(target_os = "windows"))]
        let default = dirs::home_dir().map(|h| h.join(".config").join(CONFIG_DIR_NAME));

        #[cfg(target_os = "windows")]
        let default = dirs::config_dir().map(|c| c.join(CONFIG_DIR_NAME));

        default.map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Settings::default()),
        }
    }

    /// Load settings from an explicit file, which must exist
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let settings: Settings = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values that serde accepts but a conversion cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        let handler = &self.handler;
        for (key, value) in [
            ("handler.package", &handler.package),
            ("handler.event-type", &handler.event_type),
            ("handler.context-type", &handler.context_type),
            ("handler.return-type", &handler.return_type),
            ("source.extension", &self.source.extension),
            ("manifest.file-name", &self.manifest.file_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("'{}' must not be empty", key)));
            }
        }

        for entry in &self.manifest.exclude {
            let valid = entry
                .split_once(':')
                .is_some_and(|(group, artifact)| {
                    !group.is_empty() && !artifact.is_empty() && !artifact.contains(':')
                });
            if !valid {
                return Err(ConfigError::Invalid(format!(
                    "exclusion '{}' is not a groupId:artifactId coordinate",
                    entry
                )));
            }
        }

        Ok(())
    }

    /// Imports appended to every generated class
    pub fn extra_imports(&self) -> Vec<String> {
        if self.source.inject_imports {
            vec![
                self.handler.event_type.clone(),
                self.handler.context_type.clone(),
            ]
        } else {
            Vec::new()
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}
