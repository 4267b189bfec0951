//! The built-in pom every generated function starts from

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::ManifestError;
use crate::manifest::Manifest;

/// Name used for the built-in template in error messages
pub const TEMPLATE_DOCUMENT: &str = "pom template";

pub const POM_TEMPLATE: &str = include_str!("../resources/pom-template.xml");

/// Parent `io.kubeless:kubeless`, artifact `function`, one `io.kubeless:params` dependency
pub fn builtin_template() -> Result<Manifest, ManifestError> {
    Manifest::parse(POM_TEMPLATE, TEMPLATE_DOCUMENT)
}

/// The template at `path`, or the built-in one when `path` is `None`.
///
/// Any failure to read or parse a custom template is reported against the
/// template document.
pub fn load_template(path: Option<&Path>) -> Result<Manifest, ManifestError> {
    let Some(path) = path else {
        return builtin_template();
    };
    debug!("Loading pom template from {}", path.display());
    let text = fs::read_to_string(path).map_err(|e| ManifestError::Parse {
        document: TEMPLATE_DOCUMENT.to_string(),
        message: format!("{}: {}", path.display(), e),
    })?;
    Manifest::parse(&text, TEMPLATE_DOCUMENT)
}
