use tracing::debug;

use crate::errors::ManifestError;
use crate::types::{Coordinate, Dependency};
use crate::xml::{Element, XmlDocument};

const PROJECT: &str = "project";
const DEPENDENCIES: &str = "dependencies";
const DEPENDENCY: &str = "dependency";

/// A Maven pom, kept as a full element tree.
///
/// Only the project identity, the parent and the top-level `<dependencies>`
/// list are interpreted; everything else is written back as it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    document: XmlDocument,
}

impl Manifest {
    /// Parse pom text. `document` names the source in error messages.
    pub fn parse(text: &str, document: &str) -> Result<Self, ManifestError> {
        let parsed = XmlDocument::parse(text).map_err(|message| ManifestError::Parse {
            document: document.to_string(),
            message,
        })?;

        if parsed.root().name() != PROJECT {
            return Err(ManifestError::NotAProject {
                document: document.to_string(),
                found: parsed.root().name().to_string(),
            });
        }

        let manifest = Manifest { document: parsed };
        debug!(
            "Parsed {}: artifactId={:?}, {} dependencies",
            document,
            manifest.artifact_id(),
            manifest.dependency_elements().count()
        );
        Ok(manifest)
    }

    pub fn to_xml_string(&self) -> Result<String, ManifestError> {
        self.document
            .to_xml_string()
            .map_err(ManifestError::Serialize)
    }

    pub fn root(&self) -> &Element {
        self.document.root()
    }

    pub fn group_id(&self) -> Option<String> {
        self.root().child_text("groupId")
    }

    pub fn artifact_id(&self) -> Option<String> {
        self.root().child_text("artifactId")
    }

    pub fn name(&self) -> Option<String> {
        self.root().child_text("name")
    }

    pub fn version(&self) -> Option<String> {
        self.root().child_text("version")
    }

    /// `groupId:artifactId` of the `<parent>` reference
    pub fn parent(&self) -> Option<Coordinate> {
        let parent = self.root().child("parent")?;
        Some(Coordinate::new(
            parent.child_text("groupId").unwrap_or_default(),
            parent.child_text("artifactId").unwrap_or_default(),
        ))
    }

    /// Top-level dependencies in document order; `dependencyManagement` and
    /// profiles are not included
    pub fn dependencies(&self) -> Vec<Dependency> {
        self.dependency_elements()
            .cloned()
            .map(Dependency::from_element)
            .collect()
    }

    /// Append after any existing dependencies, creating `<dependencies>`
    /// when the project has none
    pub fn append_dependencies(&mut self, dependencies: impl IntoIterator<Item = Dependency>) {
        let root = self.document.root_mut();
        if root.child(DEPENDENCIES).is_none() {
            root.push_element(Element::new(DEPENDENCIES));
        }
        if let Some(list) = root.child_mut(DEPENDENCIES) {
            for dependency in dependencies {
                list.push_element(dependency.into_element());
            }
        }
    }

    fn dependency_elements(&self) -> impl Iterator<Item = &Element> {
        self.root()
            .child(DEPENDENCIES)
            .into_iter()
            .flat_map(|list| list.elements().filter(|e| e.name() == DEPENDENCY))
    }
}
