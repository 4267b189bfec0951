//! Dependency coordinates, pom dependency entries and the exclusion set

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::ManifestError;
use crate::xml::Element;

/// `groupId:artifactId`, the identity used for exclusion filtering
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
}

impl Coordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Coordinate {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

impl FromStr for Coordinate {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once(':') {
            Some((group, artifact))
                if !group.trim().is_empty()
                    && !artifact.trim().is_empty()
                    && !artifact.contains(':') =>
            {
                Ok(Coordinate::new(group.trim(), artifact.trim()))
            }
            _ => Err(ManifestError::InvalidCoordinate(s.to_string())),
        }
    }
}

/// One `<dependency>` of a pom.
///
/// The element is kept whole so children we do not interpret (`type`,
/// `classifier`, `exclusions`, `optional`, ...) are written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    coordinate: Coordinate,
    version: Option<String>,
    scope: Option<String>,
    element: Element,
}

impl Dependency {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        let coordinate = Coordinate::new(group_id, artifact_id);
        let mut element = Element::new("dependency");
        element.push_element(Element::with_text("groupId", coordinate.group_id.as_str()));
        element.push_element(Element::with_text(
            "artifactId",
            coordinate.artifact_id.as_str(),
        ));
        Dependency {
            coordinate,
            version: None,
            scope: None,
            element,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.element
            .push_element(Element::with_text("version", version.as_str()));
        self.version = Some(version);
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        self.element
            .push_element(Element::with_text("scope", scope.as_str()));
        self.scope = Some(scope);
        self
    }

    /// Read a `<dependency>` element; missing ids read as empty strings
    pub fn from_element(element: Element) -> Self {
        Dependency {
            coordinate: Coordinate::new(
                element.child_text("groupId").unwrap_or_default(),
                element.child_text("artifactId").unwrap_or_default(),
            ),
            version: element.child_text("version"),
            scope: element.child_text("scope"),
            element,
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn group_id(&self) -> &str {
        &self.coordinate.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.coordinate.artifact_id
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn into_element(self) -> Element {
        self.element
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate)?;
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        if let Some(scope) = &self.scope {
            write!(f, " ({})", scope)?;
        }
        Ok(())
    }
}

/// Coordinates that are never copied into a generated pom
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    coordinates: BTreeSet<Coordinate>,
}

impl ExclusionSet {
    pub fn new(coordinates: impl IntoIterator<Item = Coordinate>) -> Self {
        ExclusionSet {
            coordinates: coordinates.into_iter().collect(),
        }
    }

    /// Build from `groupId:artifactId` strings
    pub fn from_coordinates<S: AsRef<str>>(
        coordinates: impl IntoIterator<Item = S>,
    ) -> Result<Self, ManifestError> {
        let coordinates = coordinates
            .into_iter()
            .map(|c| c.as_ref().parse())
            .collect::<Result<BTreeSet<Coordinate>, _>>()?;
        Ok(ExclusionSet { coordinates })
    }

    /// The reserved runtime dependency the generated pom supplies itself
    pub fn kubeless() -> Self {
        ExclusionSet::new([Coordinate::new("de.inoio.kubeless", "jvm-runtime")])
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.coordinates.contains(coordinate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.coordinates.iter()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_parse() {
        let c: Coordinate = " de.inoio.kubeless : jvm-runtime ".parse().unwrap();
        assert_eq!(c, Coordinate::new("de.inoio.kubeless", "jvm-runtime"));
        assert_eq!(c.to_string(), "de.inoio.kubeless:jvm-runtime");

        for bad in ["jvm-runtime", ":a", "g:", "g:a:1.0"] {
            assert!(bad.parse::<Coordinate>().is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_dependency_from_element_keeps_extra_children() {
        let mut element = Element::new("dependency");
        element.push_element(Element::with_text("groupId", " org.slf4j "));
        element.push_element(Element::with_text("artifactId", "slf4j-api"));
        element.push_element(Element::with_text("optional", "true"));

        let dep = Dependency::from_element(element.clone());
        assert_eq!(dep.group_id(), "org.slf4j");
        assert_eq!(dep.version(), None);
        assert_eq!(dep.scope(), None);
        assert_eq!(dep.element(), &element);
    }

    #[test]
    fn test_dependency_builder() {
        let dep = Dependency::new("junit", "junit")
            .with_version("4.12")
            .with_scope("test");
        assert_eq!(dep.to_string(), "junit:junit:4.12 (test)");
        assert_eq!(Dependency::from_element(dep.element().clone()), dep);
    }

    #[test]
    fn test_exclusion_set() {
        let set =
            ExclusionSet::from_coordinates(["de.inoio.kubeless:jvm-runtime", "a:b"]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Coordinate::new("a", "b")));
        assert!(!set.contains(&Coordinate::new("a", "c")));
        assert_eq!(ExclusionSet::kubeless().len(), 1);
        assert!(ExclusionSet::from_coordinates(["nope"]).is_err());
    }
}
