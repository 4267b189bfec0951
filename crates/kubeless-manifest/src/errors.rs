use std::io;
use thiserror::Error;

/// Errors that can occur while reading, merging or writing a pom
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error")]
    Io(#[from] io::Error),

    #[error("Unable to parse {document}: {message}")]
    Parse { document: String, message: String },

    #[error("{document} is not a Maven project (root element <{found}>)")]
    NotAProject { document: String, found: String },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(String),

    #[error("Invalid dependency coordinate `{0}`, expected groupId:artifactId")]
    InvalidCoordinate(String),
}

impl ManifestError {
    /// Name of the document that failed to parse, if this is a parse failure
    pub fn document(&self) -> Option<&str> {
        match self {
            ManifestError::Parse { document, .. } | ManifestError::NotAProject { document, .. } => {
                Some(document)
            }
            _ => None,
        }
    }
}
