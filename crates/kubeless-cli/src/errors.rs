//! Conversion errors
//!
//! Every failure of a conversion run is a [`ConvertError`] naming the path or
//! class involved; [`ConvertError::kind`] maps it onto the fixed taxonomy
//! callers match on.

use kubeless_ast::{ParseError, ValidationError};
use kubeless_manifest::ManifestError;
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    InputMissing,
    Unparseable,
    WrongPackage,
    TypeNotFound,
    NotPublic,
    NoHandlerMethod,
    DirectoryCreateFailed,
    WriteFailed,
    ManifestUnparseable,
    ManifestWriteFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InputMissing => "InputMissing",
            ErrorKind::Unparseable => "Unparseable",
            ErrorKind::WrongPackage => "WrongPackage",
            ErrorKind::TypeNotFound => "TypeNotFound",
            ErrorKind::NotPublic => "NotPublic",
            ErrorKind::NoHandlerMethod => "NoHandlerMethod",
            ErrorKind::DirectoryCreateFailed => "DirectoryCreateFailed",
            ErrorKind::WriteFailed => "WriteFailed",
            ErrorKind::ManifestUnparseable => "ManifestUnparseable",
            ErrorKind::ManifestWriteFailed => "ManifestWriteFailed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while converting a handler class
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("The input Java class {class} does not exist in {}", .directory.display())]
    SourceMissing { class: String, directory: PathBuf },

    #[error("Unable to read input Java class {}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("The input {file_name} file is not present in {}", .directory.display())]
    ManifestMissing { file_name: String, directory: PathBuf },

    #[error("Unable to parse input Java class {}", .path.display())]
    Unparseable {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Invalid input Java class {}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("Unable to create output directory {}", .path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to write output Java class {}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid manifest exclusion list")]
    InvalidExclusion {
        #[source]
        source: ManifestError,
    },

    #[error("Unable to read {document}")]
    ManifestUnparseable {
        document: String,
        #[source]
        source: ManifestError,
    },

    #[error("Unable to write new pom {}", .path.display())]
    ManifestWriteFailed {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::SourceMissing { .. }
            | ConvertError::SourceUnreadable { .. }
            | ConvertError::ManifestMissing { .. } => ErrorKind::InputMissing,
            ConvertError::Unparseable { .. } => ErrorKind::Unparseable,
            ConvertError::Invalid { source, .. } => match source {
                ValidationError::WrongPackage { .. } => ErrorKind::WrongPackage,
                ValidationError::TypeNotFound { .. } => ErrorKind::TypeNotFound,
                ValidationError::NotPublic { .. } => ErrorKind::NotPublic,
                ValidationError::NoHandlerMethod { .. } => ErrorKind::NoHandlerMethod,
            },
            ConvertError::DirectoryCreateFailed { .. } => ErrorKind::DirectoryCreateFailed,
            ConvertError::WriteFailed { .. } => ErrorKind::WriteFailed,
            ConvertError::InvalidExclusion { .. } | ConvertError::ManifestUnparseable { .. } => {
                ErrorKind::ManifestUnparseable
            }
            ConvertError::ManifestWriteFailed { .. } => ErrorKind::ManifestWriteFailed,
        }
    }

    /// The message followed by every underlying cause, `: `-separated
    pub fn detailed(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }
}

impl From<ManifestError> for ConvertError {
    fn from(source: ManifestError) -> Self {
        ConvertError::ManifestUnparseable {
            document: source.document().unwrap_or("pom").to_string(),
            source,
        }
    }
}
