//! Maven pom handling for kubeless-convert
//!
//! A pom is read into a lossless element tree ([`Manifest`]); only the
//! project identity, the parent and the top-level dependency list are
//! interpreted. The merger appends a project's runtime dependencies to the
//! built-in function template, leaving out test-scoped entries and the
//! coordinates in an [`ExclusionSet`].

pub mod errors;
pub mod manifest;
pub mod manifest_writer;
pub mod merge;
pub mod template;
pub mod types;
pub mod xml;

pub use errors::ManifestError;
pub use manifest::Manifest;
pub use merge::{filter_dependencies, merge, merge_with_test_scope, TEST_SCOPE};
pub use template::{builtin_template, load_template, TEMPLATE_DOCUMENT};
pub use types::{Coordinate, Dependency, ExclusionSet};

pub use manifest_writer::{read_from_path, write_atomic, write_to_path};
