//! Configuration for kubeless-convert
//!
//! - [`Settings`]: the immutable conversion settings (handler contract names,
//!   manifest file name, exclusion list), loaded from TOML with defaults.
//! - [`ProjectLayout`]: where input sources and manifests live and where the
//!   generated artifact goes.

pub mod layout;
pub mod settings;

pub use layout::ProjectLayout;
pub use settings::{ConfigError, HandlerSettings, ManifestSettings, Settings, SourceSettings};
