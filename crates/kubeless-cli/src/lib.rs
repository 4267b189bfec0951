//! kubeless-convert library - expose modules for testing
//!
//! The binary is a thin clap layer over [`pipeline::Converter`], which turns
//! a Kubeless Java handler project into a generated class plus pom.

pub mod commands;
pub mod common;
pub mod errors;
pub mod pipeline;

pub use common::GlobalOpts;
pub use errors::{ConvertError, ErrorKind};
pub use pipeline::{ConversionReport, ConversionRequest, Converter, Stage};

pub use kubeless_logger as logger;
