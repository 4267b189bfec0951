//! Java handler analysis for kubeless-convert
//!
//! This crate parses a single Java source file with ast-grep, checks that it
//! declares a Kubeless handler class and rewrites it for the runtime:
//! 1. [`SourceUnit::parse`] extracts package, imports and top-level types
//! 2. [`validate`] checks the class against a [`HandlerContract`]
//! 3. [`transform`] renames the class and its constructors and injects imports
//!
//! Rewriting is lossless: everything outside the renamed identifiers and the
//! injected import lines is emitted byte-for-byte.

pub mod contract;
pub mod error;
pub mod model;
mod parser;
pub mod transformer;
pub mod validator;

pub use contract::{HandlerContract, HandlerParam, Spelling, TypeName};
pub use error::{ParseError, ValidationError};
pub use model::{
    ConstructorDeclaration, ImportDeclaration, MethodDeclaration, MethodSignature,
    PackageDeclaration, Parameter, SourceUnit, TypeDeclaration, TypeKind, Visibility,
};
pub use transformer::transform;
pub use validator::{find_handler, is_handler_method, validate, validate_handler};
