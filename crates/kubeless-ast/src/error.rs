use thiserror::Error;

use crate::model::Visibility;

/// Source text that is not syntactically valid Java
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error at line {line}, column {column}: `{snippet}`")]
    Syntax {
        line: usize,
        column: usize,
        snippet: String,
    },

    #[error("incomplete declaration at line {line}, column {column}: missing {what}")]
    Incomplete {
        line: usize,
        column: usize,
        what: &'static str,
    },
}

/// A parsed source unit that does not satisfy the handler contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "the input class must belong to package {expected} (found {})",
        .found.as_deref().unwrap_or("no package declaration")
    )]
    WrongPackage {
        expected: String,
        found: Option<String>,
    },

    #[error("class {name} is not declared in the input source")]
    TypeNotFound { name: String },

    #[error("class {name} is not a public class (declared {visibility})")]
    NotPublic { name: String, visibility: Visibility },

    #[error(
        "class {name} does not implement any Kubeless function, i.e. one public method that takes {event} and {context} as parameters and returns a {returns}"
    )]
    NoHandlerMethod {
        name: String,
        event: String,
        context: String,
        returns: String,
    },
}
