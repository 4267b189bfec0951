//! The handler contract a convertible class must satisfy
//!
//! Type names are matched by spelling only: a parameter written `Event`
//! or `io.kubeless.Event` both satisfy the event slot. The accepted spellings
//! are a closed set ([`Spelling`]) so the rule stays auditable.

use serde::Serialize;

/// How a type name was written in source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Spelling {
    /// Last segment only, e.g. `Event`
    Simple,
    /// Fully-qualified, e.g. `io.kubeless.Event`
    Qualified,
}

/// A type identified by its fully-qualified name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    qualified: String,
}

impl TypeName {
    pub fn new(qualified: impl Into<String>) -> Self {
        TypeName {
            qualified: qualified.into().trim().to_string(),
        }
    }

    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    pub fn simple(&self) -> &str {
        self.qualified
            .rsplit_once('.')
            .map_or(self.qualified.as_str(), |(_, simple)| simple)
    }

    /// Which accepted spelling `written` uses, if any
    pub fn spelling_of(&self, written: &str) -> Option<Spelling> {
        let normalized: String = written.chars().filter(|c| !c.is_whitespace()).collect();
        if normalized == self.simple() {
            Some(Spelling::Simple)
        } else if normalized == self.qualified {
            Some(Spelling::Qualified)
        } else {
            None
        }
    }

    pub fn accepts(&self, written: &str) -> bool {
        self.spelling_of(written).is_some()
    }
}

/// The two parameter slots of a handler method, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandlerParam {
    Event,
    Context,
}

impl HandlerParam {
    pub const ALL: [HandlerParam; 2] = [HandlerParam::Event, HandlerParam::Context];

    /// Zero-based parameter position
    pub fn position(self) -> usize {
        match self {
            HandlerParam::Event => 0,
            HandlerParam::Context => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerContract {
    package: String,
    returns: TypeName,
    event: TypeName,
    context: TypeName,
}

impl HandlerContract {
    pub fn new(
        package: impl Into<String>,
        returns: TypeName,
        event: TypeName,
        context: TypeName,
    ) -> Self {
        HandlerContract {
            package: package.into(),
            returns,
            event,
            context,
        }
    }

    /// `public String f(io.kubeless.Event, io.kubeless.Context)` in package `io.kubeless`
    pub fn kubeless() -> Self {
        HandlerContract::new(
            "io.kubeless",
            TypeName::new("java.lang.String"),
            TypeName::new("io.kubeless.Event"),
            TypeName::new("io.kubeless.Context"),
        )
    }

    /// Package the handler class must be declared in
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn returns(&self) -> &TypeName {
        &self.returns
    }

    pub fn param(&self, slot: HandlerParam) -> &TypeName {
        match slot {
            HandlerParam::Event => &self.event,
            HandlerParam::Context => &self.context,
        }
    }
}

impl Default for HandlerContract {
    fn default() -> Self {
        HandlerContract::kubeless()
    }
}
