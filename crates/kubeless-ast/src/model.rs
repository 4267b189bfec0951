//! Structured view of one Java source file
//!
//! A [`SourceUnit`] keeps the original text next to the extracted
//! declarations. Each renameable name remembers the byte span it came from, so
//! serialization splices changed names (and injected imports) into the
//! original text and leaves every other byte alone.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    pub(crate) fn from_modifiers(modifiers: &[String]) -> Self {
        for modifier in modifiers {
            match modifier.as_str() {
                "public" => return Visibility::Public,
                "protected" => return Visibility::Protected,
                "private" => return Visibility::Private,
                _ => {}
            }
        }
        Visibility::Package
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Package => "package-private",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    pub(crate) fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "class_declaration" => Some(TypeKind::Class),
            "interface_declaration" => Some(TypeKind::Interface),
            "enum_declaration" => Some(TypeKind::Enum),
            "record_declaration" => Some(TypeKind::Record),
            "annotation_type_declaration" => Some(TypeKind::Annotation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDeclaration {
    pub(crate) name: String,
    pub(crate) span: Range<usize>,
}

impl PackageDeclaration {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    pub(crate) path: String,
    pub(crate) is_static: bool,
    pub(crate) is_wildcard: bool,
    /// Span of the whole declaration; `None` for imports added after parsing
    pub(crate) span: Option<Range<usize>>,
}

impl ImportDeclaration {
    /// Build an import from `a.b.C`, `a.b.*` or `static a.b.C.m`
    pub fn from_spec(spec: &str) -> Self {
        let spec = spec.trim();
        let spec = spec.strip_prefix("import ").unwrap_or(spec).trim();
        let spec = spec.strip_suffix(';').unwrap_or(spec).trim();

        let (is_static, rest) = match spec.strip_prefix("static ") {
            Some(rest) => (true, rest.trim()),
            None => (false, spec),
        };
        let (is_wildcard, path) = match rest.strip_suffix(".*") {
            Some(path) => (true, path),
            None => (false, rest),
        };

        ImportDeclaration {
            path: path.to_string(),
            is_static,
            is_wildcard,
            span: None,
        }
    }

    /// Imported name without `static` or the trailing `.*`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_wildcard(&self) -> bool {
        self.is_wildcard
    }

    /// True for imports appended by a transformation
    pub fn is_injected(&self) -> bool {
        self.span.is_none()
    }

    pub fn render(&self) -> String {
        format!(
            "import {}{}{};",
            if self.is_static { "static " } else { "" },
            self.path,
            if self.is_wildcard { ".*" } else { "" }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub(crate) type_name: String,
    pub(crate) name: String,
    pub(crate) varargs: bool,
}

impl Parameter {
    /// Declared type as written, e.g. `Event` or `io.kubeless.Event`
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_varargs(&self) -> bool {
        self.varargs
    }
}

/// Return type and parameter types of a method, as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    pub return_type: String,
    pub parameter_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub(crate) name: String,
    pub(crate) modifiers: Vec<String>,
    pub(crate) return_type: String,
    pub(crate) parameters: Vec<Parameter>,
    /// Legacy `String m()[]` array syntax
    pub(crate) array_dimensions: bool,
    pub(crate) text: String,
}

impl MethodDeclaration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    pub fn has_modifier(&self, keyword: &str) -> bool {
        self.modifiers.iter().any(|m| m == keyword)
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::from_modifiers(&self.modifiers)
    }

    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    pub fn has_array_dimensions(&self) -> bool {
        self.array_dimensions
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Full declaration text, annotations and body included
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn signature(&self) -> MethodSignature {
        MethodSignature {
            return_type: self.return_type.clone(),
            parameter_types: self
                .parameters
                .iter()
                .map(|p| p.type_name.clone())
                .collect(),
        }
    }

    /// `String handle(Event, Context)`
    pub fn describe(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                if p.varargs {
                    format!("{}...", p.type_name)
                } else {
                    p.type_name.clone()
                }
            })
            .collect();
        format!("{} {}({})", self.return_type, self.name, params.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDeclaration {
    pub(crate) name: String,
    pub(crate) modifiers: Vec<String>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) name_span: Range<usize>,
}

impl ConstructorDeclaration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::from_modifiers(&self.modifiers)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub(crate) kind: TypeKind,
    pub(crate) name: String,
    pub(crate) modifiers: Vec<String>,
    pub(crate) methods: Vec<MethodDeclaration>,
    pub(crate) constructors: Vec<ConstructorDeclaration>,
    pub(crate) name_span: Range<usize>,
}

impl TypeDeclaration {
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::from_modifiers(&self.modifiers)
    }

    pub fn methods(&self) -> &[MethodDeclaration] {
        &self.methods
    }

    pub fn constructors(&self) -> &[ConstructorDeclaration] {
        &self.constructors
    }

    /// Rename the type together with every constructor it declares.
    ///
    /// Constructors are the constructor declarations of this type's own body,
    /// so their previous names never need to be compared.
    pub(crate) fn rename(&mut self, new_name: &str) {
        self.name = new_name.to_string();
        for constructor in &mut self.constructors {
            constructor.name = new_name.to_string();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub(crate) source: String,
    pub(crate) package: Option<PackageDeclaration>,
    pub(crate) imports: Vec<ImportDeclaration>,
    pub(crate) types: Vec<TypeDeclaration>,
}

impl SourceUnit {
    pub fn package(&self) -> Option<&PackageDeclaration> {
        self.package.as_ref()
    }

    pub fn package_name(&self) -> Option<&str> {
        self.package.as_ref().map(|p| p.name.as_str())
    }

    pub fn imports(&self) -> &[ImportDeclaration] {
        &self.imports
    }

    /// Top-level type declarations in source order
    pub fn types(&self) -> &[TypeDeclaration] {
        &self.types
    }

    pub fn find_type(&self, name: &str) -> Option<&TypeDeclaration> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Top-level class (not interface, enum, record or annotation) named `name`
    pub fn find_class(&self, name: &str) -> Option<&TypeDeclaration> {
        self.types
            .iter()
            .find(|t| t.kind == TypeKind::Class && t.name == name)
    }

    pub(crate) fn find_type_mut(&mut self, name: &str) -> Option<&mut TypeDeclaration> {
        self.types.iter_mut().find(|t| t.name == name)
    }

    pub(crate) fn push_import(&mut self, import: ImportDeclaration) {
        self.imports.push(import);
    }

    /// The text this unit was parsed from
    pub fn original_source(&self) -> &str {
        &self.source
    }

    /// Serialize the unit, applying renames and injected imports
    pub fn to_source(&self) -> String {
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();

        for decl in &self.types {
            if self.source.get(decl.name_span.clone()) != Some(decl.name.as_str()) {
                edits.push((decl.name_span.clone(), decl.name.clone()));
            }
            for constructor in &decl.constructors {
                if self.source.get(constructor.name_span.clone()) != Some(constructor.name.as_str())
                {
                    edits.push((constructor.name_span.clone(), constructor.name.clone()));
                }
            }
        }

        if let Some((offset, text)) = self.injected_imports_text() {
            edits.push((offset..offset, text));
        }

        edits.sort_by_key(|(range, _)| range.start);

        let mut out = String::with_capacity(self.source.len() + 128);
        let mut cursor = 0;
        for (range, text) in edits {
            out.push_str(self.source.get(cursor..range.start).unwrap_or_default());
            out.push_str(&text);
            cursor = range.end;
        }
        out.push_str(self.source.get(cursor..).unwrap_or_default());
        out
    }

    /// Insertion point and text for imports added after parsing
    fn injected_imports_text(&self) -> Option<(usize, String)> {
        let injected: Vec<String> = self
            .imports
            .iter()
            .filter(|i| i.is_injected())
            .map(ImportDeclaration::render)
            .collect();
        if injected.is_empty() {
            return None;
        }

        let eol = self.line_ending();
        let last_import_end = self
            .imports
            .iter()
            .filter_map(|i| i.span.as_ref())
            .map(|span| span.end)
            .max();

        if let Some(end) = last_import_end {
            let text: String = injected.iter().map(|line| format!("{}{}", eol, line)).collect();
            return Some((end, text));
        }

        if let Some(package) = &self.package {
            let text: String = injected.iter().map(|line| format!("{}{}", eol, line)).collect();
            return Some((package.span.end, format!("{}{}", eol, text)));
        }

        let text: String = injected.iter().map(|line| format!("{}{}", line, eol)).collect();
        Some((0, format!("{}{}", text, eol)))
    }

    /// `\r\n` when the source's first line break is CRLF, `\n` otherwise
    fn line_ending(&self) -> &'static str {
        match self.source.find('\n') {
            Some(i) if i > 0 && self.source.as_bytes().get(i - 1) == Some(&b'\r') => "\r\n",
            _ => "\n",
        }
    }
}
