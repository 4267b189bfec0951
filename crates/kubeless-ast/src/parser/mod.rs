use ast_grep_core::source::StrDoc;
use ast_grep_core::{AstGrep, Node};
use ast_grep_language::Java;
use std::ops::Range;
use tracing::debug;

use crate::error::ParseError;
use crate::model::{
    ConstructorDeclaration, ImportDeclaration, MethodDeclaration, PackageDeclaration, Parameter,
    SourceUnit, TypeDeclaration, TypeKind,
};


type JavaNode<'r> = Node<'r, StrDoc<Java>>;

const SNIPPET_MAX_CHARS: usize = 60;

impl SourceUnit {
    /// Parse Java source text.
    ///
    /// Fails with [`ParseError`] when the grammar had to recover from an error
    /// anywhere in the file, even if the damaged region is unrelated to the
    /// declarations we read.
    pub fn parse(source: impl Into<String>) -> Result<Self, ParseError> {
        let source = source.into();
        let grep = AstGrep::new(&source, Java);
        let root = grep.root();

        if let Some(range) = first_syntax_problem(&root) {
            let (line, column) = line_column(&source, range.start);
            return Err(ParseError::Syntax {
                line,
                column,
                snippet: snippet_at(&source, range.start),
            });
        }

        let mut package = None;
        let mut imports = Vec::new();
        let mut types = Vec::new();

        for child in root.children() {
            let kind = child.kind();
            match &*kind {
                "package_declaration" => package = Some(read_package(&child)),
                "import_declaration" => imports.push(read_import(&child)),
                other => {
                    if let Some(type_kind) = TypeKind::from_node_kind(other) {
                        types.push(read_type(&source, &child, type_kind)?);
                    }
                }
            }
        }

        debug!(
            "Parsed source unit: package={:?}, {} imports, {} top-level types",
            package.as_ref().map(PackageDeclaration::name),
            imports.len(),
            types.len()
        );

        Ok(SourceUnit {
            source,
            package,
            imports,
            types,
        })
    }
}

/// Span of the first error or missing node, depth first
fn first_syntax_problem(node: &JavaNode<'_>) -> Option<Range<usize>> {
    if node.kind() == "ERROR" {
        return Some(node.range());
    }
    for child in node.children() {
        let range = child.range();
        // tree-sitter inserts zero-width leaves for tokens it had to assume
        if range.is_empty() && child.children().next().is_none() {
            return Some(range);
        }
        if let Some(problem) = first_syntax_problem(&child) {
            return Some(problem);
        }
    }
    None
}

fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before.get(line_start..).map_or(0, |s| s.chars().count()) + 1;
    (line, column)
}

fn snippet_at(source: &str, offset: usize) -> String {
    let before = source.get(..offset).unwrap_or(source);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    source
        .get(line_start..)
        .and_then(|rest| rest.lines().next())
        .unwrap_or_default()
        .trim()
        .chars()
        .take(SNIPPET_MAX_CHARS)
        .collect()
}

fn incomplete(source: &str, node: &JavaNode<'_>, what: &'static str) -> ParseError {
    let (line, column) = line_column(source, node.range().start);
    ParseError::Incomplete { line, column, what }
}

/// Dotted name with any interior whitespace removed
fn qualified_name(node: &JavaNode<'_>) -> String {
    node.text().chars().filter(|ch| !ch.is_whitespace()).collect()
}

fn is_comment(node: &JavaNode<'_>) -> bool {
    matches!(&*node.kind(), "line_comment" | "block_comment")
}

fn is_name_node(node: &JavaNode<'_>) -> bool {
    matches!(&*node.kind(), "scoped_identifier" | "identifier")
}

fn read_package(node: &JavaNode<'_>) -> PackageDeclaration {
    let name = node
        .children()
        .find(|c| is_name_node(c))
        .map(|n| qualified_name(&n))
        .unwrap_or_default();
    PackageDeclaration {
        name,
        span: node.range(),
    }
}

fn read_import(node: &JavaNode<'_>) -> ImportDeclaration {
    let mut path = String::new();
    let mut is_static = false;
    let mut is_wildcard = false;
    for child in node.children() {
        match &*child.kind() {
            "static" => is_static = true,
            "asterisk" => is_wildcard = true,
            "scoped_identifier" | "identifier" => path = qualified_name(&child),
            _ => {}
        }
    }
    ImportDeclaration {
        path,
        is_static,
        is_wildcard,
        span: Some(node.range()),
    }
}

/// Keyword modifiers (`public`, `static`, ...), annotations excluded
fn read_modifiers(node: &JavaNode<'_>) -> Vec<String> {
    node.children()
        .find(|c| c.kind() == "modifiers")
        .map(|modifiers| {
            modifiers
                .children()
                .filter(|m| {
                    !is_comment(m) && !matches!(&*m.kind(), "annotation" | "marker_annotation")
                })
                .map(|m| m.text().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn read_type(
    source: &str,
    node: &JavaNode<'_>,
    kind: TypeKind,
) -> Result<TypeDeclaration, ParseError> {
    let name_node = node
        .field("name")
        .ok_or_else(|| incomplete(source, node, "type name"))?;

    let mut methods = Vec::new();
    let mut constructors = Vec::new();

    if let Some(body) = node.field("body") {
        for member in body.children() {
            if member.kind() == "enum_body_declarations" {
                for nested in member.children() {
                    read_member(source, &nested, &mut methods, &mut constructors)?;
                }
            } else {
                read_member(source, &member, &mut methods, &mut constructors)?;
            }
        }
    }

    let decl = TypeDeclaration {
        kind,
        name: name_node.text().to_string(),
        modifiers: read_modifiers(node),
        methods,
        constructors,
        name_span: name_node.range(),
    };
    debug!(
        "Found {:?} {} with {} methods and {} constructors",
        decl.kind,
        decl.name,
        decl.methods.len(),
        decl.constructors.len()
    );
    Ok(decl)
}

fn read_member(
    source: &str,
    member: &JavaNode<'_>,
    methods: &mut Vec<MethodDeclaration>,
    constructors: &mut Vec<ConstructorDeclaration>,
) -> Result<(), ParseError> {
    match &*member.kind() {
        "method_declaration" => methods.push(read_method(source, member)?),
        "constructor_declaration" | "compact_constructor_declaration" => {
            constructors.push(read_constructor(source, member)?)
        }
        _ => {}
    }
    Ok(())
}

fn read_method(source: &str, node: &JavaNode<'_>) -> Result<MethodDeclaration, ParseError> {
    let name = node
        .field("name")
        .ok_or_else(|| incomplete(source, node, "method name"))?;
    let return_type = node
        .field("type")
        .ok_or_else(|| incomplete(source, node, "method return type"))?;

    Ok(MethodDeclaration {
        name: name.text().to_string(),
        modifiers: read_modifiers(node),
        return_type: return_type.text().trim().to_string(),
        parameters: read_parameters(source, node)?,
        array_dimensions: node.field("dimensions").is_some(),
        text: node.text().to_string(),
    })
}

fn read_constructor(
    source: &str,
    node: &JavaNode<'_>,
) -> Result<ConstructorDeclaration, ParseError> {
    let name = node
        .field("name")
        .ok_or_else(|| incomplete(source, node, "constructor name"))?;

    Ok(ConstructorDeclaration {
        name: name.text().to_string(),
        modifiers: read_modifiers(node),
        parameters: read_parameters(source, node)?,
        name_span: name.range(),
    })
}

/// Declared parameters; a receiver parameter (`Foo this`) is not one
fn read_parameters(source: &str, node: &JavaNode<'_>) -> Result<Vec<Parameter>, ParseError> {
    let Some(list) = node.field("parameters") else {
        return Ok(Vec::new());
    };

    let mut parameters = Vec::new();
    for param in list.children() {
        match &*param.kind() {
            "formal_parameter" => {
                let type_node = param
                    .field("type")
                    .ok_or_else(|| incomplete(source, &param, "parameter type"))?;
                let mut type_name = type_node.text().trim().to_string();
                if let Some(dims) = param.field("dimensions") {
                    type_name.push_str(dims.text().trim());
                }
                parameters.push(Parameter {
                    type_name,
                    name: param
                        .field("name")
                        .map(|n| n.text().to_string())
                        .unwrap_or_default(),
                    varargs: false,
                });
            }
            "spread_parameter" => {
                let type_node = param
                    .children()
                    .find(|c| {
                        !is_comment(c)
                            && !matches!(&*c.kind(), "modifiers" | "..." | "variable_declarator")
                    })
                    .ok_or_else(|| incomplete(source, &param, "parameter type"))?;
                let name = param
                    .children()
                    .find(|c| c.kind() == "variable_declarator")
                    .and_then(|d| d.field("name"))
                    .map(|n| n.text().to_string())
                    .unwrap_or_default();
                parameters.push(Parameter {
                    type_name: type_node.text().trim().to_string(),
                    name,
                    varargs: true,
                });
            }
            _ => {}
        }
    }
    Ok(parameters)
}
