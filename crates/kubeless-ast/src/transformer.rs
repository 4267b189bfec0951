use tracing::debug;

use crate::model::{ImportDeclaration, SourceUnit};

/// Rename the top-level type `old_name` (and its constructors) to `new_name`
/// and append `extra_imports` after the existing imports.
///
/// Leaves `unit` untouched when no type named `old_name` exists; callers
/// validate first. Imports are appended in the given order without
/// de-duplication. Blank entries are ignored.
pub fn transform<S: AsRef<str>>(
    mut unit: SourceUnit,
    old_name: &str,
    new_name: &str,
    extra_imports: &[S],
) -> SourceUnit {
    let Some(decl) = unit.find_type_mut(old_name) else {
        debug!("No type named {} in source unit, nothing to transform", old_name);
        return unit;
    };

    if old_name != new_name {
        decl.rename(new_name);
        debug!(
            "Renamed {} to {} ({} constructors)",
            old_name,
            new_name,
            decl.constructors().len()
        );
    }

    for spec in extra_imports {
        let spec = spec.as_ref();
        if spec.trim().is_empty() {
            continue;
        }
        unit.push_import(ImportDeclaration::from_spec(spec));
    }

    unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::HandlerContract;
    use crate::validator::validate_handler;
    use anyhow::Result;

    const APP_FUNCTION: &str = r#"package io.kubeless;

import java.util.Map;

/**
 * Greets whoever calls it.
 */
public class AppFunction {

    private final String greeting;

    public AppFunction() {
        this("Hello");
    }

    AppFunction(String greeting) {
        this.greeting = greeting; // keep AppFunction references in comments
    }

    public String handle(Event event, Context context) {
        AppFunction copy = new AppFunction(greeting);
        return copy.greeting + " " + event.getData();
    }

    static class Nested {
        Nested() {}
    }
}
"#;

    const IMPORTS: [&str; 2] = ["io.kubeless.Event", "io.kubeless.Context"];

    #[test]
    fn test_rename_type_and_constructors() -> Result<()> {
        let unit = SourceUnit::parse(APP_FUNCTION)?;
        let out = transform(unit, "AppFunction", "Function", &IMPORTS).to_source();

        assert!(out.contains("public class Function {"));
        assert!(out.contains("    public Function() {"));
        assert!(out.contains("    Function(String greeting) {"));
        // only declarations are renamed
        assert!(out.contains("AppFunction copy = new AppFunction(greeting);"));
        assert!(out.contains("// keep AppFunction references in comments"));
        assert!(out.contains("        Nested() {}"));
        Ok(())
    }

    #[test]
    fn test_imports_appended_after_existing() -> Result<()> {
        let unit = SourceUnit::parse(APP_FUNCTION)?;
        let out = transform(unit, "AppFunction", "AppFunction", &IMPORTS).to_source();

        assert!(out.contains(
            "import java.util.Map;\nimport io.kubeless.Event;\nimport io.kubeless.Context;\n\n/**"
        ));
        Ok(())
    }

    #[test]
    fn test_imports_after_package_when_none_exist() -> Result<()> {
        let src = "package io.kubeless;\n\npublic class Foo {\n}\n";
        let out = transform(SourceUnit::parse(src)?, "Foo", "Foo", &IMPORTS).to_source();

        assert_eq!(
            out,
            "package io.kubeless;\n\nimport io.kubeless.Event;\nimport io.kubeless.Context;\n\npublic class Foo {\n}\n"
        );
        Ok(())
    }

    #[test]
    fn test_imports_at_top_without_package() -> Result<()> {
        let src = "class Foo {}\n";
        let out = transform(SourceUnit::parse(src)?, "Foo", "Bar", &["a.B"]).to_source();

        assert_eq!(out, "import a.B;\n\nclass Bar {}\n");
        Ok(())
    }

    #[test]
    fn test_duplicate_imports_are_kept() -> Result<()> {
        let src = "package io.kubeless;\nimport io.kubeless.Event;\npublic class Foo {}\n";
        let unit = transform(SourceUnit::parse(src)?, "Foo", "Foo", &IMPORTS);

        let paths: Vec<&str> = unit.imports().iter().map(|i| i.path()).collect();
        assert_eq!(
            paths,
            vec!["io.kubeless.Event", "io.kubeless.Event", "io.kubeless.Context"]
        );
        Ok(())
    }

    #[test]
    fn test_unknown_type_is_noop() -> Result<()> {
        let unit = SourceUnit::parse(APP_FUNCTION)?;
        let out = transform(unit, "Missing", "Other", &IMPORTS);

        assert_eq!(out.to_source(), APP_FUNCTION);
        assert_eq!(out.imports().len(), 1);
        Ok(())
    }

    #[test]
    fn test_no_extra_imports_keeps_text() -> Result<()> {
        let unit = SourceUnit::parse(APP_FUNCTION)?;
        let out = transform::<&str>(unit, "AppFunction", "AppFunction", &[]);

        assert_eq!(out.to_source(), APP_FUNCTION);
        Ok(())
    }

    #[test]
    fn test_reparse_keeps_handler_intact() -> Result<()> {
        let contract = HandlerContract::kubeless();
        let original = SourceUnit::parse(APP_FUNCTION)?;
        let original_handler = validate_handler(&original, "AppFunction", &contract)?.clone();

        let out = transform(original.clone(), "AppFunction", "Converted", &IMPORTS).to_source();
        let reparsed = SourceUnit::parse(out)?;

        let decl = reparsed.find_class("Converted").expect("renamed class");
        assert!(decl.constructors().iter().all(|c| c.name() == "Converted"));
        assert_eq!(decl.constructors().len(), 2);
        assert_eq!(reparsed.package_name(), Some("io.kubeless"));

        let handler = validate_handler(&reparsed, "Converted", &contract)?;
        assert_eq!(handler, &original_handler);
        Ok(())
    }

    #[test]
    fn test_enum_constructors_renamed() -> Result<()> {
        let src = "enum Mode {\n    A, B;\n\n    Mode() {}\n}\n";
        let out = transform(SourceUnit::parse(src)?, "Mode", "Kind", &[] as &[&str]).to_source();

        assert_eq!(out, "enum Kind {\n    A, B;\n\n    Kind() {}\n}\n");
        Ok(())
    }

    #[test]
    fn test_injected_imports_follow_crlf_line_endings() -> Result<()> {
        let src = "package io.kubeless;\r\n\r\nimport java.util.List;\r\n\r\npublic class Foo {\r\n}\r\n";
        let out = transform(SourceUnit::parse(src)?, "Foo", "Foo", &IMPORTS).to_source();

        assert_eq!(
            out,
            "package io.kubeless;\r\n\r\nimport java.util.List;\r\nimport io.kubeless.Event;\r\nimport io.kubeless.Context;\r\n\r\npublic class Foo {\r\n}\r\n"
        );
        assert!(!out.replace("\r\n", "").contains('\n'));

        let bare = "package io.kubeless;\r\n\r\npublic class Foo {\r\n}\r\n";
        let out = transform(SourceUnit::parse(bare)?, "Foo", "Foo", &IMPORTS).to_source();
        assert!(out.starts_with(
            "package io.kubeless;\r\n\r\nimport io.kubeless.Event;\r\nimport io.kubeless.Context;\r\n\r\npublic"
        ));
        Ok(())
    }
}
