//! Library-level conversion tests against the fixture projects

use anyhow::Result;
use kubeless_ast::{validate_handler, HandlerContract, SourceUnit};
use kubeless_config::Settings;
use kubeless_convert::commands::check::{check_classes, discover_classes};
use kubeless_convert::{ConversionRequest, Converter, ErrorKind, Stage};
use kubeless_manifest::{read_from_path, Coordinate};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

fn fixture_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy a fixture project into a fresh temp dir so outputs never land in the tree
fn project(name: &str) -> Result<TempDir> {
    let temp = TempDir::new()?;
    let root = fixture_dir(name);
    for entry in WalkDir::new(&root) {
        let entry = entry?;
        let target = temp.path().join(entry.path().strip_prefix(&root)?);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(temp)
}

fn output_dir(base: &Path) -> PathBuf {
    base.join("target").join("generated-sources").join("kubeless")
}

fn convert_kind(base: &Path, class: &str) -> Option<ErrorKind> {
    let settings = Settings::default();
    let converter = Converter::new(&settings).ok()?;
    converter
        .convert(&ConversionRequest::new(base, class))
        .err()
        .map(|e| e.kind())
}

#[test]
fn test_missing_class_is_input_missing() -> Result<()> {
    let project = project("input-java-class-test")?;
    assert_eq!(
        convert_kind(project.path(), "DoesNotExist"),
        Some(ErrorKind::InputMissing)
    );
    assert!(!project.path().join("target").exists());
    Ok(())
}

#[test]
fn test_private_and_protected_classes_write_nothing() -> Result<()> {
    let project = project("input-java-class-test")?;
    for class in ["PrivateAccessModifier", "ProtectedAccessModifier"] {
        assert_eq!(
            convert_kind(project.path(), class),
            Some(ErrorKind::NotPublic),
            "{}",
            class
        );
    }
    assert!(!project.path().join("target").exists());
    Ok(())
}

#[test]
fn test_other_input_failures() -> Result<()> {
    let project = project("input-java-class-test")?;
    assert_eq!(
        convert_kind(project.path(), "WrongPackage"),
        Some(ErrorKind::WrongPackage)
    );
    assert_eq!(
        convert_kind(project.path(), "Broken"),
        Some(ErrorKind::Unparseable)
    );
    assert_eq!(
        convert_kind(project.path(), "MismatchedName"),
        Some(ErrorKind::TypeNotFound)
    );
    assert!(!project.path().join("target").exists());
    Ok(())
}

#[test]
fn test_classes_without_handler() -> Result<()> {
    let project = project("function-signature-test")?;
    for n in 1..=7 {
        let class = format!("PublicWithoutKubelessFunction{}", n);
        assert_eq!(
            convert_kind(project.path(), &class),
            Some(ErrorKind::NoHandlerMethod),
            "{}",
            class
        );
    }
    assert!(!output_dir(project.path()).exists());
    Ok(())
}

#[test]
fn test_classes_with_handler() -> Result<()> {
    let project = project("function-signature-test")?;
    let settings = Settings::default();
    let converter = Converter::new(&settings)?;

    for n in 1..=5 {
        let class = format!("PublicWithKubelessFunction{}", n);
        let report = converter.convert(&ConversionRequest::new(project.path(), &class))?;
        assert_eq!(report.final_stage(), Some(Stage::Done));
        assert!(output_dir(project.path())
            .join(format!("{}.java", class))
            .is_file());
        assert!(output_dir(project.path()).join("pom.xml").is_file());
    }
    Ok(())
}

#[test]
fn test_missing_pom_is_input_missing() -> Result<()> {
    let project = project("input-pom-test")?;
    let settings = Settings::default();
    let converter = Converter::new(&settings)?;
    let err = converter
        .convert(&ConversionRequest::new(project.path(), "AppFunction"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InputMissing);
    assert!(err.to_string().starts_with("The input pom.xml file is not present in"));
    assert!(!project.path().join("target").exists());
    Ok(())
}

#[test]
fn test_output_class_and_pom() -> Result<()> {
    let project = project("output-java-class-pom-test")?;
    let settings = Settings::default();
    let converter = Converter::new(&settings)?;
    let report = converter.convert(&ConversionRequest::new(project.path(), "AppFunction"))?;

    assert!(report.directory_created);
    assert_eq!(report.stages, Stage::ALL.to_vec());
    assert_eq!(report.handler, "String hello(io.kubeless.Event, io.kubeless.Context)");
    assert_eq!(report.dependencies_skipped, 2);

    // class
    let out_dir = output_dir(project.path());
    let class_text = fs::read_to_string(out_dir.join("AppFunction.java"))?;
    assert!(class_text.contains("import java.util.Locale;\nimport io.kubeless.Event;\nimport io.kubeless.Context;\n"));
    let unit = SourceUnit::parse(class_text)?;
    assert_eq!(unit.package_name(), Some("io.kubeless"));
    validate_handler(&unit, "AppFunction", &HandlerContract::kubeless())?;

    // pom
    let pom = read_from_path(&out_dir.join("pom.xml"))?;
    assert_eq!(pom.artifact_id().as_deref(), Some("function"));
    assert_eq!(pom.name().as_deref(), Some("function"));
    assert_eq!(pom.parent(), Some(Coordinate::new("io.kubeless", "kubeless")));

    let deps = pom.dependencies();
    let ids: Vec<String> = deps.iter().map(|d| d.coordinate().to_string()).collect();
    assert_eq!(
        ids,
        vec![
            "io.kubeless:params",
            "org.apache.commons:commons-lang3",
            "com.fasterxml.jackson.core:jackson-databind",
        ]
    );
    assert!(deps[2].element().child("exclusions").is_some());
    assert_eq!(
        report.dependencies,
        deps[1..].iter().map(ToString::to_string).collect::<Vec<_>>()
    );
    Ok(())
}

#[test]
fn test_rename_and_custom_output_dir() -> Result<()> {
    let project = project("output-java-class-pom-test")?;
    let out = project.path().join("dist");
    let settings = Settings::default();
    let converter = Converter::new(&settings)?;

    let request = ConversionRequest::new(project.path(), "AppFunction")
        .with_output_name("Function")
        .with_output_dir(&out);
    let report = converter.convert(&request)?;

    assert_eq!(report.class_file, out.join("Function.java"));
    let unit = SourceUnit::parse(fs::read_to_string(&report.class_file)?)?;
    let decl = unit.find_class("Function").unwrap();
    assert_eq!(decl.constructors().len(), 2);
    assert!(decl.constructors().iter().all(|c| c.name() == "Function"));
    validate_handler(&unit, "Function", &HandlerContract::kubeless())?;
    assert!(!out.join("AppFunction.java").exists());
    Ok(())
}

#[test]
fn test_rerun_overwrites_outputs() -> Result<()> {
    let project = project("output-java-class-pom-test")?;
    let settings = Settings::default();
    let converter = Converter::new(&settings)?;
    let request = ConversionRequest::new(project.path(), "AppFunction");

    let first = converter.convert(&request)?;
    fs::write(&first.class_file, "stale")?;
    fs::write(&first.manifest_file, "<broken")?;

    let second = converter.convert(&request)?;
    assert!(!second.directory_created);
    assert!(fs::read_to_string(&second.class_file)?.contains("public class AppFunction"));
    assert!(read_from_path(&second.manifest_file).is_ok());
    Ok(())
}

#[test]
fn test_no_imports_setting() -> Result<()> {
    let project = project("output-java-class-pom-test")?;
    let mut settings = Settings::default();
    settings.source.inject_imports = false;
    let converter = Converter::new(&settings)?;

    let report = converter.convert(&ConversionRequest::new(project.path(), "AppFunction"))?;
    assert!(report.imports_added.is_empty());
    let original = fs::read_to_string(
        project
            .path()
            .join("src/main/java/io/kubeless/AppFunction.java"),
    )?;
    assert_eq!(fs::read_to_string(&report.class_file)?, original);
    Ok(())
}

#[test]
fn test_unparseable_project_pom_after_class_written() -> Result<()> {
    let project = project("output-java-class-pom-test")?;
    fs::write(project.path().join("pom.xml"), "<project><dependencies></project>")?;
    let settings = Settings::default();
    let converter = Converter::new(&settings)?;

    let err = converter
        .convert(&ConversionRequest::new(project.path(), "AppFunction"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ManifestUnparseable);
    assert!(err.to_string().contains("pom.xml"));
    // the class stage already ran; the pom was never written
    let out_dir = output_dir(project.path());
    assert!(out_dir.join("AppFunction.java").is_file());
    assert!(!out_dir.join("pom.xml").exists());
    Ok(())
}

#[test]
fn test_broken_custom_template_fails_before_any_stage() -> Result<()> {
    let project = project("output-java-class-pom-test")?;
    let template = project.path().join("template.xml");
    fs::write(&template, "<project>")?;
    let mut settings = Settings::default();
    settings.manifest.template = Some(template);

    let err = Converter::new(&settings).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ManifestUnparseable);
    assert_eq!(err.to_string(), "Unable to read pom template");
    Ok(())
}

#[test]
fn test_output_over_file_is_directory_failure() -> Result<()> {
    let project = project("output-java-class-pom-test")?;
    let blocker = project.path().join("blocked");
    fs::write(&blocker, "")?;
    let settings = Settings::default();
    let converter = Converter::new(&settings)?;

    let err = converter
        .convert(&ConversionRequest::new(project.path(), "AppFunction").with_output_dir(&blocker))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryCreateFailed);
    Ok(())
}

#[test]
fn test_class_write_failure_skips_manifest() -> Result<()> {
    let project = project("output-java-class-pom-test")?;
    let out = project.path().join("out");
    fs::create_dir_all(out.join("AppFunction.java"))?;
    let settings = Settings::default();
    let converter = Converter::new(&settings)?;

    let err = converter
        .convert(&ConversionRequest::new(project.path(), "AppFunction").with_output_dir(&out))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WriteFailed);
    assert!(out.join("AppFunction.java").is_dir());
    assert!(!out.join("pom.xml").exists());
    Ok(())
}

#[test]
fn test_manifest_write_failure_keeps_class() -> Result<()> {
    let project = project("output-java-class-pom-test")?;
    let out = project.path().join("out");
    fs::create_dir_all(out.join("pom.xml"))?;
    let settings = Settings::default();
    let converter = Converter::new(&settings)?;

    let err = converter
        .convert(&ConversionRequest::new(project.path(), "AppFunction").with_output_dir(&out))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ManifestWriteFailed);
    assert!(out.join("AppFunction.java").is_file());
    assert!(out.join("pom.xml").is_dir());
    assert_eq!(err.detailed().matches("IO error").count(), 1);
    Ok(())
}

#[test]
fn test_concurrent_conversions_with_disjoint_outputs() -> Result<()> {
    let project = project("function-signature-test")?;
    let settings = Settings::default();
    let converter = Converter::new(&settings)?;

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=5)
            .map(|n| {
                let converter = &converter;
                let base = project.path();
                scope.spawn(move || {
                    let class = format!("PublicWithKubelessFunction{}", n);
                    let request = ConversionRequest::new(base, &class)
                        .with_output_dir(base.join("out").join(&class));
                    converter.convert(&request).map(|r| r.class_file)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    for result in results {
        let class_file = result.unwrap()?;
        assert!(class_file.is_file());
        assert!(class_file.with_file_name("pom.xml").is_file());
    }
    Ok(())
}

#[test]
fn test_check_all_classes_in_parallel() -> Result<()> {
    let project = project("function-signature-test")?;
    let settings = Settings::default();
    let converter = Converter::new(&settings)?;
    let layout = converter.layout(project.path());

    let classes = discover_classes(&layout);
    assert_eq!(classes.len(), 12);

    let outcomes = check_classes(&converter, &layout, &classes);
    let passed: Vec<&str> = outcomes
        .iter()
        .filter(|o| o.passed())
        .map(|o| o.class_name.as_str())
        .collect();
    assert_eq!(
        passed,
        (1..=5)
            .map(|n| format!("PublicWithKubelessFunction{}", n))
            .collect::<Vec<_>>()
    );
    assert!(!project.path().join("target").exists());
    Ok(())
}
