//! Dependency filtering and merging into the function template

use tracing::{debug, info};

use crate::manifest::Manifest;
use crate::types::{Dependency, ExclusionSet};

/// Scope of dependencies that never reach the generated pom
pub const TEST_SCOPE: &str = "test";

/// Dependencies of `source` that belong in a generated pom, in their
/// original order: test-scoped entries and excluded coordinates are dropped.
pub fn filter_dependencies(
    source: &[Dependency],
    exclusions: &ExclusionSet,
    test_scope: &str,
) -> Vec<Dependency> {
    source
        .iter()
        .filter(|dep| {
            if dep.scope() == Some(test_scope) {
                debug!("Skipping {} scoped dependency {}", test_scope, dep);
                return false;
            }
            if exclusions.contains(dep.coordinate()) {
                debug!("Skipping excluded dependency {}", dep);
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

/// Append the filtered `source` dependencies to `template`
pub fn merge(template: Manifest, source: &[Dependency], exclusions: &ExclusionSet) -> Manifest {
    merge_with_test_scope(template, source, exclusions, TEST_SCOPE)
}

/// [`merge`] with a configurable test scope literal
pub fn merge_with_test_scope(
    mut template: Manifest,
    source: &[Dependency],
    exclusions: &ExclusionSet,
    test_scope: &str,
) -> Manifest {
    let kept = filter_dependencies(source, exclusions, test_scope);
    info!(
        "Merging {} of {} project dependencies into template",
        kept.len(),
        source.len()
    );
    template.append_dependencies(kept);
    template
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::builtin_template;
    use crate::types::Coordinate;

    fn project_dependencies() -> Vec<Dependency> {
        vec![
            Dependency::new("org.apache.commons", "commons-lang3").with_version("3.9"),
            Dependency::new("de.inoio.kubeless", "jvm-runtime")
                .with_version("0.1.0")
                .with_scope("compile"),
            Dependency::new("org.junit.jupiter", "junit-jupiter").with_scope("test"),
            Dependency::new("com.google.code.gson", "gson").with_scope("compile"),
            Dependency::new("org.projectlombok", "lombok").with_scope("provided"),
        ]
    }

    fn ids(deps: &[Dependency]) -> Vec<String> {
        deps.iter().map(|d| d.coordinate().to_string()).collect()
    }

    #[test]
    fn test_filter_is_stable() {
        let kept = filter_dependencies(&project_dependencies(), &ExclusionSet::kubeless(), TEST_SCOPE);
        assert_eq!(
            ids(&kept),
            vec![
                "org.apache.commons:commons-lang3",
                "com.google.code.gson:gson",
                "org.projectlombok:lombok"
            ]
        );
    }

    #[test]
    fn test_filter_ignores_input_order() {
        let mut reversed = project_dependencies();
        reversed.reverse();
        let kept = filter_dependencies(&reversed, &ExclusionSet::kubeless(), TEST_SCOPE);
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().all(|d| d.scope() != Some("test")));
        assert!(!kept
            .iter()
            .any(|d| d.coordinate() == &Coordinate::new("de.inoio.kubeless", "jvm-runtime")));
    }

    #[test]
    fn test_exclusion_matches_on_coordinate_only() {
        let deps = vec![
            Dependency::new("de.inoio.kubeless", "jvm-runtime").with_version("9.9"),
            Dependency::new("de.inoio.kubeless", "other"),
        ];
        let kept = filter_dependencies(&deps, &ExclusionSet::kubeless(), TEST_SCOPE);
        assert_eq!(ids(&kept), vec!["de.inoio.kubeless:other"]);
    }

    #[test]
    fn test_merge_appends_after_template() {
        let template = builtin_template().unwrap();
        let merged = merge(template.clone(), &project_dependencies(), &ExclusionSet::kubeless());

        assert_eq!(
            ids(&merged.dependencies()),
            vec![
                "io.kubeless:params",
                "org.apache.commons:commons-lang3",
                "com.google.code.gson:gson",
                "org.projectlombok:lombok"
            ]
        );
        assert_eq!(merged.artifact_id(), template.artifact_id());
        assert_eq!(merged.name(), template.name());
        assert_eq!(merged.parent(), template.parent());
    }

    #[test]
    fn test_merge_is_deterministic() {
        let template = builtin_template().unwrap();
        let deps = project_dependencies();
        let first = merge(template.clone(), &deps, &ExclusionSet::kubeless());
        let second = merge(template, &deps, &ExclusionSet::kubeless());
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_test_scope() {
        let deps = vec![
            Dependency::new("a", "b").with_scope("it"),
            Dependency::new("c", "d").with_scope("test"),
        ];
        let kept = filter_dependencies(&deps, &ExclusionSet::default(), "it");
        assert_eq!(ids(&kept), vec!["c:d"]);
    }
}
