//! Tests that load the shared platform fixtures from test-fixtures/

use std::path::PathBuf;

use extsort_wiring::{
    BundleLookup, Error, ExtensionsSort, Installed, PLATFORM_FILENAME, Platform, requirers_of,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

/// Path to the platform fixtures (tests/integration -> ../../test-fixtures).
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/platforms")
        .join(name)
}

fn install(name: &str) -> Installed {
    Platform::from_path(&fixture(name))
        .and_then(|platform| platform.install())
        .unwrap_or_else(|e| panic!("fixture {name} should install: {e}"))
}

fn ordered_ids(installed: &Installed, point: &str) -> Vec<String> {
    let sorter = ExtensionsSort::new(&installed.wiring);
    installed
        .extensions
        .sorted_for(point, &sorter)
        .unwrap()
        .items()
        .iter()
        .map(|extension| extension.display_name())
        .collect()
}

#[test]
fn test_workbench_fragments_order() {
    let installed = install("workbench.toml");
    assert_eq!(
        ordered_ids(&installed, "org.example.fragments"),
        vec![
            "runtime.fragment",
            "legacy.fragment",
            "workbench.fragment",
            "tools.fragment",
        ]
    );
}

#[test]
fn test_workbench_commands_order() {
    let installed = install("workbench.toml");
    assert_eq!(
        ordered_ids(&installed, "org.example.commands"),
        vec!["model.commands", "workbench.commands"]
    );
}

#[test]
fn test_workbench_optional_requirement_skipped() {
    let installed = install("workbench.toml");
    assert!(installed.wiring.bundle_for_name("org.example.telemetry").is_none());
    assert_eq!(installed.wiring.wires().len(), 4);
}

#[test]
fn test_workbench_runtime_requirers() {
    let installed = install("workbench.toml");
    let wiring = &installed.wiring;
    let runtime = wiring.bundle_for_name("org.example.runtime").unwrap();

    let mut names: Vec<String> = requirers_of(wiring, runtime)
        .into_iter()
        .filter_map(|id| wiring.bundle(id))
        .map(|bundle| bundle.symbolic_name)
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["org.example.legacy", "org.example.model", "org.example.workbench"]
    );
}

#[test]
fn test_cycle_fixture_is_reported() {
    let installed = install("cycle.toml");
    let sorter = ExtensionsSort::new(&installed.wiring);
    let sorted = installed.extensions.sorted_for("demo.point", &sorter).unwrap();

    assert_eq!(sorted.len(), 3);
    assert_eq!(sorted.unresolved().len(), 2);
    assert_eq!(sorted.items()[0].display_name(), "gamma.ext");
}

#[test]
fn test_unresolved_fixture_fails_to_install() {
    let platform = Platform::from_path(&fixture("unresolved.toml")).unwrap();
    let err = platform.install().unwrap_err();
    assert!(matches!(err, Error::UnresolvedRequirement { .. }));
}

#[test]
fn test_invalid_fixture_fails_to_load() {
    let err = Platform::from_path(&fixture("invalid-version.toml")).unwrap_err();
    assert!(matches!(err, Error::InvalidVersion { .. }));
}

#[test]
fn test_fixture_survives_rewrite() {
    let platform = Platform::from_path(&fixture("workbench.toml")).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join(PLATFORM_FILENAME);
    std::fs::write(&path, platform.to_toml().unwrap()).unwrap();

    let rewritten = Platform::from_path(&path).unwrap().install().unwrap();
    assert_eq!(
        ordered_ids(&rewritten, "org.example.fragments"),
        ordered_ids(&install("workbench.toml"), "org.example.fragments")
    );
}
