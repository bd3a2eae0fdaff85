//! End-to-end ordering scenarios across the engine and the wiring registry
//!
//! Each test drives the generic sort through a live `WiringRegistry`, the way
//! an extension registry orders contributions at runtime.

use std::collections::HashSet;

use extsort_core::{TopologicalSort, sort_by_dependencies, sort_by_requirements};
use extsort_wiring::{
    BundleId, BundleVersion, Extension, ExtensionsSort, Visibility, WiringRegistry, requirers_of,
};
use pretty_assertions::assert_eq;

const POINT: &str = "org.example.scenarios";

fn v1() -> BundleVersion {
    BundleVersion::new(1, 0, 0)
}

fn contributors(extensions: &[Extension]) -> Vec<&str> {
    extensions.iter().map(|e| e.contributor.as_str()).collect()
}

#[test]
fn test_chain_is_ordered_by_requirements() {
    // B requires A, C requires B.
    let registry = WiringRegistry::new();
    let a = registry.install("A", v1());
    let b = registry.install("B", v1());
    let c = registry.install("C", v1());
    registry.wire(a, b, Visibility::Private).unwrap();
    registry.wire(b, c, Visibility::Private).unwrap();

    let sorted = ExtensionsSort::new(&registry).order(vec![
        Extension::new(POINT, "C"),
        Extension::new(POINT, "A"),
        Extension::new(POINT, "B"),
    ]);
    assert_eq!(contributors(sorted.items()), vec!["A", "B", "C"]);
}

#[test]
fn test_chain_same_result_from_either_direction() {
    let requires = |key: &&str| match *key {
        "B" => vec!["A"],
        "C" => vec!["B"],
        _ => vec![],
    };
    let required_by = |key: &&str| match *key {
        "A" => vec!["B"],
        "B" => vec!["C"],
        _ => vec![],
    };

    let by_dependencies = sort_by_dependencies(vec!["C", "A", "B"], |s| Some(*s), requires);
    let by_requirements = sort_by_requirements(vec!["C", "A", "B"], |s| Some(*s), required_by);
    assert_eq!(by_dependencies.items(), by_requirements.items());
    assert_eq!(by_dependencies.into_items(), vec!["A", "B", "C"]);
}

#[test]
fn test_cycle_returns_every_item() {
    let registry = WiringRegistry::new();
    let x = registry.install("X", v1());
    let y = registry.install("Y", v1());
    registry.wire(x, y, Visibility::Private).unwrap();
    registry.wire(y, x, Visibility::Private).unwrap();

    let sorted = ExtensionsSort::new(&registry).order(vec![
        Extension::new(POINT, "X"),
        Extension::new(POINT, "Y"),
    ]);

    let emitted: HashSet<&str> = contributors(sorted.items()).into_iter().collect();
    assert_eq!(emitted, HashSet::from(["X", "Y"]));
    assert!(!sorted.is_complete());
}

#[test]
fn test_reexport_chain_requirers() {
    let registry = WiringRegistry::new();
    let p = registry.install("P", v1());
    let q = registry.install("Q", v1());
    let r = registry.install("R", v1());
    registry.wire(p, q, Visibility::Reexport).unwrap();
    registry.wire(q, r, Visibility::Private).unwrap();

    assert_eq!(requirers_of(&registry, p), HashSet::from([q, r]));
    assert_eq!(requirers_of(&registry, q), HashSet::from([r]));

    // R sees P through Q, so R's extension follows P's even with Q absent.
    let sorted = ExtensionsSort::new(&registry).order(vec![
        Extension::new(POINT, "R"),
        Extension::new(POINT, "P"),
    ]);
    assert_eq!(contributors(sorted.items()), vec!["P", "R"]);
}

#[test]
fn test_stale_wiring_has_no_requirers() {
    let registry = WiringRegistry::new();
    let p = registry.install("P", v1());
    let q = registry.install("Q", v1());
    registry.wire(p, q, Visibility::Reexport).unwrap();
    registry.mark_stale(p);

    assert!(requirers_of(&registry, p).is_empty());
}

#[test]
fn test_shared_keys_keep_relative_order() {
    let registry = WiringRegistry::new();
    let core = registry.install("core", v1());
    let ui = registry.install("ui", v1());
    registry.wire(core, ui, Visibility::Private).unwrap();

    let extensions = vec![
        Extension::new(POINT, "ui").with_id("ui.first"),
        Extension::new(POINT, "core").with_id("core.first"),
        Extension::new(POINT, "other").with_id("other"),
        Extension::new(POINT, "ui").with_id("ui.second"),
        Extension::new(POINT, "core").with_id("core.second"),
    ];
    let sorted = ExtensionsSort::new(&registry).order(extensions);
    let ids: Vec<String> = sorted.items().iter().map(Extension::display_name).collect();

    let position = |id: &str| ids.iter().position(|x| x == id).unwrap();
    assert!(position("ui.first") < position("ui.second"));
    assert!(position("core.first") < position("core.second"));
    assert!(position("core.second") < position("ui.first"));
    assert_eq!(ids.len(), 5);
}

#[test]
fn test_sort_sees_registry_updates_between_calls() {
    let registry = WiringRegistry::new();
    let core = registry.install("core", v1());
    let ui = registry.install("ui", v1());
    let sorter = ExtensionsSort::new(&registry);
    let extensions = || vec![Extension::new(POINT, "ui"), Extension::new(POINT, "core")];

    let before = sorter.sort(extensions()).unwrap();
    assert_eq!(contributors(before.items()), vec!["ui", "core"]);

    registry.wire(core, ui, Visibility::Private).unwrap();
    let after = sorter.sort(extensions()).unwrap();
    assert_eq!(contributors(after.items()), vec!["core", "ui"]);
    assert!(after.unresolved().iter().all(|id: &BundleId| registry.bundle(*id).is_some()));
}
