#![allow(clippy::unwrap_used)]

use gradle_dsl::{Document, DocumentState, DslError, PropertyValue, Value};
use rstest::rstest;

use crate::helpers::source_fixtures::APP_MODULE;
use crate::helpers::{apply_and_reload, parse_ok};

#[test]
fn test_build_tools_version_scenario() {
    let mut doc = parse_ok("android { buildToolsVersion \"23.0.0\" }\n");
    let android = doc.android();

    android.set_build_tools_version(&mut doc, "24.0.0").unwrap();
    assert_eq!(
        android.build_tools_version(&doc).unwrap().as_deref(),
        Some("24.0.0")
    );

    doc.reset_state();
    assert_eq!(
        android.build_tools_version(&doc).unwrap().as_deref(),
        Some("23.0.0")
    );

    android.set_build_tools_version(&mut doc, "24.0.0").unwrap();
    doc.apply_changes_and_reparse().unwrap();
    assert_eq!(doc.text(), "android { buildToolsVersion \"24.0.0\" }\n");

    let fresh = parse_ok(doc.text());
    assert_eq!(
        fresh.android().build_tools_version(&fresh).unwrap().as_deref(),
        Some("24.0.0")
    );
}

/// Snapshot of a handful of effective values used to compare states.
fn snapshot(doc: &Document) -> Vec<PropertyValue> {
    [
        "android.compileSdkVersion",
        "android.buildToolsVersion",
        "android.defaultConfig.versionCode",
        "android.defaultConfig.manifestPlaceholders",
        "android.buildTypes.release.proguardFiles",
        "android.buildTypes.debug.debuggable",
        "android.flavorDimensions",
    ]
    .iter()
    .map(|p| doc.property(p).unwrap().value(doc).unwrap())
    .collect()
}

#[rstest]
#[case::scalar_writes(|doc: &mut Document| {
    let android = doc.android();
    android.set_compile_sdk_version(doc, "24").unwrap();
    android.remove_build_tools_version(doc).unwrap();
})]
#[case::collection_writes(|doc: &mut Document| {
    let android = doc.android();
    android.add_flavor_dimension(doc, "abi").unwrap();
    let release = android.build_type("release");
    release.add_proguard_file(doc, "extra.pro").unwrap();
    release.remove_proguard_file(doc, "proguard-rules.pro").unwrap();
    android
        .default_config()
        .set_manifest_placeholder(doc, "activityLabel", "other")
        .unwrap();
})]
#[case::block_writes(|doc: &mut Document| {
    let android = doc.android();
    android.remove_build_type(doc, "debug").unwrap();
    android.remove_build_type(doc, "release").unwrap();
    android.block().remove(doc).unwrap();
})]
fn test_reset_restores_every_value(#[case] mutate: fn(&mut Document)) {
    let mut doc = parse_ok(APP_MODULE);
    let before = snapshot(&doc);
    mutate(&mut doc);
    assert_eq!(doc.state(), DocumentState::Dirty);
    assert_ne!(snapshot(&doc), before);

    doc.reset_state();
    assert_eq!(snapshot(&doc), before);
    assert_eq!(doc.state(), DocumentState::Clean);
    assert_eq!(doc.text(), APP_MODULE);
}

#[test]
fn test_reset_never_touches_text() {
    let mut doc = parse_ok(APP_MODULE);
    doc.android().set_resource_prefix(&mut doc, "lib_").unwrap();
    assert_eq!(doc.render(), APP_MODULE);
    doc.reset_state();
    assert_eq!(doc.render(), APP_MODULE);
}

#[test]
fn test_stale_after_reparse() {
    let mut doc = parse_ok(APP_MODULE);
    let handle = doc.property("android.compileSdkVersion").unwrap();
    let block = doc.block("android.defaultConfig");
    doc.reparse().unwrap();

    assert!(matches!(
        handle.value(&doc),
        Err(DslError::StaleHandle { expected: 0, found: 1 })
    ));
    assert!(matches!(
        handle.set_value(&mut doc, Value::number(24)),
        Err(DslError::StaleHandle { .. })
    ));
    assert!(matches!(block.exists(&doc), Err(DslError::StaleHandle { .. })));
    assert!(doc.pending_ops().is_empty());

    let fresh = doc.property("android.compileSdkVersion").unwrap();
    assert_eq!(fresh.get::<String>(&doc).unwrap().as_deref(), Some("23"));
}

#[test]
fn test_handle_from_another_document_is_stale() {
    let first = parse_ok(APP_MODULE);
    let mut second = parse_ok(APP_MODULE);
    let handle = first.property("android.compileSdkVersion").unwrap();

    assert!(matches!(
        handle.value(&second),
        Err(DslError::StaleHandle { .. })
    ));
    assert!(matches!(
        handle.delete(&mut second),
        Err(DslError::StaleHandle { .. })
    ));
}

#[test]
fn test_failed_parse_reads_missing() {
    let mut doc = Document::parse("android {\n  compileSdkVersion 23\n");
    assert_eq!(doc.state(), DocumentState::Failed);
    let error = doc.parse_error().unwrap();
    assert!(error.message.contains("unclosed"));

    let android = doc.android();
    assert_eq!(android.compile_sdk_version(&doc).unwrap(), None);
    assert!(!android.block().exists(&doc).unwrap());
    assert!(matches!(
        android.set_compile_sdk_version(&mut doc, "24"),
        Err(DslError::Parse(_))
    ));
    assert!(matches!(doc.apply_changes(), Err(DslError::Parse(_))));
    assert!(Document::try_parse("android {\n").is_err());
}

#[test]
fn test_external_rewrite_needs_reparse() {
    let mut doc = parse_ok("android { compileSdkVersion 23 }\n");
    doc.set_persisted_text("android { compileSdkVersion 25 }\n");
    let android = doc.android();
    assert_eq!(android.compile_sdk_version(&doc).unwrap().as_deref(), Some("23"));

    doc.reparse().unwrap();
    let android = doc.android();
    assert_eq!(android.compile_sdk_version(&doc).unwrap().as_deref(), Some("25"));
}

#[test]
fn test_apply_keeps_generation_until_reparse() {
    let mut doc = parse_ok(APP_MODULE);
    let android = doc.android();
    android.set_compile_sdk_version(&mut doc, "24").unwrap();
    let report = doc.apply_changes().unwrap();
    assert_eq!(report.applied_count, 1);
    assert_eq!(doc.state(), DocumentState::Applied);
    assert_eq!(android.compile_sdk_version(&doc).unwrap().as_deref(), Some("24"));

    let (fresh, _) = apply_and_reload(&mut doc);
    assert_eq!(
        fresh.android().compile_sdk_version(&fresh).unwrap().as_deref(),
        Some("24")
    );
}
