#![allow(clippy::unwrap_used)]

use gradle_dsl::{PropertyValue, Value};
use rstest::rstest;

use crate::helpers::{apply_and_reload, parse_ok};

#[rstest]
#[case::block_then_dotted_then_assignment(
    "android {\n  compileSdkVersion 21\n}\nandroid.compileSdkVersion 22\nandroid.compileSdkVersion = 23\n"
)]
#[case::assignment_then_block_then_dotted(
    "android.compileSdkVersion = 21\nandroid {\n  compileSdkVersion 22\n}\nandroid.compileSdkVersion 23\n"
)]
#[case::dotted_then_assignment_then_call(
    "android.compileSdkVersion 21\nandroid.compileSdkVersion = 22\nandroid {\n  compileSdkVersion(23)\n}\n"
)]
#[case::reopened_block(
    "android {\n  compileSdkVersion 21\n}\nandroid {\n  compileSdkVersion = 22\n}\nandroid {\n  compileSdkVersion 23\n}\n"
)]
fn test_last_scalar_statement_wins(#[case] source: &str) {
    let doc = parse_ok(source);
    let android = doc.android();
    assert_eq!(android.compile_sdk_version(&doc).unwrap().as_deref(), Some("23"));
}

#[rstest]
#[case::plural_forms("resConfigs 'a', 'b'\n    resConfigs = ['c']\n    resConfigs 'd'")]
#[case::singular_append("resConfigs 'a', 'b'\n    resConfigs = ['c']\n    resConfig 'd'")]
#[case::call_forms("resConfigs('a', 'b')\n    resConfigs = ['c']\n    resConfigs('d')")]
fn test_list_assignment_clears_earlier_entries(#[case] statements: &str) {
    let source = format!("android {{\n  defaultConfig {{\n    {statements}\n  }}\n}}\n");
    let doc = parse_ok(&source);
    let config = doc.android().default_config();
    assert_eq!(
        config.res_configs(&doc).unwrap(),
        Some(vec!["c".to_string(), "d".to_string()])
    );
}

#[test]
fn test_list_accumulates_across_spellings() {
    let doc = parse_ok(
        "android.defaultConfig.proguardFiles 'a'\nandroid {\n  defaultConfig {\n    proguardFile 'b'\n    proguardFiles 'c', 'd'\n  }\n}\n",
    );
    let files = doc.android().default_config().proguard_files(&doc).unwrap();
    assert_eq!(
        files,
        Some(vec!["a".into(), "b".into(), "c".into(), "d".into()])
    );
}

#[test]
fn test_map_key_shadow() {
    let doc = parse_ok(
        "android {\n  defaultConfig {\n    manifestPlaceholders a: \"1\"\n    manifestPlaceholders a: \"2\", b: \"3\"\n  }\n}\n",
    );
    let placeholders = doc
        .android()
        .default_config()
        .manifest_placeholders(&doc)
        .unwrap()
        .unwrap();
    let entries: Vec<(&str, String)> = placeholders
        .iter()
        .map(|(k, v)| (k.as_str(), v.to_string()))
        .collect();
    assert_eq!(
        entries,
        vec![("a", "2".to_string()), ("b", "3".to_string())]
    );
}

#[test]
fn test_map_merges_dotted_and_singular_entries() {
    let doc = parse_ok(
        "android.defaultConfig {\n  testInstrumentationRunnerArguments size: 'small'\n  testInstrumentationRunnerArgument 'clearPackageData', 'true'\n}\nandroid.defaultConfig.testInstrumentationRunnerArguments.size = 'large'\n",
    );
    let arguments = doc
        .android()
        .default_config()
        .test_instrumentation_runner_arguments(&doc)
        .unwrap()
        .unwrap();
    assert_eq!(arguments.get("size"), Some(&Value::string("large")));
    assert_eq!(arguments.get("clearPackageData"), Some(&Value::string("true")));
    assert_eq!(arguments.len(), 2);
}

#[test]
fn test_missing_is_not_empty() {
    let doc = parse_ok("android {\n  flavorDimensions = []\n}\n");
    let android = doc.android();
    assert_eq!(android.flavor_dimensions(&doc).unwrap(), Some(Vec::new()));
    let missing = doc.property("android.resourcePrefix").unwrap();
    assert_eq!(missing.value(&doc).unwrap(), PropertyValue::Missing);
    assert!(!missing.exists(&doc).unwrap());
    assert_eq!(android.default_config().res_configs(&doc).unwrap(), None);
}

#[test]
fn test_pending_writes_are_read_back() {
    let mut doc = parse_ok("android {\n  flavorDimensions \"abi\", \"version\"\n}\n");
    let android = doc.android();
    android.remove_flavor_dimension(&mut doc, "version").unwrap();
    android.add_flavor_dimension(&mut doc, "xyz").unwrap();
    assert_eq!(
        android.flavor_dimensions(&doc).unwrap(),
        Some(vec!["abi".to_string(), "xyz".to_string()])
    );

    let (fresh, report) = apply_and_reload(&mut doc);
    assert_eq!(report.applied_count, 2);
    assert_eq!(doc.text(), "android {\n  flavorDimensions \"abi\", \"xyz\"\n}\n");
    assert_eq!(
        fresh.android().flavor_dimensions(&fresh).unwrap(),
        Some(vec!["abi".to_string(), "xyz".to_string()])
    );
}

#[test]
fn test_unresolved_statements_are_preserved() {
    let source = "android {\n  = 3\n  compileSdkVersion 23\n}\n";
    let mut doc = parse_ok(source);
    assert_eq!(doc.element_tree().unwrap().unresolved().len(), 1);
    let android = doc.android();
    assert_eq!(android.compile_sdk_version(&doc).unwrap().as_deref(), Some("23"));

    android.set_compile_sdk_version(&mut doc, "24").unwrap();
    doc.apply_changes().unwrap();
    assert_eq!(doc.text(), "android {\n  = 3\n  compileSdkVersion \"24\"\n}\n");
}

#[test]
fn test_typed_getter_on_wrong_shape_is_none() {
    let doc = parse_ok("android {\n  compileSdkVersion 'android-N'\n  publishNonDefault 'yes'\n}\n");
    let android = doc.android();
    assert_eq!(android.publish_non_default(&doc).unwrap(), None);
    assert_eq!(
        android.compile_sdk_version(&doc).unwrap().as_deref(),
        Some("android-N")
    );
    let code = doc.property("android.compileSdkVersion").unwrap();
    assert_eq!(code.get::<i64>(&doc).unwrap(), None);
}
