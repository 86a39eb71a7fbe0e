#![allow(clippy::unwrap_used)]

use gradle_dsl::{Document, DslError, Value};
use rstest::rstest;

use crate::helpers::source_fixtures::APP_MODULE;
use crate::helpers::{apply_and_reload, parse_ok};

#[test]
fn test_read_app_module() {
    let doc = parse_ok(APP_MODULE);
    let android = doc.android();
    assert_eq!(android.compile_sdk_version(&doc).unwrap().as_deref(), Some("23"));
    assert_eq!(
        android.build_tools_version(&doc).unwrap().as_deref(),
        Some("23.0.1")
    );
    assert_eq!(android.flavor_dimensions(&doc).unwrap(), None);

    let config = android.default_config();
    assert_eq!(
        config.application_id(&doc).unwrap().as_deref(),
        Some("com.example.app")
    );
    assert_eq!(config.min_sdk_version(&doc).unwrap().as_deref(), Some("15"));
    assert_eq!(config.version_code(&doc).unwrap(), Some(1));
    assert_eq!(config.version_name(&doc).unwrap().as_deref(), Some("1.0"));
    let placeholders = config.manifest_placeholders(&doc).unwrap().unwrap();
    assert_eq!(placeholders.get("activityLabel"), Some(&Value::string("app")));

    let build_types: Vec<String> = android
        .build_types(&doc)
        .unwrap()
        .iter()
        .map(|b| b.name().to_string())
        .collect();
    assert_eq!(build_types, vec!["release", "debug"]);

    let release = android.build_type("release");
    assert_eq!(release.minify_enabled(&doc).unwrap(), Some(false));
    assert_eq!(
        release.proguard_files(&doc).unwrap(),
        Some(vec![
            "proguard-android.txt".to_string(),
            "proguard-rules.pro".to_string()
        ])
    );
    assert_eq!(android.build_type("debug").debuggable(&doc).unwrap(), Some(true));

    let flavors: Vec<String> = android
        .product_flavors(&doc)
        .unwrap()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    assert_eq!(flavors, vec!["free", "paid"]);
    assert_eq!(
        android.product_flavor("paid").application_id(&doc).unwrap().as_deref(),
        Some("com.example.app.paid")
    );
}

#[rstest]
#[case::version_code(
    "android.defaultConfig.versionCode 3\n",
    |doc: &mut Document| doc.android().default_config().set_version_code(doc, 4).unwrap(),
    "android.defaultConfig.versionCode 4\n"
)]
#[case::boolean(
    "android {\n  buildTypes {\n    release {\n      debuggable false\n    }\n  }\n}\n",
    |doc: &mut Document| doc.android().build_type("release").set_debuggable(doc, true).unwrap(),
    "android {\n  buildTypes {\n    release {\n      debuggable true\n    }\n  }\n}\n"
)]
#[case::assignment_keeps_form(
    "android {\n  resourcePrefix = 'lib_'\n}\n",
    |doc: &mut Document| doc.android().set_resource_prefix(doc, "app_").unwrap(),
    "android {\n  resourcePrefix = \"app_\"\n}\n"
)]
#[case::remove_scalar(
    "android {\n  compileSdkVersion 23\n  generatePureSplits true\n}\n",
    |doc: &mut Document| doc.android().remove_generate_pure_splits(doc).unwrap(),
    "android {\n  compileSdkVersion 23\n}\n"
)]
#[case::replace_list_entry(
    "android {\n  defaultConfig {\n    resConfigs 'en', 'fr'\n  }\n}\n",
    |doc: &mut Document| doc.android().default_config().replace_res_config(doc, "fr", "de").unwrap(),
    "android {\n  defaultConfig {\n    resConfigs \"en\", \"de\"\n  }\n}\n"
)]
#[case::remove_map_entry(
    "android.defaultConfig.manifestPlaceholders a: '1', b: '2'\n",
    |doc: &mut Document| doc.android().default_config().remove_manifest_placeholder(doc, "a").unwrap(),
    "android.defaultConfig.manifestPlaceholders b: \"2\"\n"
)]
fn test_model_write(
    #[case] source: &str,
    #[case] write: fn(&mut Document),
    #[case] expected: &str,
) {
    let mut doc = parse_ok(source);
    write(&mut doc);
    doc.apply_changes().unwrap();
    assert_eq!(doc.text(), expected);
}

#[test]
fn test_kind_mismatch_is_rejected_at_write_time() {
    let mut doc = parse_ok("android {\n  compileSdkVersion 23\n}\n");
    let compile_sdk = doc.property("android.compileSdkVersion").unwrap();
    assert!(matches!(
        compile_sdk.add_list_value(&mut doc, "x"),
        Err(DslError::KindMismatch { expected: "list", found: "scalar", .. })
    ));

    let dimensions = doc.property("android.flavorDimensions").unwrap();
    assert!(matches!(
        dimensions.set_value(&mut doc, Value::string("abi")),
        Err(DslError::KindMismatch { .. })
    ));
    assert!(doc.pending_ops().is_empty());
}

#[test]
fn test_replayed_writes_do_not_duplicate() {
    fn edit(doc: &mut Document) {
        let android = doc.android();
        android.add_flavor_dimension(doc, "abi").unwrap();
        android.set_compile_sdk_version(doc, "24").unwrap();
        android
            .default_config()
            .set_manifest_placeholder(doc, "label", "x")
            .unwrap();
        android.add_build_type(doc, "staging").unwrap();
        android.build_type("staging").set_debuggable(doc, true).unwrap();
    }

    let mut doc = parse_ok(APP_MODULE);
    edit(&mut doc);
    let (mut fresh, _) = apply_and_reload(&mut doc);
    let once = doc.text().to_string();

    edit(&mut fresh);
    let report = fresh.apply_changes().unwrap();
    assert!(report.is_clean());
    assert_eq!(fresh.text(), once);
    assert_eq!(
        fresh.android().flavor_dimensions(&fresh).unwrap(),
        Some(vec!["abi".to_string()])
    );
}

#[test]
fn test_entry_not_found_is_a_warning() {
    let mut doc = parse_ok("android {\n  flavorDimensions 'abi'\n  compileSdkVersion 23\n}\n");
    let android = doc.android();
    android.remove_flavor_dimension(&mut doc, "missing").unwrap();
    android.set_compile_sdk_version(&mut doc, "24").unwrap();
    let report = doc.apply_changes().unwrap();
    assert_eq!(report.applied_count, 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].op_index, 0);
    assert_eq!(
        doc.text(),
        "android {\n  flavorDimensions 'abi'\n  compileSdkVersion \"24\"\n}\n"
    );
}
