#![allow(clippy::unwrap_used)]

use gradle_dsl::{PropertyValue, ScopePath, Value};
use rstest::rstest;

use crate::helpers::source_fixtures::APP_MODULE;
use crate::helpers::{apply_and_reload, parse_ok};

#[test]
fn test_deleting_last_property_elides_block() {
    let mut doc = parse_ok(
        "android {\n  defaultConfig {\n    applicationId 'a'\n  }\n  compileSdkVersion 23\n}\n",
    );
    let config = doc.android().default_config();
    config.remove_application_id(&mut doc).unwrap();

    let (fresh, _) = apply_and_reload(&mut doc);
    assert_eq!(doc.text(), "android {\n  compileSdkVersion 23\n}\n");

    let config = fresh.android().default_config();
    assert!(!config.block().exists(&fresh).unwrap());
    assert_eq!(config.application_id(&fresh).unwrap(), None);
    let id = fresh.property("android.defaultConfig.applicationId").unwrap();
    assert_eq!(id.value(&fresh).unwrap(), PropertyValue::Missing);
}

#[test]
fn test_elision_walks_up_to_the_root() {
    let mut doc = parse_ok("buildscript { }\nandroid {\n  buildTypes {\n    release {\n      minifyEnabled true\n    }\n  }\n}\n");
    let release = doc.android().build_type("release");
    release.remove_minify_enabled(&mut doc).unwrap();
    doc.apply_changes().unwrap();
    assert_eq!(doc.text(), "buildscript { }\n");
}

#[test]
fn test_remove_block_covers_dotted_statements() {
    let mut doc = parse_ok(APP_MODULE);
    let android = doc.android();
    assert!(android.build_type("debug").block().exists(&doc).unwrap());

    android.remove_build_type(&mut doc, "debug").unwrap();
    assert!(!android.build_type("debug").block().exists(&doc).unwrap());
    assert_eq!(
        android.build_type("debug").debuggable(&doc).unwrap(),
        None
    );

    let (fresh, _) = apply_and_reload(&mut doc);
    assert!(!doc.text().contains("debuggable"));
    assert!(doc.text().contains("// keep this comment"));
    let names: Vec<String> = fresh
        .android()
        .build_types(&fresh)
        .unwrap()
        .iter()
        .map(|b| b.name().to_string())
        .collect();
    assert_eq!(names, vec!["release"]);
}

#[test]
fn test_add_block_without_properties_is_not_saved() {
    let mut doc = parse_ok("android {\n  compileSdkVersion 23\n}\n");
    let android = doc.android();
    let staging = android.add_build_type(&mut doc, "staging").unwrap();
    assert!(staging.block().exists(&doc).unwrap());
    assert!(!staging.block().exists_in_source(&doc).unwrap());

    doc.apply_changes().unwrap();
    assert_eq!(doc.text(), "android {\n  compileSdkVersion 23\n}\n");
}

#[test]
fn test_add_block_then_write_nests_inside_existing_blocks() {
    let mut doc = parse_ok("android {\n  buildTypes {\n  }\n}\n");
    let android = doc.android();
    let staging = android.add_build_type(&mut doc, "staging").unwrap();
    staging.set_minify_enabled(&mut doc, true).unwrap();
    staging.add_proguard_file(&mut doc, "staging.pro").unwrap();

    let (fresh, report) = apply_and_reload(&mut doc);
    assert_eq!(report.applied_count, 3);
    assert_eq!(fresh.element_tree().unwrap().blocks_at(&ScopePath::parse("android.buildTypes")).len(), 1);
    let staging = fresh.android().build_type("staging");
    assert!(staging.block().exists_in_source(&fresh).unwrap());
    assert_eq!(staging.minify_enabled(&fresh).unwrap(), Some(true));
    assert_eq!(
        staging.proguard_files(&fresh).unwrap(),
        Some(vec!["staging.pro".to_string()])
    );
}

#[test]
fn test_remove_product_flavor_keeps_siblings() {
    let mut doc = parse_ok(
        "android {\n  productFlavors {\n    free {\n      applicationId 'f'\n    }\n    paid {\n      applicationId 'p'\n    }\n  }\n}\n",
    );
    let android = doc.android();
    android.remove_product_flavor(&mut doc, "free").unwrap();
    doc.apply_changes().unwrap();
    assert_eq!(
        doc.text(),
        "android {\n  productFlavors {\n    paid {\n      applicationId 'p'\n    }\n  }\n}\n"
    );
}

#[test]
fn test_readding_a_removed_block_starts_empty() {
    let mut doc = parse_ok(APP_MODULE);
    let android = doc.android();
    android.remove_product_flavor(&mut doc, "free").unwrap();
    let free = android.add_product_flavor(&mut doc, "free").unwrap();
    assert!(free.block().exists(&doc).unwrap());
    assert_eq!(free.application_id(&doc).unwrap(), None);
}

#[test]
fn test_block_holding_only_comments_is_elided() {
    let mut doc = parse_ok("android {\n  // note\n  resourcePrefix 'a'\n}\n");
    let android = doc.android();
    android.remove_resource_prefix(&mut doc).unwrap();

    let (fresh, _) = apply_and_reload(&mut doc);
    assert_eq!(doc.text(), "");
    assert!(!fresh.android().block().exists(&fresh).unwrap());
    assert!(!fresh.android().block().exists_in_source(&fresh).unwrap());
}

#[rstest]
#[case::space("space buildtype", "\"space buildtype\"")]
#[case::leading_digit("2abc", "\"2abc\"")]
#[case::dotted("dotted.buildtype", "\"dotted.buildtype\"")]
#[case::operator("debug-custom", "\"debug-custom\"")]
#[case::unicode("ħƁǅẅΣЖא", "ħƁǅẅΣЖא")]
#[case::keyword("class", "class")]
fn test_block_names_need_not_be_identifiers(#[case] name: &str, #[case] spelled: &str) {
    let mut doc = parse_ok("android {\n}\n");
    let android = doc.android();
    let build_type = android.add_build_type(&mut doc, name).unwrap();
    build_type.set_application_id_suffix(&mut doc, "foo").unwrap();

    let (fresh, report) = apply_and_reload(&mut doc);
    assert_eq!(report.applied_count, 2);
    assert_eq!(
        doc.text(),
        format!(
            "android {{\n  buildTypes {{\n    {spelled} {{\n      applicationIdSuffix \"foo\"\n    }}\n  }}\n}}\n"
        )
    );

    let android = fresh.android();
    let names: Vec<String> = android
        .build_types(&fresh)
        .unwrap()
        .iter()
        .map(|b| b.name().to_string())
        .collect();
    assert_eq!(names, vec![name.to_string()]);
    assert_eq!(
        android.build_type(name).application_id_suffix(&fresh).unwrap().as_deref(),
        Some("foo")
    );
}

#[test]
fn test_quoted_block_names_are_read() {
    let doc = parse_ok(
        "android {\n  buildTypes {\n    'debug-custom' {\n      debuggable true\n    }\n  }\n}\n\
         android.buildTypes.'2abc'.minifyEnabled true\n",
    );
    let android = doc.android();
    let names: Vec<String> = android
        .build_types(&doc)
        .unwrap()
        .iter()
        .map(|b| b.name().to_string())
        .collect();
    assert_eq!(names, vec!["debug-custom", "2abc"]);
    assert_eq!(android.build_type("debug-custom").debuggable(&doc).unwrap(), Some(true));
    assert_eq!(android.build_type("2abc").minify_enabled(&doc).unwrap(), Some(true));
}

#[test]
fn test_dotted_map_entry_does_not_open_a_block() {
    let doc = parse_ok("android.defaultConfig.manifestPlaceholders.a \"1\"\n");
    let config = doc.android().default_config();
    assert!(config.block().exists(&doc).unwrap());
    assert!(config.block().children(&doc).unwrap().is_empty());
    let placeholders = config.block().child("manifestPlaceholders");
    assert!(!placeholders.exists(&doc).unwrap());
    assert!(!placeholders.exists_in_source(&doc).unwrap());
    assert_eq!(
        config.manifest_placeholders(&doc).unwrap().unwrap().get("a"),
        Some(&Value::string("1"))
    );
}
