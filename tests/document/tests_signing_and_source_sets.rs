#![allow(clippy::unwrap_used)]

use gradle_dsl::{Document, Value};

use crate::helpers::{apply_and_reload, parse_ok};

const SIGNING: &str = r#"android {
  signingConfigs {
    release {
      storeFile file("release.keystore")
      storePassword "password"
      storeType "type"
      keyAlias "myReleaseKey"
      keyPassword "releaseKeyPassword"
    }
  }
}
android.signingConfigs.debug.keyAlias 'androiddebugkey'
"#;

fn signing_names(doc: &Document) -> Vec<String> {
    doc.android()
        .signing_configs(doc)
        .unwrap()
        .iter()
        .map(|c| c.name().to_string())
        .collect()
}

fn source_set_names(doc: &Document) -> Vec<String> {
    doc.android()
        .source_sets(doc)
        .unwrap()
        .iter()
        .map(|s| s.name().to_string())
        .collect()
}

#[test]
fn test_read_signing_configs() {
    let doc = parse_ok(SIGNING);
    assert_eq!(signing_names(&doc), vec!["release", "debug"]);

    let release = doc.android().signing_config("release");
    assert_eq!(
        release.store_file(&doc).unwrap(),
        Some(Value::reference("file(\"release.keystore\")"))
    );
    assert_eq!(release.store_password(&doc).unwrap().as_deref(), Some("password"));
    assert_eq!(release.store_type(&doc).unwrap().as_deref(), Some("type"));
    assert_eq!(release.key_alias(&doc).unwrap().as_deref(), Some("myReleaseKey"));
    assert_eq!(
        release.key_password(&doc).unwrap().as_deref(),
        Some("releaseKeyPassword")
    );
    assert_eq!(
        doc.android().signing_config("debug").key_alias(&doc).unwrap().as_deref(),
        Some("androiddebugkey")
    );
}

#[test]
fn test_add_and_apply_signing_config() {
    let mut doc = parse_ok("android {\n  compileSdkVersion 23\n}\n");
    let android = doc.android();
    let config = android.add_signing_config(&mut doc, "config").unwrap();
    assert_eq!(signing_names(&doc), vec!["config"]);
    config.set_key_alias(&mut doc, "myKeyAlias").unwrap();
    config
        .set_store_file(&mut doc, Value::reference("file('debug.keystore')"))
        .unwrap();

    let (fresh, _) = apply_and_reload(&mut doc);
    assert_eq!(
        doc.text(),
        "android {\n  compileSdkVersion 23\n  signingConfigs {\n    config {\n      keyAlias \"myKeyAlias\"\n      storeFile file('debug.keystore')\n    }\n  }\n}\n"
    );
    assert_eq!(signing_names(&fresh), vec!["config"]);
    let config = fresh.android().signing_config("config");
    assert_eq!(config.key_alias(&fresh).unwrap().as_deref(), Some("myKeyAlias"));
    assert_eq!(
        config.store_file(&fresh).unwrap(),
        Some(Value::reference("file('debug.keystore')"))
    );
}

#[test]
fn test_remove_and_apply_signing_config() {
    let mut doc = parse_ok(SIGNING);
    let android = doc.android();
    android.remove_signing_config(&mut doc, "release").unwrap();
    assert_eq!(signing_names(&doc), vec!["debug"]);
    assert_eq!(android.signing_config("release").key_alias(&doc).unwrap(), None);

    let (fresh, _) = apply_and_reload(&mut doc);
    assert_eq!(
        doc.text(),
        "android.signingConfigs.debug.keyAlias 'androiddebugkey'\n"
    );
    assert_eq!(signing_names(&fresh), vec!["debug"]);
}

#[test]
fn test_reset_discards_added_signing_config() {
    let mut doc = parse_ok(SIGNING);
    let android = doc.android();
    let config = android.add_signing_config(&mut doc, "config").unwrap();
    config.set_key_alias(&mut doc, "myKeyAlias").unwrap();
    assert_eq!(signing_names(&doc), vec!["release", "debug", "config"]);

    doc.reset_state();
    assert_eq!(signing_names(&doc), vec!["release", "debug"]);
    assert!(!config.block().exists(&doc).unwrap());
    assert_eq!(doc.text(), SIGNING);
}

#[test]
fn test_read_source_sets() {
    let doc = parse_ok(
        "android {\n  sourceSets {\n    main {\n      root 'src/main'\n    }\n  }\n}\nandroid.sourceSets.test.root = 'src/test'\n",
    );
    assert_eq!(source_set_names(&doc), vec!["main", "test"]);
    let android = doc.android();
    assert_eq!(
        android.source_set("main").root(&doc).unwrap().as_deref(),
        Some("src/main")
    );
    assert_eq!(
        android.source_set("test").root(&doc).unwrap().as_deref(),
        Some("src/test")
    );
}

#[test]
fn test_empty_source_set_is_not_saved() {
    let mut doc = parse_ok("android {\n  compileSdkVersion 23\n}\n");
    let android = doc.android();
    android.add_source_set(&mut doc, "set").unwrap();
    assert_eq!(source_set_names(&doc), vec!["set"]);

    let (fresh, _) = apply_and_reload(&mut doc);
    assert_eq!(doc.text(), "android {\n  compileSdkVersion 23\n}\n");
    assert!(source_set_names(&fresh).is_empty());
}

#[test]
fn test_add_and_apply_source_set_root() {
    let mut doc = parse_ok("android {\n  compileSdkVersion 23\n}\n");
    let android = doc.android();
    let set = android.add_source_set(&mut doc, "set").unwrap();
    set.set_root(&mut doc, "source").unwrap();

    let (fresh, _) = apply_and_reload(&mut doc);
    assert_eq!(
        doc.text(),
        "android {\n  compileSdkVersion 23\n  sourceSets {\n    set {\n      root \"source\"\n    }\n  }\n}\n"
    );
    assert_eq!(source_set_names(&fresh), vec!["set"]);
    assert_eq!(
        fresh.android().source_set("set").root(&fresh).unwrap().as_deref(),
        Some("source")
    );
}

#[test]
fn test_remove_and_apply_source_set() {
    let mut doc = parse_ok(
        "android {\n  sourceSets {\n    set1 {\n      root 'a'\n    }\n    set2 {\n      root 'b'\n    }\n  }\n}\n",
    );
    let android = doc.android();
    android.remove_source_set(&mut doc, "set2").unwrap();
    assert_eq!(source_set_names(&doc), vec!["set1"]);

    let (fresh, _) = apply_and_reload(&mut doc);
    assert_eq!(
        doc.text(),
        "android {\n  sourceSets {\n    set1 {\n      root 'a'\n    }\n  }\n}\n"
    );
    assert_eq!(source_set_names(&fresh), vec!["set1"]);
}
