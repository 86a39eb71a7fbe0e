#![allow(clippy::unwrap_used)]

use gradle_dsl::{Document, DslError};
use rstest::rstest;

use crate::helpers::source_fixtures::APP_MODULE;
use crate::helpers::{apply_and_reload, parse_ok};

const APPLICATION: &str = "com.android.application";
const LIBRARY: &str = "com.android.library";

const APPLY_BLOCK: &str =
    "apply {\n  plugin 'com.android.application'\n  plugin 'com.android.library'\n}\n";
const APPLY_BLOCK_REPEATED: &str = "apply {\n  plugin 'com.android.application'\n  plugin 'com.android.library'\n  plugin 'com.android.application'\n}\n";
const APPLY_STATEMENTS: &str =
    "apply plugin: 'com.android.application'\napply plugin: 'com.android.library'\n";
const APPLY_STATEMENTS_REPEATED: &str = "apply plugin: 'com.android.application'\napply plugin: 'com.android.library'\napply plugin: 'com.android.application'\n";
const PLUGINS_BLOCK: &str =
    "plugins {\n  id 'com.android.application'\n  id 'com.android.library'\n}\n";

fn applied(doc: &Document) -> Vec<String> {
    doc.plugins().applied(doc).unwrap()
}

#[rstest]
#[case::apply_block(APPLY_BLOCK)]
#[case::apply_block_repeated(APPLY_BLOCK_REPEATED)]
#[case::apply_statements(APPLY_STATEMENTS)]
#[case::apply_statements_repeated(APPLY_STATEMENTS_REPEATED)]
#[case::plugins_block(PLUGINS_BLOCK)]
fn test_applied_plugins(#[case] source: &str) {
    let doc = parse_ok(source);
    assert_eq!(applied(&doc), vec![APPLICATION, LIBRARY]);
}

#[test]
fn test_applied_plugins_in_app_module() {
    let doc = parse_ok(APP_MODULE);
    assert_eq!(applied(&doc), vec![APPLICATION]);
    assert!(doc.plugins().is_applied(&doc, APPLICATION).unwrap());
    assert!(!doc.plugins().is_applied(&doc, LIBRARY).unwrap());
}

#[rstest]
#[case::apply_block(APPLY_BLOCK)]
#[case::apply_block_repeated(APPLY_BLOCK_REPEATED)]
#[case::apply_statements(APPLY_STATEMENTS)]
#[case::apply_statements_repeated(APPLY_STATEMENTS_REPEATED)]
fn test_remove_and_reset_plugin(#[case] source: &str) {
    let mut doc = parse_ok(source);
    let plugins = doc.plugins();
    plugins.remove(&mut doc, APPLICATION).unwrap();
    assert_eq!(applied(&doc), vec![LIBRARY]);

    doc.reset_state();
    assert_eq!(applied(&doc), vec![APPLICATION, LIBRARY]);
    assert_eq!(doc.text(), source);
}

#[rstest]
#[case::apply_block(APPLY_BLOCK, "apply {\n  plugin 'com.android.library'\n}\n")]
#[case::apply_block_repeated(APPLY_BLOCK_REPEATED, "apply {\n  plugin 'com.android.library'\n}\n")]
#[case::apply_statements(APPLY_STATEMENTS, "apply plugin: 'com.android.library'\n")]
#[case::apply_statements_repeated(
    APPLY_STATEMENTS_REPEATED,
    "apply plugin: 'com.android.library'\n"
)]
#[case::plugins_block(PLUGINS_BLOCK, "plugins {\n  id 'com.android.library'\n}\n")]
fn test_remove_and_apply_plugin(#[case] source: &str, #[case] expected: &str) {
    let mut doc = parse_ok(source);
    let plugins = doc.plugins();
    plugins.remove(&mut doc, APPLICATION).unwrap();
    assert_eq!(applied(&doc), vec![LIBRARY]);

    let (fresh, _) = apply_and_reload(&mut doc);
    assert_eq!(doc.text(), expected);
    assert_eq!(applied(&doc), vec![LIBRARY]);
    assert_eq!(applied(&fresh), vec![LIBRARY]);
}

#[test]
fn test_removing_the_last_plugin_elides_its_block() {
    let mut doc = parse_ok("plugins {\n  id 'com.android.application'\n}\nandroid { }\n");
    let plugins = doc.plugins();
    plugins.remove(&mut doc, APPLICATION).unwrap();
    let (fresh, _) = apply_and_reload(&mut doc);
    assert_eq!(doc.text(), "android { }\n");
    assert!(applied(&fresh).is_empty());
}

#[test]
fn test_add_and_reset_plugin() {
    let mut doc = parse_ok("apply plugin: 'com.android.application'\n");
    let plugins = doc.plugins();
    plugins.apply(&mut doc, LIBRARY).unwrap();
    assert_eq!(applied(&doc), vec![APPLICATION, LIBRARY]);

    doc.reset_state();
    assert_eq!(applied(&doc), vec![APPLICATION]);
}

#[test]
fn test_add_and_apply_plugin() {
    let mut doc = parse_ok(APP_MODULE);
    let plugins = doc.plugins();
    plugins.apply(&mut doc, LIBRARY).unwrap();
    assert_eq!(applied(&doc), vec![APPLICATION, LIBRARY]);

    let (fresh, _) = apply_and_reload(&mut doc);
    assert!(doc.text().starts_with(
        "apply plugin: 'com.android.application'\napply plugin: \"com.android.library\"\n\nandroid {"
    ));
    assert_eq!(applied(&fresh), vec![APPLICATION, LIBRARY]);
}

#[rstest]
#[case::apply_statements(APPLY_STATEMENTS)]
#[case::plugins_block(PLUGINS_BLOCK)]
fn test_add_already_applied_plugin_changes_nothing(#[case] source: &str) {
    let mut doc = parse_ok(source);
    let plugins = doc.plugins();
    plugins.apply(&mut doc, APPLICATION).unwrap();
    assert_eq!(applied(&doc), vec![APPLICATION, LIBRARY]);

    let (fresh, report) = apply_and_reload(&mut doc);
    assert_eq!(report.applied_count, 1);
    assert_eq!(doc.text(), source);
    assert_eq!(applied(&fresh), vec![APPLICATION, LIBRARY]);
}

#[test]
fn test_plugins_handle_goes_stale_on_reparse() {
    let mut doc = parse_ok(APPLY_STATEMENTS);
    let plugins = doc.plugins();
    doc.reparse().unwrap();
    assert!(matches!(
        plugins.applied(&doc),
        Err(DslError::StaleHandle { .. })
    ));
    assert!(matches!(
        plugins.remove(&mut doc, LIBRARY),
        Err(DslError::StaleHandle { .. })
    ));
    assert!(doc.pending_ops().is_empty());
}
