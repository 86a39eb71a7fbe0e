#![allow(clippy::unwrap_used)]

use gradle_dsl::Document;
use gradle_dsl::parser::{parse, render};
use rstest::rstest;

use crate::helpers::source_fixtures::{APP_MODULE, WITH_UNRESOLVED};
use crate::helpers::{apply_and_reload, parse_ok};

#[rstest]
#[case::app_module(APP_MODULE)]
#[case::unresolved(WITH_UNRESOLVED)]
#[case::empty("")]
#[case::no_trailing_newline("android { compileSdkVersion 23 }")]
#[case::crlf("android {\r\n  compileSdkVersion 23\r\n}\r\n")]
#[case::tabs_and_semicolons("android {\n\tcompileSdkVersion 23; buildToolsVersion '23'\n}\n")]
#[case::block_comment("/* header\n * text */\nandroid { }\n")]
#[case::unclosed_brace("android {\n  compileSdkVersion 23\n")]
#[case::stray_brace("}\nandroid { }\n")]
#[case::garbage("@@ ## !!\n")]
fn test_render_parse_is_identity(#[case] source: &str) {
    assert_eq!(render(&parse(source).syntax()), source);
}

#[test]
fn test_untouched_regions_survive_apply() {
    let mut doc = parse_ok(APP_MODULE);
    let android = doc.android();
    android.set_compile_sdk_version(&mut doc, "24").unwrap();
    doc.apply_changes().unwrap();
    let expected = APP_MODULE.replace("compileSdkVersion 23", "compileSdkVersion \"24\"");
    assert_eq!(doc.text(), expected);
}

#[test]
fn test_applied_tree_matches_reparse() {
    let mut doc = parse_ok(APP_MODULE);
    let android = doc.android();
    android.add_flavor_dimension(&mut doc, "abi").unwrap();
    android.build_type("release").add_proguard_file(&mut doc, "extra.pro").unwrap();
    android.remove_product_flavor(&mut doc, "free").unwrap();

    let (fresh, _) = apply_and_reload(&mut doc);
    let applied = doc.element_tree().unwrap();
    let reparsed = fresh.element_tree().unwrap();
    assert_eq!(applied.len(), reparsed.len());
    assert_eq!(doc.render(), fresh.render());

    let kinds = |doc: &Document| -> Vec<String> {
        doc.element_tree()
            .unwrap()
            .iter()
            .map(|(_, element)| format!("{:?}", element.syntax().kind()))
            .collect()
    };
    assert_eq!(kinds(&doc), kinds(&fresh));
}

#[test]
fn test_generated_quotes_follow_options() {
    use gradle_dsl::{DocumentOptions, QuoteStyle};

    let options = DocumentOptions {
        tab_size: 4,
        insert_spaces: true,
        quote_style: QuoteStyle::Single,
    };
    let mut doc = Document::parse_with_options("", options);
    let android = doc.android();
    android.default_config().set_application_id(&mut doc, "com.example").unwrap();
    doc.apply_changes().unwrap();
    assert_eq!(
        doc.text(),
        "android {\n    defaultConfig {\n        applicationId 'com.example'\n    }\n}\n"
    );
}
