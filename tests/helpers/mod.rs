//! Shared fixtures and helpers for document tests.

#![allow(dead_code)]

pub mod source_fixtures;

use gradle_dsl::{ApplyReport, Document};

/// Apply pending changes and return a fresh document parsed from the result.
pub fn apply_and_reload(doc: &mut Document) -> (Document, ApplyReport) {
    let report = doc
        .apply_changes()
        .unwrap_or_else(|e| panic!("apply failed: {e}"));
    assert!(
        report.is_clean(),
        "unexpected apply warnings:\n{}",
        report
            .warnings
            .iter()
            .map(|w| format!("  {w}"))
            .collect::<Vec<_>>()
            .join("\n")
    );
    (Document::parse(doc.text()), report)
}

/// Parse `text`, failing the test on a fatal syntax error.
pub fn parse_ok(text: &str) -> Document {
    Document::try_parse(text).unwrap_or_else(|e| panic!("failed to parse {text:?}: {e}"))
}
