//! Error types for parsing, structural edits and model access.

use crate::base::{LineIndex, Position, TextRange};
use crate::parser::SyntaxError;
use thiserror::Error;

/// The document text could not be turned into a usable tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
    pub position: Position,
}

impl ParseError {
    pub fn from_syntax_error(error: &SyntaxError, text: &str) -> Self {
        Self {
            message: error.message.clone(),
            range: error.range,
            position: LineIndex::new(text).position(error.range.start()),
        }
    }
}

/// Errors surfaced by the document and its handles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DslError {
    /// The last parse failed; the document has no tree.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A handle was used against a document it does not belong to, or after
    /// the document was reparsed.
    #[error("Stale handle: issued for generation {expected}, document is at {found}")]
    StaleHandle { expected: u64, found: u64 },

    /// A collection operation was used on a property of another kind.
    #[error("Property {path} is a {found}, not a {expected}")]
    KindMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A structural edit primitive could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Generated text did not parse as exactly one well-formed statement.
    #[error("Invalid statement text: {0:?}")]
    InvalidStatement(String),

    /// Generated text did not parse as a value.
    #[error("Invalid value text: {0:?}")]
    InvalidValue(String),

    /// The node handed to a primitive has the wrong kind.
    #[error("Invalid {kind}: {message}")]
    InvalidTarget {
        kind: &'static str,
        message: String,
    },
}

impl EditError {
    pub fn invalid_target(kind: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            kind,
            message: message.into(),
        }
    }
}
