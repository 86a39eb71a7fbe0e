//! Rowan-based lossless parser for build scripts
//!
//! This module provides a lossless parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! Every byte of the input, trivia included, is kept in the tree, so
//! [`render`] of an unedited tree returns the input unchanged.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//!     ↓
//! edit → new GreenNode roots sharing untouched subtrees
//! ```

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
pub mod edit;
mod lexer;
mod syntax_kind;

pub use ast::AstNode;
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{GradleLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};

/// Serialize a tree back to text.
pub fn render(root: &SyntaxNode) -> String {
    root.to_string()
}
