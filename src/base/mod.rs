//! Foundation types shared by every layer.
//!
//! - [`ScopePath`], [`PropertyPath`] - logical addresses of blocks and properties
//! - [`Position`], [`LineIndex`] - line/column conversion for diagnostics
//!
//! This module has NO dependencies on other crate modules.

mod path;
mod position;

pub use path::{PropertyPath, ScopePath};
pub use position::{LineIndex, Position};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
