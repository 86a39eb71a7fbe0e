//! # gradle-dsl
//!
//! Read/write model over Gradle-style build scripts. Properties are queried
//! and edited through handles; edits are buffered, then written back into
//! the text without disturbing anything they do not touch.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! document  → Document lifecycle: parse, read, write, apply, reset, reparse
//!   ↓
//! model     → Schema, override/merge resolution, handles, Android and plugin accessors
//!   ↓
//! edit      → Pending operation log and the reconciling apply engine
//!   ↓
//! dsl       → Element tree: statements classified into blocks and properties
//!   ↓
//! parser    → Logos lexer, rowan lossless CST, typed AST, structural edits
//!   ↓
//! base      → Primitives (ScopePath, PropertyPath, LineIndex, TextRange)
//! ```
//!
//! ## Example
//!
//! ```
//! use gradle_dsl::Document;
//!
//! let mut doc = Document::parse("android {\n  buildToolsVersion \"23.0.0\"\n}\n");
//! let android = doc.android();
//! android.set_build_tools_version(&mut doc, "24.0.0").unwrap();
//! doc.apply_changes().unwrap();
//! assert_eq!(doc.text(), "android {\n  buildToolsVersion \"24.0.0\"\n}\n");
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → dsl → edit → model → document)
// ============================================================================

/// Foundation types: dotted paths, line/column index
pub mod base;

/// Parser: Logos lexer, rowan CST, typed AST, structural edit primitives
pub mod parser;

/// Element tree: logical view of blocks and properties
pub mod dsl;

/// Pending operation log and apply engine
pub mod edit;

/// Property model: schema, resolution, handles, typed accessors
pub mod model;

/// Document lifecycle
pub mod document;

mod error;
mod options;

pub use base::{LineIndex, Position, PropertyPath, ScopePath, TextRange, TextSize};
pub use document::{Document, DocumentState};
pub use dsl::{ElementTree, Literal, Reference, Value};
pub use edit::{ApplyReport, ApplyWarning, PendingOp, WarningKind};
pub use error::{DslError, EditError, ParseError};
pub use model::{
    AndroidModel, BlockHandle, BuildTypeModel, FromValue, PluginForm, PluginsModel,
    ProductFlavorModel, PropertyHandle, PropertyKind, PropertyValue, Schema, SchemaEntry,
    SigningConfigModel, SourceSetModel,
};
pub use options::{DocumentOptions, QuoteStyle};
