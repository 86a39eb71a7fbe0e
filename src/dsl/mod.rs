//! Dsl Element Tree
//!
//! Classifies each statement of a parsed build script as a block, a
//! property or an unresolved statement:
//!
//! - `name { ... }` opens a block (dotted names open nested scopes)
//! - `name value`, `name(value)` and `name = value` are properties
//! - anything else is kept verbatim as unresolved
//!
//! Statements for the same property are all retained; choosing the
//! effective value is the job of [`crate::model`].

mod builder;
mod element;
mod tree;

pub use element::{
    BlockElement, DslElement, ElementId, Literal, PropertyElement, RawValue, Reference,
    StatementForm, UnresolvedElement, Value,
};
pub use tree::ElementTree;
