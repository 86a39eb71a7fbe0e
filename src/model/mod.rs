//! Property Model
//!
//! The typed read/write surface over the element tree:
//!
//! - [`schema`] - which properties are lists or maps, and their singular forms
//! - [`resolve`] - override and merge resolution across occurrences
//! - [`PropertyHandle`], [`BlockHandle`] - generation-checked views
//! - [`AndroidModel`] and friends - typed accessors for the `android` block
//! - [`PluginsModel`] - plugins applied by `apply plugin:`, `apply { }` and
//!   `plugins { }`
//!
//! Reads are pure: every call folds the parsed occurrences and then the
//! pending log, so a write is visible to the next read without touching text.

mod android;
mod handle;
pub mod plugins;
pub mod resolve;
pub mod schema;
mod value;

pub use android::{
    AndroidModel, BuildTypeModel, ProductFlavorModel, SigningConfigModel, SourceSetModel,
};
pub use handle::{BlockHandle, PropertyHandle};
pub use plugins::{PluginForm, PluginsModel};
pub use resolve::{Resolved, Role};
pub use schema::{PropertyKind, Schema, SchemaEntry};
pub use value::{FromValue, PropertyValue};
