//! The Pending Operation Log.
//!
//! Writes are recorded here against logical paths and never touch the
//! element tree; reads fold the log over the parsed occurrences, and
//! [`apply`](super::apply) replays it into the syntax tree.

use crate::base::{PropertyPath, ScopePath};
use crate::dsl::Value;
use crate::model::PropertyValue;
use smol_str::SmolStr;
use std::fmt;

/// One buffered mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
    SetValue {
        path: PropertyPath,
        value: PropertyValue,
    },
    Delete {
        path: PropertyPath,
    },
    AddListValue {
        path: PropertyPath,
        value: Value,
    },
    RemoveListValue {
        path: PropertyPath,
        value: Value,
    },
    ReplaceListValue {
        path: PropertyPath,
        old: Value,
        new: Value,
    },
    SetMapEntry {
        path: PropertyPath,
        key: SmolStr,
        value: Value,
    },
    RemoveMapEntry {
        path: PropertyPath,
        key: SmolStr,
    },
    AddBlock {
        scope: ScopePath,
    },
    RemoveBlock {
        scope: ScopePath,
    },
    ApplyPlugin {
        name: SmolStr,
    },
    RemovePlugin {
        name: SmolStr,
    },
}

/// The address an operation targets
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpTarget<'a> {
    Property(&'a PropertyPath),
    Block(&'a ScopePath),
    Plugin(&'a SmolStr),
}

impl PendingOp {
    pub fn target(&self) -> OpTarget<'_> {
        match self {
            Self::SetValue { path, .. }
            | Self::Delete { path }
            | Self::AddListValue { path, .. }
            | Self::RemoveListValue { path, .. }
            | Self::ReplaceListValue { path, .. }
            | Self::SetMapEntry { path, .. }
            | Self::RemoveMapEntry { path, .. } => OpTarget::Property(path),
            Self::AddBlock { scope } | Self::RemoveBlock { scope } => OpTarget::Block(scope),
            Self::ApplyPlugin { name } | Self::RemovePlugin { name } => OpTarget::Plugin(name),
        }
    }

    pub fn property_path(&self) -> Option<&PropertyPath> {
        match self.target() {
            OpTarget::Property(path) => Some(path),
            OpTarget::Block(_) | OpTarget::Plugin(_) => None,
        }
    }

    /// Whether this op writes a value that makes `scope` exist.
    pub fn creates_scope(&self, scope: &ScopePath) -> bool {
        match self {
            Self::AddBlock { scope: added } => added.starts_with(scope),
            Self::SetValue { path, .. }
            | Self::AddListValue { path, .. }
            | Self::ReplaceListValue { path, .. }
            | Self::SetMapEntry { path, .. } => path.scope.starts_with(scope),
            _ => false,
        }
    }

    /// Whether this op discards everything at or below `scope`.
    pub fn removes_scope(&self, scope: &ScopePath) -> bool {
        matches!(self, Self::RemoveBlock { scope: removed } if scope.starts_with(removed))
    }

    /// Fold this op over the value it targets.
    ///
    /// A collection emptied by removals becomes missing, the same as a
    /// property whose last statement was deleted. Adding a list entry that is
    /// already present changes nothing, so a replayed log does not duplicate
    /// entries.
    pub fn fold(&self, value: PropertyValue) -> PropertyValue {
        match self {
            Self::SetValue { value: new, .. } => new.clone(),
            Self::Delete { .. } => PropertyValue::Missing,
            Self::AddListValue { value: new, .. } => match value {
                PropertyValue::Missing => PropertyValue::List(vec![new.clone()]),
                PropertyValue::Scalar(old) if &old == new => PropertyValue::List(vec![old]),
                PropertyValue::Scalar(old) => PropertyValue::List(vec![old, new.clone()]),
                PropertyValue::List(values) if values.contains(new) => PropertyValue::List(values),
                PropertyValue::List(mut values) => {
                    values.push(new.clone());
                    PropertyValue::List(values)
                }
                map @ PropertyValue::Map(_) => map,
            },
            Self::RemoveListValue { value: old, .. } => match value {
                PropertyValue::List(mut values) => {
                    if let Some(index) = values.iter().position(|v| v == old) {
                        values.remove(index);
                    }
                    if values.is_empty() {
                        PropertyValue::Missing
                    } else {
                        PropertyValue::List(values)
                    }
                }
                PropertyValue::Scalar(current) if &current == old => PropertyValue::Missing,
                other => other,
            },
            Self::ReplaceListValue { old, new, .. } => match value {
                PropertyValue::List(mut values) => {
                    if let Some(slot) = values.iter_mut().find(|v| *v == old) {
                        *slot = new.clone();
                    }
                    PropertyValue::List(values)
                }
                PropertyValue::Scalar(current) if &current == old => {
                    PropertyValue::List(vec![new.clone()])
                }
                other => other,
            },
            Self::SetMapEntry { key, value: new, .. } => match value {
                PropertyValue::Map(mut entries) => {
                    entries.insert(key.clone(), new.clone());
                    PropertyValue::Map(entries)
                }
                PropertyValue::Missing => {
                    PropertyValue::Map([(key.clone(), new.clone())].into_iter().collect())
                }
                other => other,
            },
            Self::RemoveMapEntry { key, .. } => match value {
                PropertyValue::Map(mut entries) => {
                    entries.shift_remove(key);
                    if entries.is_empty() {
                        PropertyValue::Missing
                    } else {
                        PropertyValue::Map(entries)
                    }
                }
                other => other,
            },
            Self::AddBlock { .. }
            | Self::RemoveBlock { .. }
            | Self::ApplyPlugin { .. }
            | Self::RemovePlugin { .. } => value,
        }
    }
}

impl fmt::Display for OpTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(path) => write!(f, "{path}"),
            Self::Block(scope) => write!(f, "{scope}"),
            Self::Plugin(name) => write!(f, "plugin {name}"),
        }
    }
}

/// Ordered record of pending mutations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationLog {
    ops: Vec<PendingOp>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: PendingOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[PendingOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}
