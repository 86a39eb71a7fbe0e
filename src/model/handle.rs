//! Handles: owned views of a property or block of one document generation.
//!
//! A handle stores no data. Every read resolves against the document it is
//! given, and every write is appended to that document's pending log. Using
//! a handle with another document, or after a reparse, fails with
//! [`DslError::StaleHandle`].

use super::schema::PropertyKind;
use super::value::{FromValue, PropertyValue};
use crate::base::{PropertyPath, ScopePath};
use crate::document::Document;
use crate::dsl::Value;
use crate::edit::PendingOp;
use crate::error::DslError;
use indexmap::IndexMap;
use smol_str::SmolStr;
use uuid::Uuid;

/// View of one logical property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyHandle {
    document: Uuid,
    generation: u64,
    path: PropertyPath,
}

impl PropertyHandle {
    pub(crate) fn new(document: Uuid, generation: u64, path: PropertyPath) -> Self {
        Self {
            document,
            generation,
            path,
        }
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn name(&self) -> &SmolStr {
        &self.path.name
    }

    /// Effective value, pending writes included.
    pub fn value(&self, doc: &Document) -> Result<PropertyValue, DslError> {
        doc.check_handle(self.document, self.generation)?;
        Ok(doc.resolve_property(&self.path))
    }

    pub fn exists(&self, doc: &Document) -> Result<bool, DslError> {
        Ok(!self.value(doc)?.is_missing())
    }

    /// Scalar value converted to `T`; `None` when missing or not convertible.
    pub fn get<T: FromValue>(&self, doc: &Document) -> Result<Option<T>, DslError> {
        Ok(self.value(doc)?.as_scalar().and_then(T::from_value))
    }

    /// List entries converted to `T`, skipping entries that do not convert.
    pub fn list<T: FromValue>(&self, doc: &Document) -> Result<Option<Vec<T>>, DslError> {
        Ok(self
            .value(doc)?
            .as_list()
            .map(|values| values.iter().filter_map(T::from_value).collect()))
    }

    /// Map entries converted to `T`, skipping entries that do not convert.
    pub fn map<T: FromValue>(
        &self,
        doc: &Document,
    ) -> Result<Option<IndexMap<SmolStr, T>>, DslError> {
        Ok(self.value(doc)?.as_map().map(|entries| {
            entries
                .iter()
                .filter_map(|(k, v)| Some((k.clone(), T::from_value(v)?)))
                .collect()
        }))
    }

    /// Replace the whole value. Setting [`PropertyValue::Missing`] deletes.
    pub fn set_value(
        &self,
        doc: &mut Document,
        value: impl Into<PropertyValue>,
    ) -> Result<(), DslError> {
        doc.check_handle(self.document, self.generation)?;
        let value = value.into();
        if let (Some(registered), Some(given)) = (doc.schema().kind_of(&self.path), value.kind())
        {
            if registered.name() != given.name() {
                return Err(self.mismatch(registered.name(), given.name()));
            }
        }
        let op = match value {
            PropertyValue::Missing => PendingOp::Delete {
                path: self.path.clone(),
            },
            value => PendingOp::SetValue {
                path: self.path.clone(),
                value,
            },
        };
        doc.push_op(op)
    }

    /// Remove every statement of the property.
    pub fn delete(&self, doc: &mut Document) -> Result<(), DslError> {
        doc.check_handle(self.document, self.generation)?;
        doc.push_op(PendingOp::Delete {
            path: self.path.clone(),
        })
    }

    pub fn add_list_value(
        &self,
        doc: &mut Document,
        value: impl Into<Value>,
    ) -> Result<(), DslError> {
        self.expect_kind(doc, PropertyKind::LIST)?;
        doc.push_op(PendingOp::AddListValue {
            path: self.path.clone(),
            value: value.into(),
        })
    }

    pub fn remove_list_value(
        &self,
        doc: &mut Document,
        value: impl Into<Value>,
    ) -> Result<(), DslError> {
        self.expect_kind(doc, PropertyKind::LIST)?;
        doc.push_op(PendingOp::RemoveListValue {
            path: self.path.clone(),
            value: value.into(),
        })
    }

    pub fn replace_list_value(
        &self,
        doc: &mut Document,
        old: impl Into<Value>,
        new: impl Into<Value>,
    ) -> Result<(), DslError> {
        self.expect_kind(doc, PropertyKind::LIST)?;
        doc.push_op(PendingOp::ReplaceListValue {
            path: self.path.clone(),
            old: old.into(),
            new: new.into(),
        })
    }

    pub fn set_map_entry(
        &self,
        doc: &mut Document,
        key: impl Into<SmolStr>,
        value: impl Into<Value>,
    ) -> Result<(), DslError> {
        self.expect_kind(doc, PropertyKind::MAP)?;
        doc.push_op(PendingOp::SetMapEntry {
            path: self.path.clone(),
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn remove_map_entry(
        &self,
        doc: &mut Document,
        key: impl Into<SmolStr>,
    ) -> Result<(), DslError> {
        self.expect_kind(doc, PropertyKind::MAP)?;
        doc.push_op(PendingOp::RemoveMapEntry {
            path: self.path.clone(),
            key: key.into(),
        })
    }

    /// Collection ops need the registered kind, or else the current value,
    /// to agree with them. A missing unregistered property takes any kind.
    fn expect_kind(&self, doc: &Document, expected: PropertyKind) -> Result<(), DslError> {
        doc.check_handle(self.document, self.generation)?;
        let found = doc
            .schema()
            .kind_of(&self.path)
            .or_else(|| doc.resolve_property(&self.path).kind());
        match found {
            Some(kind) if kind.name() != expected.name() => {
                Err(self.mismatch(expected.name(), kind.name()))
            }
            _ => Ok(()),
        }
    }

    fn mismatch(&self, expected: &'static str, found: &'static str) -> DslError {
        DslError::KindMismatch {
            path: self.path.to_string(),
            expected,
            found,
        }
    }
}

/// View of one logical block
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockHandle {
    document: Uuid,
    generation: u64,
    scope: ScopePath,
}

impl BlockHandle {
    pub(crate) fn new(document: Uuid, generation: u64, scope: ScopePath) -> Self {
        Self {
            document,
            generation,
            scope,
        }
    }

    pub fn scope(&self) -> &ScopePath {
        &self.scope
    }

    pub(crate) fn check(&self, doc: &Document) -> Result<(), DslError> {
        doc.check_handle(self.document, self.generation)
    }

    /// The block's own name; `None` for the document root.
    pub fn name(&self) -> Option<&SmolStr> {
        self.scope.name()
    }

    pub fn property(&self, name: impl Into<SmolStr>) -> PropertyHandle {
        PropertyHandle::new(
            self.document,
            self.generation,
            PropertyPath::new(self.scope.clone(), name),
        )
    }

    pub fn child(&self, name: impl Into<SmolStr>) -> BlockHandle {
        BlockHandle::new(self.document, self.generation, self.scope.child(name))
    }

    /// Child blocks in first-appearance order, pending writes included.
    pub fn children(&self, doc: &Document) -> Result<Vec<BlockHandle>, DslError> {
        doc.check_handle(self.document, self.generation)?;
        Ok(doc
            .child_blocks(&self.scope)
            .into_iter()
            .map(|name| self.child(name))
            .collect())
    }

    /// Whether the block exists, pending writes included.
    pub fn exists(&self, doc: &Document) -> Result<bool, DslError> {
        doc.check_handle(self.document, self.generation)?;
        Ok(doc.block_exists(&self.scope))
    }

    /// Whether the parsed text spells out this block, ignoring pending writes.
    pub fn exists_in_source(&self, doc: &Document) -> Result<bool, DslError> {
        doc.check_handle(self.document, self.generation)?;
        Ok(doc.block_in_source(&self.scope))
    }

    pub fn add_block(
        &self,
        doc: &mut Document,
        name: impl Into<SmolStr>,
    ) -> Result<BlockHandle, DslError> {
        doc.check_handle(self.document, self.generation)?;
        let child = self.child(name);
        doc.push_op(PendingOp::AddBlock {
            scope: child.scope.clone(),
        })?;
        Ok(child)
    }

    pub fn remove_block(&self, doc: &mut Document, name: impl Into<SmolStr>) -> Result<(), DslError> {
        self.child(name).remove(doc)
    }

    /// Remove this block and everything below it, however it is spelled.
    pub fn remove(&self, doc: &mut Document) -> Result<(), DslError> {
        doc.check_handle(self.document, self.generation)?;
        doc.push_op(PendingOp::RemoveBlock {
            scope: self.scope.clone(),
        })
    }
}
