//! Applied plugins.
//!
//! A plugin is applied by any of these top-level forms:
//!
//! - `apply plugin: 'com.android.application'`
//! - `plugin 'com.android.application'` inside `apply { }`
//! - `id 'com.android.application'` inside `plugins { }`
//!
//! Each name is reported once, at its first appearance.

use super::handle::BlockHandle;
use crate::base::ScopePath;
use crate::document::Document;
use crate::dsl::{ElementId, ElementTree, Literal, RawValue, Value};
use crate::edit::PendingOp;
use crate::error::DslError;
use smol_str::SmolStr;

/// How a statement applies its plugins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginForm {
    /// `apply plugin: 'x'`
    ApplyStatement,
    /// `plugin 'x'` in `apply { }`
    ApplyBlock,
    /// `id 'x'` in `plugins { }`
    PluginsBlock,
}

impl PluginForm {
    /// Scope whose removal discards plugins applied this way.
    pub fn scope(self) -> ScopePath {
        match self {
            Self::ApplyStatement => ScopePath::root(),
            Self::ApplyBlock => ScopePath::new(["apply"]),
            Self::PluginsBlock => ScopePath::new(["plugins"]),
        }
    }
}

/// One statement naming plugins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginStatement {
    pub id: ElementId,
    pub form: PluginForm,
    pub names: Vec<SmolStr>,
}

/// Every statement applying a plugin, in document order.
pub fn plugin_statements(tree: &ElementTree) -> Vec<PluginStatement> {
    let forms = [
        (PluginForm::ApplyStatement, ScopePath::root(), "apply"),
        (PluginForm::ApplyBlock, PluginForm::ApplyBlock.scope(), "plugin"),
        (PluginForm::PluginsBlock, PluginForm::PluginsBlock.scope(), "id"),
    ];
    let mut statements = Vec::new();
    for (form, scope, name) in forms {
        for id in tree.occurrences(&scope, name) {
            let Some(property) = tree.property(*id) else {
                continue;
            };
            let names = match (form, &property.value) {
                (PluginForm::ApplyStatement, RawValue::Map(entries)) => {
                    entries.get("plugin").and_then(plugin_name).into_iter().collect()
                }
                (PluginForm::ApplyStatement, _) => Vec::new(),
                (_, RawValue::List(values)) => values.iter().filter_map(plugin_name).collect(),
                (_, raw) => raw.as_value().as_ref().and_then(plugin_name).into_iter().collect(),
            };
            if !names.is_empty() {
                statements.push(PluginStatement {
                    id: *id,
                    form,
                    names,
                });
            }
        }
    }
    statements.sort_by_key(|s| s.id);
    statements
}

fn plugin_name(value: &Value) -> Option<SmolStr> {
    match value {
        Value::Literal(Literal::String(name)) => Some(name.clone()),
        _ => None,
    }
}

/// Applied plugin names once `ops` are layered over the parsed tree.
pub fn applied_plugins(tree: &ElementTree, ops: &[PendingOp]) -> Vec<SmolStr> {
    // Pending applications live at the top level, like `apply plugin:`.
    let mut applied: Vec<(SmolStr, PluginForm)> = Vec::new();
    for statement in plugin_statements(tree) {
        for name in statement.names {
            applied.push((name, statement.form));
        }
    }
    for op in ops {
        match op {
            PendingOp::ApplyPlugin { name } => {
                if !applied.iter().any(|(n, _)| n == name) {
                    applied.push((name.clone(), PluginForm::ApplyStatement));
                }
            }
            PendingOp::RemovePlugin { name } => applied.retain(|(n, _)| n != name),
            PendingOp::RemoveBlock { scope } => {
                applied.retain(|(_, form)| !form.scope().starts_with(scope));
            }
            _ => {}
        }
    }
    let mut names: Vec<SmolStr> = Vec::with_capacity(applied.len());
    for (name, _) in applied {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// The plugins a build script applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginsModel {
    root: BlockHandle,
}

impl PluginsModel {
    pub(crate) fn new(root: BlockHandle) -> Self {
        Self { root }
    }

    /// Applied plugin names, pending writes included.
    pub fn applied(&self, doc: &Document) -> Result<Vec<String>, DslError> {
        self.root.check(doc)?;
        Ok(doc
            .applied_plugins()
            .into_iter()
            .map(|name| name.to_string())
            .collect())
    }

    pub fn is_applied(&self, doc: &Document, name: &str) -> Result<bool, DslError> {
        Ok(self.applied(doc)?.iter().any(|n| n == name))
    }

    /// Apply `name` unless it already is.
    pub fn apply(&self, doc: &mut Document, name: impl Into<SmolStr>) -> Result<(), DslError> {
        self.root.check(doc)?;
        doc.push_op(PendingOp::ApplyPlugin { name: name.into() })
    }

    /// Stop applying `name`, whichever forms apply it.
    pub fn remove(&self, doc: &mut Document, name: impl Into<SmolStr>) -> Result<(), DslError> {
        self.root.check(doc)?;
        doc.push_op(PendingOp::RemovePlugin { name: name.into() })
    }
}
