//! The Apply Engine.
//!
//! Replays the pending operation log into the syntax tree. Apply is
//! reconciling: for op *i* the engine folds `log[..=i]` over the parsed
//! document to get the value the property should end up with, resolves the
//! same property against the tree being edited, and only touches text when
//! the two differ. Replaying a log against its own output is therefore a
//! no-op.
//!
//! Each op first tries the smallest edit (rewrite one occurrence, append
//! after the last one). If the tree still does not resolve to the target,
//! every occurrence is collapsed into a single rewritten statement. An op
//! whose edits fail is rolled back and reported as an [`ApplyWarning`].

use super::log::PendingOp;
use crate::base::{PropertyPath, ScopePath, TextRange, TextSize};
use crate::dsl::{DslElement, ElementId, ElementTree, StatementForm, Value};
use crate::model::plugins::{self, PluginForm, PluginStatement};
use crate::model::resolve::{self, Contribution, Occurrence, Resolved, Role};
use crate::model::{PropertyKind, PropertyValue, Schema};
use crate::options::DocumentOptions;
use crate::parser::ast::{Arg, AstNode, BlockStmt, Expr, Statement, quote};
use crate::parser::{SyntaxKind, SyntaxNode, edit};
use indexmap::IndexMap;
use rowan::NodeOrToken;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::fmt;
use tracing::{debug, trace, warn};

/// Why an operation did not take effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// A block or property name is not a valid identifier.
    InvalidName,
    /// The list entry or map key to remove or replace is not there.
    EntryNotFound,
    /// A node the op needs could not be found in the tree.
    UnresolvedTarget,
    /// A structural edit primitive refused the edit.
    RejectedEdit(String),
}

/// An operation that was skipped during apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyWarning {
    /// Position of the op in the log.
    pub op_index: usize,
    /// Dotted path the op targets.
    pub path: String,
    pub kind: WarningKind,
}

impl fmt::Display for ApplyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (index, path) = (self.op_index, &self.path);
        match &self.kind {
            WarningKind::InvalidName => write!(f, "op {index}: invalid name in '{path}'"),
            WarningKind::EntryNotFound => write!(f, "op {index}: no such entry in '{path}'"),
            WarningKind::UnresolvedTarget => {
                write!(f, "op {index}: could not locate '{path}' in the document")
            }
            WarningKind::RejectedEdit(reason) => {
                write!(f, "op {index}: edit of '{path}' rejected: {reason}")
            }
        }
    }
}

/// Outcome of an apply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Ops that took effect, including those that needed no edit.
    pub applied_count: usize,
    pub warnings: Vec<ApplyWarning>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, Clone)]
enum EditAction {
    Remove,
    ReplaceValue(String),
    ReplaceStatement(String),
    /// Append `text` to the container node, indented by `indent`.
    Insert { text: String, indent: String },
    /// Put `text` on its own line next to the statement.
    InsertBeside { text: String, side: edit::Side },
}

/// An edit addressed by the range and kind of its node, so it survives
/// edits later in the document.
#[derive(Debug, Clone)]
struct PlannedEdit {
    range: TextRange,
    kind: SyntaxKind,
    action: EditAction,
}

impl PlannedEdit {
    fn on(node: &SyntaxNode, action: EditAction) -> Self {
        Self {
            range: node.text_range(),
            kind: node.kind(),
            action,
        }
    }

    /// Offset where the edit lands. Plans run from the end of the document
    /// backwards.
    fn at(&self) -> TextSize {
        match self.action {
            EditAction::Insert { .. }
            | EditAction::InsertBeside {
                side: edit::Side::After,
                ..
            } => self.range.end(),
            _ => self.range.start(),
        }
    }
}

/// Replays a log against one parsed document
pub struct ApplyEngine<'a> {
    base: &'a ElementTree,
    schema: &'a Schema,
    options: &'a DocumentOptions,
    root: SyntaxNode,
    tree: ElementTree,
    touched: FxHashSet<ScopePath>,
}

impl<'a> ApplyEngine<'a> {
    pub fn new(base: &'a ElementTree, schema: &'a Schema, options: &'a DocumentOptions) -> Self {
        Self {
            base,
            schema,
            options,
            root: base.root().clone(),
            tree: base.clone(),
            touched: FxHashSet::default(),
        }
    }

    /// Apply `ops` in order, then elide blocks left blank. Returns the
    /// edited root.
    pub fn run(mut self, ops: &[PendingOp]) -> (SyntaxNode, ApplyReport) {
        let mut report = ApplyReport::default();
        for (index, op) in ops.iter().enumerate() {
            trace!("[APPLY] op {index}: {op:?}");
            let snapshot = (self.root.clone(), self.tree.clone());
            match self.apply_op(&ops[..=index], op) {
                Ok(()) => report.applied_count += 1,
                Err(kind) => {
                    (self.root, self.tree) = snapshot;
                    let warning = ApplyWarning {
                        op_index: index,
                        path: op.target().to_string(),
                        kind,
                    };
                    warn!("[APPLY] {warning}");
                    report.warnings.push(warning);
                }
            }
        }
        self.elide_blank_blocks();
        debug!(
            "[APPLY] applied {} of {} ops with {} warnings",
            report.applied_count,
            ops.len(),
            report.warnings.len()
        );
        (self.root, report)
    }

    fn apply_op(&mut self, prefix: &[PendingOp], op: &PendingOp) -> Result<(), WarningKind> {
        match op {
            // Blocks are only written once something is put in them.
            PendingOp::AddBlock { scope } => check_names(scope),
            PendingOp::RemoveBlock { scope } => {
                check_names(scope)?;
                self.remove_block(scope)
            }
            PendingOp::ApplyPlugin { name } | PendingOp::RemovePlugin { name } => {
                let wanted = plugins::applied_plugins(self.base, prefix).contains(name);
                self.reconcile_plugin(name, wanted)
            }
            _ => {
                let Some(path) = op.property_path() else {
                    return Ok(());
                };
                check_names(&path.scope)?;
                if !is_identifier(&path.name) {
                    return Err(WarningKind::InvalidName);
                }
                let kind = resolve::kind_for(self.schema, self.base, prefix, path);
                self.check_entry(&prefix[..prefix.len() - 1], op, path, kind)?;
                let target = resolve::resolve_pending(self.base, prefix, path, kind);
                self.reconcile(path, kind, &target)
            }
        }
    }

    /// Removals and replacements need their entry to exist beforehand.
    fn check_entry(
        &self,
        earlier: &[PendingOp],
        op: &PendingOp,
        path: &PropertyPath,
        kind: PropertyKind,
    ) -> Result<(), WarningKind> {
        let before = || resolve::resolve_pending(self.base, earlier, path, kind);
        let present = match op {
            PendingOp::RemoveListValue { value, .. }
            | PendingOp::ReplaceListValue { old: value, .. } => match before() {
                PropertyValue::List(values) => values.contains(value),
                PropertyValue::Scalar(current) => &current == value,
                _ => false,
            },
            PendingOp::RemoveMapEntry { key, .. } => {
                before().as_map().is_some_and(|entries| entries.contains_key(key))
            }
            _ => true,
        };
        if present {
            Ok(())
        } else {
            Err(WarningKind::EntryNotFound)
        }
    }

    fn reconcile(
        &mut self,
        path: &PropertyPath,
        kind: PropertyKind,
        target: &PropertyValue,
    ) -> Result<(), WarningKind> {
        let current = resolve::resolve(&self.tree, path, kind);
        if current.value == *target {
            trace!("[APPLY] {path} is already up to date");
            return Ok(());
        }
        self.touched.insert(path.scope.clone());

        if let Some(plan) = self.minimal_plan(path, kind, &current, target) {
            self.execute(plan)?;
            if self.resolve(path, kind) == *target {
                return Ok(());
            }
        }

        trace!("[APPLY] {path}: collapsing occurrences into one statement");
        let current = resolve::resolve(&self.tree, path, kind);
        let plan = self
            .collapse_plan(path, &current, target)
            .ok_or(WarningKind::UnresolvedTarget)?;
        self.execute(plan)?;
        if self.resolve(path, kind) == *target {
            Ok(())
        } else {
            Err(WarningKind::RejectedEdit(format!(
                "'{path}' does not resolve to the pending {} after editing",
                target.kind_name()
            )))
        }
    }

    fn resolve(&self, path: &PropertyPath, kind: PropertyKind) -> PropertyValue {
        resolve::resolve(&self.tree, path, kind).value
    }

    // ========================================================================
    // Planning
    // ========================================================================

    fn minimal_plan(
        &self,
        path: &PropertyPath,
        kind: PropertyKind,
        current: &Resolved,
        target: &PropertyValue,
    ) -> Option<Vec<PlannedEdit>> {
        match target {
            PropertyValue::Missing => Some(self.remove_all(current)),
            PropertyValue::Scalar(value) => match current.winner() {
                Some(winner) if kind == PropertyKind::Scalar => {
                    let node = self.syntax_of(winner.id)?;
                    let action = EditAction::ReplaceValue(self.source(value));
                    Some(vec![PlannedEdit::on(node, action)])
                }
                None => Some(vec![self.create(path, current, target)?]),
                Some(_) => None,
            },
            PropertyValue::List(values) => self.list_plan(path, current, values),
            PropertyValue::Map(entries) => self.map_plan(path, current, entries),
        }
    }

    /// Lists change by appending, by positional replacement or by removing
    /// a subsequence; anything else is left to the collapse.
    fn list_plan(
        &self,
        path: &PropertyPath,
        current: &Resolved,
        target: &[Value],
    ) -> Option<Vec<PlannedEdit>> {
        let live: Vec<&Occurrence> = current.live().collect();
        let mut contributions: Vec<Vec<Value>> = live
            .iter()
            .map(|o| o.contribution.values().to_vec())
            .collect();
        let slots: Vec<(usize, usize)> = contributions
            .iter()
            .enumerate()
            .flat_map(|(o, values)| (0..values.len()).map(move |i| (o, i)))
            .collect();
        let existing: Vec<&Value> = slots.iter().map(|&(o, i)| &contributions[o][i]).collect();

        if target.len() > existing.len() && existing.iter().zip(target).all(|(a, b)| *a == b) {
            let suffix = &target[existing.len()..];
            return match live.last() {
                Some(last) if last.role == Role::Whole => {
                    let mut values = contributions[live.len() - 1].clone();
                    values.extend_from_slice(suffix);
                    Some(vec![self.rewrite(path, last, Contribution::Values(values))?])
                }
                _ => {
                    let addition = PropertyValue::List(suffix.to_vec());
                    Some(vec![self.create(path, current, &addition)?])
                }
            };
        }

        let mut changed = vec![false; live.len()];
        if target.len() == slots.len() {
            for (k, &(o, i)) in slots.iter().enumerate() {
                if contributions[o][i] != target[k] {
                    contributions[o][i] = target[k].clone();
                    changed[o] = true;
                }
            }
        } else if target.len() < slots.len() {
            let mut next = 0;
            let mut kept: Vec<Vec<Value>> = vec![Vec::new(); live.len()];
            for &(o, i) in &slots {
                let value = &contributions[o][i];
                if target.get(next) == Some(value) {
                    kept[o].push(value.clone());
                    next += 1;
                } else {
                    changed[o] = true;
                }
            }
            if next != target.len() {
                return None;
            }
            contributions = kept;
        } else {
            return None;
        }

        let mut plan = Vec::new();
        for (o, occurrence) in live.iter().enumerate() {
            if changed[o] {
                let values = Contribution::Values(std::mem::take(&mut contributions[o]));
                plan.push(self.rewrite(path, occurrence, values)?);
            }
        }
        Some(plan)
    }

    /// Changed keys are rewritten where their last live writer is, removed
    /// keys are dropped from every live writer, new keys go to the last
    /// occurrence or a new statement after it.
    fn map_plan(
        &self,
        path: &PropertyPath,
        current: &Resolved,
        target: &IndexMap<SmolStr, Value>,
    ) -> Option<Vec<PlannedEdit>> {
        let live: Vec<&Occurrence> = current.live().collect();
        let mut contributions: Vec<IndexMap<SmolStr, Value>> =
            live.iter().map(|o| o.contribution.to_entries()).collect();
        let existing = current.value.as_map().cloned().unwrap_or_default();

        let mut additions = IndexMap::new();
        for (key, value) in target {
            match existing.get(key) {
                Some(old) if old == value => {}
                Some(_) => {
                    let writer = contributions.iter().rposition(|c| c.contains_key(key))?;
                    contributions[writer].insert(key.clone(), value.clone());
                }
                None => {
                    additions.insert(key.clone(), value.clone());
                }
            }
        }
        for key in existing.keys().filter(|k| !target.contains_key(*k)) {
            for entries in &mut contributions {
                entries.shift_remove(key);
            }
        }
        if let Some(last) = live.last() {
            if last.role == Role::Whole && !additions.is_empty() {
                let o = live.len() - 1;
                contributions[o].extend(std::mem::take(&mut additions));
            }
        }

        let mut plan = Vec::new();
        for (o, occurrence) in live.iter().enumerate() {
            if contributions[o] != occurrence.contribution.to_entries() {
                let entries = Contribution::Entries(std::mem::take(&mut contributions[o]));
                plan.push(self.rewrite(path, occurrence, entries)?);
            }
        }
        if !additions.is_empty() {
            plan.push(self.create(path, current, &PropertyValue::Map(additions))?);
        }
        Some(plan)
    }

    /// Rewrite the first occurrence as the whole value and drop the rest.
    fn collapse_plan(
        &self,
        path: &PropertyPath,
        current: &Resolved,
        target: &PropertyValue,
    ) -> Option<Vec<PlannedEdit>> {
        if target.is_missing() {
            return Some(self.remove_all(current));
        }
        let Some((first, rest)) = current.occurrences.split_first() else {
            return Some(vec![self.create(path, current, target)?]);
        };
        let node = self.syntax_of(first.id)?;
        let name = format!("{}{}", name_prefix(node, &first.role), path.name);
        let text = self.statement_text(&name, target, self.registered(path), true);
        let mut plan = vec![PlannedEdit::on(node, EditAction::ReplaceStatement(text))];
        for occurrence in rest {
            plan.push(PlannedEdit::on(self.syntax_of(occurrence.id)?, EditAction::Remove));
        }
        Some(plan)
    }

    fn remove_all(&self, current: &Resolved) -> Vec<PlannedEdit> {
        current
            .occurrences
            .iter()
            .filter_map(|o| self.syntax_of(o.id))
            .map(|node| PlannedEdit::on(node, EditAction::Remove))
            .collect()
    }

    /// Make `occurrence` contribute exactly `entries`.
    fn rewrite(
        &self,
        path: &PropertyPath,
        occurrence: &Occurrence,
        entries: Contribution,
    ) -> Option<PlannedEdit> {
        let node = self.syntax_of(occurrence.id)?;
        if entries.is_empty() {
            // An emptied assignment still clears what came before it.
            let action = if occurrence.clears() {
                EditAction::ReplaceValue(self.bracketed(&entries))
            } else {
                EditAction::Remove
            };
            return Some(PlannedEdit::on(node, action));
        }
        let action = match &occurrence.role {
            Role::Whole if occurrence.form == StatementForm::Assignment => {
                EditAction::ReplaceValue(self.bracketed(&entries))
            }
            Role::Whole => {
                if is_bracketed(node) || self.needs_brackets(path, &entries) {
                    EditAction::ReplaceValue(self.bracketed(&entries))
                } else {
                    EditAction::ReplaceValue(self.args(&entries))
                }
            }
            role if entries.len() == 1 => EditAction::ReplaceValue(self.single(role, &entries)),
            role => EditAction::ReplaceStatement(format!(
                "{}{} {}",
                name_prefix(node, role),
                path.name,
                self.args(&entries)
            )),
        };
        Some(PlannedEdit::on(node, action))
    }

    /// A statement for `value` that continues after the last occurrence,
    /// spelled with its name prefix, or a new statement in the deepest
    /// block that already exists when there is no occurrence.
    fn create(
        &self,
        path: &PropertyPath,
        current: &Resolved,
        value: &PropertyValue,
    ) -> Option<PlannedEdit> {
        let registered = self.registered(path);
        let unit = self.options.indent(1);
        if let Some(last) = current.occurrences.last() {
            let node = self.syntax_of(last.id)?;
            let container = node.parent()?;
            let name = format!("{}{}", name_prefix(node, &last.role), path.name);
            let text = self.statement_text(&name, value, registered, false);
            let indent = edit::child_indent(&container, &unit);
            return Some(PlannedEdit::on(&container, EditAction::Insert { text, indent }));
        }
        let (container, missing) = self.insertion_point(&path.scope)?;
        let statement = self.statement_text(&path.name, value, registered, true);
        let names: Vec<String> = missing.iter().map(|name| self.key(name)).collect();
        let text = nest(&names, &statement, &unit);
        let indent = edit::child_indent(&container, &unit);
        trace!(
            "[APPLY] creating {path} with {} new block(s)",
            missing.len()
        );
        Some(PlannedEdit::on(&container, EditAction::Insert { text, indent }))
    }

    /// Body of the last textual block for the deepest existing ancestor of
    /// `scope` (or the file), and the block names still to be created.
    fn insertion_point(&self, scope: &ScopePath) -> Option<(SyntaxNode, Vec<SmolStr>)> {
        let ancestors: Vec<ScopePath> = scope.ancestors_and_self().collect();
        for ancestor in ancestors.iter().rev() {
            let missing = scope.strip_prefix(ancestor).unwrap_or_default().to_vec();
            if ancestor.is_root() {
                return Some((self.root.clone(), missing));
            }
            if let Some(body) = self.last_body(ancestor) {
                return Some((body, missing));
            }
        }
        None
    }

    /// Body of the last textual block opening `scope`.
    fn last_body(&self, scope: &ScopePath) -> Option<SyntaxNode> {
        self.tree
            .blocks_at(scope)
            .iter()
            .rev()
            .filter_map(|id| self.tree.block(*id))
            .find_map(|block| BlockStmt::cast(block.syntax.clone())?.body())
            .map(|body| body.syntax().clone())
    }

    // ========================================================================
    // Text generation
    // ========================================================================

    fn registered(&self, path: &PropertyPath) -> bool {
        self.schema.kind_of(path).is_some()
    }

    /// A lone entry of an unregistered list is written as `[v]` so that it
    /// reads back as a list.
    fn needs_brackets(&self, path: &PropertyPath, entries: &Contribution) -> bool {
        matches!(entries, Contribution::Values(values) if values.len() == 1)
            && !self.registered(path)
    }

    fn source(&self, value: &Value) -> String {
        value.to_source(self.options.quote())
    }

    fn key(&self, key: &str) -> String {
        if is_identifier(key) {
            key.to_string()
        } else {
            quote(key, self.options.quote())
        }
    }

    /// `a, b` or `k: v, k2: v2`
    fn args(&self, entries: &Contribution) -> String {
        match entries {
            Contribution::Values(values) => values
                .iter()
                .map(|v| self.source(v))
                .collect::<Vec<_>>()
                .join(", "),
            Contribution::Entries(entries) => entries
                .iter()
                .map(|(k, v)| format!("{}: {}", self.key(k), self.source(v)))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// `[a, b]`, `[k: v]`, `[]` or `[:]`
    fn bracketed(&self, entries: &Contribution) -> String {
        match entries {
            Contribution::Entries(map) if map.is_empty() => "[:]".to_string(),
            _ => format!("[{}]", self.args(entries)),
        }
    }

    /// Value of a statement that holds a single entry: the value for a
    /// singular list form or a dotted map entry, `"k", v` for a singular
    /// map form.
    fn single(&self, role: &Role, entries: &Contribution) -> String {
        match entries {
            Contribution::Values(values) => values
                .first()
                .map(|v| self.source(v))
                .unwrap_or_default(),
            Contribution::Entries(map) => match (role, map.first()) {
                (Role::Entry(_), Some((_, v))) => self.source(v),
                (_, Some((k, v))) => {
                    format!("{}, {}", quote(k, self.options.quote()), self.source(v))
                }
                (_, None) => String::new(),
            },
        }
    }

    /// A whole statement for `value`. Without `may_clear` the statement
    /// must not be an assignment, which would discard earlier occurrences.
    fn statement_text(
        &self,
        name: &str,
        value: &PropertyValue,
        registered: bool,
        may_clear: bool,
    ) -> String {
        match value {
            PropertyValue::Missing => String::new(),
            PropertyValue::Scalar(v) => format!("{name} {}", self.source(v)),
            PropertyValue::List(values) => {
                let entries = Contribution::Values(values.clone());
                match values.len() {
                    0 => format!("{name} = []"),
                    1 if !registered && may_clear => {
                        format!("{name} = {}", self.bracketed(&entries))
                    }
                    1 if !registered => format!("{name} {}", self.bracketed(&entries)),
                    _ => format!("{name} {}", self.args(&entries)),
                }
            }
            PropertyValue::Map(map) if map.is_empty() => format!("{name} = [:]"),
            PropertyValue::Map(map) => {
                format!("{name} {}", self.args(&Contribution::Entries(map.clone())))
            }
        }
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Remove every statement at or below `scope`, outermost first.
    fn remove_block(&mut self, scope: &ScopePath) -> Result<(), WarningKind> {
        let mut selected: FxHashSet<ElementId> = FxHashSet::default();
        let mut plan = Vec::new();
        for (id, element) in self.tree.iter() {
            let inside = match element {
                DslElement::Block(block) => block.scope.starts_with(scope),
                DslElement::Property(property) => property.scope.starts_with(scope),
                DslElement::Unresolved(_) => false,
            };
            if !inside || self.within(element, &selected) {
                continue;
            }
            selected.insert(id);
            plan.push(PlannedEdit::on(element.syntax(), EditAction::Remove));
        }
        if plan.is_empty() {
            trace!("[APPLY] block {scope} has no text to remove");
            return Ok(());
        }
        if let Some(parent) = scope.parent() {
            self.touched.insert(parent);
        }
        self.execute(plan)
    }

    /// Whether a textual ancestor of `element` is in `selected`.
    fn within(&self, element: &DslElement, selected: &FxHashSet<ElementId>) -> bool {
        let mut parent = element.parent();
        while let Some(id) = parent {
            if selected.contains(&id) {
                return true;
            }
            parent = self.tree.get(id).and_then(DslElement::parent);
        }
        false
    }

    // ========================================================================
    // Plugins
    // ========================================================================

    fn reconcile_plugin(&mut self, name: &SmolStr, wanted: bool) -> Result<(), WarningKind> {
        let statements = plugins::plugin_statements(&self.tree);
        let present = statements.iter().any(|s| s.names.contains(name));
        if present == wanted {
            trace!("[APPLY] plugin {name} is already up to date");
            return Ok(());
        }
        let plan = if wanted {
            vec![
                self.add_plugin(name, &statements)
                    .ok_or(WarningKind::UnresolvedTarget)?,
            ]
        } else {
            self.remove_plugin(name, &statements)?
        };
        self.execute(plan)?;
        let applied = plugins::plugin_statements(&self.tree)
            .iter()
            .any(|s| s.names.contains(name));
        if applied == wanted {
            Ok(())
        } else {
            Err(WarningKind::RejectedEdit(format!(
                "plugin '{name}' is still {} after editing",
                if wanted { "missing" } else { "applied" }
            )))
        }
    }

    /// Statements naming `name` drop it; those left naming nothing go.
    fn remove_plugin(
        &mut self,
        name: &SmolStr,
        statements: &[PluginStatement],
    ) -> Result<Vec<PlannedEdit>, WarningKind> {
        let mut plan = Vec::new();
        for statement in statements.iter().filter(|s| s.names.contains(name)) {
            let node = self
                .syntax_of(statement.id)
                .ok_or(WarningKind::UnresolvedTarget)?;
            let rest: Vec<Value> = statement
                .names
                .iter()
                .filter(|n| *n != name)
                .map(|n| Value::string(n.clone()))
                .collect();
            let action = if rest.is_empty() {
                EditAction::Remove
            } else {
                EditAction::ReplaceValue(self.args(&Contribution::Values(rest)))
            };
            plan.push(PlannedEdit::on(node, action));
            self.touched.insert(statement.form.scope());
        }
        Ok(plan)
    }

    /// After the last `apply plugin:` statement, else in the last
    /// `plugins { }` or `apply { }` block, else before the first statement.
    fn add_plugin(&self, name: &SmolStr, statements: &[PluginStatement]) -> Option<PlannedEdit> {
        let value = self.source(&Value::string(name.clone()));
        let text = format!("apply plugin: {value}");
        let last_statement = statements
            .iter()
            .rev()
            .find(|s| s.form == PluginForm::ApplyStatement);
        if let Some(last) = last_statement {
            let node = self.syntax_of(last.id)?;
            let side = edit::Side::After;
            return Some(PlannedEdit::on(node, EditAction::InsertBeside { text, side }));
        }
        for (form, keyword) in [(PluginForm::PluginsBlock, "id"), (PluginForm::ApplyBlock, "plugin")] {
            if let Some(body) = self.last_body(&form.scope()) {
                let indent = edit::child_indent(&body, &self.options.indent(1));
                let text = format!("{keyword} {value}");
                return Some(PlannedEdit::on(&body, EditAction::Insert { text, indent }));
            }
        }
        match self.root.children().find(|n| n.kind().is_statement()) {
            Some(first) => {
                let side = edit::Side::Before;
                Some(PlannedEdit::on(&first, EditAction::InsertBeside { text, side }))
            }
            None => {
                let indent = String::new();
                Some(PlannedEdit::on(&self.root, EditAction::Insert { text, indent }))
            }
        }
    }

    /// Remove blank blocks in every touched scope, deepest first, so that
    /// emptied parents go too.
    fn elide_blank_blocks(&mut self) {
        let scopes: FxHashSet<ScopePath> = self
            .touched
            .iter()
            .flat_map(|scope| scope.ancestors_and_self().collect::<Vec<_>>())
            .filter(|scope| !scope.is_root())
            .collect();
        let mut scopes: Vec<ScopePath> = scopes.into_iter().collect();
        scopes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        for scope in &scopes {
            while let Some(node) = self.blank_block(scope) {
                if let Err(kind) = self.execute(vec![PlannedEdit::on(&node, EditAction::Remove)]) {
                    warn!("[APPLY] could not elide empty block {scope}: {kind:?}");
                    break;
                }
                debug!("[APPLY] elided empty block {scope}");
            }
        }
    }

    fn blank_block(&self, scope: &ScopePath) -> Option<SyntaxNode> {
        self.tree
            .blocks_at(scope)
            .iter()
            .rev()
            .filter_map(|id| self.tree.block(*id))
            .find(|block| {
                BlockStmt::cast(block.syntax.clone())
                    .and_then(|stmt| stmt.body())
                    .is_some_and(|body| body.is_blank())
            })
            .map(|block| block.syntax.clone())
    }

    // ========================================================================
    // Execution
    // ========================================================================

    fn syntax_of(&self, id: ElementId) -> Option<&SyntaxNode> {
        self.tree.get(id).map(DslElement::syntax)
    }

    /// Run a plan from the end of the document backwards, then rebuild the
    /// element tree.
    fn execute(&mut self, mut plan: Vec<PlannedEdit>) -> Result<(), WarningKind> {
        plan.sort_by(|a, b| b.at().cmp(&a.at()));
        for planned in plan {
            let node = self
                .locate(planned.range, planned.kind)
                .ok_or(WarningKind::UnresolvedTarget)?;
            let result = match &planned.action {
                EditAction::Remove => edit::remove_statement(&node),
                EditAction::ReplaceValue(text) => edit::replace_value(&node, text),
                EditAction::ReplaceStatement(text) => edit::replace_statement(&node, text),
                EditAction::Insert { text, indent } => edit::insert_statement(&node, text, indent),
                EditAction::InsertBeside { text, side } => edit::insert_beside(&node, text, *side),
            };
            let green = result.map_err(|e| WarningKind::RejectedEdit(e.to_string()))?;
            self.root = SyntaxNode::new_root(green);
        }
        self.tree = ElementTree::build(self.root.clone());
        Ok(())
    }

    fn locate(&self, range: TextRange, kind: SyntaxKind) -> Option<SyntaxNode> {
        if self.root.text_range() == range && self.root.kind() == kind {
            return Some(self.root.clone());
        }
        let node = match self.root.covering_element(range) {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => token.parent()?,
        };
        node.ancestors()
            .find(|n| n.text_range() == range && n.kind() == kind)
    }
}

/// Block names that are not identifiers are written quoted, so only empty
/// ones are refused.
fn check_names(scope: &ScopePath) -> Result<(), WarningKind> {
    if scope.segments().iter().all(|s| !s.is_empty()) {
        Ok(())
    } else {
        Err(WarningKind::InvalidName)
    }
}

/// Whether `name` can be written as a bare name in a build script.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let start = chars
        .next()
        .is_some_and(|c| c == '_' || c == '$' || unicode_ident::is_xid_start(c));
    start
        && chars.all(|c| c == '$' || unicode_ident::is_xid_continue(c))
        && !matches!(name, "true" | "false" | "null")
}

/// Dotted name prefix of a statement as spelled in the source, without the
/// property name (and for dotted map entries, without the key).
fn name_prefix(node: &SyntaxNode, role: &Role) -> String {
    let segments: Vec<String> = Statement::cast(node.clone())
        .and_then(|s| s.name_path())
        .map(|p| {
            p.syntax()
                .children_with_tokens()
                .filter_map(|e| e.into_token())
                .filter(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::STRING))
                .map(|t| t.text().to_string())
                .collect()
        })
        .unwrap_or_default();
    let drop = if matches!(role, Role::Entry(_)) { 2 } else { 1 };
    let keep = segments.len().saturating_sub(drop);
    segments[..keep].iter().map(|s| format!("{s}.")).collect()
}

/// Whether the statement's only argument is a `[...]` literal.
fn is_bracketed(node: &SyntaxNode) -> bool {
    let args = match Statement::cast(node.clone()) {
        Some(Statement::Application(app)) => app.args(),
        Some(Statement::MethodCall(call)) => call.args(),
        _ => None,
    };
    args.is_some_and(|list| {
        let args: Vec<Arg> = list.args().collect();
        matches!(args.as_slice(), [Arg::Positional(Expr::List(_) | Expr::Map(_))])
    })
}

/// Wrap `statement` in `name { }` blocks, outermost first. Names are
/// already spelled for the source.
fn nest(blocks: &[String], statement: &str, unit: &str) -> String {
    let mut text = statement.to_string();
    for name in blocks.iter().rev() {
        let body: Vec<String> = text
            .lines()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{unit}{line}")
                }
            })
            .collect();
        text = format!("{name} {{\n{}\n}}", body.join("\n"));
    }
    text
}
