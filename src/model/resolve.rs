//! Override and merge resolution.
//!
//! Resolution is a pure fold over the occurrences of a property in document
//! order:
//!
//! - scalars: the last occurrence wins, whatever its form
//! - lists: occurrences append their entries; an assignment clears what
//!   came before it
//! - maps: the same clearing rule; otherwise last write wins per key
//!
//! Pending operations are folded after the parsed occurrences.

use super::schema::{PropertyKind, Schema};
use super::value::PropertyValue;
use crate::base::{PropertyPath, ScopePath};
use crate::dsl::{ElementId, ElementTree, RawValue, StatementForm, Value};
use crate::edit::PendingOp;
use indexmap::IndexMap;
use smol_str::SmolStr;

/// How an occurrence spells the property it contributes to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// The property's own name: `proguardFiles 'a', 'b'`
    Whole,
    /// A singular form adding one entry: `proguardFile 'a'`
    Singular,
    /// A dotted map entry: `manifestPlaceholders.key "v"`
    Entry(SmolStr),
}

/// What one occurrence contributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contribution {
    Values(Vec<Value>),
    Entries(IndexMap<SmolStr, Value>),
}

impl Contribution {
    pub fn len(&self) -> usize {
        match self {
            Self::Values(values) => values.len(),
            Self::Entries(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> &[Value] {
        match self {
            Self::Values(values) => values,
            Self::Entries(_) => &[],
        }
    }

    pub fn to_entries(&self) -> IndexMap<SmolStr, Value> {
        match self {
            Self::Entries(entries) => entries.clone(),
            Self::Values(_) => IndexMap::new(),
        }
    }
}

/// One statement contributing to a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub id: ElementId,
    pub role: Role,
    pub form: StatementForm,
    pub contribution: Contribution,
    /// False when a later occurrence overrides or clears this one.
    pub live: bool,
}

impl Occurrence {
    /// Whether this occurrence clears everything before it.
    pub fn clears(&self) -> bool {
        self.role == Role::Whole && self.form == StatementForm::Assignment
    }
}

/// A resolved property: its effective value and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolved {
    pub value: PropertyValue,
    /// Every resolvable occurrence, in document order.
    pub occurrences: Vec<Occurrence>,
}

impl Resolved {
    pub fn live(&self) -> impl Iterator<Item = &Occurrence> + '_ {
        self.occurrences.iter().filter(|o| o.live)
    }

    /// The last live occurrence.
    pub fn winner(&self) -> Option<&Occurrence> {
        self.occurrences.iter().rev().find(|o| o.live)
    }
}

/// Resolve `path` against the parsed occurrences only.
pub fn resolve(tree: &ElementTree, path: &PropertyPath, kind: PropertyKind) -> Resolved {
    let mut candidates: Vec<(ElementId, Role)> = tree
        .occurrences(&path.scope, &path.name)
        .iter()
        .map(|id| (*id, Role::Whole))
        .collect();
    if let Some(singular) = kind.singular() {
        candidates.extend(
            tree.occurrences(&path.scope, singular)
                .iter()
                .map(|id| (*id, Role::Singular)),
        );
    }
    if let PropertyKind::Map { .. } = kind {
        let entry_scope = path.as_scope();
        for key in tree.property_names(&entry_scope) {
            candidates.extend(
                tree.occurrences(&entry_scope, key)
                    .iter()
                    .map(|id| (*id, Role::Entry(key.clone()))),
            );
        }
    }
    candidates.sort_by_key(|(id, _)| *id);

    let mut occurrences = Vec::with_capacity(candidates.len());
    for (id, role) in candidates {
        let Some(property) = tree.property(id) else {
            continue;
        };
        let Some(contribution) = contribution(kind, &role, &property.value) else {
            continue;
        };
        occurrences.push(Occurrence {
            id,
            role,
            form: property.form,
            contribution,
            live: true,
        });
    }

    let value = fold(kind, &mut occurrences);
    Resolved { value, occurrences }
}

/// What an occurrence with payload `raw` adds to a property of `kind`.
fn contribution(kind: PropertyKind, role: &Role, raw: &RawValue) -> Option<Contribution> {
    match (kind, role) {
        (PropertyKind::Scalar, _) => raw.as_value().map(|v| Contribution::Values(vec![v])),
        (PropertyKind::List { .. }, _) => match raw {
            RawValue::List(values) => Some(Contribution::Values(values.clone())),
            _ => raw.as_value().map(|v| Contribution::Values(vec![v])),
        },
        (PropertyKind::Map { .. }, Role::Whole) => match raw {
            RawValue::Map(entries) => Some(Contribution::Entries(entries.clone())),
            _ => None,
        },
        (PropertyKind::Map { .. }, Role::Singular) => match raw {
            RawValue::List(values) => match values.as_slice() {
                [key, value] => {
                    let key = SmolStr::new(key.as_text()?);
                    Some(Contribution::Entries(
                        [(key, value.clone())].into_iter().collect(),
                    ))
                }
                _ => None,
            },
            _ => None,
        },
        (PropertyKind::Map { .. }, Role::Entry(key)) => raw
            .as_value()
            .map(|v| Contribution::Entries([(key.clone(), v)].into_iter().collect())),
    }
}

/// Fold contributions into the effective value, marking dead occurrences.
fn fold(kind: PropertyKind, occurrences: &mut [Occurrence]) -> PropertyValue {
    if occurrences.is_empty() {
        return PropertyValue::Missing;
    }
    match kind {
        PropertyKind::Scalar => {
            let last = occurrences.len() - 1;
            for occurrence in &mut occurrences[..last] {
                occurrence.live = false;
            }
            match &occurrences[last].contribution {
                Contribution::Values(values) => values
                    .first()
                    .cloned()
                    .map_or(PropertyValue::Missing, PropertyValue::Scalar),
                Contribution::Entries(_) => PropertyValue::Missing,
            }
        }
        PropertyKind::List { .. } => {
            clear_before_last_assignment(occurrences);
            let values = occurrences
                .iter()
                .filter(|o| o.live)
                .flat_map(|o| match &o.contribution {
                    Contribution::Values(values) => values.clone(),
                    Contribution::Entries(_) => Vec::new(),
                })
                .collect();
            PropertyValue::List(values)
        }
        PropertyKind::Map { .. } => {
            clear_before_last_assignment(occurrences);
            let mut entries = IndexMap::new();
            for occurrence in occurrences.iter().filter(|o| o.live) {
                if let Contribution::Entries(contributed) = &occurrence.contribution {
                    for (key, value) in contributed {
                        entries.insert(key.clone(), value.clone());
                    }
                }
            }
            PropertyValue::Map(entries)
        }
    }
}

fn clear_before_last_assignment(occurrences: &mut [Occurrence]) {
    if let Some(last_clear) = occurrences.iter().rposition(Occurrence::clears) {
        for occurrence in &mut occurrences[..last_clear] {
            occurrence.live = false;
        }
    }
}

/// Resolve `path` with `ops` layered after the parsed occurrences.
pub fn resolve_pending(
    tree: &ElementTree,
    ops: &[PendingOp],
    path: &PropertyPath,
    kind: PropertyKind,
) -> PropertyValue {
    let mut value = resolve(tree, path, kind).value;
    for op in ops {
        if op.removes_scope(&path.scope) {
            value = PropertyValue::Missing;
        } else if op.property_path() == Some(path) {
            value = op.fold(value);
        }
    }
    value
}

/// Kind of `path`: registered, else implied by the latest pending write,
/// else inferred from the parsed payloads.
pub fn kind_for(
    schema: &Schema,
    tree: &ElementTree,
    ops: &[PendingOp],
    path: &PropertyPath,
) -> PropertyKind {
    if let Some(kind) = schema.kind_of(path) {
        return kind;
    }
    let pending = ops
        .iter()
        .rev()
        .filter(|op| op.property_path() == Some(path))
        .find_map(op_kind);
    pending.unwrap_or_else(|| infer_kind(tree, path))
}

fn op_kind(op: &PendingOp) -> Option<PropertyKind> {
    match op {
        PendingOp::SetValue { value, .. } => value.kind(),
        PendingOp::AddListValue { .. }
        | PendingOp::RemoveListValue { .. }
        | PendingOp::ReplaceListValue { .. } => Some(PropertyKind::LIST),
        PendingOp::SetMapEntry { .. } | PendingOp::RemoveMapEntry { .. } => {
            Some(PropertyKind::MAP)
        }
        _ => None,
    }
}

/// Any map payload makes a map, any list payload a list.
fn infer_kind(tree: &ElementTree, path: &PropertyPath) -> PropertyKind {
    let payloads = tree
        .occurrences(&path.scope, &path.name)
        .iter()
        .filter_map(|id| tree.property(*id))
        .map(|p| &p.value);
    let mut kind = PropertyKind::Scalar;
    for payload in payloads {
        match payload {
            RawValue::Map(_) => return PropertyKind::MAP,
            RawValue::List(_) => kind = PropertyKind::LIST,
            _ => {}
        }
    }
    kind
}

/// Whether the parsed tree opens `scope` as a block. A dotted map entry
/// (`manifestPlaceholders.key "v"`) names its map, not a block.
pub fn scope_in_source(schema: &Schema, tree: &ElementTree, scope: &ScopePath) -> bool {
    tree.has_scope(scope) && !is_map_prefix(schema, tree, scope)
}

fn is_map_prefix(schema: &Schema, tree: &ElementTree, scope: &ScopePath) -> bool {
    let (Some(parent), Some(name)) = (scope.parent(), scope.name()) else {
        return false;
    };
    if !tree.blocks_at(scope).is_empty() || !tree.child_blocks(scope).is_empty() {
        return false;
    }
    let path = PropertyPath::new(parent, name.clone());
    let kind = schema
        .kind_of(&path)
        .unwrap_or_else(|| infer_kind(tree, &path));
    matches!(kind, PropertyKind::Map { .. })
}

/// Whether `scope` exists once `ops` are layered over the parsed tree.
pub fn block_exists(
    schema: &Schema,
    tree: &ElementTree,
    ops: &[PendingOp],
    scope: &ScopePath,
) -> bool {
    let mut exists = scope_in_source(schema, tree, scope);
    for op in ops {
        if op.removes_scope(scope) {
            exists = false;
        } else if op.creates_scope(scope) {
            exists = true;
        }
    }
    exists
}

/// Logical child blocks of `scope` once `ops` are layered over the parsed
/// tree, in first-appearance order.
pub fn child_blocks(
    schema: &Schema,
    tree: &ElementTree,
    ops: &[PendingOp],
    scope: &ScopePath,
) -> Vec<SmolStr> {
    let mut names: Vec<SmolStr> = tree.child_blocks(scope).to_vec();
    for op in ops {
        let touched = match op {
            PendingOp::AddBlock { scope } => Some(scope),
            other => other.property_path().map(|p| &p.scope),
        };
        let next = touched
            .and_then(|t| t.strip_prefix(scope))
            .and_then(|rest| rest.first());
        if let Some(name) = next {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names.retain(|name| block_exists(schema, tree, ops, &scope.child(name.clone())));
    names
}
