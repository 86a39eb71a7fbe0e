//! Elements of the Dsl Element Tree and their raw values.

use crate::base::ScopePath;
use crate::parser::SyntaxNode;
use crate::parser::ast::quote;
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::fmt;

/// Index of an element in its [`ElementTree`](super::ElementTree).
///
/// Ids are assigned in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub(crate) u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Syntactic form a property was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementForm {
    /// `name value` or `name(value)` inside the block it belongs to
    BlockScoped,
    /// `a.b.name value`, reaching its block through a dotted path
    Application,
    /// `name = value` or `a.b.name = value`
    Assignment,
}

/// A literal value. Numbers keep their source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    String(SmolStr),
    Number(SmolStr),
    Bool(bool),
}

/// A non-literal expression such as `file("x")` or `rootProject.ext.sdk`,
/// kept as source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub text: SmolStr,
}

impl Reference {
    pub fn new(text: impl Into<SmolStr>) -> Self {
        Self { text: text.into() }
    }
}

/// A single value: a list entry, a map value or a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Literal(Literal),
    Reference(Reference),
}

impl Value {
    pub fn string(value: impl Into<SmolStr>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    pub fn number(value: impl fmt::Display) -> Self {
        Self::Literal(Literal::Number(SmolStr::new(value.to_string())))
    }

    pub fn bool(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }

    pub fn reference(text: impl Into<SmolStr>) -> Self {
        Self::Reference(Reference::new(text))
    }

    /// The value read as text: strings, numbers and reference source all
    /// convert, booleans do not.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Literal(Literal::String(s) | Literal::Number(s)) => Some(s),
            Self::Reference(r) => Some(&r.text),
            Self::Literal(Literal::Bool(_)) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Literal(Literal::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Integer read of a number literal or of a string holding one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Literal(Literal::Number(s) | Literal::String(s)) => s.parse().ok(),
            _ => None,
        }
    }

    /// Source text for this value, quoting strings with `quote_char`.
    pub fn to_source(&self, quote_char: char) -> String {
        match self {
            Self::Literal(Literal::String(s)) => quote(s, quote_char),
            Self::Literal(Literal::Number(n)) => n.to_string(),
            Self::Literal(Literal::Bool(b)) => b.to_string(),
            Self::Reference(r) => r.text.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(Literal::String(s)) => f.write_str(s),
            _ => f.write_str(&self.to_source('"')),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::number(value)
    }
}

/// The payload of a property statement, tagged by shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Literal(Literal),
    Reference(Reference),
    List(Vec<Value>),
    Map(IndexMap<SmolStr, Value>),
    /// A value the tree cannot model; holds the statement text.
    Unresolved(SmolStr),
}

impl RawValue {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved(_))
    }

    /// The payload as a single value, if it is one.
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Self::Literal(l) => Some(Value::Literal(l.clone())),
            Self::Reference(r) => Some(Value::Reference(r.clone())),
            _ => None,
        }
    }
}

/// A `{ }`-bodied statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockElement {
    pub name: SmolStr,
    /// Full logical path of the block, dotted prefix included.
    pub scope: ScopePath,
    /// Innermost textual block this one is written in.
    pub parent: Option<ElementId>,
    pub syntax: SyntaxNode,
}

/// A statement carrying a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyElement {
    pub name: SmolStr,
    /// Logical scope the property belongs to.
    pub scope: ScopePath,
    pub form: StatementForm,
    pub value: RawValue,
    /// Innermost textual block this statement is written in.
    pub parent: Option<ElementId>,
    pub syntax: SyntaxNode,
}

/// A statement whose shape could not be classified; kept for round-tripping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedElement {
    pub scope: ScopePath,
    pub parent: Option<ElementId>,
    pub syntax: SyntaxNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DslElement {
    Block(BlockElement),
    Property(PropertyElement),
    Unresolved(UnresolvedElement),
}

impl DslElement {
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Block(b) => &b.syntax,
            Self::Property(p) => &p.syntax,
            Self::Unresolved(u) => &u.syntax,
        }
    }

    pub fn parent(&self) -> Option<ElementId> {
        match self {
            Self::Block(b) => b.parent,
            Self::Property(p) => p.parent,
            Self::Unresolved(u) => u.parent,
        }
    }

    pub fn as_block(&self) -> Option<&BlockElement> {
        match self {
            Self::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyElement> {
        match self {
            Self::Property(p) => Some(p),
            _ => None,
        }
    }
}
