//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and provides methods to access children.
//! Accessors only look at direct children, so a value that the parser had to
//! wrap in an `ERROR` node is reported as absent.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};
use smol_str::SmolStr;

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// Generates the accessors shared by every statement that starts with a
/// name path.
macro_rules! has_name_path {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                pub fn name_path(&self) -> Option<NamePath> {
                    self.0.children().find_map(NamePath::cast)
                }

                /// Whether part of the statement could not be parsed.
                pub fn has_error(&self) -> bool {
                    self.0.children().any(|n| n.kind() == SyntaxKind::ERROR)
                }
            }
        )*
    };
}

/// Generates the trailing closure accessor
macro_rules! has_closure {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                pub fn closure(&self) -> Option<BlockBody> {
                    self.0.children().find_map(BlockBody::cast)
                }
            }
        )*
    };
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        self.0.children().filter_map(Statement::cast)
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Any statement of a file or block body
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    Block(BlockStmt),
    Assignment(AssignmentStmt),
    MethodCall(MethodCallStmt),
    Application(ApplicationStmt),
    Error(ErrorStmt),
}

impl AstNode for Statement {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_statement()
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::BLOCK_STMT => Some(Self::Block(BlockStmt(node))),
            SyntaxKind::ASSIGNMENT_STMT => Some(Self::Assignment(AssignmentStmt(node))),
            SyntaxKind::METHOD_CALL_STMT => Some(Self::MethodCall(MethodCallStmt(node))),
            SyntaxKind::APPLICATION_STMT => Some(Self::Application(ApplicationStmt(node))),
            SyntaxKind::ERROR_STMT => Some(Self::Error(ErrorStmt(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Block(n) => n.syntax(),
            Self::Assignment(n) => n.syntax(),
            Self::MethodCall(n) => n.syntax(),
            Self::Application(n) => n.syntax(),
            Self::Error(n) => n.syntax(),
        }
    }
}

impl Statement {
    pub fn name_path(&self) -> Option<NamePath> {
        match self {
            Self::Block(n) => n.name_path(),
            Self::Assignment(n) => n.name_path(),
            Self::MethodCall(n) => n.name_path(),
            Self::Application(n) => n.name_path(),
            Self::Error(_) => None,
        }
    }

    /// The `{ ... }` body of a block, or the trailing closure of a call.
    pub fn body(&self) -> Option<BlockBody> {
        match self {
            Self::Block(n) => n.body(),
            Self::MethodCall(n) => n.closure(),
            Self::Application(n) => n.closure(),
            Self::Assignment(_) | Self::Error(_) => None,
        }
    }
}

ast_node!(BlockStmt, BLOCK_STMT);
ast_node!(AssignmentStmt, ASSIGNMENT_STMT);
ast_node!(MethodCallStmt, METHOD_CALL_STMT);
ast_node!(ApplicationStmt, APPLICATION_STMT);
ast_node!(ErrorStmt, ERROR_STMT);

has_name_path!(BlockStmt, AssignmentStmt, MethodCallStmt, ApplicationStmt);
has_closure!(MethodCallStmt, ApplicationStmt);

impl BlockStmt {
    pub fn body(&self) -> Option<BlockBody> {
        self.0.children().find_map(BlockBody::cast)
    }
}

impl AssignmentStmt {
    pub fn value(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl MethodCallStmt {
    /// Arguments between the parentheses; `None` for `name()`.
    pub fn args(&self) -> Option<ArgList> {
        self.0.children().find_map(ArgList::cast)
    }
}

impl ApplicationStmt {
    pub fn args(&self) -> Option<ArgList> {
        self.0.children().find_map(ArgList::cast)
    }
}

ast_node!(BlockBody, BLOCK_BODY);

impl BlockBody {
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        self.0.children().filter_map(Statement::cast)
    }

    pub fn r_brace(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::R_BRACE)
    }

    /// Whether the body holds no statements. Comments and separators do not count.
    pub fn is_blank(&self) -> bool {
        self.statements().next().is_none()
    }
}

// ============================================================================
// Names
// ============================================================================

ast_node!(NamePath, NAME_PATH);

impl NamePath {
    pub fn segments(&self) -> Vec<SmolStr> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter_map(|t| match t.kind() {
                SyntaxKind::IDENT => Some(SmolStr::new(t.text())),
                SyntaxKind::STRING => Some(unquote(t.text())),
                _ => None,
            })
            .collect()
    }
}

// ============================================================================
// Arguments
// ============================================================================

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Arg> + '_ {
        self.0.children().filter_map(Arg::cast)
    }
}

/// One argument of a call or application
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arg {
    Named(NamedArg),
    Positional(Expr),
}

impl AstNode for Arg {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::NAMED_ARG || Expr::can_cast(kind)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == SyntaxKind::NAMED_ARG {
            Some(Self::Named(NamedArg(node)))
        } else {
            Expr::cast(node).map(Self::Positional)
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Named(n) => n.syntax(),
            Self::Positional(n) => n.syntax(),
        }
    }
}

ast_node!(NamedArg, NAMED_ARG);

impl NamedArg {
    /// The key, unquoted when written as a string.
    pub fn key(&self) -> Option<SmolStr> {
        let token = self.0.first_token()?;
        match token.kind() {
            SyntaxKind::IDENT => Some(SmolStr::new(token.text())),
            SyntaxKind::STRING => Some(unquote(token.text())),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(LiteralExpr),
    List(ListExpr),
    Map(MapExpr),
    Call(CallExpr),
    Reference(ReferenceExpr),
}

impl AstNode for Expr {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::LITERAL
                | SyntaxKind::LIST_EXPR
                | SyntaxKind::MAP_EXPR
                | SyntaxKind::CALL_EXPR
                | SyntaxKind::REFERENCE_EXPR
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::LITERAL => Some(Self::Literal(LiteralExpr(node))),
            SyntaxKind::LIST_EXPR => Some(Self::List(ListExpr(node))),
            SyntaxKind::MAP_EXPR => Some(Self::Map(MapExpr(node))),
            SyntaxKind::CALL_EXPR => Some(Self::Call(CallExpr(node))),
            SyntaxKind::REFERENCE_EXPR => Some(Self::Reference(ReferenceExpr(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Literal(n) => n.syntax(),
            Self::List(n) => n.syntax(),
            Self::Map(n) => n.syntax(),
            Self::Call(n) => n.syntax(),
            Self::Reference(n) => n.syntax(),
        }
    }
}

ast_node!(LiteralExpr, LITERAL);

impl LiteralExpr {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.first_token()
    }
}

ast_node!(ListExpr, LIST_EXPR);

impl ListExpr {
    pub fn items(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }

    pub fn has_error(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::ERROR)
    }
}

ast_node!(MapExpr, MAP_EXPR);

impl MapExpr {
    pub fn entries(&self) -> impl Iterator<Item = NamedArg> + '_ {
        self.0.children().filter_map(NamedArg::cast)
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn name_path(&self) -> Option<NamePath> {
        self.0.children().find_map(NamePath::cast)
    }

    pub fn args(&self) -> Option<ArgList> {
        self.0.children().find_map(ArgList::cast)
    }
}

ast_node!(ReferenceExpr, REFERENCE_EXPR);

impl ReferenceExpr {
    pub fn name_path(&self) -> Option<NamePath> {
        self.0.children().find_map(NamePath::cast)
    }
}

// ============================================================================
// String literals
// ============================================================================

/// Strip the quotes from a string token and resolve its escapes.
pub fn unquote(text: &str) -> SmolStr {
    let inner = text
        .strip_prefix(['"', '\''])
        .and_then(|t| t.strip_suffix(['"', '\'']))
        .unwrap_or(text);
    if !inner.contains('\\') {
        return SmolStr::new(inner);
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    SmolStr::new(out)
}

/// Quote `value` with `quote`, escaping what needs it.
pub fn quote(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '$' if quote == '"' => out.push_str("\\$"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
