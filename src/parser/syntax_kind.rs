//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree of
//! a build script.

/// All syntax kinds (tokens and nodes)
///
/// Tokens are leaf nodes (identifiers, literals, punctuation).
/// Nodes are composite (statements, blocks, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    NEWLINE,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,   // identifier
    INTEGER, // 42
    DECIMAL, // 3.14
    STRING,  // "hello" or 'hello'
    TRUE_KW,
    FALSE_KW,
    NULL_KW,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,   // {
    R_BRACE,   // }
    L_BRACKET, // [
    R_BRACKET, // ]
    L_PAREN,   // (
    R_PAREN,   // )
    COMMA,     // ,
    COLON,     // :
    DOT,       // .
    EQ,        // =
    SEMICOLON, // ;

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    /// `name { ... }`
    BLOCK_STMT,
    /// `name = value`
    ASSIGNMENT_STMT,
    /// `name(args)` with an optional trailing closure
    METHOD_CALL_STMT,
    /// `name arg, arg` with an optional trailing closure
    APPLICATION_STMT,
    /// A statement that does not start with a name path
    ERROR_STMT,
    BLOCK_BODY,
    NAME_PATH,
    ARG_LIST,
    NAMED_ARG,
    LITERAL,
    LIST_EXPR,
    MAP_EXPR,
    CALL_EXPR,
    REFERENCE_EXPR,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace, newline or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::NEWLINE | Self::LINE_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Trivia that does not end a statement
    pub fn is_inline_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::BLOCK_COMMENT)
    }

    /// Check if this is a literal token
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INTEGER
                | Self::DECIMAL
                | Self::STRING
                | Self::TRUE_KW
                | Self::FALSE_KW
                | Self::NULL_KW
        )
    }

    /// Check if this kind is a statement node
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Self::BLOCK_STMT
                | Self::ASSIGNMENT_STMT
                | Self::METHOD_CALL_STMT
                | Self::APPLICATION_STMT
                | Self::ERROR_STMT
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GradleLanguage {}

impl rowan::Language for GradleLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<GradleLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<GradleLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<GradleLanguage>;
