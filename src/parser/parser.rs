//! Recursive descent parser for build scripts
//!
//! Builds a rowan GreenNode tree from tokens. Statements are terminated by a
//! newline or `;`; a trailing `,` continues an argument list onto the next
//! line, and newlines are free inside `[...]` and `(...)`.
//!
//! Unbalanced braces are fatal because they make the block structure
//! ambiguous. Everything else recovers locally: a value that cannot be parsed
//! is wrapped in an `ERROR` node inside its statement, and a statement that
//! does not start with a name becomes an `ERROR_STMT`.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first error that makes the block structure unusable, if any.
    pub fn fatal_error(&self) -> Option<&SyntaxError> {
        self.errors.iter().find(|e| e.fatal)
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
    /// Fatal errors invalidate the whole parse; the rest are local.
    pub fatal: bool,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
            fatal: false,
        }
    }

    pub fn fatal(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
            fatal: true,
        }
    }
}

/// Parse a build script into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, input.len());
    parser.parse_source_file();
    parser.finish()
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    input_len: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], input_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            input_len,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Kind of the next token that is not inline trivia (newlines count).
    fn peek_inline(&self) -> Option<SyntaxKind> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .map(|t| t.kind)
            .find(|k| !k.is_inline_trivia())
    }

    /// Kind of the n-th token after the current one that is not inline trivia.
    fn nth_inline(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_inline_trivia())
            .nth(n)
    }

    /// Whether the statement ends here: newline, `;`, `}`, line comment or EOF.
    fn at_statement_end(&self) -> bool {
        matches!(
            self.peek_inline(),
            None | Some(
                SyntaxKind::NEWLINE
                    | SyntaxKind::SEMICOLON
                    | SyntaxKind::R_BRACE
                    | SyntaxKind::LINE_COMMENT
            )
        )
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    /// Bump whitespace and block comments, stopping at newlines.
    fn skip_inline_trivia(&mut self) {
        while self.current().is_some_and(|t| t.kind.is_inline_trivia()) {
            self.bump();
        }
    }

    /// Bump all trivia, newlines included.
    fn skip_trivia(&mut self) {
        while self.current().is_some_and(|t| t.kind.is_trivia()) {
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn current_range(&self) -> TextRange {
        self.current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(TextSize::new(self.input_len as u32)))
    }

    fn error(&mut self, message: impl Into<String>) {
        let range = self.current_range();
        self.errors.push(SyntaxError::new(message, range));
    }

    fn fatal(&mut self, message: impl Into<String>, range: TextRange) {
        self.errors.push(SyntaxError::fatal(message, range));
    }

    /// Consume the rest of the current line, keeping brackets balanced so
    /// that a `{ ... }` region spanning several lines is swallowed whole.
    ///
    /// Stops before a `}` that closes an enclosing block.
    fn bump_rest_of_line(&mut self) {
        let mut depth = 0usize;
        let mut braces = 0usize;
        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::NEWLINE | SyntaxKind::SEMICOLON if depth == 0 => break,
                SyntaxKind::R_BRACE | SyntaxKind::R_BRACKET | SyntaxKind::R_PAREN
                    if depth == 0 =>
                {
                    break;
                }
                SyntaxKind::L_BRACE => {
                    depth += 1;
                    braces += 1;
                }
                SyntaxKind::L_BRACKET | SyntaxKind::L_PAREN => depth += 1,
                SyntaxKind::R_BRACE => {
                    depth -= 1;
                    braces = braces.saturating_sub(1);
                }
                SyntaxKind::R_BRACKET | SyntaxKind::R_PAREN => depth -= 1,
                _ => {}
            }
            self.bump();
        }
        if braces > 0 {
            let range = self.current_range();
            self.fatal("unclosed '{' at end of input", range);
        }
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Grammar rules: statements
    // =========================================================================

    /// SourceFile = Statement*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);
        self.parse_statements(false);
        self.finish_node();
    }

    /// Statements of the file or of a block body, with the trivia and `;`
    /// separators between them.
    fn parse_statements(&mut self, in_block: bool) {
        loop {
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            match self.current_kind() {
                SyntaxKind::SEMICOLON => self.bump(),
                SyntaxKind::R_BRACE if in_block => break,
                SyntaxKind::R_BRACE => {
                    let range = self.current_range();
                    self.fatal("unmatched '}'", range);
                    self.start_node(SyntaxKind::ERROR_STMT);
                    self.bump();
                    self.finish_node();
                }
                _ => {
                    let pos_before = self.pos;
                    self.parse_statement();
                    // Safety: if we didn't make progress, force-skip a token
                    if self.pos == pos_before {
                        self.error(format!("stuck on token: {:?}", self.current_kind()));
                        self.start_node(SyntaxKind::ERROR_STMT);
                        self.bump();
                        self.finish_node();
                    }
                }
            }
        }
    }

    /// Statement = BlockStmt | AssignmentStmt | MethodCallStmt | ApplicationStmt | ErrorStmt
    fn parse_statement(&mut self) {
        let quoted = self.at(SyntaxKind::STRING);
        if !self.at(SyntaxKind::IDENT) && !quoted {
            self.parse_error_statement("expected a statement");
            return;
        }

        let checkpoint = self.builder.checkpoint();
        self.parse_name_path();

        match self.peek_inline() {
            // `'debug-custom' { ... }` names a block; a quoted name is nothing else.
            Some(kind) if quoted && kind != SyntaxKind::L_BRACE => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::ERROR_STMT.into());
                self.error("a quoted name must open a block");
                self.bump_rest_of_line();
                self.finish_node();
            }
            Some(SyntaxKind::L_BRACE) => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::BLOCK_STMT.into());
                self.skip_inline_trivia();
                self.parse_block_body();
                self.finish_node();
            }
            Some(SyntaxKind::EQ) => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::ASSIGNMENT_STMT.into());
                self.skip_inline_trivia();
                self.bump(); // =
                self.skip_inline_trivia();
                self.parse_value(|p| p.parse_expr(), false);
                self.finish_node();
            }
            Some(SyntaxKind::L_PAREN) => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::METHOD_CALL_STMT.into());
                self.skip_inline_trivia();
                self.parse_value(|p| p.parse_paren_args(), true);
                self.finish_node();
            }
            _ if self.at_statement_end() => {
                // A bare name (`google`) carries no value we can model.
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::ERROR_STMT.into());
                self.error("statement has no value");
                self.finish_node();
            }
            _ => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::APPLICATION_STMT.into());
                self.skip_inline_trivia();
                self.parse_value(|p| p.parse_arg_list(false), true);
                self.finish_node();
            }
        }
    }

    /// Parse a statement value; if anything but the statement end follows,
    /// wrap the value and the rest of the line in an `ERROR` node.
    ///
    /// Errors inside a trailing closure belong to the closure's own
    /// statements and do not invalidate the value.
    fn parse_value(&mut self, value: impl FnOnce(&mut Self), closure: bool) {
        let checkpoint = self.builder.checkpoint();
        let errors_before = self.errors.len();
        value(self);
        let failed = self.errors.len() > errors_before;
        if !failed && closure {
            self.parse_trailing_closure();
        }
        if failed || !self.at_statement_end() {
            if !failed {
                self.error("unexpected tokens after value");
            }
            self.builder
                .start_node_at(checkpoint, SyntaxKind::ERROR.into());
            self.bump_rest_of_line();
            self.finish_node();
        }
    }

    fn parse_error_statement(&mut self, message: &str) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR_STMT);
        if matches!(
            self.current_kind(),
            SyntaxKind::R_BRACKET | SyntaxKind::R_PAREN
        ) {
            self.bump();
        }
        self.bump_rest_of_line();
        self.finish_node();
    }

    /// NamePath = Segment ('.' Segment)*, Segment = Ident | String
    fn parse_name_path(&mut self) {
        self.start_node(SyntaxKind::NAME_PATH);
        self.bump(); // segment
        while self.at(SyntaxKind::DOT)
            && self
                .tokens
                .get(self.pos + 1)
                .is_some_and(|t| matches!(t.kind, SyntaxKind::IDENT | SyntaxKind::STRING))
        {
            self.bump(); // .
            self.bump(); // segment
        }
        self.finish_node();
    }

    /// BlockBody = '{' Statement* '}'
    fn parse_block_body(&mut self) {
        self.start_node(SyntaxKind::BLOCK_BODY);
        let open = self.current_range();
        self.bump(); // {
        self.parse_statements(true);
        if !self.eat(SyntaxKind::R_BRACE) {
            self.fatal("unclosed '{'", open);
        }
        self.finish_node();
    }

    fn parse_trailing_closure(&mut self) {
        if self.peek_inline() == Some(SyntaxKind::L_BRACE) {
            self.skip_inline_trivia();
            self.parse_block_body();
        }
    }

    // =========================================================================
    // Grammar rules: arguments and expressions
    // =========================================================================

    /// '(' ArgList? ')'
    fn parse_paren_args(&mut self) {
        self.bump(); // (
        self.skip_trivia();
        if !self.at(SyntaxKind::R_PAREN) {
            self.parse_arg_list(true);
            self.skip_trivia();
        }
        self.expect(SyntaxKind::R_PAREN);
    }

    /// ArgList = Arg (',' Arg)*
    ///
    /// Inside parentheses newlines are free; otherwise only after a comma.
    fn parse_arg_list(&mut self, in_parens: bool) {
        self.start_node(SyntaxKind::ARG_LIST);
        loop {
            self.parse_arg();
            let next = if in_parens {
                self.nth_significant(0)
            } else {
                self.peek_inline()
            };
            if next != Some(SyntaxKind::COMMA) {
                break;
            }
            if in_parens {
                self.skip_trivia();
            } else {
                self.skip_inline_trivia();
            }
            self.bump(); // ,
            self.skip_trivia();
        }
        self.finish_node();
    }

    /// Kind of the n-th token after the current one that is not trivia.
    fn nth_significant(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .nth(n)
    }

    /// Arg = NamedArg | Expr
    fn parse_arg(&mut self) {
        if self.at_named_arg() {
            self.parse_named_arg();
        } else {
            self.parse_expr();
        }
    }

    fn at_named_arg(&self) -> bool {
        (self.at(SyntaxKind::IDENT) || self.at(SyntaxKind::STRING))
            && self.nth_inline(1) == Some(SyntaxKind::COLON)
    }

    /// NamedArg = (Ident | String) ':' Expr
    fn parse_named_arg(&mut self) {
        self.start_node(SyntaxKind::NAMED_ARG);
        self.bump(); // key
        self.skip_inline_trivia();
        self.bump(); // :
        self.skip_inline_trivia();
        self.parse_expr();
        self.finish_node();
    }

    /// Expr = Literal | ListExpr | MapExpr | CallExpr | ReferenceExpr
    fn parse_expr(&mut self) {
        match self.current_kind() {
            kind if kind.is_literal() && !self.at_eof() => {
                self.start_node(SyntaxKind::LITERAL);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::L_BRACKET if !self.at_eof() => self.parse_list_or_map(),
            SyntaxKind::IDENT if !self.at_eof() => {
                let checkpoint = self.builder.checkpoint();
                self.parse_name_path();
                if self.at(SyntaxKind::L_PAREN) {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::CALL_EXPR.into());
                    self.parse_paren_args();
                    self.finish_node();
                } else {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::REFERENCE_EXPR.into());
                    self.finish_node();
                }
            }
            _ => self.error("expected an expression"),
        }
    }

    /// ListExpr = '[' (Expr (',' Expr)*)? ']'
    /// MapExpr  = '[' ':' ']' | '[' NamedArg (',' NamedArg)* ']'
    fn parse_list_or_map(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.bump(); // [
        self.skip_trivia();

        if self.at(SyntaxKind::COLON) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::MAP_EXPR.into());
            self.bump(); // :
            self.skip_trivia();
            self.expect(SyntaxKind::R_BRACKET);
            self.finish_node();
            return;
        }

        let is_map = self.at_named_arg();
        let kind = if is_map {
            SyntaxKind::MAP_EXPR
        } else {
            SyntaxKind::LIST_EXPR
        };
        self.builder.start_node_at(checkpoint, kind.into());

        while !self.at_eof() && !self.at(SyntaxKind::R_BRACKET) {
            let pos_before = self.pos;
            if is_map {
                if self.at_named_arg() {
                    self.parse_named_arg();
                } else {
                    self.error("expected a map entry");
                }
            } else {
                self.parse_expr();
            }
            self.skip_trivia();
            if !self.eat(SyntaxKind::COMMA) || self.pos == pos_before {
                break;
            }
            self.skip_trivia();
        }
        self.skip_trivia();
        self.expect(SyntaxKind::R_BRACKET);
        self.finish_node();
    }
}
