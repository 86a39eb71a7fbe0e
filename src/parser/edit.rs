//! Structural edits on the green tree.
//!
//! Every primitive takes nodes of the current tree and returns the new root
//! `GreenNode`. Subtrees that are not on the path to the edit are shared with
//! the old tree, so rendering the new root reproduces untouched regions
//! byte-for-byte.
//!
//! New text (statements, values) is produced by parsing a small fragment and
//! grafting the resulting green node into place.

use super::ast::{AstNode, Statement};
use super::parser::parse;
use super::syntax_kind::SyntaxKind;
use super::{SyntaxElement, SyntaxNode};
use crate::error::EditError;
use rowan::{GreenNode, GreenToken, NodeOrToken};

type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// Name used for the statement that carries a value fragment while parsing.
const PLACEHOLDER: &str = "__value";

/// Parse `text` as exactly one well-formed statement.
pub fn parse_statement(text: &str) -> Result<GreenNode, EditError> {
    let parse = parse(text);
    if !parse.ok() {
        return Err(EditError::InvalidStatement(text.to_string()));
    }
    let root = parse.syntax();
    let mut statements = root.children().filter(|n| n.kind().is_statement());
    match (statements.next(), statements.next()) {
        (Some(stmt), None) if stmt.kind() != SyntaxKind::ERROR_STMT => {
            Ok(stmt.green().into_owned())
        }
        _ => Err(EditError::InvalidStatement(text.to_string())),
    }
}

/// Append a statement at the end of a block body or of the file.
///
/// `statement` may span several lines; every line after the first is
/// prefixed with `indent`, the indentation of the new statement itself.
pub fn insert_statement(
    container: &SyntaxNode,
    statement: &str,
    indent: &str,
) -> Result<GreenNode, EditError> {
    let newline = newline_style(container);
    let green = parse_statement(&indent_lines(statement, indent, newline))?;
    let stmt = NodeOrToken::Node(green);
    let children: Vec<SyntaxElement> = container.children_with_tokens().collect();

    let new_container = match container.kind() {
        SyntaxKind::BLOCK_BODY => {
            let r_brace = children
                .iter()
                .position(|e| e.kind() == SyntaxKind::R_BRACE)
                .ok_or_else(|| EditError::invalid_target("block", "body has no closing brace"))?;
            let mut ws_start = r_brace;
            while ws_start > 0 && children[ws_start - 1].kind() == SyntaxKind::WHITESPACE {
                ws_start -= 1;
            }
            if ws_start > 0 && children[ws_start - 1].kind() == SyntaxKind::NEWLINE {
                // `}` on its own line: add a line before the last line break.
                let mut new_children = vec![newline_token(newline)];
                new_children.extend(whitespace_token(indent));
                new_children.push(stmt);
                container
                    .green()
                    .splice_children(ws_start - 1..ws_start - 1, new_children)
            } else {
                // `{ }` or `{ x 1 }`: break the closing brace onto its own line.
                let outer = container.parent().map(|p| line_indent(&p)).unwrap_or_default();
                let mut new_children = vec![newline_token(newline)];
                new_children.extend(whitespace_token(indent));
                new_children.push(stmt);
                new_children.push(newline_token(newline));
                new_children.extend(whitespace_token(&outer));
                container
                    .green()
                    .splice_children(ws_start..r_brace, new_children)
            }
        }
        SyntaxKind::SOURCE_FILE => {
            let last_content = children.iter().rposition(|e| {
                !matches!(e.kind(), SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE)
            });
            match last_content {
                None => container
                    .green()
                    .splice_children(0..0, [stmt, newline_token(newline)]),
                Some(last) => match children.get(last + 1).map(|e| e.kind()) {
                    Some(SyntaxKind::NEWLINE) => {
                        let mut new_children: Vec<GreenElement> = whitespace_token(indent).collect();
                        new_children.push(stmt);
                        new_children.push(newline_token(newline));
                        container
                            .green()
                            .splice_children(last + 2..last + 2, new_children)
                    }
                    _ => {
                        let mut new_children = vec![newline_token(newline)];
                        new_children.extend(whitespace_token(indent));
                        new_children.push(stmt);
                        container
                            .green()
                            .splice_children(children.len()..children.len(), new_children)
                    }
                },
            }
        }
        kind => {
            return Err(EditError::invalid_target(
                "container",
                format!("cannot insert statements into {kind:?}"),
            ));
        }
    };
    Ok(container.replace_with(new_container))
}

/// Which side of an existing statement [`insert_beside`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

/// Insert a statement on its own line next to `anchor`, at the anchor's
/// indentation. A trailing comment stays on the anchor's line.
pub fn insert_beside(
    anchor: &SyntaxNode,
    statement: &str,
    side: Side,
) -> Result<GreenNode, EditError> {
    if !anchor.kind().is_statement() {
        return Err(EditError::invalid_target(
            "statement",
            format!("{:?} is not a statement", anchor.kind()),
        ));
    }
    let parent = anchor
        .parent()
        .ok_or_else(|| EditError::invalid_target("statement", "statement is detached"))?;
    let children: Vec<SyntaxElement> = parent.children_with_tokens().collect();
    let index = children
        .iter()
        .position(|e| e.as_node() == Some(anchor))
        .ok_or_else(|| EditError::invalid_target("statement", "statement not found in parent"))?;
    let indent = line_indent(anchor);
    let newline = newline_style(anchor);
    let stmt = NodeOrToken::Node(parse_statement(&indent_lines(statement, &indent, newline))?);

    let (at, new_children) = match side {
        Side::Before => {
            let mut new_children = vec![stmt, newline_token(newline)];
            new_children.extend(whitespace_token(&indent));
            (index, new_children)
        }
        Side::After => {
            let mut at = index + 1;
            while matches!(
                children.get(at).map(|e| e.kind()),
                Some(SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT)
            ) {
                at += 1;
            }
            let mut new_children = vec![newline_token(newline)];
            new_children.extend(whitespace_token(&indent));
            new_children.push(stmt);
            (at, new_children)
        }
    };
    let new_parent = parent.green().splice_children(at..at, new_children);
    Ok(parent.replace_with(new_parent))
}

/// Remove a statement together with the line it occupied.
///
/// A trailing line comment on the same line is kept.
pub fn remove_statement(statement: &SyntaxNode) -> Result<GreenNode, EditError> {
    if !statement.kind().is_statement() {
        return Err(EditError::invalid_target(
            "statement",
            format!("{:?} is not a statement", statement.kind()),
        ));
    }
    let parent = statement
        .parent()
        .ok_or_else(|| EditError::invalid_target("statement", "statement is detached"))?;
    let children: Vec<SyntaxElement> = parent.children_with_tokens().collect();
    let index = children
        .iter()
        .position(|e| e.as_node() == Some(statement))
        .ok_or_else(|| EditError::invalid_target("statement", "statement not found in parent"))?;
    let kind_at = |i: usize| children.get(i).map(|e| e.kind());

    let mut start = index;
    while start > 0 && kind_at(start - 1) == Some(SyntaxKind::WHITESPACE) {
        start -= 1;
    }
    let mut end = index + 1;
    loop {
        while kind_at(end) == Some(SyntaxKind::WHITESPACE) {
            end += 1;
        }
        if kind_at(end) == Some(SyntaxKind::SEMICOLON) {
            end += 1;
            continue;
        }
        break;
    }

    let at_line_start = start == 0 || kind_at(start - 1) == Some(SyntaxKind::NEWLINE);
    let range = match kind_at(end) {
        Some(SyntaxKind::NEWLINE) if at_line_start => start..end + 1,
        Some(SyntaxKind::LINE_COMMENT) if at_line_start => index..end,
        None | Some(SyntaxKind::R_BRACE) if at_line_start && start > 0 => start - 1..end,
        None | Some(SyntaxKind::R_BRACE | SyntaxKind::NEWLINE) => start..end,
        _ => index..end,
    };

    let new_parent = parent
        .green()
        .splice_children(range, std::iter::empty::<GreenElement>());
    Ok(parent.replace_with(new_parent))
}

/// Replace a whole statement, keeping its position and indentation.
pub fn replace_statement(statement: &SyntaxNode, text: &str) -> Result<GreenNode, EditError> {
    if !statement.kind().is_statement() {
        return Err(EditError::invalid_target(
            "statement",
            format!("{:?} is not a statement", statement.kind()),
        ));
    }
    let indent = line_indent(statement);
    let green = parse_statement(&indent_lines(text, &indent, newline_style(statement)))?;
    Ok(statement.replace_with(green))
}

/// Replace the value part of a statement.
///
/// For an assignment `value` is an expression; for an application or a
/// method call it is an argument list (`"a", "b"`). Trailing closures and
/// surrounding trivia are kept.
pub fn replace_value(statement: &SyntaxNode, value: &str) -> Result<GreenNode, EditError> {
    let stmt = Statement::cast(statement.clone())
        .ok_or_else(|| EditError::invalid_target("statement", "not a statement"))?;
    let (target, fragment) = match &stmt {
        Statement::Assignment(assign) if !assign.has_error() => (
            assign.value().map(|v| v.syntax().clone()),
            format!("{PLACEHOLDER} = {value}"),
        ),
        Statement::Application(app) if !app.has_error() => (
            app.args().map(|a| a.syntax().clone()),
            format!("{PLACEHOLDER} {value}"),
        ),
        Statement::MethodCall(call) if !call.has_error() => {
            return replace_call_args(statement, call.args().map(|a| a.syntax().clone()), value);
        }
        _ => {
            return Err(EditError::invalid_target(
                "statement",
                "statement has no replaceable value",
            ));
        }
    };
    let target =
        target.ok_or_else(|| EditError::invalid_target("statement", "statement has no value"))?;
    let new_value = value_green(&fragment, target.kind())
        .ok_or_else(|| EditError::InvalidValue(value.to_string()))?;
    Ok(target.replace_with(new_value))
}

/// Swap the tokens between the parentheses of a method call.
fn replace_call_args(
    statement: &SyntaxNode,
    args: Option<SyntaxNode>,
    value: &str,
) -> Result<GreenNode, EditError> {
    if let Some(args) = args {
        let new_args = value_green(&format!("{PLACEHOLDER}({value})"), SyntaxKind::ARG_LIST)
            .ok_or_else(|| EditError::InvalidValue(value.to_string()))?;
        return Ok(args.replace_with(new_args));
    }
    let children: Vec<SyntaxElement> = statement.children_with_tokens().collect();
    let l_paren = children
        .iter()
        .position(|e| e.kind() == SyntaxKind::L_PAREN)
        .ok_or_else(|| EditError::invalid_target("statement", "method call has no '('"))?;
    let r_paren = children
        .iter()
        .position(|e| e.kind() == SyntaxKind::R_PAREN)
        .ok_or_else(|| EditError::invalid_target("statement", "method call has no ')'"))?;
    let new_args = value_green(&format!("{PLACEHOLDER}({value})"), SyntaxKind::ARG_LIST)
        .ok_or_else(|| EditError::InvalidValue(value.to_string()))?;
    let new_statement = statement
        .green()
        .splice_children(l_paren + 1..r_paren, [NodeOrToken::Node(new_args)]);
    Ok(statement.replace_with(new_statement))
}

/// Parse a placeholder statement and pull out the first node of `kind`
/// (or, for expressions, any expression node).
fn value_green(fragment: &str, kind: SyntaxKind) -> Option<GreenNode> {
    let parse = parse(fragment);
    if !parse.ok() {
        return None;
    }
    let root = parse.syntax();
    let stmt = root.children().find(|n| n.kind().is_statement())?;
    let wants_expr = super::ast::Expr::can_cast(kind);
    stmt.children()
        .find(|n| {
            if wants_expr {
                super::ast::Expr::can_cast(n.kind())
            } else {
                n.kind() == kind
            }
        })
        .map(|n| n.green().into_owned())
}

/// Leading whitespace of the line `node` starts on.
pub fn line_indent(node: &SyntaxNode) -> String {
    let mut parts = Vec::new();
    let mut token = node.first_token().and_then(|t| t.prev_token());
    while let Some(t) = token {
        if t.kind() == SyntaxKind::NEWLINE {
            break;
        }
        parts.push(t.text().to_string());
        token = t.prev_token();
    }
    let line: String = parts.into_iter().rev().collect();
    line.chars().take_while(|c| *c == ' ' || *c == '\t').collect()
}

/// Indentation for a new statement in `container`: that of the first
/// statement already on its own line, else the owner's indent plus `unit`.
pub fn child_indent(container: &SyntaxNode, unit: &str) -> String {
    let existing = container
        .children()
        .filter(|n| n.kind().is_statement())
        .find(|n| starts_line(n));
    if let Some(stmt) = existing {
        return line_indent(&stmt);
    }
    match container.kind() {
        SyntaxKind::BLOCK_BODY => {
            let outer = container.parent().map(|p| line_indent(&p)).unwrap_or_default();
            format!("{outer}{unit}")
        }
        _ => String::new(),
    }
}

fn starts_line(node: &SyntaxNode) -> bool {
    let mut token = node.first_token().and_then(|t| t.prev_token());
    while let Some(t) = token {
        match t.kind() {
            SyntaxKind::WHITESPACE => token = t.prev_token(),
            SyntaxKind::NEWLINE => return true,
            _ => return false,
        }
    }
    true
}

/// `"\r\n"` if the document already uses it, else `"\n"`.
fn newline_style(node: &SyntaxNode) -> &'static str {
    let root = node.ancestors().last().unwrap_or_else(|| node.clone());
    let crlf = root
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::NEWLINE)
        .is_some_and(|t| t.text() == "\r\n");
    if crlf { "\r\n" } else { "\n" }
}

fn indent_lines(text: &str, indent: &str, newline: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push_str(newline);
            if !line.is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
    out
}

fn newline_token(text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(SyntaxKind::NEWLINE.into(), text))
}

fn whitespace_token(text: &str) -> impl Iterator<Item = GreenElement> {
    (!text.is_empty())
        .then(|| NodeOrToken::Token(GreenToken::new(SyntaxKind::WHITESPACE.into(), text)))
        .into_iter()
}
