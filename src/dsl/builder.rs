//! Classification of CST statements into Dsl elements.

use super::element::{
    BlockElement, DslElement, ElementId, Literal, PropertyElement, RawValue, Reference,
    StatementForm, UnresolvedElement, Value,
};
use crate::base::ScopePath;
use crate::parser::ast::{Arg, ArgList, AstNode, Expr, SourceFile, Statement, unquote};
use crate::parser::{SyntaxKind, SyntaxNode};
use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

/// Walks a source file and produces its elements in document order.
pub(crate) struct TreeBuilder {
    elements: Vec<DslElement>,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub(crate) fn build(mut self, root: &SyntaxNode) -> Vec<DslElement> {
        if let Some(file) = SourceFile::cast(root.clone()) {
            self.walk(file.statements(), &ScopePath::root(), None);
        }
        self.elements
    }

    fn push(&mut self, element: DslElement) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    fn walk(
        &mut self,
        statements: impl Iterator<Item = Statement>,
        scope: &ScopePath,
        parent: Option<ElementId>,
    ) {
        for statement in statements {
            self.add_statement(statement, scope, parent);
        }
    }

    fn add_statement(&mut self, statement: Statement, scope: &ScopePath, parent: Option<ElementId>) {
        let syntax = statement.syntax().clone();
        let Some(segments) = statement.name_path().map(|p| p.segments()) else {
            debug!(
                "[ELEMENT_TREE] unresolved statement in {}: {:?}",
                scope,
                syntax.text()
            );
            self.push(DslElement::Unresolved(UnresolvedElement {
                scope: scope.clone(),
                parent,
                syntax,
            }));
            return;
        };
        let Some((name, prefix)) = segments.split_last() else {
            return;
        };
        let target = scope.join(&ScopePath::new(prefix.iter().cloned()));

        match &statement {
            Statement::Block(block) => {
                let block_scope = target.child(name.clone());
                let id = self.push(DslElement::Block(BlockElement {
                    name: name.clone(),
                    scope: block_scope.clone(),
                    parent,
                    syntax,
                }));
                if let Some(body) = block.body() {
                    self.walk(body.statements(), &block_scope, Some(id));
                }
            }
            Statement::Assignment(assign) => {
                let value = match assign.value() {
                    Some(expr) if !assign.has_error() => expr_raw_value(&expr),
                    _ => unresolved(&syntax),
                };
                self.push_property(name, target, StatementForm::Assignment, value, parent, syntax);
            }
            Statement::MethodCall(call) => {
                let value = if call.has_error() {
                    unresolved(&syntax)
                } else {
                    call.args()
                        .map(|args| args_raw_value(&args))
                        .unwrap_or_else(|| unresolved(&syntax))
                };
                let form = call_form(prefix);
                self.push_property(name, target, form, value, parent, syntax);
            }
            Statement::Application(app) => {
                let value = match app.args() {
                    Some(args) if !app.has_error() => args_raw_value(&args),
                    _ => unresolved(&syntax),
                };
                let form = call_form(prefix);
                self.push_property(name, target, form, value, parent, syntax);
            }
            Statement::Error(_) => {}
        }
    }

    fn push_property(
        &mut self,
        name: &SmolStr,
        scope: ScopePath,
        form: StatementForm,
        value: RawValue,
        parent: Option<ElementId>,
        syntax: SyntaxNode,
    ) {
        self.push(DslElement::Property(PropertyElement {
            name: name.clone(),
            scope,
            form,
            value,
            parent,
            syntax,
        }));
    }
}

fn call_form(prefix: &[SmolStr]) -> StatementForm {
    if prefix.is_empty() {
        StatementForm::BlockScoped
    } else {
        StatementForm::Application
    }
}

fn unresolved(syntax: &SyntaxNode) -> RawValue {
    RawValue::Unresolved(SmolStr::new(syntax.text().to_string()))
}

/// Payload of an argument list: one positional argument is the value
/// itself, several form a list, named arguments form a map.
fn args_raw_value(list: &ArgList) -> RawValue {
    let args: Vec<Arg> = list.args().collect();
    if args.iter().all(|a| matches!(a, Arg::Named(_))) && !args.is_empty() {
        let mut map = IndexMap::new();
        for arg in &args {
            let Arg::Named(named) = arg else { continue };
            match (named.key(), named.value().as_ref().and_then(expr_value)) {
                (Some(key), Some(value)) => {
                    map.insert(key, value);
                }
                _ => return unresolved(list.syntax()),
            }
        }
        return RawValue::Map(map);
    }
    match args.as_slice() {
        [Arg::Positional(expr)] => expr_raw_value(expr),
        _ => {
            let mut values = Vec::with_capacity(args.len());
            for arg in &args {
                match arg {
                    Arg::Positional(expr) => match expr_value(expr) {
                        Some(value) => values.push(value),
                        None => return unresolved(list.syntax()),
                    },
                    Arg::Named(_) => return unresolved(list.syntax()),
                }
            }
            RawValue::List(values)
        }
    }
}

fn expr_raw_value(expr: &Expr) -> RawValue {
    match expr {
        Expr::List(list) => {
            if list.has_error() {
                return unresolved(list.syntax());
            }
            let mut values = Vec::new();
            for item in list.items() {
                match expr_value(&item) {
                    Some(value) => values.push(value),
                    None => return unresolved(list.syntax()),
                }
            }
            RawValue::List(values)
        }
        Expr::Map(map) => {
            let mut entries = IndexMap::new();
            for entry in map.entries() {
                match (entry.key(), entry.value().as_ref().and_then(expr_value)) {
                    (Some(key), Some(value)) => {
                        entries.insert(key, value);
                    }
                    _ => return unresolved(map.syntax()),
                }
            }
            RawValue::Map(entries)
        }
        _ => match expr_value(expr) {
            Some(Value::Literal(literal)) => RawValue::Literal(literal),
            Some(Value::Reference(reference)) => RawValue::Reference(reference),
            None => unresolved(expr.syntax()),
        },
    }
}

/// A single value; lists, maps and `null` are not values.
fn expr_value(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Literal(literal) => {
            let token = literal.token()?;
            let literal = match token.kind() {
                SyntaxKind::STRING => Literal::String(unquote(token.text())),
                SyntaxKind::INTEGER | SyntaxKind::DECIMAL => {
                    Literal::Number(SmolStr::new(token.text()))
                }
                SyntaxKind::TRUE_KW => Literal::Bool(true),
                SyntaxKind::FALSE_KW => Literal::Bool(false),
                _ => return None,
            };
            Some(Value::Literal(literal))
        }
        Expr::Call(_) | Expr::Reference(_) => Some(Value::Reference(Reference::new(
            expr.syntax().text().to_string(),
        ))),
        Expr::List(_) | Expr::Map(_) => None,
    }
}
