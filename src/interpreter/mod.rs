//! The tree-walking evaluator: statement execution, expression
//! evaluation, and the scope/assignable-resolution machinery behind
//! assignment and compound assignment.
//!
//! Grounded on the teacher's `Interpreter::run_statement`/`run_expression`
//! split (`interpreter/mod.rs`), generalized from the teacher's
//! three-operator subset and single hardcoded `print` native call to the
//! full operator set of `crate::value::binary_op` and a general
//! native-function/native-class surface. The teacher's `Scope` (a
//! `Vec<HashMap<String, VariableType>>` of variable *types*, used only by
//! its typechecker-adjacent pass) is generalized here to a stack of
//! `HashMap<Rc<str>, Value>` frames holding actual runtime values, since
//! this crate has no separate typechecking pass.

use std::rc::Rc;
use std::collections::HashMap;

use crate::ast::{Ast, ForDecl, FunctionDecl, IfDecl, ParseNode, TableKey, WhileDecl};
use crate::environment::Environment;
use crate::error::EvalError;
use crate::lexer::{Token, TokenKind};
use crate::symbols::{Keyword, Separator};
use crate::value::{self, Array, FunctionRecord, Table, Value};

/// One function activation's scope stack. Lexical scoping is a plain
/// stack of frames pushed on block entry and popped on exit; an
/// unresolved read falls through to `Environment::globals`.
struct Frame {
    scopes: Vec<HashMap<Rc<str>, Value>>,
}

impl Frame {
    fn new() -> Self {
        Frame {
            scopes: vec![HashMap::new()],
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// `local` forces insertion into the innermost frame, shadowing any
    /// same-named binding in an outer frame.
    fn declare_local(&mut self, name: Rc<str>) {
        self.scopes
            .last_mut()
            .expect("at least one scope frame")
            .insert(name, Value::Null);
    }

    fn bind_param(&mut self, name: Rc<str>, value: Value) {
        self.scopes[0].insert(name, value);
    }

    /// Reading an unresolved bare identifier yields `Null` without
    /// touching global state; only a *write* auto-inserts into globals.
    fn read(&self, env: &Environment, name: &str) -> Value {
        for scope in self.scopes.iter().rev() {
            if let Some(v) = scope.get(name) {
                return v.clone();
            }
        }
        env.globals()
            .get(&Value::String(env.intern(name)))
            .unwrap_or(Value::Null)
    }

    fn write(&mut self, env: &Environment, name: Rc<str>, value: Value) {
        for scope in self.scopes.iter_mut().rev() {
            if scope.contains_key(name.as_ref()) {
                scope.insert(name, value);
                return;
            }
        }
        env.globals().set(Value::String(name), value);
    }
}

/// What a statement (or the body it ran) resolved to, threaded through
/// `exec_block` to implement `return`/`break`/`continue`.
enum Signal {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// An assignable location, replacing the source's literal "mutable
/// reference to a Value" with a capability-object Rust can express
/// without a long-lived borrow: a bare name is re-resolved by walking
/// the scope stack (then globals) at `get`/`set` time, and an indexed
/// target is just the already-evaluated `Value` it indexes into (tables,
/// arrays and native objects all carry their storage behind an `Rc`, so
/// holding the `Value` itself is enough to read or write through it
/// later).
enum Place {
    Scope { name: Rc<str> },
    Index { target: Value, key: Value },
}

fn place_get(env: &Environment, frame: &Frame, place: &Place) -> Result<Value, EvalError> {
    match place {
        Place::Scope { name } => Ok(frame.read(env, name)),
        Place::Index { target, key } => target.index(env, key),
    }
}

fn place_set(env: &Environment, frame: &mut Frame, place: &Place, value: Value) -> Result<(), EvalError> {
    match place {
        Place::Scope { name } => {
            frame.write(env, Rc::clone(name), value);
            Ok(())
        }
        Place::Index { target, key } => target.set_index(env, key.clone(), value),
    }
}

fn as_expr(node: &ParseNode) -> Result<&Ast, EvalError> {
    match node {
        ParseNode::Expression(ast) => Ok(ast),
        _ => Err(EvalError::type_error("malformed expression node")),
    }
}

/// The identifier text of a bare `space`-wrapped leaf, e.g. the callee
/// name in `f(args)` or the method name in `new Foo(args)`.
fn identifier_text(ast: &Ast) -> Result<String, EvalError> {
    if ast.operation != Separator::Space || ast.operands.len() != 1 {
        return Err(EvalError::type_error("expected a bare identifier"));
    }
    match &ast.operands[0] {
        ParseNode::Token(Token {
            kind: TokenKind::Identifier(name),
            ..
        }) => Ok(name.clone()),
        _ => Err(EvalError::type_error("expected a bare identifier")),
    }
}

/// Resolves an lvalue expression into a `Place`. A bare (possibly
/// `local`/`const`-qualified) identifier resolves to `Place::Scope`,
/// declaring it in the innermost frame first if `local` was present.
/// `target[key]` and `target.field` both resolve to `Place::Index` (the
/// target and key are evaluated eagerly; the mutation itself happens
/// later via `Value::set_index`, which already knows how to reach into
/// a table, array or native object).
fn resolve_place(env: &mut Environment, frame: &mut Frame, ast: &Ast) -> Result<Place, EvalError> {
    match ast.operation {
        Separator::Space => {
            let mut local = false;
            let mut name: Option<Rc<str>> = None;
            for operand in &ast.operands {
                if let ParseNode::Token(token) = operand {
                    match &token.kind {
                        TokenKind::Keyword(Keyword::Local) => local = true,
                        TokenKind::Keyword(Keyword::Const) => {}
                        TokenKind::Identifier(n) => name = Some(env.intern(n)),
                        _ => {}
                    }
                }
            }
            let name = name.ok_or_else(|| {
                EvalError::type_error("expected an assignable identifier")
            })?;
            if local {
                frame.declare_local(Rc::clone(&name));
            }
            Ok(Place::Scope { name })
        }
        Separator::Index => {
            if ast.operands.len() != 2 {
                return Err(EvalError::type_error(
                    "cannot assign to a ranged selection",
                ));
            }
            let target = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
            let key = eval_expr(env, frame, as_expr(&ast.operands[1])?)?;
            Ok(Place::Index { target, key })
        }
        Separator::Dot => {
            let target = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
            let name = identifier_text(as_expr(&ast.operands[1])?)?;
            Ok(Place::Index {
                target,
                key: Value::String(env.intern(&name)),
            })
        }
        _ => Err(EvalError::type_error("expression is not assignable")),
    }
}

/// Evaluates a literal/identifier leaf token.
fn eval_token(env: &Environment, frame: &Frame, token: &Token) -> Result<Value, EvalError> {
    match &token.kind {
        TokenKind::IntegerLiteral(i) => Ok(Value::Integer(*i)),
        TokenKind::NumberLiteral(n) => Ok(Value::Number(*n)),
        TokenKind::StringLiteral(s) => Ok(Value::String(env.intern(s))),
        TokenKind::Identifier(name) => Ok(frame.read(env, name)),
        TokenKind::Keyword(Keyword::True) => Ok(Value::Boolean(true)),
        TokenKind::Keyword(Keyword::False) => Ok(Value::Boolean(false)),
        TokenKind::Keyword(Keyword::Null) => Ok(Value::Null),
        TokenKind::Keyword(_) => Err(EvalError::type_error("unexpected keyword in expression")),
        TokenKind::Separator(_) => Err(EvalError::type_error("unexpected operator token")),
    }
}

/// A qualifier-only statement such as `local x;` with no assignment:
/// declares the name in the innermost scope, per `resolve_place`'s
/// `Space` handling, and yields `Null`.
fn eval_bare_qualified(env: &mut Environment, frame: &mut Frame, operands: &[ParseNode]) -> Result<Value, EvalError> {
    let position = operands.first().map(|n| n.position()).unwrap_or((0, 0));
    let ast = Ast {
        operation: Separator::Space,
        operands: operands.to_vec(),
        position,
    };
    resolve_place(env, frame, &ast)?;
    Ok(Value::Null)
}

fn eval_expr(env: &mut Environment, frame: &mut Frame, ast: &Ast) -> Result<Value, EvalError> {
    eval_expr_inner(env, frame, ast).map_err(|e| e.at(ast.position))
}

fn eval_expr_inner(env: &mut Environment, frame: &mut Frame, ast: &Ast) -> Result<Value, EvalError> {
    use Separator::*;

    match ast.operation {
        Space => match ast.operands.as_slice() {
            [] => Ok(Value::Null),
            [ParseNode::Token(token)] => eval_token(env, frame, token),
            [ParseNode::Empty] => Ok(Value::Null),
            [ParseNode::ImmediateArray(items)] => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(eval_expr(env, frame, item)?);
                }
                Ok(Value::Array(Array::new(values)))
            }
            [ParseNode::ImmediateTable(entries)] => {
                let table = Table::new();
                for (key, value_ast) in entries {
                    let key_value = match key {
                        TableKey::Ident(name) => Value::String(env.intern(name)),
                        TableKey::Computed(ast) => eval_expr(env, frame, ast)?,
                    };
                    let value = eval_expr(env, frame, value_ast)?;
                    table.set(key_value, value);
                }
                Ok(Value::Table(table))
            }
            operands if operands.iter().any(is_qualifier_token) => {
                eval_bare_qualified(env, frame, operands)
            }
            _ => Err(EvalError::type_error("malformed expression")),
        },

        Assignment => {
            let lhs = as_expr(&ast.operands[0])?;
            let rhs = as_expr(&ast.operands[1])?;
            let place = resolve_place(env, frame, lhs)?;
            let value = eval_expr(env, frame, rhs)?;
            place_set(env, frame, &place, value.clone())?;
            Ok(value)
        }

        op if op.is_compound_assignment() => {
            let lhs = as_expr(&ast.operands[0])?;
            let rhs = as_expr(&ast.operands[1])?;
            let place = resolve_place(env, frame, lhs)?;
            let current = place_get(env, frame, &place)?;
            let rhs_value = eval_expr(env, frame, rhs)?;
            let underlying = op.underlying_arithmetic().expect("compound assignment has an underlying operator");
            let new_value = value::binary_op(env, underlying, current, rhs_value)?;
            place_set(env, frame, &place, new_value.clone())?;
            Ok(new_value)
        }

        LogicalOr => {
            let lhs = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
            if let Value::NativeObject(obj) = &lhs {
                let rhs = eval_expr(env, frame, as_expr(&ast.operands[1])?)?;
                return obj.binary_op(LogicalOr, &rhs);
            }
            if lhs.truthy() {
                Ok(lhs)
            } else {
                eval_expr(env, frame, as_expr(&ast.operands[1])?)
            }
        }

        LogicalAnd => {
            let lhs = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
            if let Value::NativeObject(obj) = &lhs {
                let rhs = eval_expr(env, frame, as_expr(&ast.operands[1])?)?;
                return obj.binary_op(LogicalAnd, &rhs);
            }
            if lhs.truthy() {
                eval_expr(env, frame, as_expr(&ast.operands[1])?)
            } else {
                Ok(Value::Boolean(false))
            }
        }

        LogicalNot => {
            let operand = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
            Ok(value::logical_not(&operand))
        }

        BitwiseNot => {
            let operand = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
            value::bitwise_not(&operand)
        }

        Length => {
            let operand = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
            operand.length()
        }

        Ternary => {
            let cond = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
            if cond.truthy() {
                eval_expr(env, frame, as_expr(&ast.operands[1])?)
            } else {
                eval_expr(env, frame, as_expr(&ast.operands[2])?)
            }
        }

        PrefixIncrement | PostfixIncrement | PrefixDecrement | PostfixDecrement => {
            eval_increment_decrement(env, frame, ast.operation, as_expr(&ast.operands[0])?)
        }

        NewObject => eval_new(env, frame, as_expr(&ast.operands[0])?),

        Index => {
            let target = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
            if ast.operands.len() == 3 {
                let lower = eval_expr(env, frame, as_expr(&ast.operands[1])?)?;
                let upper = eval_expr(env, frame, as_expr(&ast.operands[2])?)?;
                target.ranged_index(env, &lower, &upper)
            } else {
                let key = eval_expr(env, frame, as_expr(&ast.operands[1])?)?;
                target.index(env, &key)
            }
        }

        Dot => eval_dot(env, frame, ast),

        Call => {
            let callee = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
            let mut args = Vec::with_capacity(ast.operands.len().saturating_sub(1));
            for operand in &ast.operands[1..] {
                args.push(eval_expr(env, frame, as_expr(operand)?)?);
            }
            call_value(env, &callee, args)
        }

        Addition | Subtraction | Multiplication | Division | Modulus | Exponent | BitwiseOr
        | BitwiseAnd | BitwiseXor | ShiftLeft | ShiftRight | Equality | InverseEquality
        | Greater | Lesser | GreaterEquality | LesserEquality => {
            let lhs = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
            let rhs = eval_expr(env, frame, as_expr(&ast.operands[1])?)?;
            value::binary_op(env, ast.operation, lhs, rhs)
        }

        other => Err(EvalError::type_error(format!(
            "{other:?} cannot appear in expression position"
        ))),
    }
}

fn is_qualifier_token(node: &ParseNode) -> bool {
    matches!(
        node,
        ParseNode::Token(Token {
            kind: TokenKind::Keyword(Keyword::Local | Keyword::Const),
            ..
        })
    )
}

/// `a.f` is plain member access; `a.f(args)` is a method call, which —
/// because the parser folds a trailing call onto the bare name before
/// the `.` itself reduces — shows up as `Dot(a, Call(f, args))` rather
/// than `Call(Dot(a, f), args)`. Both shapes are handled here so the
/// method receiver becomes the call's implicit first argument.
fn eval_dot(env: &mut Environment, frame: &mut Frame, ast: &Ast) -> Result<Value, EvalError> {
    let target = eval_expr(env, frame, as_expr(&ast.operands[0])?)?;
    let rhs = as_expr(&ast.operands[1])?;

    if rhs.operation == Separator::Call {
        let name = identifier_text(as_expr(&rhs.operands[0])?)?;
        let method = target.index(env, &Value::String(env.intern(&name)))?;
        let mut args = Vec::with_capacity(rhs.operands.len());
        args.push(target);
        for operand in &rhs.operands[1..] {
            args.push(eval_expr(env, frame, as_expr(operand)?)?);
        }
        return call_value(env, &method, args);
    }

    let name = identifier_text(rhs)?;
    target.index(env, &Value::String(env.intern(&name)))
}

fn eval_new(env: &mut Environment, frame: &mut Frame, operand: &Ast) -> Result<Value, EvalError> {
    if operand.operation != Separator::Call {
        return Err(EvalError::type_error("'new' requires a constructor call"));
    }
    let name = identifier_text(as_expr(&operand.operands[0])?)?;
    let mut args = Vec::with_capacity(operand.operands.len().saturating_sub(1));
    for a in &operand.operands[1..] {
        args.push(eval_expr(env, frame, as_expr(a)?)?);
    }
    let class = env.get_native_class(&name)?;
    (class.constructor)(env, &args)
}

fn eval_increment_decrement(
    env: &mut Environment,
    frame: &mut Frame,
    op: Separator,
    operand_ast: &Ast,
) -> Result<Value, EvalError> {
    let place = resolve_place(env, frame, operand_ast)?;
    let current = place_get(env, frame, &place)?;

    if let Value::NativeObject(obj) = &current {
        return match op {
            Separator::PrefixIncrement => obj.prefix_increment(),
            Separator::PostfixIncrement => obj.postfix_increment(),
            Separator::PrefixDecrement => obj.prefix_decrement(),
            Separator::PostfixDecrement => obj.postfix_decrement(),
            _ => unreachable!(),
        };
    }

    let delta = match op {
        Separator::PrefixIncrement | Separator::PostfixIncrement => Value::Integer(1),
        _ => Value::Integer(-1),
    };
    let new_value = value::binary_op(env, Separator::Addition, current.clone(), delta)?;
    place_set(env, frame, &place, new_value.clone())?;
    match op {
        Separator::PrefixIncrement | Separator::PrefixDecrement => Ok(new_value),
        _ => Ok(current),
    }
}

/// Runs a statement list as its own scope, threading `return`/`break`/
/// `continue` up through nested blocks. `if`/`else if`/`else` are a
/// chain of *separate* sibling statements (not a single nested node), so
/// this loop tracks whether the previous member of the chain ran to
/// decide whether the next one is even considered — the "prior_eval"
/// threading the language reference's interpreter design describes.
fn exec_block(env: &mut Environment, frame: &mut Frame, stmts: &[ParseNode]) -> Result<Signal, EvalError> {
    frame.push_scope();
    let mut chain_taken: Option<bool> = None;
    let result = (|| {
        for stmt in stmts {
            match stmt {
                ParseNode::IfDecl(decl) => {
                    let taken = run_if_arm(env, frame, decl)?;
                    if let Some(signal) = taken.1 {
                        return Ok(signal);
                    }
                    chain_taken = Some(taken.0);
                }
                ParseNode::ElseIfDecl(decl) => {
                    if chain_taken == Some(false) {
                        let taken = run_if_arm(env, frame, decl)?;
                        if let Some(signal) = taken.1 {
                            return Ok(signal);
                        }
                        chain_taken = Some(taken.0);
                    }
                }
                ParseNode::ElseDecl(body) => {
                    if chain_taken == Some(false) {
                        if let Some(signal) = run_body(env, frame, body)? {
                            return Ok(signal);
                        }
                    }
                    chain_taken = None;
                }
                other => {
                    chain_taken = None;
                    match exec_statement(env, frame, other)? {
                        Signal::Normal => {}
                        signal => return Ok(signal),
                    }
                }
            }
        }
        Ok(Signal::Normal)
    })();
    frame.pop_scope();
    result
}

/// Evaluates one `if`/`else if` arm: returns `(condition_truth,
/// early_exit_signal)`. `early_exit_signal` is `Some` only when the body
/// ran and produced a non-`Normal` signal that must propagate past the
/// rest of the chain.
fn run_if_arm(env: &mut Environment, frame: &mut Frame, decl: &IfDecl) -> Result<(bool, Option<Signal>), EvalError> {
    let truth = eval_expr(env, frame, &decl.condition)?.truthy();
    if !truth {
        return Ok((false, None));
    }
    let signal = run_body(env, frame, &decl.body)?;
    Ok((true, signal))
}

fn run_body(env: &mut Environment, frame: &mut Frame, body: &ParseNode) -> Result<Option<Signal>, EvalError> {
    let ParseNode::Block(stmts) = body else {
        return Err(EvalError::type_error("malformed statement body"));
    };
    match exec_block(env, frame, stmts)? {
        Signal::Normal => Ok(None),
        other => Ok(Some(other)),
    }
}

fn exec_statement(env: &mut Environment, frame: &mut Frame, stmt: &ParseNode) -> Result<Signal, EvalError> {
    exec_statement_inner(env, frame, stmt).map_err(|e| e.at(stmt.position()))
}

fn exec_statement_inner(env: &mut Environment, frame: &mut Frame, stmt: &ParseNode) -> Result<Signal, EvalError> {
    match stmt {
        ParseNode::Expression(ast) => {
            eval_expr(env, frame, ast)?;
            Ok(Signal::Normal)
        }
        ParseNode::Block(stmts) => exec_block(env, frame, stmts),
        ParseNode::ForDecl(decl) => exec_for(env, frame, decl),
        ParseNode::WhileDecl(decl) => exec_while(env, frame, decl),
        ParseNode::FunctionDecl(decl) => exec_function_decl(env, frame, decl),
        ParseNode::ReturnStmt(value) => {
            let v = match value {
                Some(ast) => eval_expr(env, frame, ast)?,
                None => Value::Null,
            };
            Ok(Signal::Return(v))
        }
        ParseNode::Break => Ok(Signal::Break),
        ParseNode::Continue => Ok(Signal::Continue),
        ParseNode::IfDecl(_) | ParseNode::ElseIfDecl(_) | ParseNode::ElseDecl(_) => {
            unreachable!("if-chain nodes are handled directly by exec_block")
        }
        ParseNode::DoDecl | ParseNode::SwitchDecl | ParseNode::ClassDecl => Err(
            EvalError::type_error("this construct is not supported"),
        ),
        other => Err(EvalError::type_error(format!(
            "{other:?} cannot appear as a statement"
        ))),
    }
}

fn exec_for(env: &mut Environment, frame: &mut Frame, decl: &ForDecl) -> Result<Signal, EvalError> {
    frame.push_scope();
    let outcome = (|| {
        eval_expr(env, frame, &decl.init)?;
        loop {
            if !decl.condition.is_empty() && !eval_expr(env, frame, &decl.condition)?.truthy() {
                break;
            }
            if let Some(signal) = run_body(env, frame, &decl.body)? {
                match signal {
                    Signal::Break => break,
                    Signal::Continue => {}
                    Signal::Return(v) => return Ok(Signal::Return(v)),
                    Signal::Normal => {}
                }
            }
            eval_expr(env, frame, &decl.iteration)?;
        }
        Ok(Signal::Normal)
    })();
    frame.pop_scope();
    outcome
}

fn exec_while(env: &mut Environment, frame: &mut Frame, decl: &WhileDecl) -> Result<Signal, EvalError> {
    loop {
        if !eval_expr(env, frame, &decl.condition)?.truthy() {
            return Ok(Signal::Normal);
        }
        if let Some(signal) = run_body(env, frame, &decl.body)? {
            match signal {
                Signal::Break => return Ok(Signal::Normal),
                Signal::Continue => continue,
                Signal::Return(v) => return Ok(Signal::Return(v)),
                Signal::Normal => {}
            }
        }
    }
}

fn exec_function_decl(env: &mut Environment, frame: &mut Frame, decl: &FunctionDecl) -> Result<Signal, EvalError> {
    let params: Vec<Rc<str>> = decl
        .params
        .iter()
        .map(|p| env.intern(&p.name))
        .collect();
    let body = match decl.body.as_ref() {
        ParseNode::Block(_) => Rc::new((*decl.body).clone()),
        _ => return Err(EvalError::type_error("function body must be a block")),
    };

    let name_ast = decl
        .ast_name()
        .ok_or_else(|| EvalError::type_error("malformed function name"))?;

    if name_ast.operation == Separator::Dot {
        let target = eval_expr(env, frame, as_expr(&name_ast.operands[0])?)?;
        let method_name = identifier_text(as_expr(&name_ast.operands[1])?)?;
        let record = FunctionRecord::Interpreted {
            name: Some(env.intern(&method_name)),
            params,
            body,
        };
        target.set_index(env, Value::String(env.intern(&method_name)), Value::Function(Rc::new(record)))?;
        return Ok(Signal::Normal);
    }

    let name = env.intern(&identifier_text(name_ast)?);
    let record = FunctionRecord::Interpreted {
        name: Some(Rc::clone(&name)),
        params,
        body,
    };
    let value = Value::Function(Rc::new(record));
    if decl.tag.is_local() {
        frame.declare_local(Rc::clone(&name));
        frame.write(env, name, value);
    } else {
        env.globals().set(Value::String(name), value);
    }
    Ok(Signal::Normal)
}

/// Invokes a callable value with already-evaluated arguments: an
/// interpreted function runs in a fresh scope stack (this language has
/// no closures — each call starts clean, with unresolved names falling
/// through to the shared global table), a native function reads its
/// arguments off `Environment`'s argument stack, a `NativeObject`
/// dispatches its `call` slot, and anything else yields `Null` (the
/// source's literal non-callable fallback).
pub fn call_value(env: &mut Environment, callee: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
    match callee {
        Value::Function(record) => match record.as_ref() {
            FunctionRecord::Interpreted { params, body, .. } => {
                let mut frame = Frame::new();
                for (i, name) in params.iter().enumerate() {
                    let value = args.get(i).cloned().unwrap_or(Value::Null);
                    frame.bind_param(Rc::clone(name), value);
                }
                let ParseNode::Block(stmts) = body.as_ref() else {
                    return Err(EvalError::type_error("function body must be a block"));
                };
                match exec_block(env, &mut frame, stmts)? {
                    Signal::Return(v) => Ok(v),
                    _ => Ok(Value::Null),
                }
            }
            FunctionRecord::Native(native) => {
                env.push_args(args);
                let result = native(env);
                env.pop_args();
                result
            }
        },
        Value::NativeObject(obj) => obj.call(env, &args),
        _ => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn run(source: &str) -> Result<Value, Error> {
        let mut env = Environment::new();
        let program = env.compile(source)?;
        Ok(env.call(&program, Vec::new())?)
    }

    #[test]
    fn arithmetic_precedence() {
        let v = run("return 1 + 2 * 3;").unwrap();
        assert!(matches!(v, Value::Integer(7)));
    }

    #[test]
    fn fib_recursive() {
        let v = run(
            "function fib(n) { if (n < 2) { return n; } return fib(n - 1) + fib(n - 2); } return fib(10);",
        )
        .unwrap();
        assert!(matches!(v, Value::Integer(55)));
    }

    #[test]
    fn compound_assignment() {
        let v = run("local x = 1; x += 4; x *= 2; return x;").unwrap();
        assert!(matches!(v, Value::Integer(10)));
    }

    #[test]
    fn string_concatenation_length() {
        let v = run("local s = \"foo\" + \"bar\"; return #s;").unwrap();
        assert!(matches!(v, Value::Integer(6)));
    }

    #[test]
    fn table_field_read_write() {
        let v = run("local t = { a = 1 }; t[\"a\"] = t[\"a\"] + 1; return t[\"a\"];").unwrap();
        assert!(matches!(v, Value::Integer(2)));
    }

    #[test]
    fn array_slicing() {
        let v = run("local a = [10, 20, 30, 40]; local b = a[1:2]; return #b;").unwrap();
        assert!(matches!(v, Value::Integer(2)));
    }

    #[test]
    fn for_loop_summation() {
        let v = run("local sum = 0; for (local i = 0; i < 5; i += 1) { sum += i; } return sum;").unwrap();
        assert!(matches!(v, Value::Integer(10)));
    }

    #[test]
    fn while_loop_with_continue() {
        let v = run(
            "local i = 0; local sum = 0; while (i < 5) { i += 1; if (i == 3) { continue; } sum += i; } return sum;",
        )
        .unwrap();
        assert!(matches!(v, Value::Integer(12)));
    }

    #[test]
    fn short_circuit_does_not_evaluate_rhs() {
        let v = run("local x = 0; local r = true || (x = 1); return x;").unwrap();
        assert!(matches!(v, Value::Integer(0)));
    }

    #[test]
    fn exponent_is_right_associative() {
        let v = run("return 2 ^ 3 ^ 2;").unwrap();
        assert!(matches!(v, Value::Number(n) if n == 512.0));
    }
}
