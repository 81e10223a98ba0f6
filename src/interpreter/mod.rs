// File: src/interpreter/mod.rs
//
// Tree-walking evaluator for Nix expressions.
// Walks the AST recursively, resolving identifiers through a chain of
// environment frames, applying functions strictly, and evaluating
// recursive attribute sets in two phases (literal seeds first, then the
// remaining bindings with the recursive frame in scope).

mod environment;
mod value;

pub use environment::Environment;
pub use value::{format_float, AttrMap, Builtin, BuiltinFn, Function, Value};

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use log::debug;

use crate::ast::{AttrBinding, BinaryOp, Expr, ExprKind, InheritClause, Pattern, SourcePos, UnaryOp};
use crate::builtins;
use crate::errors::{EvalError, EvalErrorKind};

/// Evaluates expressions against a registry of built-ins and a base
/// directory used to resolve relative path literals.
pub struct Evaluator {
    base_dir: PathBuf,
    builtins: HashMap<String, Value>,
}

impl Evaluator {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let builtins = builtins::registry();
        debug!("registered {} built-ins", builtins.len());
        Evaluator {
            base_dir: base_dir.into(),
            builtins,
        }
    }

    /// Evaluates an expression in a fresh top-level environment with all
    /// built-ins pre-bound.
    pub fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        let env = Environment::new();
        for (name, value) in &self.builtins {
            env.define(name.clone(), value.clone());
        }
        self.eval_expr(expr, &env)
    }

    /// Evaluates an expression in an existing environment. Used for
    /// function bodies and anywhere bindings are already in scope.
    pub fn eval_with_env(&self, expr: &Expr, env: &Rc<Environment>) -> Result<Value, EvalError> {
        self.eval_expr(expr, env)
    }

    fn eval_expr(&self, expr: &Expr, env: &Rc<Environment>) -> Result<Value, EvalError> {
        match &expr.kind {
            ExprKind::Int(v) => Ok(Value::Int(*v)),
            ExprKind::Float(v) => Ok(Value::Float(*v)),
            ExprKind::Str { value, .. } => Ok(Value::string(value)),
            ExprKind::Bool(v) => Ok(Value::Bool(*v)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Path { value, absolute } => {
                Ok(Value::path(self.resolve_path(value, *absolute)))
            }
            ExprKind::Ident(name) => env.get(name).ok_or_else(|| {
                EvalError::with_pos(
                    EvalErrorKind::UndefinedVariable,
                    format!("undefined variable: {}", name),
                    expr.pos,
                )
            }),
            ExprKind::List(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expr(element, env)?);
                }
                Ok(Value::list(values))
            }
            ExprKind::AttrSet {
                recursive,
                bindings,
                inherits,
            } => self.eval_attr_set(*recursive, bindings, inherits, env, expr.pos),
            ExprKind::Binary { left, op, right } => {
                self.eval_binary(left, *op, right, env, expr.pos)
            }
            ExprKind::Unary { op, expr: operand } => self.eval_unary(*op, operand, env, expr.pos),
            ExprKind::If {
                cond,
                then,
                otherwise,
            } => {
                let value = self.eval_expr(cond, env)?;
                match value {
                    Value::Bool(true) => self.eval_expr(then, env),
                    Value::Bool(false) => self.eval_expr(otherwise, env),
                    other => Err(EvalError::with_pos(
                        EvalErrorKind::TypeMismatch,
                        format!("if condition must be a boolean, got {}", other.type_name()),
                        cond.pos,
                    )),
                }
            }
            ExprKind::Let { bindings, body } => {
                // Strict and sequential: each binding sees the ones
                // before it, never the ones after.
                let frame = env.extend();
                for binding in bindings {
                    let value = self.eval_expr(&binding.value, &frame)?;
                    frame.define(binding.name.clone(), value);
                }
                self.eval_expr(body, &frame)
            }
            ExprKind::With { scope, body } => {
                let value = self.eval_expr(scope, env)?;
                let attrs = match value {
                    Value::Attrs(attrs) => attrs,
                    other => {
                        return Err(EvalError::with_pos(
                            EvalErrorKind::TypeMismatch,
                            format!(
                                "with expression requires an attribute set, got {}",
                                other.type_name()
                            ),
                            scope.pos,
                        ))
                    }
                };
                let frame = env.extend();
                for (key, value) in attrs.iter() {
                    frame.define(key.clone(), value.clone());
                }
                self.eval_expr(body, &frame)
            }
            ExprKind::Assert { cond, body } => {
                let value = self.eval_expr(cond, env)?;
                match value {
                    Value::Bool(true) => self.eval_expr(body, env),
                    Value::Bool(false) => Err(EvalError::with_pos(
                        EvalErrorKind::AssertionFailed,
                        "assertion failed",
                        cond.pos,
                    )),
                    other => Err(EvalError::with_pos(
                        EvalErrorKind::TypeMismatch,
                        format!(
                            "assert condition must be a boolean, got {}",
                            other.type_name()
                        ),
                        cond.pos,
                    )),
                }
            }
            ExprKind::Function { param, body } => Ok(Value::Function(Rc::new(Function {
                param: param.clone(),
                body: Rc::clone(body),
                env: Rc::clone(env),
            }))),
            ExprKind::Apply { func, arg } => {
                let callee = self.eval_expr(func, env)?;
                let argument = self.eval_expr(arg, env)?;
                self.apply(callee, argument, expr.pos)
            }
            ExprKind::Select {
                target,
                path,
                default,
            } => self.eval_select(target, path, default.as_deref(), env, expr.pos),
            ExprKind::HasAttr { target, path } => {
                let mut current = self.eval_expr(target, env)?;
                for key in path {
                    let attrs = match &current {
                        Value::Attrs(attrs) => Rc::clone(attrs),
                        _ => return Ok(Value::Bool(false)),
                    };
                    match attrs.get(key) {
                        Some(next) => current = next.clone(),
                        None => return Ok(Value::Bool(false)),
                    }
                }
                Ok(Value::Bool(true))
            }
        }
    }

    // --- functions ---------------------------------------------------------

    /// Applies a callable to one argument. Built-ins accumulate arguments
    /// until their arity is reached, so partial application of a binary
    /// built-in yields a value.
    pub fn apply(
        &self,
        callee: Value,
        argument: Value,
        pos: SourcePos,
    ) -> Result<Value, EvalError> {
        match callee {
            Value::Function(func) => {
                let frame = func.env.extend();
                bind_param(&func.param, argument, &frame, pos)?;
                self.eval_expr(&func.body, &frame)
            }
            Value::Builtin(mut builtin) => {
                builtin.applied.push(argument);
                if builtin.applied.len() < builtin.arity {
                    Ok(Value::Builtin(builtin))
                } else {
                    let args = std::mem::take(&mut builtin.applied);
                    builtin.invoke(&args).map_err(|e| e.at(pos))
                }
            }
            other => Err(EvalError::with_pos(
                EvalErrorKind::NonFunctionApply,
                format!("cannot apply {} as a function", other.type_name()),
                pos,
            )),
        }
    }

    // --- operators ---------------------------------------------------------

    fn eval_binary(
        &self,
        left: &Expr,
        op: BinaryOp,
        right: &Expr,
        env: &Rc<Environment>,
        pos: SourcePos,
    ) -> Result<Value, EvalError> {
        // The logical operators evaluate their right side conditionally
        match op {
            BinaryOp::And => return self.eval_and(left, right, env),
            BinaryOp::Or => return self.eval_or(left, right, env),
            BinaryOp::Implies => return self.eval_implies(left, right, env),
            _ => {}
        }

        let lhs = self.eval_expr(left, env)?;
        let rhs = self.eval_expr(right, env)?;

        match op {
            BinaryOp::Add => eval_add(&lhs, &rhs).map_err(|e| e.at(pos)),
            BinaryOp::Sub => eval_sub(&lhs, &rhs).map_err(|e| e.at(pos)),
            BinaryOp::Mul => eval_mul(&lhs, &rhs).map_err(|e| e.at(pos)),
            BinaryOp::Div => eval_div(&lhs, &rhs).map_err(|e| e.at(pos)),
            BinaryOp::Concat => eval_concat(&lhs, &rhs).map_err(|e| e.at(pos)),
            BinaryOp::Update => eval_update(&lhs, &rhs).map_err(|e| e.at(pos)),
            BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
            BinaryOp::NotEq => Ok(Value::Bool(lhs != rhs)),
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => {
                eval_compare(op, &lhs, &rhs).map_err(|e| e.at(pos))
            }
            _ => Err(EvalError::with_pos(
                EvalErrorKind::TypeMismatch,
                format!("unknown binary operator {}", op),
                pos,
            )),
        }
    }

    fn eval_and(
        &self,
        left: &Expr,
        right: &Expr,
        env: &Rc<Environment>,
    ) -> Result<Value, EvalError> {
        if !self.eval_bool_operand(left, env, "&&")? {
            return Ok(Value::Bool(false));
        }
        Ok(Value::Bool(self.eval_bool_operand(right, env, "&&")?))
    }

    fn eval_or(
        &self,
        left: &Expr,
        right: &Expr,
        env: &Rc<Environment>,
    ) -> Result<Value, EvalError> {
        if self.eval_bool_operand(left, env, "||")? {
            return Ok(Value::Bool(true));
        }
        Ok(Value::Bool(self.eval_bool_operand(right, env, "||")?))
    }

    fn eval_implies(
        &self,
        left: &Expr,
        right: &Expr,
        env: &Rc<Environment>,
    ) -> Result<Value, EvalError> {
        if !self.eval_bool_operand(left, env, "->")? {
            return Ok(Value::Bool(true));
        }
        Ok(Value::Bool(self.eval_bool_operand(right, env, "->")?))
    }

    fn eval_bool_operand(
        &self,
        expr: &Expr,
        env: &Rc<Environment>,
        op: &str,
    ) -> Result<bool, EvalError> {
        match self.eval_expr(expr, env)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::with_pos(
                EvalErrorKind::TypeMismatch,
                format!("{} requires boolean operands, got {}", op, other.type_name()),
                expr.pos,
            )),
        }
    }

    fn eval_unary(
        &self,
        op: UnaryOp,
        operand: &Expr,
        env: &Rc<Environment>,
        pos: SourcePos,
    ) -> Result<Value, EvalError> {
        let value = self.eval_expr(operand, env)?;
        match op {
            UnaryOp::Not => match value {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(EvalError::with_pos(
                    EvalErrorKind::TypeMismatch,
                    format!("! operator requires a boolean operand, got {}", other.type_name()),
                    pos,
                )),
            },
            UnaryOp::Neg => match value {
                Value::Int(i) => Ok(Value::Int(-i)),
                Value::Float(f) => Ok(Value::Float(-f)),
                other => Err(EvalError::with_pos(
                    EvalErrorKind::TypeMismatch,
                    format!("- operator requires a numeric operand, got {}", other.type_name()),
                    pos,
                )),
            },
        }
    }

    // --- attribute sets ----------------------------------------------------

    fn eval_attr_set(
        &self,
        recursive: bool,
        bindings: &[AttrBinding],
        inherits: &[InheritClause],
        env: &Rc<Environment>,
        pos: SourcePos,
    ) -> Result<Value, EvalError> {
        let mut map = AttrMap::new();

        if recursive {
            let rec_env = env.extend();

            // Inherited names resolve in the enclosing scope and seed
            // the recursive frame like phase-1 bindings.
            self.eval_inherits(inherits, env, Some(&rec_env), &mut map, pos)?;

            // Phase 1: seed simple literals so later bindings can
            // reference them.
            for binding in bindings {
                if binding.path.len() == 1 && is_simple_expr(&binding.value) {
                    let value = self.eval_expr(&binding.value, &rec_env)?;
                    map.insert(binding.path[0].clone(), value.clone());
                    rec_env.define(binding.path[0].clone(), value);
                }
            }

            // Phase 2: the remaining top-level bindings in textual
            // order, each installed into the frame before the next one
            // is evaluated.
            for binding in bindings {
                if binding.path.len() == 1 && !is_simple_expr(&binding.value) {
                    let value = self.eval_expr(&binding.value, &rec_env)?;
                    map.insert(binding.path[0].clone(), value.clone());
                    rec_env.define(binding.path[0].clone(), value);
                }
            }

            // Nested paths install last, creating intermediate sets.
            for binding in bindings {
                if binding.path.len() > 1 {
                    let value = self.eval_expr(&binding.value, &rec_env)?;
                    set_nested_attr(&mut map, &binding.path, value, binding.value.pos)?;
                }
            }
        } else {
            self.eval_inherits(inherits, env, None, &mut map, pos)?;
            for binding in bindings {
                let value = self.eval_expr(&binding.value, env)?;
                if binding.path.len() == 1 {
                    map.insert(binding.path[0].clone(), value);
                } else {
                    set_nested_attr(&mut map, &binding.path, value, binding.value.pos)?;
                }
            }
        }

        Ok(Value::attrs(map))
    }

    fn eval_inherits(
        &self,
        inherits: &[InheritClause],
        env: &Rc<Environment>,
        rec_env: Option<&Rc<Environment>>,
        map: &mut AttrMap,
        pos: SourcePos,
    ) -> Result<(), EvalError> {
        for clause in inherits {
            let source = match &clause.from {
                Some(from) => match self.eval_expr(from, env)? {
                    Value::Attrs(attrs) => Some(attrs),
                    other => {
                        return Err(EvalError::with_pos(
                            EvalErrorKind::TypeMismatch,
                            format!(
                                "inherit source must be an attribute set, got {}",
                                other.type_name()
                            ),
                            from.pos,
                        ))
                    }
                },
                None => None,
            };

            for name in &clause.names {
                let value = match &source {
                    Some(attrs) => attrs.get(name).cloned().ok_or_else(|| {
                        EvalError::with_pos(
                            EvalErrorKind::MissingAttr,
                            format!("attribute '{}' not found", name),
                            pos,
                        )
                    })?,
                    None => env.get(name).ok_or_else(|| {
                        EvalError::with_pos(
                            EvalErrorKind::UndefinedVariable,
                            format!("undefined variable: {}", name),
                            pos,
                        )
                    })?,
                };
                map.insert(name.clone(), value.clone());
                if let Some(rec_env) = rec_env {
                    rec_env.define(name.clone(), value);
                }
            }
        }
        Ok(())
    }

    // --- selection ---------------------------------------------------------

    fn eval_select(
        &self,
        target: &Expr,
        path: &[String],
        default: Option<&Expr>,
        env: &Rc<Environment>,
        pos: SourcePos,
    ) -> Result<Value, EvalError> {
        let mut current = self.eval_expr(target, env)?;
        for key in path {
            let attrs = match &current {
                Value::Attrs(attrs) => Rc::clone(attrs),
                other => {
                    if let Some(default) = default {
                        return self.eval_expr(default, env);
                    }
                    return Err(EvalError::with_pos(
                        EvalErrorKind::MissingAttr,
                        format!(
                            "cannot select attribute '{}' from {}",
                            key,
                            other.type_name()
                        ),
                        pos,
                    ));
                }
            };
            match attrs.get(key) {
                Some(next) => current = next.clone(),
                None => {
                    if let Some(default) = default {
                        return self.eval_expr(default, env);
                    }
                    return Err(EvalError::with_pos(
                        EvalErrorKind::MissingAttr,
                        format!("attribute '{}' not found", key),
                        pos,
                    ));
                }
            }
        }
        Ok(current)
    }

    fn resolve_path(&self, value: &str, absolute: bool) -> String {
        if absolute {
            return value.to_string();
        }
        let relative = value.strip_prefix("./").unwrap_or(value);
        self.base_dir.join(relative).to_string_lossy().into_owned()
    }
}

/// Binds a function parameter in a fresh call frame. Set patterns
/// destructure the argument; every listed attribute must be present, and
/// extras are rejected unless the pattern ends with `...`.
fn bind_param(
    param: &Pattern,
    argument: Value,
    frame: &Rc<Environment>,
    pos: SourcePos,
) -> Result<(), EvalError> {
    match param {
        Pattern::Ident(name) => {
            frame.define(name.clone(), argument);
            Ok(())
        }
        Pattern::AttrSet {
            attrs,
            ellipsis,
            bind,
        } => {
            let set = match &argument {
                Value::Attrs(map) => Rc::clone(map),
                other => {
                    return Err(EvalError::with_pos(
                        EvalErrorKind::TypeMismatch,
                        format!(
                            "this function expects an attribute set argument, got {}",
                            other.type_name()
                        ),
                        pos,
                    ))
                }
            };
            for name in attrs {
                let value = set.get(name).cloned().ok_or_else(|| {
                    EvalError::with_pos(
                        EvalErrorKind::MissingAttr,
                        format!("function argument is missing attribute '{}'", name),
                        pos,
                    )
                })?;
                frame.define(name.clone(), value);
            }
            if !*ellipsis {
                for key in set.keys() {
                    if !attrs.contains(key) {
                        return Err(EvalError::with_pos(
                            EvalErrorKind::TypeMismatch,
                            format!("unexpected argument attribute '{}'", key),
                            pos,
                        ));
                    }
                }
            }
            if let Some(name) = bind {
                frame.define(name.clone(), argument);
            }
            Ok(())
        }
    }
}

/// Simple expressions evaluate to themselves without touching the
/// environment; they are safe to seed in phase 1 of a recursive set.
fn is_simple_expr(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::Str { .. }
            | ExprKind::Bool(_)
            | ExprKind::Null
            | ExprKind::Path { .. }
    )
}

/// Installs a nested-path binding like `a.b.c = v`, creating
/// intermediate sets and failing if a non-set value is in the way.
fn set_nested_attr(
    map: &mut AttrMap,
    path: &[String],
    value: Value,
    pos: SourcePos,
) -> Result<(), EvalError> {
    let (key, rest) = match path.split_first() {
        Some(split) => split,
        None => return Ok(()),
    };
    if rest.is_empty() {
        map.insert(key.clone(), value);
        return Ok(());
    }
    let mut inner_map = match map.get(key) {
        Some(Value::Attrs(inner)) => (**inner).clone(),
        Some(_) => {
            return Err(EvalError::with_pos(
                EvalErrorKind::AttrPathConflict,
                format!("attribute path conflict at '{}'", key),
                pos,
            ))
        }
        None => AttrMap::new(),
    };
    set_nested_attr(&mut inner_map, rest, value, pos)?;
    map.insert(key.clone(), Value::attrs(inner_map));
    Ok(())
}

// --- strict operator implementations ---------------------------------------
// These are free functions so the arithmetic built-ins can share them.

pub(crate) fn eval_add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 + b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + *b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::Str(a), Value::Str(b)) => Ok(Value::string(format!("{}{}", a, b))),
        _ => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!("cannot add {} and {}", left.type_name(), right.type_name()),
        )),
    }
}

pub(crate) fn eval_sub(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 - b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a - *b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
        _ => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!(
                "cannot subtract {} from {}",
                right.type_name(),
                left.type_name()
            ),
        )),
    }
}

pub(crate) fn eval_mul(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 * b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a * *b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
        _ => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!(
                "cannot multiply {} by {}",
                left.type_name(),
                right.type_name()
            ),
        )),
    }
}

/// Division always produces a float; dividing by zero is an error.
pub(crate) fn eval_div(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let divisor = match right {
        Value::Int(b) => *b as f64,
        Value::Float(b) => *b,
        _ => {
            return Err(EvalError::new(
                EvalErrorKind::TypeMismatch,
                format!(
                    "cannot divide {} by {}",
                    left.type_name(),
                    right.type_name()
                ),
            ))
        }
    };
    if divisor == 0.0 {
        return Err(EvalError::new(
            EvalErrorKind::DivisionByZero,
            "division by zero",
        ));
    }
    let dividend = match left {
        Value::Int(a) => *a as f64,
        Value::Float(a) => *a,
        _ => {
            return Err(EvalError::new(
                EvalErrorKind::TypeMismatch,
                format!(
                    "cannot divide {} by {}",
                    left.type_name(),
                    right.type_name()
                ),
            ))
        }
    };
    Ok(Value::Float(dividend / divisor))
}

fn eval_concat(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::List(a), Value::List(b)) => {
            let mut elements = (**a).clone();
            elements.extend(b.iter().cloned());
            Ok(Value::list(elements))
        }
        _ => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!(
                "++ operator requires two lists, got {} and {}",
                left.type_name(),
                right.type_name()
            ),
        )),
    }
}

/// Shallow merge of two attribute sets; right-hand keys win.
fn eval_update(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Attrs(a), Value::Attrs(b)) => {
            let mut merged = (**a).clone();
            for (key, value) in b.iter() {
                merged.insert(key.clone(), value.clone());
            }
            Ok(Value::attrs(merged))
        }
        _ => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!(
                "// operator requires two attribute sets, got {} and {}",
                left.type_name(),
                right.type_name()
            ),
        )),
    }
}

/// Relational comparison over numbers (mixed Int/Float promotes through
/// f64) and strings (lexicographic).
fn eval_compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let ord: Option<Ordering> = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => {
            return Err(EvalError::new(
                EvalErrorKind::TypeMismatch,
                format!(
                    "cannot compare {} with {}",
                    left.type_name(),
                    right.type_name()
                ),
            ))
        }
    };
    let result = match op {
        BinaryOp::Lt => matches!(ord, Some(Ordering::Less)),
        BinaryOp::Gt => matches!(ord, Some(Ordering::Greater)),
        BinaryOp::Le => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        BinaryOp::Ge => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
        _ => {
            return Err(EvalError::new(
                EvalErrorKind::TypeMismatch,
                format!("{} is not a comparison operator", op),
            ))
        }
    };
    Ok(Value::Bool(result))
}
