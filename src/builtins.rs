// File: src/builtins.rs
//
// Built-in functions for the Nix evaluator.
// Every entry here is pre-bound in the top-level environment. Built-ins
// are curried: applying a binary built-in to one argument yields a
// partial application that waits for the rest.

use std::collections::HashMap;

use crate::derivation::Derivation;
use crate::errors::{EvalError, EvalErrorKind};
use crate::interpreter::{
    eval_add, eval_div, eval_mul, eval_sub, format_float, Builtin, BuiltinFn, Value,
};

/// Builds the registry of values bound in every top-level environment.
pub fn registry() -> HashMap<String, Value> {
    let mut builtins = HashMap::new();

    // Constants
    builtins.insert("true".to_string(), Value::Bool(true));
    builtins.insert("false".to_string(), Value::Bool(false));
    builtins.insert("null".to_string(), Value::Null);

    // Type predicates
    register(&mut builtins, "isNull", 1, is_null);
    register(&mut builtins, "isBool", 1, is_bool);
    register(&mut builtins, "isInt", 1, is_int);
    register(&mut builtins, "isFloat", 1, is_float);
    register(&mut builtins, "isString", 1, is_string);
    register(&mut builtins, "isList", 1, is_list);
    register(&mut builtins, "isAttrs", 1, is_attrs);
    register(&mut builtins, "isFunction", 1, is_function);

    // Conversion
    register(&mut builtins, "toString", 1, to_string);

    // List operations
    register(&mut builtins, "length", 1, length);
    register(&mut builtins, "head", 1, head);
    register(&mut builtins, "tail", 1, tail);
    register(&mut builtins, "elem", 2, elem);

    // Attribute set operations
    register(&mut builtins, "attrNames", 1, attr_names);
    register(&mut builtins, "attrValues", 1, attr_values);
    register(&mut builtins, "hasAttr", 2, has_attr);
    register(&mut builtins, "getAttr", 2, get_attr);

    // Arithmetic, sharing the operator implementations
    register(&mut builtins, "add", 2, add);
    register(&mut builtins, "sub", 2, sub);
    register(&mut builtins, "mul", 2, mul);
    register(&mut builtins, "div", 2, div);

    // Derivations
    register(&mut builtins, "derivation", 1, derivation);

    builtins
}

fn register(map: &mut HashMap<String, Value>, name: &'static str, arity: usize, func: BuiltinFn) {
    map.insert(name.to_string(), Value::Builtin(Builtin::new(name, arity, func)));
}

// --- type predicates --------------------------------------------------------

fn is_null(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(args[0], Value::Null)))
}

fn is_bool(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(args[0], Value::Bool(_))))
}

fn is_int(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(args[0], Value::Int(_))))
}

fn is_float(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(args[0], Value::Float(_))))
}

fn is_string(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(args[0], Value::Str(_))))
}

fn is_list(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(args[0], Value::List(_))))
}

fn is_attrs(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(args[0], Value::Attrs(_))))
}

/// True for user functions and built-ins alike.
fn is_function(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(
        args[0],
        Value::Function(_) | Value::Builtin(_)
    )))
}

// --- conversion -------------------------------------------------------------

fn to_string(args: &[Value]) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Str(s) => Ok(Value::Str(s.clone())),
        Value::Int(i) => Ok(Value::string(i.to_string())),
        Value::Float(f) => Ok(Value::string(format_float(*f))),
        Value::Bool(true) => Ok(Value::string("true")),
        Value::Bool(false) => Ok(Value::string("false")),
        Value::Null => Ok(Value::string("null")),
        Value::Path(p) => Ok(Value::Str(p.clone())),
        other => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!("cannot convert {} to a string", other.type_name()),
        )),
    }
}

// --- lists ------------------------------------------------------------------

/// List length, string byte length, or attribute set size.
fn length(args: &[Value]) -> Result<Value, EvalError> {
    match &args[0] {
        Value::List(elements) => Ok(Value::Int(elements.len() as i64)),
        Value::Str(s) => Ok(Value::Int(s.len() as i64)),
        Value::Attrs(attrs) => Ok(Value::Int(attrs.len() as i64)),
        other => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!(
                "length expects a list, string, or attribute set, got {}",
                other.type_name()
            ),
        )),
    }
}

fn head(args: &[Value]) -> Result<Value, EvalError> {
    match &args[0] {
        Value::List(elements) => elements.first().cloned().ok_or_else(|| {
            EvalError::new(EvalErrorKind::TypeMismatch, "head called on empty list")
        }),
        other => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!("head expects a list, got {}", other.type_name()),
        )),
    }
}

fn tail(args: &[Value]) -> Result<Value, EvalError> {
    match &args[0] {
        Value::List(elements) => {
            if elements.is_empty() {
                return Err(EvalError::new(
                    EvalErrorKind::TypeMismatch,
                    "tail called on empty list",
                ));
            }
            Ok(Value::list(elements[1..].to_vec()))
        }
        other => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!("tail expects a list, got {}", other.type_name()),
        )),
    }
}

/// Structural membership test: `elem x xs`.
fn elem(args: &[Value]) -> Result<Value, EvalError> {
    match &args[1] {
        Value::List(elements) => Ok(Value::Bool(elements.iter().any(|e| *e == args[0]))),
        other => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!(
                "elem expects a list as its second argument, got {}",
                other.type_name()
            ),
        )),
    }
}

// --- attribute sets ---------------------------------------------------------

fn attr_names(args: &[Value]) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Attrs(attrs) => Ok(Value::list(
            attrs.keys().map(Value::string).collect(),
        )),
        other => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!("attrNames expects an attribute set, got {}", other.type_name()),
        )),
    }
}

fn attr_values(args: &[Value]) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Attrs(attrs) => Ok(Value::list(attrs.values().cloned().collect())),
        other => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!(
                "attrValues expects an attribute set, got {}",
                other.type_name()
            ),
        )),
    }
}

fn has_attr(args: &[Value]) -> Result<Value, EvalError> {
    let name = match &args[0] {
        Value::Str(s) => s,
        other => {
            return Err(EvalError::new(
                EvalErrorKind::TypeMismatch,
                format!(
                    "hasAttr expects a string as its first argument, got {}",
                    other.type_name()
                ),
            ))
        }
    };
    match &args[1] {
        Value::Attrs(attrs) => Ok(Value::Bool(attrs.contains_key(name.as_ref()))),
        other => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!(
                "hasAttr expects an attribute set as its second argument, got {}",
                other.type_name()
            ),
        )),
    }
}

fn get_attr(args: &[Value]) -> Result<Value, EvalError> {
    let name = match &args[0] {
        Value::Str(s) => s,
        other => {
            return Err(EvalError::new(
                EvalErrorKind::TypeMismatch,
                format!(
                    "getAttr expects a string as its first argument, got {}",
                    other.type_name()
                ),
            ))
        }
    };
    match &args[1] {
        Value::Attrs(attrs) => attrs.get(name.as_ref()).cloned().ok_or_else(|| {
            EvalError::new(
                EvalErrorKind::MissingAttr,
                format!("attribute '{}' not found", name),
            )
        }),
        other => Err(EvalError::new(
            EvalErrorKind::TypeMismatch,
            format!(
                "getAttr expects an attribute set as its second argument, got {}",
                other.type_name()
            ),
        )),
    }
}

// --- arithmetic -------------------------------------------------------------

fn add(args: &[Value]) -> Result<Value, EvalError> {
    eval_add(&args[0], &args[1])
}

fn sub(args: &[Value]) -> Result<Value, EvalError> {
    eval_sub(&args[0], &args[1])
}

fn mul(args: &[Value]) -> Result<Value, EvalError> {
    eval_mul(&args[0], &args[1])
}

fn div(args: &[Value]) -> Result<Value, EvalError> {
    eval_div(&args[0], &args[1])
}

// --- derivations ------------------------------------------------------------

/// Builds a derivation from an attribute set. The result carries all of
/// the inputs plus the computed store paths.
fn derivation(args: &[Value]) -> Result<Value, EvalError> {
    let attrs = match &args[0] {
        Value::Attrs(attrs) => attrs,
        other => {
            return Err(EvalError::new(
                EvalErrorKind::InvalidDerivation,
                format!("derivation expects an attribute set, got {}", other.type_name()),
            ))
        }
    };
    let drv = Derivation::from_attrs(attrs)?;
    let mut result = (**attrs).clone();
    for (key, value) in drv.to_attrs() {
        result.insert(key, value);
    }
    Ok(Value::attrs(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Result<Value, EvalError> {
        let registry = registry();
        match registry.get(name) {
            Some(Value::Builtin(builtin)) => builtin.invoke(args),
            Some(other) => panic!("{} is bound to {}, not a built-in", name, other),
            None => panic!("no built-in named {}", name),
        }
    }

    #[test]
    fn constants_are_bound() {
        let registry = registry();
        assert_eq!(registry.get("true"), Some(&Value::Bool(true)));
        assert_eq!(registry.get("false"), Some(&Value::Bool(false)));
        assert_eq!(registry.get("null"), Some(&Value::Null));
    }

    #[test]
    fn predicates() {
        assert_eq!(call("isNull", &[Value::Null]), Ok(Value::Bool(true)));
        assert_eq!(call("isNull", &[Value::Int(1)]), Ok(Value::Bool(false)));
        assert_eq!(call("isInt", &[Value::Int(1)]), Ok(Value::Bool(true)));
        assert_eq!(call("isFloat", &[Value::Float(1.0)]), Ok(Value::Bool(true)));
        assert_eq!(
            call("isString", &[Value::string("x")]),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            call("isList", &[Value::list(vec![])]),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            call("isAttrs", &[Value::attrs(Default::default())]),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn to_string_conversions() {
        assert_eq!(call("toString", &[Value::Int(42)]), Ok(Value::string("42")));
        assert_eq!(
            call("toString", &[Value::Bool(true)]),
            Ok(Value::string("true"))
        );
        assert_eq!(call("toString", &[Value::Null]), Ok(Value::string("null")));
        assert_eq!(
            call("toString", &[Value::path("/bin/sh")]),
            Ok(Value::string("/bin/sh"))
        );
        assert_eq!(
            call("toString", &[Value::Float(3.14)]),
            Ok(Value::string("3.14"))
        );
        assert!(call("toString", &[Value::list(vec![])]).is_err());
    }

    #[test]
    fn length_counts_bytes_for_strings() {
        assert_eq!(call("length", &[Value::string("hello")]), Ok(Value::Int(5)));
        assert_eq!(call("length", &[Value::string("")]), Ok(Value::Int(0)));
        // Multi-byte characters count as bytes, not code points
        assert_eq!(call("length", &[Value::string("héllo")]), Ok(Value::Int(6)));
    }

    #[test]
    fn head_and_tail() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(call("head", &[list.clone()]), Ok(Value::Int(1)));
        assert_eq!(
            call("tail", &[list]),
            Ok(Value::list(vec![Value::Int(2), Value::Int(3)]))
        );
        assert!(call("head", &[Value::list(vec![])]).is_err());
        assert!(call("tail", &[Value::list(vec![])]).is_err());
    }

    #[test]
    fn elem_uses_structural_equality() {
        let list = Value::list(vec![Value::string("a"), Value::string("b")]);
        assert_eq!(
            call("elem", &[Value::string("a"), list.clone()]),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            call("elem", &[Value::string("c"), list]),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn attr_names_are_sorted() {
        let mut map = crate::interpreter::AttrMap::new();
        map.insert("zeta".into(), Value::Int(1));
        map.insert("alpha".into(), Value::Int(2));
        assert_eq!(
            call("attrNames", &[Value::attrs(map.clone())]),
            Ok(Value::list(vec![
                Value::string("alpha"),
                Value::string("zeta")
            ]))
        );
        assert_eq!(
            call("attrValues", &[Value::attrs(map)]),
            Ok(Value::list(vec![Value::Int(2), Value::Int(1)]))
        );
    }

    #[test]
    fn get_attr_reports_missing_attributes() {
        let err = call("getAttr", &[Value::string("x"), Value::attrs(Default::default())])
            .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::MissingAttr);
    }

    #[test]
    fn arity_mismatch_message() {
        let err = call("length", &[Value::Int(1), Value::Int(2)]).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::Arity);
        assert_eq!(err.to_string(), "length expects 1 argument(s), got 2");
    }
}
