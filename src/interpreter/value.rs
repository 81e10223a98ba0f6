// File: src/interpreter/value.rs
//
// Runtime values for the Nix evaluator.
// A closed sum over primitives, containers, user functions, and
// built-ins. Containers are reference-counted so cloning a value is
// cheap; all values are immutable once constructed.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::{escape_string, Expr, Pattern};
use crate::errors::{EvalError, EvalErrorKind};

use super::environment::Environment;

/// Attribute sets keep their entries in a sorted map so iteration is
/// always by ascending key, which printing and `attrNames` rely on.
pub type AttrMap = BTreeMap<String, Value>;

/// The signature shared by every built-in implementation. The slice
/// holds exactly `arity` values when invoked.
pub type BuiltinFn = fn(&[Value]) -> Result<Value, EvalError>;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Path(Rc<str>),
    List(Rc<Vec<Value>>),
    Attrs(Rc<AttrMap>),
    Function(Rc<Function>),
    Builtin(Builtin),
}

/// A user-defined function: its parameter, the shared body subtree, and
/// the environment frame it captured at definition time.
pub struct Function {
    pub param: Pattern,
    pub body: Rc<Expr>,
    pub env: Rc<Environment>,
}

/// A built-in function, possibly partially applied. Each application
/// appends one argument; the implementation runs once `applied` reaches
/// `arity`.
#[derive(Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub applied: Vec<Value>,
    func: BuiltinFn,
}

impl Builtin {
    pub fn new(name: &'static str, arity: usize, func: BuiltinFn) -> Self {
        Builtin {
            name,
            arity,
            applied: Vec::new(),
            func,
        }
    }

    /// Runs the implementation with a full argument list.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, EvalError> {
        if args.len() != self.arity {
            return Err(EvalError::new(
                EvalErrorKind::Arity,
                format!(
                    "{} expects {} argument(s), got {}",
                    self.name,
                    self.arity,
                    args.len()
                ),
            ));
        }
        (self.func)(args)
    }
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn path(s: impl AsRef<str>) -> Self {
        Value::Path(Rc::from(s.as_ref()))
    }

    pub fn list(elements: Vec<Value>) -> Self {
        Value::List(Rc::new(elements))
    }

    pub fn attrs(map: AttrMap) -> Self {
        Value::Attrs(Rc::new(map))
    }

    /// A short name for the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Int(_) => "an integer",
            Value::Float(_) => "a float",
            Value::Str(_) => "a string",
            Value::Path(_) => "a path",
            Value::List(_) => "a list",
            Value::Attrs(_) => "an attribute set",
            Value::Function(_) => "a function",
            Value::Builtin(_) => "a built-in function",
        }
    }
}

/// Structural equality. Functions compare unequal to everything,
/// themselves included; built-ins compare by name.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Attrs(a), Value::Attrs(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }
}

/// Formats a float so the printed text re-lexes as a float: integral
/// values keep one fractional digit, everything else uses the shortest
/// round-trip form.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::Str(s) => write!(f, "\"{}\"", escape_string(s)),
            Value::Path(p) => f.write_str(p),
            Value::List(elements) => {
                if elements.is_empty() {
                    return f.write_str("[ ]");
                }
                f.write_str("[ ")?;
                for element in elements.iter() {
                    write!(f, "{} ", element)?;
                }
                f.write_str("]")
            }
            Value::Attrs(attrs) => {
                if attrs.is_empty() {
                    return f.write_str("{ }");
                }
                f.write_str("{ ")?;
                for (key, value) in attrs.iter() {
                    write!(f, "{} = {}; ", key, value)?;
                }
                f.write_str("}")
            }
            Value::Function(func) => write!(f, "<LAMBDA {}>", func.param),
            Value::Builtin(builtin) => write!(f, "<BUILTIN {}>", builtin.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The display form is unambiguous enough for diagnostics, and it
        // avoids walking the (possibly cyclic) captured environment.
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printing_matches_the_external_format() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(3.14).to_string(), "3.14");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::string("hi").to_string(), "\"hi\"");
        assert_eq!(Value::path("/bin/sh").to_string(), "/bin/sh");
        assert_eq!(Value::list(vec![]).to_string(), "[ ]");
        assert_eq!(
            Value::list(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "[ 1 2 ]"
        );
        assert_eq!(Value::attrs(AttrMap::new()).to_string(), "{ }");

        let mut map = AttrMap::new();
        map.insert("b".into(), Value::Int(2));
        map.insert("a".into(), Value::Int(1));
        assert_eq!(Value::attrs(map).to_string(), "{ a = 1; b = 2; }");
    }

    #[test]
    fn strings_print_with_escapes() {
        assert_eq!(Value::string("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Value::string("line\n").to_string(), "\"line\\n\"");
    }

    #[test]
    fn equality_is_structural_and_type_strict() {
        assert_eq!(Value::Int(1), Value::Int(1));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_eq!(
            Value::list(vec![Value::Int(1)]),
            Value::list(vec![Value::Int(1)])
        );

        let mut a = AttrMap::new();
        a.insert("x".into(), Value::Int(1));
        let mut b = AttrMap::new();
        b.insert("x".into(), Value::Int(1));
        assert_eq!(Value::attrs(a), Value::attrs(b));
    }
}
