// File: src/ast.rs
//
// Abstract syntax tree for Nix expressions.
// The parser builds this tree and hands ownership to the evaluator.
// Nodes are immutable after construction; function bodies are shared
// behind `Rc` so closures can hold onto them without copying.

use std::fmt;
use std::rc::Rc;

/// A position in the source text. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

impl SourcePos {
    pub fn new(line: usize, column: usize) -> Self {
        SourcePos { line, column }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// An expression together with the position of its first token.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: SourcePos,
}

impl Expr {
    pub fn new(kind: ExprKind, pos: SourcePos) -> Self {
        Expr { kind, pos }
    }
}

/// The closed set of expression forms.
#[derive(Debug, Clone)]
pub enum ExprKind {
    Int(i64),
    Float(f64),
    Str { value: String, indented: bool },
    Bool(bool),
    Null,
    Path { value: String, absolute: bool },
    Ident(String),
    List(Vec<Expr>),
    AttrSet {
        recursive: bool,
        bindings: Vec<AttrBinding>,
        inherits: Vec<InheritClause>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Let {
        bindings: Vec<Binding>,
        body: Box<Expr>,
    },
    With {
        scope: Box<Expr>,
        body: Box<Expr>,
    },
    Assert {
        cond: Box<Expr>,
        body: Box<Expr>,
    },
    Function {
        param: Pattern,
        body: Rc<Expr>,
    },
    Apply {
        func: Box<Expr>,
        arg: Box<Expr>,
    },
    Select {
        target: Box<Expr>,
        path: Vec<String>,
        default: Option<Box<Expr>>,
    },
    HasAttr {
        target: Box<Expr>,
        path: Vec<String>,
    },
}

/// A single `path = value;` binding inside an attribute set.
/// The path has at least one component; `a.b.c = 1;` yields three.
#[derive(Debug, Clone)]
pub struct AttrBinding {
    pub path: Vec<String>,
    pub value: Expr,
}

/// An `inherit name...;` or `inherit (expr) name...;` clause.
#[derive(Debug, Clone)]
pub struct InheritClause {
    pub from: Option<Expr>,
    pub names: Vec<String>,
}

/// A `name = value;` binding inside a let expression.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub value: Expr,
}

/// Function parameter: a plain name, or a destructuring set pattern
/// `{ a, b, ... } @ bind`.
#[derive(Debug, Clone)]
pub enum Pattern {
    Ident(String),
    AttrSet {
        attrs: Vec<String>,
        ellipsis: bool,
        bind: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Concat,
    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Implies,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Concat => "++",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Implies => "->",
            BinaryOp::Update => "//",
        };
        f.write_str(op)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => f.write_str("!"),
            UnaryOp::Neg => f.write_str("-"),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Ident(name) => f.write_str(name),
            Pattern::AttrSet { attrs, ellipsis, bind } => {
                let mut parts: Vec<&str> = attrs.iter().map(String::as_str).collect();
                if *ellipsis {
                    parts.push("...");
                }
                if parts.is_empty() {
                    f.write_str("{ }")?;
                } else {
                    write!(f, "{{ {} }}", parts.join(", "))?;
                }
                if let Some(name) = bind {
                    write!(f, " @ {}", name)?;
                }
                Ok(())
            }
        }
    }
}

/// Escapes a string the way the printer and the lexer agree on:
/// backslash, double quote, newline, tab, and carriage return.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Int(v) => write!(f, "{}", v),
            ExprKind::Float(v) => write!(f, "{}", v),
            ExprKind::Str { value, indented } => {
                if *indented {
                    write!(f, "''{}''", value)
                } else {
                    write!(f, "\"{}\"", escape_string(value))
                }
            }
            ExprKind::Bool(v) => write!(f, "{}", v),
            ExprKind::Null => f.write_str("null"),
            ExprKind::Path { value, .. } => f.write_str(value),
            ExprKind::Ident(name) => f.write_str(name),
            ExprKind::List(elements) => {
                if elements.is_empty() {
                    return f.write_str("[ ]");
                }
                let parts: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[ {} ]", parts.join(" "))
            }
            ExprKind::AttrSet { recursive, bindings, inherits } => {
                let mut parts = Vec::new();
                for inherit in inherits {
                    parts.push(inherit.to_string());
                }
                for binding in bindings {
                    parts.push(format!("{} = {};", binding.path.join("."), binding.value));
                }
                let prefix = if *recursive { "rec " } else { "" };
                if parts.is_empty() {
                    write!(f, "{}{{ }}", prefix)
                } else {
                    write!(f, "{}{{ {} }}", prefix, parts.join(" "))
                }
            }
            ExprKind::Binary { left, op, right } => write!(f, "({} {} {})", left, op, right),
            ExprKind::Unary { op, expr } => write!(f, "({}{})", op, expr),
            ExprKind::If { cond, then, otherwise } => {
                write!(f, "if {} then {} else {}", cond, then, otherwise)
            }
            ExprKind::Let { bindings, body } => {
                let parts: Vec<String> = bindings
                    .iter()
                    .map(|b| format!("{} = {};", b.name, b.value))
                    .collect();
                write!(f, "let {} in {}", parts.join(" "), body)
            }
            ExprKind::With { scope, body } => write!(f, "with {}; {}", scope, body),
            ExprKind::Assert { cond, body } => write!(f, "assert {}; {}", cond, body),
            ExprKind::Function { param, body } => write!(f, "{}: {}", param, body),
            ExprKind::Apply { func, arg } => write!(f, "({} {})", func, arg),
            ExprKind::Select { target, path, default } => {
                write!(f, "{}.{}", target, path.join("."))?;
                if let Some(default) = default {
                    write!(f, " or {}", default)?;
                }
                Ok(())
            }
            ExprKind::HasAttr { target, path } => {
                write!(f, "{} ? {}", target, path.join("."))
            }
        }
    }
}

impl fmt::Display for InheritClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "inherit ({}) {};", from, self.names.join(" ")),
            None => write!(f, "inherit {};", self.names.join(" ")),
        }
    }
}
