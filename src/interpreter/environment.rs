// File: src/interpreter/environment.rs
//
// Lexical scoping environment for the evaluator.
// A chain of frames, each mapping names to values with a shared parent
// pointer. Lookup walks from the innermost frame outward.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::value::Value;

/// One frame in the scope chain.
///
/// Frames are shared by reference: closures keep the frame they were
/// created in alive, and extending a frame shares the parent rather than
/// copying it. A frame is only written while the construct that created
/// it (let, rec set, function call) is still being evaluated; afterwards
/// every holder treats it as read-only.
///
/// ```ignore
/// let env = Environment::new();
/// env.define("x", Value::Int(10));
///
/// let inner = env.extend();
/// inner.define("x", Value::Int(20));      // shadows the outer x
/// assert_eq!(inner.get("x"), Some(Value::Int(20)));
/// assert_eq!(env.get("x"), Some(Value::Int(10)));
/// ```
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new root frame with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a child frame. The parent is shared, not copied.
    pub fn extend(self: &Rc<Self>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(Rc::clone(self)),
        })
    }

    /// Looks a name up, searching from this frame outward.
    /// Returns a clone of the stored value.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Binds a name in this frame, shadowing any outer binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }
}
