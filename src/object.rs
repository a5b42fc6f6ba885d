//! The runtime value model. A tagged union rather than a trait-object
//! hierarchy: the set of value kinds is closed, so exhaustive `match`
//! carries more weight here than dynamic dispatch would.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use once_cell::sync::Lazy;

use crate::ast::{FunctionLiteral, Identifier};
use crate::environment::Environment;

/// The tag half of a [`HashKey`]. Kept separate from the payload so two
/// values of different kinds never collide even if their bit patterns do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Boolean,
    String,
}

/// The key under which a [`Value`] is stored in a `Value::Hash`. Only
/// integers, booleans, and strings are hashable; anything else is rejected
/// by [`Value::hash_key`] with an `unusable as hash key` error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: ValueKind,
    pub value: u64,
}

fn fnv1a64(s: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for byte in s.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// A runtime value. `ReturnValue`, `Error`, and `Exit` are control-flow
/// signals riding along the same channel as ordinary data: evaluating an
/// expression always produces a `Value`, never a `Result`, so a `return`
/// nested arbitrarily deep can unwind by just being handed back up.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Rc<Value>>),
    Hash(Vec<(Rc<Value>, Rc<Value>)>),
    Function(FunctionValue),
    Builtin(BuiltinValue),
    ReturnValue(Rc<Value>),
    Error(String),
    Exit(i32),
    Null,
}

#[derive(Debug, Clone)]
pub struct FunctionValue {
    pub parameters: Vec<Identifier>,
    pub body: crate::ast::BlockStatement,
    pub env: Rc<RefCell<Environment>>,
}

impl FunctionValue {
    pub fn from_literal(literal: &FunctionLiteral, env: Rc<RefCell<Environment>>) -> Self {
        Self {
            parameters: literal.parameters.clone(),
            body: literal.body.clone(),
            env,
        }
    }
}

pub type BuiltinFn = fn(&[Rc<Value>]) -> Value;

#[derive(Clone)]
pub struct BuiltinValue {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for BuiltinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinValue").field("name", &self.name).finish()
    }
}

/// Singleton `true`, `false`, and `null`. The evaluator hands out clones of
/// these `Rc`s rather than constructing fresh `Value::Boolean`s, so equality
/// checks on booleans and null can use `Rc::ptr_eq` instead of structural
/// comparison.
pub static TRUE: Lazy<Rc<Value>> = Lazy::new(|| Rc::new(Value::Boolean(true)));
pub static FALSE: Lazy<Rc<Value>> = Lazy::new(|| Rc::new(Value::Boolean(false)));
pub static NULL: Lazy<Rc<Value>> = Lazy::new(|| Rc::new(Value::Null));

pub fn native_bool(b: bool) -> Rc<Value> {
    if b {
        TRUE.clone()
    } else {
        FALSE.clone()
    }
}

impl Value {
    /// The tag string reported by the `kind` builtin and used in error
    /// messages, e.g. `unknown operator: INTEGER + BOOLEAN`.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
            Value::Exit(_) => "EXIT",
            Value::Null => "NULL",
        }
    }

    /// `false`, `null`, and the integer `0` are falsy; everything else,
    /// including the empty string and the empty array, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Null => false,
            Value::Integer(0) => false,
            _ => true,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// True for `Error` and `Exit`: the two signals that must abort
    /// evaluation of an enclosing expression (prefix/infix operand,
    /// call callee/argument, index target, array element, hash
    /// key/value) rather than being treated as ordinary operands.
    pub fn is_error_or_exit(&self) -> bool {
        matches!(self, Value::Error(_) | Value::Exit(_))
    }

    pub fn is_return_or_error_or_exit(&self) -> bool {
        matches!(self, Value::ReturnValue(_) | Value::Error(_) | Value::Exit(_))
    }

    /// The key a value would occupy in a `Value::Hash`, or `None` if the
    /// value's kind cannot be hashed.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(i) => Some(HashKey {
                kind: ValueKind::Integer,
                value: *i as u64,
            }),
            Value::Boolean(b) => Some(HashKey {
                kind: ValueKind::Boolean,
                value: if *b { 1 } else { 0 },
            }),
            Value::String(s) => Some(HashKey {
                kind: ValueKind::String,
                value: fnv1a64(s),
            }),
            _ => None,
        }
    }

    /// Human-readable rendering used by `puts` and the REPL/test harness.
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(elements) => {
                let rendered: Vec<String> = elements.iter().map(|e| e.inspect()).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Hash(pairs) => {
                let rendered: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.inspect(), v.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Function(f) => {
                let params: Vec<String> = f.parameters.iter().map(|p| p.to_string()).collect();
                format!("fn({}) {{\n{}\n}}", params.join(", "), f.body)
            }
            Value::Builtin(_) => "builtin function".to_string(),
            Value::ReturnValue(v) => v.inspect(),
            Value::Error(msg) => format!("Error: {msg}"),
            Value::Exit(code) => format!("exit({code})"),
            Value::Null => "null".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_falsy_but_empty_string_is_not() {
        assert!(!Value::Integer(0).is_truthy());
        assert!(Value::Integer(1).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
    }

    #[test]
    fn hash_keys_distinguish_kind_from_payload() {
        let one = Value::Integer(1);
        let truth = Value::Boolean(true);
        assert_ne!(one.hash_key(), truth.hash_key());
    }

    #[test]
    fn unhashable_values_have_no_hash_key() {
        assert_eq!(Value::Array(vec![]).hash_key(), None);
        assert_eq!(Value::Null.hash_key(), None);
    }

    #[test]
    fn inspect_renders_containers_recursively() {
        let arr = Value::Array(vec![Rc::new(Value::Integer(1)), Rc::new(Value::Integer(2))]);
        assert_eq!(arr.inspect(), "[1, 2]");
    }
}
