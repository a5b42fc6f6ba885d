//! Lexical environments. Each [`Environment`] is a single stack frame;
//! frames are chained through `parent` rather than nested in one big stack,
//! so a closure can keep its defining frame alive past the call that created
//! it just by holding an `Rc` to it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Value;

#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Rc<Value>>,
    parent: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            store: HashMap::new(),
            parent: None,
        }))
    }

    /// A fresh frame whose lookups fall back to `parent` on miss. Used for
    /// function calls and block-local scoping alike.
    pub fn enclosed(parent: Rc<RefCell<Environment>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            store: HashMap::new(),
            parent: Some(parent),
        }))
    }

    /// Walk the parent chain looking for `name`, innermost frame first.
    pub fn get(&self, name: &str) -> Option<Rc<Value>> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .parent
                .as_ref()
                .and_then(|parent| parent.borrow().get(name)),
        }
    }

    /// Bind `name` in this frame, shadowing any binding of the same name in
    /// an enclosing frame.
    pub fn set(&mut self, name: impl Into<String>, value: Rc<Value>) {
        self.store.insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_through_parent_chain() {
        let outer = Environment::new();
        outer.borrow_mut().set("x", Rc::new(Value::Integer(1)));

        let inner = Environment::enclosed(outer.clone());
        assert!(matches!(*inner.borrow().get("x").unwrap(), Value::Integer(1)));
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let outer = Environment::new();
        outer.borrow_mut().set("x", Rc::new(Value::Integer(1)));

        let inner = Environment::enclosed(outer.clone());
        inner.borrow_mut().set("x", Rc::new(Value::Integer(2)));

        assert!(matches!(*inner.borrow().get("x").unwrap(), Value::Integer(2)));
        assert!(matches!(*outer.borrow().get("x").unwrap(), Value::Integer(1)));
    }

    #[test]
    fn missing_name_resolves_to_none() {
        let env = Environment::new();
        assert!(env.borrow().get("missing").is_none());
    }
}
