//! Builtin functions available in every environment without needing a
//! `let` binding. Looked up by name only when the identifier isn't found in
//! the environment chain, so user code can still shadow a builtin with its
//! own binding of the same name.

use std::rc::Rc;

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::object::{BuiltinValue, Value};

static BUILTINS: Lazy<HashMap<&'static str, BuiltinValue>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("len", BuiltinValue { name: "len", func: builtin_len });
    m.insert("first", BuiltinValue { name: "first", func: builtin_first });
    m.insert("last", BuiltinValue { name: "last", func: builtin_last });
    m.insert("rest", BuiltinValue { name: "rest", func: builtin_rest });
    m.insert("push", BuiltinValue { name: "push", func: builtin_push });
    m.insert("puts", BuiltinValue { name: "puts", func: builtin_puts });
    m.insert("kind", BuiltinValue { name: "kind", func: builtin_kind });
    m.insert("exit", BuiltinValue { name: "exit", func: builtin_exit });
    m
});

pub fn lookup_builtin(name: &str) -> Option<Rc<Value>> {
    BUILTINS.get(name).map(|b| Rc::new(Value::Builtin(b.clone())))
}

fn wrong_args(got: usize, want: &str) -> Value {
    Value::Error(format!("wrong number of arguments. got={got}, want={want}"))
}

fn builtin_len(args: &[Rc<Value>]) -> Value {
    if args.len() != 1 {
        return wrong_args(args.len(), "1");
    }
    match &*args[0] {
        // Inherited quirk: byte length, not Unicode scalar count.
        Value::String(s) => Value::Integer(s.len() as i64),
        Value::Array(elements) => Value::Integer(elements.len() as i64),
        other => Value::Error(format!("argument to `len` not supported, got {}", other.kind())),
    }
}

fn builtin_first(args: &[Rc<Value>]) -> Value {
    if args.len() != 1 {
        return wrong_args(args.len(), "1");
    }
    match &*args[0] {
        Value::Array(elements) => elements.first().map(|v| (**v).clone()).unwrap_or(Value::Null),
        other => Value::Error(format!(
            "arguments to `first` must be ARRAY, got {}",
            other.kind()
        )),
    }
}

fn builtin_last(args: &[Rc<Value>]) -> Value {
    if args.len() != 1 {
        return wrong_args(args.len(), "1");
    }
    match &*args[0] {
        Value::Array(elements) => elements.last().map(|v| (**v).clone()).unwrap_or(Value::Null),
        other => Value::Error(format!(
            "arguments to `last` must be ARRAY, got {}",
            other.kind()
        )),
    }
}

fn builtin_rest(args: &[Rc<Value>]) -> Value {
    if args.len() != 1 {
        return wrong_args(args.len(), "1");
    }
    match &*args[0] {
        Value::Array(elements) => {
            if elements.is_empty() {
                Value::Null
            } else {
                Value::Array(elements[1..].to_vec())
            }
        }
        other => Value::Error(format!(
            "arguments to `rest` must be ARRAY, got {}",
            other.kind()
        )),
    }
}

fn builtin_push(args: &[Rc<Value>]) -> Value {
    if args.len() != 2 {
        return wrong_args(args.len(), "2");
    }
    match &*args[0] {
        Value::Array(elements) => {
            let mut new_elements = elements.clone();
            new_elements.push(args[1].clone());
            Value::Array(new_elements)
        }
        other => Value::Error(format!(
            "arguments to `push` must be ARRAY, got {}",
            other.kind()
        )),
    }
}

fn builtin_puts(args: &[Rc<Value>]) -> Value {
    log::trace!("puts() called with {} argument(s)", args.len());
    for arg in args {
        println!("{}", arg.inspect());
    }
    Value::Null
}

fn builtin_kind(args: &[Rc<Value>]) -> Value {
    if args.len() != 1 {
        return wrong_args(args.len(), "1");
    }
    log::trace!("kind() called on a {} value", args[0].kind());
    println!("{}", args[0].kind());
    Value::Null
}

fn builtin_exit(args: &[Rc<Value>]) -> Value {
    if args.len() > 1 {
        return wrong_args(args.len(), "0 or 1");
    }
    match args.first() {
        None => Value::Exit(0),
        Some(value) => match &**value {
            Value::Integer(code) => Value::Exit(*code as i32),
            other => Value::Error(format!("argument to `exit` not supported, got {}", other.kind())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Rc<Value>]) -> Value {
        (BUILTINS.get(name).unwrap().func)(args)
    }

    #[test]
    fn len_counts_string_chars_and_array_elements() {
        assert!(matches!(
            call("len", &[Rc::new(Value::String("hello".into()))]),
            Value::Integer(5)
        ));
        let arr = Rc::new(Value::Array(vec![Rc::new(Value::Integer(1)), Rc::new(Value::Integer(2))]));
        assert!(matches!(call("len", &[arr]), Value::Integer(2)));
    }

    #[test]
    fn len_rejects_unsupported_argument() {
        match call("len", &[Rc::new(Value::Integer(1))]) {
            Value::Error(msg) => assert_eq!(msg, "argument to `len` not supported, got INTEGER"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn first_and_last_on_empty_array_are_null() {
        let empty = Rc::new(Value::Array(vec![]));
        assert!(matches!(call("first", &[empty.clone()]), Value::Null));
        assert!(matches!(call("last", &[empty]), Value::Null));
    }

    #[test]
    fn rest_drops_the_head() {
        let arr = Rc::new(Value::Array(vec![
            Rc::new(Value::Integer(1)),
            Rc::new(Value::Integer(2)),
            Rc::new(Value::Integer(3)),
        ]));
        match call("rest", &[arr]) {
            Value::Array(rest) => assert_eq!(rest.len(), 2),
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn push_returns_a_new_array_without_mutating_the_original() {
        let original = vec![Rc::new(Value::Integer(1))];
        let arr = Rc::new(Value::Array(original.clone()));
        match call("push", &[arr.clone(), Rc::new(Value::Integer(2))]) {
            Value::Array(pushed) => assert_eq!(pushed.len(), 2),
            other => panic!("expected array, got {other:?}"),
        }
        assert!(matches!(&*arr, Value::Array(e) if e.len() == 1));
    }

    #[test]
    fn exit_defaults_to_zero() {
        assert!(matches!(call("exit", &[]), Value::Exit(0)));
    }

    #[test]
    fn kind_writes_the_tag_and_returns_null() {
        assert!(matches!(call("kind", &[Rc::new(Value::Integer(1))]), Value::Null));
    }

    #[test]
    fn wrong_argument_count_uses_the_got_want_wording() {
        match call("len", &[]) {
            Value::Error(msg) => assert_eq!(msg, "wrong number of arguments. got=0, want=1"),
            other => panic!("expected error, got {other:?}"),
        }
    }
}
