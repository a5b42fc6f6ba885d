//! Tree-walking evaluator. `eval` recurses over the AST and always returns a
//! [`Value`] — there is no `Result` in this module's public surface.
//! `Value::Error`, `Value::ReturnValue`, and `Value::Exit` are themselves
//! values, so they propagate up through ordinary control flow instead of
//! `?`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{
    BlockStatement, Expression, Program, Statement,
};
use crate::builtins::lookup_builtin;
use crate::environment::Environment;
use crate::object::{native_bool, FunctionValue, Value, NULL};

fn error(msg: impl Into<String>) -> Rc<Value> {
    Rc::new(Value::Error(msg.into()))
}

/// Evaluate a whole program. A top-level `return` unwraps to its payload
/// here; a top-level `exit` and any error are returned as-is.
pub fn eval_program(program: &Program, env: Rc<RefCell<Environment>>) -> Rc<Value> {
    let mut result = NULL.clone();
    for statement in &program.statements {
        result = eval_statement(statement, env.clone());
        match &*result {
            Value::ReturnValue(value) => return value.clone(),
            Value::Error(_) | Value::Exit(_) => return result,
            _ => {}
        }
    }
    result
}

/// Evaluate a block without unwrapping `ReturnValue`: a `return` inside a
/// nested block must keep propagating as a `ReturnValue` until it reaches
/// `eval_program` or a function call boundary, so an outer block that
/// contains more statements after the inner one still stops short.
fn eval_block(block: &BlockStatement, env: Rc<RefCell<Environment>>) -> Rc<Value> {
    let mut result = NULL.clone();
    for statement in &block.statements {
        result = eval_statement(statement, env.clone());
        if result.is_return_or_error_or_exit() {
            return result;
        }
    }
    result
}

fn eval_statement(statement: &Statement, env: Rc<RefCell<Environment>>) -> Rc<Value> {
    match statement {
        Statement::Let(let_stmt) => {
            let value = eval_expression(&let_stmt.value, env.clone());
            if value.is_error_or_exit() {
                return value;
            }
            env.borrow_mut().set(let_stmt.name.name.clone(), value);
            NULL.clone()
        }
        Statement::Return(return_stmt) => {
            let value = eval_expression(&return_stmt.value, env);
            if value.is_error_or_exit() {
                return value;
            }
            Rc::new(Value::ReturnValue(value))
        }
        Statement::Expression(expr_stmt) => eval_expression(&expr_stmt.expression, env),
    }
}

fn eval_expression(expr: &Expression, env: Rc<RefCell<Environment>>) -> Rc<Value> {
    match expr {
        Expression::IntegerLiteral(lit) => Rc::new(Value::Integer(lit.value)),
        Expression::BooleanLiteral(lit) => native_bool(lit.value),
        Expression::StringLiteral(lit) => Rc::new(Value::String(lit.value.clone())),
        Expression::Identifier(ident) => match env.borrow().get(&ident.name) {
            Some(value) => value,
            None => lookup_builtin(&ident.name)
                .unwrap_or_else(|| error(format!("identifier not found: {}", ident.name))),
        },
        Expression::Prefix(prefix) => {
            let right = eval_expression(&prefix.right, env);
            if right.is_error_or_exit() {
                return right;
            }
            eval_prefix_expression(&prefix.operator, &right)
        }
        Expression::Infix(infix) => {
            let left = eval_expression(&infix.left, env.clone());
            if left.is_error_or_exit() {
                return left;
            }
            let right = eval_expression(&infix.right, env);
            if right.is_error_or_exit() {
                return right;
            }
            eval_infix_expression(&infix.operator, &left, &right)
        }
        Expression::If(if_expr) => {
            let condition = eval_expression(&if_expr.condition, env.clone());
            if condition.is_error_or_exit() {
                return condition;
            }
            // No new frame here; only a function call (`apply_function`)
            // encloses one, so a `let` inside a consequence stays visible
            // after the `if`.
            if condition.is_truthy() {
                eval_block(&if_expr.consequence, env)
            } else if let Some(alternative) = &if_expr.alternative {
                eval_block(alternative, env)
            } else {
                NULL.clone()
            }
        }
        Expression::FunctionLiteral(literal) => {
            Rc::new(Value::Function(FunctionValue::from_literal(literal, env)))
        }
        Expression::Call(call) => {
            let function = eval_expression(&call.function, env.clone());
            if function.is_error_or_exit() {
                return function;
            }
            let mut arguments = Vec::with_capacity(call.arguments.len());
            for arg in &call.arguments {
                let value = eval_expression(arg, env.clone());
                if value.is_error_or_exit() {
                    return value;
                }
                arguments.push(value);
            }
            apply_function(&function, &arguments)
        }
        Expression::ArrayLiteral(array) => {
            let mut elements = Vec::with_capacity(array.elements.len());
            for element in &array.elements {
                let value = eval_expression(element, env.clone());
                if value.is_error_or_exit() {
                    return value;
                }
                elements.push(value);
            }
            Rc::new(Value::Array(elements))
        }
        Expression::HashLiteral(hash) => eval_hash_literal(hash, env),
        Expression::Index(index) => {
            let left = eval_expression(&index.left, env.clone());
            if left.is_error_or_exit() {
                return left;
            }
            let index_value = eval_expression(&index.index, env);
            if index_value.is_error_or_exit() {
                return index_value;
            }
            eval_index_expression(&left, &index_value)
        }
    }
}

fn eval_hash_literal(hash: &crate::ast::HashLiteral, env: Rc<RefCell<Environment>>) -> Rc<Value> {
    let mut pairs: Vec<(Rc<Value>, Rc<Value>)> = Vec::with_capacity(hash.pairs.len());
    for (key_expr, value_expr) in &hash.pairs {
        let key = eval_expression(key_expr, env.clone());
        if key.is_error_or_exit() {
            return key;
        }
        let Some(hash_key) = key.hash_key() else {
            return error(format!("unusable as hash key: {}", key.kind()));
        };
        let value = eval_expression(value_expr, env.clone());
        if value.is_error_or_exit() {
            return value;
        }
        // A later duplicate key overwrites the earlier entry's value in place.
        match pairs.iter_mut().find(|(k, _)| k.hash_key().as_ref() == Some(&hash_key)) {
            Some(existing) => existing.1 = value,
            None => pairs.push((key, value)),
        }
    }
    Rc::new(Value::Hash(pairs))
}

fn eval_index_expression(left: &Value, index: &Value) -> Rc<Value> {
    match (left, index) {
        (Value::Array(elements), Value::Integer(i)) => {
            if *i < 0 || *i as usize >= elements.len() {
                NULL.clone()
            } else {
                elements[*i as usize].clone()
            }
        }
        (Value::Hash(pairs), key) => {
            let Some(target) = key.hash_key() else {
                return error(format!("unusable as hash key: {}", key.kind()));
            };
            pairs
                .iter()
                .find(|(k, _)| k.hash_key().as_ref() == Some(&target))
                .map(|(_, v)| v.clone())
                .unwrap_or_else(|| NULL.clone())
        }
        (left, _) => error(format!("index operator not supported: {}", left.kind())),
    }
}

fn eval_prefix_expression(operator: &str, right: &Value) -> Rc<Value> {
    match operator {
        "!" => native_bool(!right.is_truthy()),
        "-" => match right {
            Value::Integer(i) => Rc::new(Value::Integer(-i)),
            _ => error(format!("unknown operator: -{}", right.kind())),
        },
        _ => error(format!("unknown operator: {operator}{}", right.kind())),
    }
}

/// Every operand pair that isn't Integer-Integer or String-String falls
/// through to `==`/`!=` by reference identity (spec.md §3.3): `TRUE`,
/// `FALSE`, and `NULL` are process-wide singletons, so this is
/// observationally structural for booleans and null, but for arrays,
/// hashes, and functions it really is pointer comparison — two
/// separately-built arrays with identical contents are unequal.
fn eval_infix_expression(operator: &str, left: &Rc<Value>, right: &Rc<Value>) -> Rc<Value> {
    match (&**left, &**right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Value::String(l), Value::String(r)) => eval_string_infix(operator, l, r),
        (_, _) if operator == "==" => native_bool(Rc::ptr_eq(left, right)),
        (_, _) if operator == "!=" => native_bool(!Rc::ptr_eq(left, right)),
        (left_v, right_v) => error(format!(
            "unknown operator: {} {operator} {}",
            left_v.kind(),
            right_v.kind()
        )),
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Rc<Value> {
    match operator {
        "+" => Rc::new(Value::Integer(left + right)),
        "-" => Rc::new(Value::Integer(left - right)),
        "*" => Rc::new(Value::Integer(left * right)),
        "/" => {
            if right == 0 {
                error("division by 0")
            } else {
                Rc::new(Value::Integer(left / right))
            }
        }
        "<" => native_bool(left < right),
        ">" => native_bool(left > right),
        "==" => native_bool(left == right),
        "!=" => native_bool(left != right),
        _ => error(format!("unknown operator: INTEGER {operator} INTEGER")),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Rc<Value> {
    match operator {
        "+" => Rc::new(Value::String(format!("{left}{right}"))),
        "==" => native_bool(left == right),
        "!=" => native_bool(left != right),
        _ => error(format!("unknown operator: STRING {operator} STRING")),
    }
}

fn apply_function(function: &Value, arguments: &[Rc<Value>]) -> Rc<Value> {
    match function {
        Value::Function(func) => {
            if func.parameters.len() != arguments.len() {
                return error(format!(
                    "wrong number of arguments. got={}, want={}",
                    arguments.len(),
                    func.parameters.len()
                ));
            }
            let call_env = Environment::enclosed(func.env.clone());
            for (param, arg) in func.parameters.iter().zip(arguments) {
                call_env.borrow_mut().set(param.name.clone(), arg.clone());
            }
            let result = eval_block(&func.body, call_env);
            match &*result {
                Value::ReturnValue(value) => value.clone(),
                _ => result,
            }
        }
        Value::Builtin(builtin) => Rc::new((builtin.func)(arguments)),
        other => error(format!("not a function: {}", other.kind())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn eval_source(source: &str) -> Rc<Value> {
        let program = Parser::new(Lexer::new(source)).parse_program();
        eval_program(&program, Environment::new())
    }

    #[test]
    fn evaluates_integer_arithmetic() {
        assert!(matches!(*eval_source("5 + 5 * 2 - 10 / 2"), Value::Integer(10)));
    }

    #[test]
    fn zero_is_falsy_in_conditionals() {
        assert!(matches!(*eval_source("if (0) { 10 } else { 20 }"), Value::Integer(20)));
    }

    #[test]
    fn return_escapes_nested_blocks() {
        let source = "if (true) { if (true) { return 10; } return 1; }";
        assert!(matches!(*eval_source(source), Value::Integer(10)));
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let source = "let newAdder = fn(x) { fn(y) { x + y; }; }; let addTwo = newAdder(2); addTwo(3);";
        assert!(matches!(*eval_source(source), Value::Integer(5)));
    }

    #[test]
    fn errors_short_circuit_evaluation() {
        let value = eval_source("5 + true;");
        match &*value {
            Value::Error(msg) => assert_eq!(msg, "unknown operator: INTEGER + BOOLEAN"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn division_by_zero_is_an_error_not_a_panic() {
        let value = eval_source("1 / 0");
        match &*value {
            Value::Error(msg) => assert_eq!(msg, "division by 0"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let value = eval_source("foobar;");
        match &*value {
            Value::Error(msg) => assert_eq!(msg, "identifier not found: foobar"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn array_index_out_of_range_is_null() {
        assert!(matches!(*eval_source("[1, 2, 3][5]"), Value::Null));
    }

    #[test]
    fn hash_literal_and_index() {
        let value = eval_source(r#"let h = {"one": 1, "two": 2}; h["one"]"#);
        assert!(matches!(*value, Value::Integer(1)));
    }
}
