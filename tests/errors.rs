use lenient_lang::{eval_source, Environment};
use pretty_assertions::assert_eq;

fn run(source: &str) -> String {
    eval_source(source, Environment::new()).inspect()
}

#[test]
fn unknown_operator_between_integer_and_boolean() {
    assert_eq!(run("5 + true;"), "Error: unknown operator: INTEGER + BOOLEAN");
    assert_eq!(run("5 + true; 5;"), "Error: unknown operator: INTEGER + BOOLEAN");
}

#[test]
fn division_by_zero_is_an_error() {
    assert_eq!(run("1 / 0"), "Error: division by 0");
}

#[test]
fn unknown_operator_on_booleans() {
    assert_eq!(run("-true"), "Error: unknown operator: -BOOLEAN");
    assert_eq!(run("true + false;"), "Error: unknown operator: BOOLEAN + BOOLEAN");
}

#[test]
fn error_from_nested_block_propagates_to_the_top() {
    let source = r#"
        if (10 > 1) {
            if (10 > 1) {
                return true + false;
            }
            return 1;
        }
    "#;
    assert_eq!(run(source), "Error: unknown operator: BOOLEAN + BOOLEAN");
}

#[test]
fn unknown_identifier() {
    assert_eq!(run("foobar"), "Error: identifier not found: foobar");
}

#[test]
fn calling_a_non_function_is_an_error() {
    assert_eq!(run("let x = 5; x(1);"), "Error: not a function: INTEGER");
}

#[test]
fn wrong_argument_count_is_an_error() {
    assert_eq!(
        run("let add = fn(a, b) { a + b }; add(1);"),
        "Error: wrong number of arguments. got=1, want=2"
    );
}

#[test]
fn syntax_errors_surface_as_an_error_value_instead_of_panicking() {
    assert_eq!(run("let x 5;"), "Error: expected next token to be =, got INT instead (L1)");
}
