use lenient_lang::{eval_source, Environment};
use pretty_assertions::assert_eq;

fn run(source: &str) -> String {
    eval_source(source, Environment::new()).inspect()
}

#[test]
fn len_reports_string_and_array_length() {
    assert_eq!(run(r#"len("")"#), "0");
    assert_eq!(run(r#"len("four")"#), "4");
    assert_eq!(run(r#"len("hello world")"#), "11");
    assert_eq!(run("len([1, 2, 3])"), "3");
}

#[test]
fn len_rejects_an_integer_argument() {
    assert_eq!(run("len(1)"), "Error: argument to `len` not supported, got INTEGER");
}

#[test]
fn len_rejects_wrong_argument_count() {
    assert_eq!(
        run(r#"len("one", "two")"#),
        "Error: wrong number of arguments. got=2, want=1"
    );
}

#[test]
fn kind_writes_the_tag_and_yields_null() {
    assert_eq!(run("kind(1)"), "null");
    assert_eq!(run("kind(true)"), "null");
    assert_eq!(run(r#"kind("s")"#), "null");
    assert_eq!(run("kind([1])"), "null");
}

#[test]
fn exit_with_no_argument_defaults_to_zero() {
    assert_eq!(run("exit()"), "exit(0)");
}

#[test]
fn exit_with_integer_argument() {
    assert_eq!(run("exit(2)"), "exit(2)");
}

#[test]
fn exit_short_circuits_remaining_top_level_statements() {
    assert_eq!(run("exit(227); 334;"), "exit(227)");
}

#[test]
fn user_code_can_shadow_a_builtin_name() {
    assert_eq!(run("let len = fn(x) { 99 }; len(\"anything\")"), "99");
}

#[test]
fn exit_propagates_out_of_an_infix_operand_instead_of_a_type_error() {
    assert_eq!(run("1 + exit(3)"), "exit(3)");
    assert_eq!(run("exit(3) + 1"), "exit(3)");
}

#[test]
fn exit_propagates_out_of_a_call_argument() {
    assert_eq!(run("let add = fn(a, b) { a + b }; add(1, exit(4))"), "exit(4)");
}

#[test]
fn exit_propagates_out_of_an_array_literal_element() {
    assert_eq!(run("[1, exit(5), 3]"), "exit(5)");
}

#[test]
fn exit_propagates_out_of_an_if_condition() {
    assert_eq!(run("if (exit(6)) { 1 } else { 2 }"), "exit(6)");
}
