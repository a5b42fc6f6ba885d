use lenient_lang::{eval_source, Environment};
use pretty_assertions::assert_eq;

fn run(source: &str) -> String {
    eval_source(source, Environment::new()).inspect()
}

#[test]
fn integer_arithmetic() {
    assert_eq!(run("5"), "5");
    assert_eq!(run("-5"), "-5");
    assert_eq!(run("5 + 5 + 5 + 5 - 10"), "10");
    assert_eq!(run("2 * 2 * 2 * 2 * 2"), "32");
    assert_eq!(run("(5 + 10 * 2 + 15 / 3) * 2 + -10"), "50");
}

#[test]
fn integer_division_truncates() {
    assert_eq!(run("7 / 2"), "3");
}

#[test]
fn string_concatenation() {
    assert_eq!(run(r#""Hello" + " " + "World!""#), "Hello World!");
}

#[test]
fn string_equality_is_structural() {
    assert_eq!(run(r#""abc" == "abc""#), "true");
    assert_eq!(run(r#""abc" != "abd""#), "true");
}

#[test]
fn string_literals_do_not_process_escapes() {
    assert_eq!(run(r#""a\nb""#), r"a\nb");
}

#[test]
fn let_statement_yields_null_not_the_bound_value() {
    assert_eq!(run("let x = 5;"), "null");
    assert_eq!(run("let x = 5; let y = 10;"), "null");
}
