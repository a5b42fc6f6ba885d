//! A tree-walking interpreter for a small expression-oriented scripting
//! language: `let` bindings, first-class functions with lexical closures,
//! integers, booleans, strings, arrays, hashes, and a handful of builtins.
//!
//! ```
//! use lenient_lang::{eval_source, Environment};
//!
//! let env = Environment::new();
//! let result = eval_source("let add = fn(a, b) { a + b }; add(2, 3)", env);
//! assert_eq!(result.inspect(), "5");
//! ```

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;

pub use ast::Program;
pub use environment::Environment;
pub use evaluator::eval_program;
pub use lexer::{lex, Lexer};
pub use object::Value;
pub use parser::Parser;
pub use token::{Token, TokenKind};

use std::cell::RefCell;
use std::rc::Rc;

/// Parse and evaluate `source` against `env` in one call. Parse
/// diagnostics, if any, are logged and folded into a single
/// [`Value::Error`] rather than silently discarded.
pub fn eval_source(source: &str, env: Rc<RefCell<Environment>>) -> Rc<Value> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    if !parser.diagnostics.is_empty() {
        for diagnostic in &parser.diagnostics {
            log::error!("{diagnostic}");
        }
        return Rc::new(Value::Error(parser.diagnostics.join("; ")));
    }

    eval_program(&program, env)
}
