//! Single-pass lexer with one character of lookahead.

use std::iter::Peekable;
use std::str::Chars;

use crate::token::{lookup_ident, Token, TokenKind};

/// Scans a source string into [`Token`]s one at a time.
///
/// The lexer never fails at the Rust level: characters it cannot classify
/// become `Illegal` tokens rather than an `Err`, matching the rest of the
/// pipeline's policy of representing failure as data.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    ch: Option<char>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut input = source.chars().peekable();
        let ch = input.next();
        Self { input, ch, line: 1 }
    }

    fn advance(&mut self) {
        if self.ch == Some('\n') {
            self.line += 1;
        }
        self.ch = self.input.next();
    }

    fn peek(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn eat_whitespace(&mut self) {
        while matches!(self.ch, Some(' ' | '\t' | '\n' | '\r')) {
            self.advance();
        }
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.ch {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.advance();
        }
        out
    }

    fn read_string(&mut self) -> String {
        // Opening quote already consumed by the caller.
        let mut out = String::new();
        loop {
            match self.ch {
                None => break,
                Some('"') => break,
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
            }
        }
        out
    }

    /// Produce the next token, advancing internal state. Calling this
    /// repeatedly past the end of input keeps yielding `Eof`.
    pub fn next_token(&mut self) -> Token {
        self.eat_whitespace();

        let line = self.line;

        let Some(c) = self.ch else {
            return Token::new(TokenKind::Eof, "", line);
        };

        macro_rules! single {
            ($kind:expr) => {{
                let lexeme = c.to_string();
                self.advance();
                Token::new($kind, lexeme, line)
            }};
        }

        match c {
            '=' => {
                self.advance();
                if self.ch == Some('=') {
                    self.advance();
                    Token::new(TokenKind::Eq, "==", line)
                } else {
                    Token::new(TokenKind::Assign, "=", line)
                }
            }
            '!' => {
                self.advance();
                if self.ch == Some('=') {
                    self.advance();
                    Token::new(TokenKind::Ne, "!=", line)
                } else {
                    Token::new(TokenKind::Bang, "!", line)
                }
            }
            ';' => single!(TokenKind::Semicolon),
            ':' => single!(TokenKind::Colon),
            ',' => single!(TokenKind::Comma),
            '(' => single!(TokenKind::LParen),
            ')' => single!(TokenKind::RParen),
            '{' => single!(TokenKind::LBrace),
            '}' => single!(TokenKind::RBrace),
            '[' => single!(TokenKind::LBracket),
            ']' => single!(TokenKind::RBracket),
            '+' => single!(TokenKind::Plus),
            '-' => single!(TokenKind::Minus),
            '*' => single!(TokenKind::Asterisk),
            '/' => single!(TokenKind::Slash),
            '<' => single!(TokenKind::Lt),
            '>' => single!(TokenKind::Gt),
            '"' => {
                self.advance();
                let lexeme = self.read_string();
                // Consume the closing quote if present; EOF is tolerated.
                if self.ch == Some('"') {
                    self.advance();
                }
                Token::new(TokenKind::String, lexeme, line)
            }
            c if c.is_alphabetic() || c == '_' => {
                let lexeme = self.read_while(|c| c.is_alphanumeric() || c == '_');
                let kind = lookup_ident(&lexeme);
                Token::new(kind, lexeme, line)
            }
            c if c.is_ascii_digit() => {
                let lexeme = self.read_while(|c| c.is_ascii_digit());
                Token::new(TokenKind::Int, lexeme, line)
            }
            other => {
                log::debug!("lexer encountered an illegal character '{other}' on line {line}");
                self.advance();
                Token::new(TokenKind::Illegal, other.to_string(), line)
            }
        }
    }
}

/// Run `lexer` to completion, collecting every token including the trailing
/// `Eof`. Used by [`crate::parser::Parser::new`] to materialize a token
/// stream up front.
pub fn drain(mut lexer: Lexer<'_>) -> Vec<Token> {
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let is_eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    tokens
}

/// Convenience wrapper: run a fresh [`Lexer`] over `source` to completion and
/// collect every token, including the trailing `Eof`.
pub fn lex(source: &str) -> Vec<Token> {
    drain(Lexer::new(source))
}
