//! Recursive-descent Pratt parser. Each [`TokenKind`] that can start an
//! expression has a prefix parse function; each that can continue one as an
//! infix or index operator has an infix parse function plus a precedence.
//! Parsing an expression is "parse a prefix, then keep absorbing infixes of
//! higher precedence than the caller's floor" — the textbook Pratt loop.

use crate::ast::{
    ArrayLiteral, BlockStatement, BooleanLiteral, CallExpression, Expression, ExpressionStatement,
    FunctionLiteral, HashLiteral, Identifier, IfExpression, IndexExpression, InfixExpression,
    IntegerLiteral, LetStatement, PrefixExpression, Program, ReturnStatement, Statement,
    StringLiteral,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::Ne => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

/// Parses a fixed token stream into a [`Program`], accumulating diagnostics
/// rather than failing outright. A syntax error does not stop the parser:
/// it records a message and tries to resynchronize on the next statement,
/// the same recovery strategy as a single-pass compiler front end.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    pub diagnostics: Vec<String>,
}

impl Parser {
    /// Drain `lexer` to completion up front. The parser itself still looks
    /// like the textbook double-buffered `cur_token`/`peek_token` design
    /// (see `current`/`peek` below); materializing the stream first just
    /// lets those be plain index lookups instead of a two-deep ring buffer.
    pub fn new(lexer: Lexer) -> Self {
        Self {
            tokens: crate::lexer::drain(lexer),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    fn current(&self) -> &Token {
        // `tokens` always ends in `Eof`, and `pos` never advances past it,
        // so this index is always in bounds.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        let idx = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn current_is(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume the peeked token if it matches `kind`; otherwise record a
    /// diagnostic and leave position unchanged.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.advance();
            true
        } else {
            self.diagnostics.push(format!(
                "expected next token to be {kind}, got {} instead (L{})",
                self.peek().kind,
                self.peek().line
            ));
            false
        }
    }

    /// The diagnostics accumulated so far. A non-empty result means the
    /// program is skeletal; collaborators must not hand it to `eval`.
    pub fn errors(&self) -> &[String] {
        &self.diagnostics
    }

    fn no_prefix_parse_fn_error(&mut self) {
        self.diagnostics.push(format!(
            "no prefix parse function for {} found",
            self.current().kind
        ));
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.advance();
        }
        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current().kind {
            TokenKind::Let => self.parse_let_statement().map(Statement::Let),
            TokenKind::Return => self.parse_return_statement().map(Statement::Return),
            _ => self.parse_expression_statement().map(Statement::Expression),
        }
    }

    fn parse_let_statement(&mut self) -> Option<LetStatement> {
        let token = self.current().clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier {
            token: self.current().clone(),
            name: self.current().lexeme.clone(),
        };

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }

        Some(LetStatement { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<ReturnStatement> {
        let token = self.current().clone();
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }

        Some(ReturnStatement { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<ExpressionStatement> {
        let token = self.current().clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }

        Some(ExpressionStatement { token, expression })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < precedence_of(self.peek().kind) {
            self.advance();
            left = match self.current().kind {
                TokenKind::LParen => self.parse_call_expression(left),
                TokenKind::LBracket => self.parse_index_expression(left),
                _ => self.parse_infix_expression(left),
            }?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.current().kind {
            TokenKind::Ident => Some(Expression::Identifier(Identifier {
                token: self.current().clone(),
                name: self.current().lexeme.clone(),
            })),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::String => Some(Expression::StringLiteral(StringLiteral {
                token: self.current().clone(),
                value: self.current().lexeme.clone(),
            })),
            TokenKind::True | TokenKind::False => Some(Expression::BooleanLiteral(BooleanLiteral {
                token: self.current().clone(),
                value: self.current_is(TokenKind::True),
            })),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            _ => {
                self.no_prefix_parse_fn_error();
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.current().clone();
        match token.lexeme.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral(IntegerLiteral { token, value })),
            Err(_) => {
                self.diagnostics
                    .push(format!("could not parse {} as integer", token.lexeme));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.current().clone();
        let operator = token.lexeme.clone();
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix(PrefixExpression {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current().clone();
        let operator = token.lexeme.clone();
        let precedence = precedence_of(token.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix(InfixExpression {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.advance();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expression)
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.current().clone();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expression::ArrayLiteral(ArrayLiteral { token, elements }))
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.current().clone();
        let mut pairs = Vec::new();

        while !self.peek_is(TokenKind::RBrace) {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if !self.peek_is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }

        Some(Expression::HashLiteral(HashLiteral { token, pairs }))
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.current().clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenKind::Else) {
            self.advance();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::If(IfExpression {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.current().clone();
        let mut statements = Vec::new();
        self.advance();

        while !self.current_is(TokenKind::RBrace) && !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.advance();
        }

        BlockStatement { token, statements }
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.current().clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expression::FunctionLiteral(FunctionLiteral {
            token,
            parameters,
            body,
        }))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.advance();
            return Some(parameters);
        }

        self.advance();
        parameters.push(Identifier {
            token: self.current().clone(),
            name: self.current().lexeme.clone(),
        });

        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            parameters.push(Identifier {
                token: self.current().clone(),
                name: self.current().lexeme.clone(),
            });
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(parameters)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.current().clone();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::Call(CallExpression {
            token,
            function: Box::new(function),
            arguments,
        }))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current().clone();
        self.advance();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expression::Index(IndexExpression {
            token,
            left: Box::new(left),
            index: Box::new(index),
        }))
    }

    /// Parse a comma-separated expression list terminated by `end`, shared
    /// by array literals, call arguments, and (indirectly) hash literals.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.advance();
            return Some(list);
        }

        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        assert!(
            parser.diagnostics.is_empty(),
            "unexpected parse errors: {:?}",
            parser.diagnostics
        );
        program
    }

    #[test]
    fn parses_let_statements() {
        let program = parse("let x = 5; let y = true; let foobar = y;");
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn parses_operator_precedence() {
        let program = parse("a + b * c");
        assert_eq!(program.to_string(), "(a + (b * c))");
    }

    #[test]
    fn parses_grouped_precedence() {
        let program = parse("(a + b) * c");
        assert_eq!(program.to_string(), "((a + b) * c)");
    }

    #[test]
    fn parses_if_else_expression() {
        let program = parse("if (x < y) { x } else { y }");
        assert_eq!(program.to_string(), "if(x < y) xelse y");
    }

    #[test]
    fn parses_function_literal_single_closing_paren() {
        let program = parse("fn(x, y) { x + y; }");
        assert_eq!(program.to_string(), "fn(x, y) (x + y)");
    }

    #[test]
    fn parses_call_expression_arguments() {
        let program = parse("add(1, 2 * 3, 4 + 5)");
        assert_eq!(program.to_string(), "add(1, (2 * 3), (4 + 5))");
    }

    #[test]
    fn parses_index_expression() {
        let program = parse("myArray[1 + 1]");
        assert_eq!(program.to_string(), "(myArray[(1 + 1)])");
    }

    #[test]
    fn records_diagnostic_on_missing_token() {
        let mut parser = Parser::new(Lexer::new("let x 5;"));
        parser.parse_program();
        assert!(!parser.diagnostics.is_empty());
        assert!(parser.diagnostics[0].contains("expected next token to be ="));
    }

    #[test]
    fn records_diagnostic_for_unparsable_prefix() {
        let mut parser = Parser::new(Lexer::new(")"));
        parser.parse_program();
        assert!(parser.diagnostics[0].contains("no prefix parse function for )"));
    }
}
