use std::fmt::{Display, Formatter};
use crate::interpreter::ast::{BinaryOp, Expr, Stmt};
use crate::interpreter::lexer::{Lexer, LexerError, Token, TokenType};

#[derive(Debug)]
pub enum ParseError {
    UnexpectedToken {
        expected: TokenType,
        actual: Token,
    },
    ExpectedStatement {
        actual: Token,
    },
    ExpectedFactor {
        actual: Token,
    },
    InvalidNumber {
        token: Token,
        message: String,
    },
    Lexer(LexerError),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnexpectedToken { expected, actual } =>
                write!(f, "{} Unexpected token {}; expecting {}", actual.start(), actual, expected),
            ParseError::ExpectedStatement { actual } =>
                write!(f, "{} Expected turtle action statement, got {}", actual.start(), actual),
            ParseError::ExpectedFactor { actual } =>
                write!(f, "{} Expected factor, got {}", actual.start(), actual),
            ParseError::InvalidNumber { token, message } =>
                write!(f, "{} Failed to parse number literal {}: {}", token.start(), token, message),
            ParseError::Lexer(err) => err.fmt(f),
        }
    }
}

impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> ParseError {
        ParseError::Lexer(err)
    }
}

type ParseResult<T> = Result<T, ParseError>;

/// Predictive recursive-descent parser with one token of lookahead.
/// The first violated expectation aborts parsing; no partial tree is
/// returned and no recovery is attempted.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    current: Token,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'_>) -> Parser<'_> {
        Parser {
            lexer,
            current: Token::empty(),
        }
    }

    /// Parses a whole program: a top-level statement list followed by EOT.
    pub fn parse(&mut self) -> ParseResult<Vec<Stmt>> {
        self.advance()?;

        let statements = self.parse_statement_list()?;
        self.expect(TokenType::Eof)?;

        Ok(statements)
    }

    // Statement parsing

    fn parse_statement_list(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while Self::starts_statement(self.current.token_type()) {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// A block is a greedy statement repetition; it ends at the first token
    /// that cannot start a statement (`OD`, `FI`, `ELSE`, `ELSIF`, EOT, ...).
    fn parse_block(&mut self) -> ParseResult<Stmt> {
        Ok(Stmt::Block(self.parse_statement_list()?))
    }

    fn starts_statement(token_type: TokenType) -> bool {
        matches!(token_type,
            TokenType::Identifier | TokenType::While | TokenType::If
            | TokenType::Home | TokenType::PenUp | TokenType::PenDown
            | TokenType::Forward | TokenType::Left | TokenType::Right
            | TokenType::PushState | TokenType::PopState)
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.current.token_type() {
            TokenType::Identifier => self.parse_assign(),
            TokenType::While => self.parse_while_statement(),
            TokenType::If => self.parse_if_statement(),
            _ => self.parse_action(),
        }
    }

    fn parse_assign(&mut self) -> ParseResult<Stmt> {
        let name = self.current.source().to_owned();
        self.expect(TokenType::Identifier)?;
        self.expect(TokenType::Assign)?;

        let expr = self.parse_expression()?;
        Ok(Stmt::Assign { name, expr })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::While)?;
        let condition = self.parse_bool()?;

        self.expect(TokenType::Do)?;
        let body = self.parse_block()?;
        self.expect(TokenType::Od)?;

        Ok(Stmt::While { condition, body: Box::new(body) })
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::If)?;
        let condition = self.parse_bool()?;

        self.expect(TokenType::Then)?;
        let then = self.parse_block()?;
        let otherwise = self.parse_else_part()?;

        Ok(Stmt::If { condition, then: Box::new(then), otherwise })
    }

    /// An `ELSIF` chain becomes right-nested `If` nodes; a bare `FI`
    /// collapses to no alternative branch.
    fn parse_else_part(&mut self) -> ParseResult<Option<Box<Stmt>>> {
        if self.matches(TokenType::Elsif)? {
            let condition = self.parse_bool()?;

            self.expect(TokenType::Then)?;
            let then = self.parse_block()?;
            let otherwise = self.parse_else_part()?;

            Ok(Some(Box::new(Stmt::If { condition, then: Box::new(then), otherwise })))
        } else if self.matches(TokenType::Else)? {
            let body = self.parse_block()?;
            self.expect(TokenType::Fi)?;

            Ok(Some(Box::new(body)))
        } else {
            self.expect(TokenType::Fi)?;
            Ok(None)
        }
    }

    fn parse_action(&mut self) -> ParseResult<Stmt> {
        match self.current.token_type() {
            TokenType::Home => { self.advance()?; Ok(Stmt::Home) },
            TokenType::PenUp => { self.advance()?; Ok(Stmt::PenUp) },
            TokenType::PenDown => { self.advance()?; Ok(Stmt::PenDown) },
            TokenType::PushState => { self.advance()?; Ok(Stmt::PushState) },
            TokenType::PopState => { self.advance()?; Ok(Stmt::PopState) },

            TokenType::Forward => { self.advance()?; Ok(Stmt::Forward(self.parse_expression()?)) },
            TokenType::Left => { self.advance()?; Ok(Stmt::Left(self.parse_expression()?)) },
            TokenType::Right => { self.advance()?; Ok(Stmt::Right(self.parse_expression()?)) },

            _ => Err(ParseError::ExpectedStatement { actual: self.current.clone() }),
        }
    }

    // Expression parsing

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_term()?;

        loop {
            let operator = match self.current.token_type() {
                TokenType::Plus => BinaryOp::Add,
                TokenType::Minus => BinaryOp::Subtract,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_term()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_factor()?;

        loop {
            let operator = match self.current.token_type() {
                TokenType::Multiply => BinaryOp::Multiply,
                TokenType::Divide => BinaryOp::Divide,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_factor()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        match self.current.token_type() {
            // Unary '+' is a pass-through
            TokenType::Plus => {
                self.advance()?;
                self.parse_factor()
            },
            TokenType::Minus => {
                self.advance()?;
                Ok(Expr::Negate(Box::new(self.parse_factor()?)))
            },
            TokenType::ParenthesisLeft => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenType::ParenthesisRight)?;

                Ok(expr)
            },
            TokenType::Identifier => {
                let name = self.current.source().to_owned();
                self.advance()?;

                Ok(Expr::Variable(name))
            },
            TokenType::Real => {
                let token = self.current.clone();
                self.advance()?;

                token.source().parse().map(Expr::Constant)
                    .map_err(|err: std::num::ParseFloatError| ParseError::InvalidNumber {
                        token, message: err.to_string(),
                    })
            },
            _ => Err(ParseError::ExpectedFactor { actual: self.current.clone() }),
        }
    }

    // Boolean expression parsing

    fn parse_bool(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_bool_term()?;

        while self.matches(TokenType::Or)? {
            let right = self.parse_bool_term()?;
            expr = Expr::Binary { left: Box::new(expr), operator: BinaryOp::Or, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_bool_term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_bool_factor()?;

        while self.matches(TokenType::And)? {
            let right = self.parse_bool_factor()?;
            expr = Expr::Binary { left: Box::new(expr), operator: BinaryOp::And, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_bool_factor(&mut self) -> ParseResult<Expr> {
        if self.matches(TokenType::Not)? {
            // NOT parses its operand and yields it unchanged; the node set
            // has no negation node for it.
            self.parse_bool_factor()
        } else if self.matches(TokenType::ParenthesisLeft)? {
            let expr = self.parse_bool()?;
            self.expect(TokenType::ParenthesisRight)?;

            Ok(expr)
        } else {
            self.parse_comparison()
        }
    }

    /// The comparison operator is optional: a bare arithmetic expression is
    /// a valid boolean term, truthy when non-zero.
    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_expression()?;

        let operator = match self.current.token_type() {
            TokenType::Equal => BinaryOp::Equal,
            TokenType::NotEqual => BinaryOp::NotEqual,
            TokenType::Less => BinaryOp::Less,
            TokenType::LessEqual => BinaryOp::LessEqual,
            TokenType::Greater => BinaryOp::Greater,
            TokenType::GreaterEqual => BinaryOp::GreaterEqual,
            _ => return Ok(expr),
        };

        self.advance()?;
        let right = self.parse_expression()?;

        Ok(Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) })
    }

    fn advance(&mut self) -> ParseResult<()> {
        self.current = self.lexer.scan_token()?;
        Ok(())
    }

    fn expect(&mut self, token_type: TokenType) -> ParseResult<()> {
        if self.current.token_type() == token_type {
            self.advance()
        } else {
            Err(ParseError::UnexpectedToken { expected: token_type, actual: self.current.clone() })
        }
    }

    fn matches(&mut self, token_type: TokenType) -> ParseResult<bool> {
        if self.current.token_type() == token_type {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseResult<Vec<Stmt>> {
        Parser::new(Lexer::new(source)).parse()
    }

    fn binary(left: Expr, operator: BinaryOp, right: Expr) -> Expr {
        Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }

    #[test]
    fn test_precedence() {
        // 2 + 3 * 4 groups as 2 + (3 * 4)
        assert_eq!(vec![Stmt::Forward(binary(
            Expr::Constant(2.0),
            BinaryOp::Add,
            binary(Expr::Constant(3.0), BinaryOp::Multiply, Expr::Constant(4.0)),
        ))], parse("FORWARD 2 + 3 * 4").unwrap());

        assert_eq!(vec![Stmt::Forward(binary(
            binary(Expr::Constant(2.0), BinaryOp::Add, Expr::Constant(3.0)),
            BinaryOp::Multiply,
            Expr::Constant(4.0),
        ))], parse("FORWARD (2 + 3) * 4").unwrap());
    }

    #[test]
    fn test_unary_operators() {
        // Unary minus binds tighter than binary
        assert_eq!(vec![Stmt::Forward(binary(
            Expr::Negate(Box::new(Expr::Constant(2.0))),
            BinaryOp::Add,
            Expr::Constant(3.0),
        ))], parse("FORWARD -2 + 3").unwrap());

        // Unary plus is a no-op
        assert_eq!(vec![Stmt::Forward(Expr::Constant(2.0))], parse("FORWARD +2").unwrap());
    }

    #[test]
    fn test_assign() {
        assert_eq!(vec![Stmt::Assign {
            name: String::from("x"),
            expr: Expr::Constant(5.0),
        }], parse("x := 5").unwrap());
    }

    #[test]
    fn test_while_statement() {
        assert_eq!(vec![Stmt::While {
            condition: binary(Expr::Variable(String::from("x")), BinaryOp::Less, Expr::Constant(3.0)),
            body: Box::new(Stmt::Block(vec![Stmt::Home])),
        }], parse("WHILE x < 3 DO HOME OD").unwrap());
    }

    #[test]
    fn test_elsif_chain_nests_right() {
        assert_eq!(vec![Stmt::If {
            condition: Expr::Constant(0.0),
            then: Box::new(Stmt::Block(vec![Stmt::Home])),
            otherwise: Some(Box::new(Stmt::If {
                condition: Expr::Constant(1.0),
                then: Box::new(Stmt::Block(vec![Stmt::PenUp])),
                otherwise: Some(Box::new(Stmt::Block(vec![Stmt::PenDown]))),
            })),
        }], parse("IF 0 THEN HOME ELSIF 1 THEN PENUP ELSE PENDOWN FI").unwrap());
    }

    #[test]
    fn test_if_without_else_has_no_alternative() {
        assert_eq!(vec![Stmt::If {
            condition: Expr::Constant(1.0),
            then: Box::new(Stmt::Block(vec![Stmt::Home])),
            otherwise: None,
        }], parse("IF 1 THEN HOME FI").unwrap());
    }

    #[test]
    fn test_bool_operators() {
        assert_eq!(vec![Stmt::While {
            condition: binary(
                binary(Expr::Variable(String::from("x")), BinaryOp::And, Expr::Variable(String::from("y"))),
                BinaryOp::Or,
                binary(Expr::Variable(String::from("z")), BinaryOp::Equal, Expr::Constant(1.0)),
            ),
            body: Box::new(Stmt::Block(vec![])),
        }], parse("WHILE x AND y OR z = 1 DO OD").unwrap());
    }

    #[test]
    fn test_error_reports_offending_line() {
        let err = parse("FORWARD\nIF").unwrap_err();

        match err {
            ParseError::ExpectedFactor { actual } => {
                assert_eq!(TokenType::If, actual.token_type());
                assert_eq!(2, actual.start().line);
            },
            err => panic!("expected factor error, got: {}", err),
        }
    }

    #[test]
    fn test_error_on_missing_od() {
        assert!(matches!(parse("WHILE 1 DO HOME"),
            Err(ParseError::UnexpectedToken { expected: TokenType::Od, .. })));
    }

    #[test]
    fn test_error_on_trailing_token() {
        assert!(matches!(parse("HOME OD"),
            Err(ParseError::UnexpectedToken { expected: TokenType::Eof, .. })));
    }

    #[test]
    fn test_lexer_error_propagates() {
        assert!(matches!(parse("x : 5"), Err(ParseError::Lexer(_))));
    }
}
