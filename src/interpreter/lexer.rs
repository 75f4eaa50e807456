use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::Chars;
use lazy_static::lazy_static;
use crate::util;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenType {
    ParenthesisLeft, ParenthesisRight,

    Assign,
    Equal, NotEqual,
    Greater, GreaterEqual,
    Less, LessEqual,

    Plus, Minus,
    Multiply, Divide,

    Identifier,
    Real,

    // Keywords
    Or, And, Not,
    While, Do, Od,
    If, Then, Elsif, Else, Fi,
    Home, PenUp, PenDown,
    Forward, Left, Right,
    PushState, PopState,

    // EOF
    Eof,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenType::ParenthesisLeft => "LPAREN",
            TokenType::ParenthesisRight => "RPAREN",
            TokenType::Assign => "ASSIGN",
            TokenType::Equal => "EQ",
            TokenType::NotEqual => "NE",
            TokenType::Greater => "GT",
            TokenType::GreaterEqual => "GE",
            TokenType::Less => "LT",
            TokenType::LessEqual => "LE",
            TokenType::Plus => "PLUS",
            TokenType::Minus => "MINUS",
            TokenType::Multiply => "MULT",
            TokenType::Divide => "DIV",
            TokenType::Identifier => "IDENT",
            TokenType::Real => "REAL",
            TokenType::Or => "OR",
            TokenType::And => "AND",
            TokenType::Not => "NOT",
            TokenType::While => "WHILE",
            TokenType::Do => "DO",
            TokenType::Od => "OD",
            TokenType::If => "IF",
            TokenType::Then => "THEN",
            TokenType::Elsif => "ELSIF",
            TokenType::Else => "ELSE",
            TokenType::Fi => "FI",
            TokenType::Home => "HOME",
            TokenType::PenUp => "PENUP",
            TokenType::PenDown => "PENDOWN",
            TokenType::Forward => "FORWARD",
            TokenType::Left => "LEFT",
            TokenType::Right => "RIGHT",
            TokenType::PushState => "PUSHSTATE",
            TokenType::PopState => "POPSTATE",
            TokenType::Eof => "EOT",
        })
    }
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("OR", TokenType::Or),
        ("AND", TokenType::And),
        ("NOT", TokenType::Not),
        ("WHILE", TokenType::While),
        ("DO", TokenType::Do),
        ("OD", TokenType::Od),
        ("IF", TokenType::If),
        ("THEN", TokenType::Then),
        ("ELSIF", TokenType::Elsif),
        ("ELSE", TokenType::Else),
        ("FI", TokenType::Fi),
        ("HOME", TokenType::Home),
        ("PENUP", TokenType::PenUp),
        ("PENDOWN", TokenType::PenDown),
        ("FORWARD", TokenType::Forward),
        ("LEFT", TokenType::Left),
        ("RIGHT", TokenType::Right),
        ("PUSHSTATE", TokenType::PushState),
        ("POPSTATE", TokenType::PopState),
    ]);
}

/// A lexical unit. Identifier text and numeric literal text travel in
/// `source`, so a token stays valid however many tokens are scanned after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    start: TokenPos, end: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, start: TokenPos, end: TokenPos) -> Token {
        Token {
            token_type, source,
            start, end
        }
    }

    pub fn empty() -> Token {
        Token {
            token_type: TokenType::Eof,
            source: String::from(""),
            start: TokenPos::begin(), end: TokenPos::begin(),
        }
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("EOT"),
            _ => write!(f, "'{}'", self.source),
        }
    }
}

#[derive(Debug, Clone)]
pub enum LexerError {
    UnexpectedCharacter(TokenPos, char),
    ExpectedCharacter {
        pos: TokenPos,
        expected: char,
        got: Option<char>,
    },
}

impl LexerError {
    pub fn pos(&self) -> TokenPos {
        match self {
            LexerError::UnexpectedCharacter(pos, _) => *pos,
            LexerError::ExpectedCharacter { pos, .. } => *pos,
        }
    }
}

impl Display for LexerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LexerError::UnexpectedCharacter(pos, c) => write!(f, "{} Unexpected character '{}'", pos, c),
            LexerError::ExpectedCharacter { pos, expected, got: Some(c) } =>
                write!(f, "{} Expected '{}', got '{}'", pos, expected, c),
            LexerError::ExpectedCharacter { pos, expected, got: None } =>
                write!(f, "{} Expected '{}', got end of input", pos, expected),
        }
    }
}

type LexerResult<T> = Result<T, LexerError>;

pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peeked: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peeked: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),
        }
    }

    /// Scans the next token. At end of input this returns the EOT token,
    /// and keeps returning it on every call after that.
    pub fn scan_token(&mut self) -> LexerResult<Token> {
        loop {
            self.skip_whitespace();
            self.start_index = self.current_index;
            self.start_pos = self.current_pos;

            let c = match self.consume() {
                Some(c) => c,
                None => return Ok(self.make_token(TokenType::Eof)),
            };

            return match c {
                '#' => {
                    self.skip_line();
                    continue;
                },

                '(' => Ok(self.make_token(TokenType::ParenthesisLeft)),
                ')' => Ok(self.make_token(TokenType::ParenthesisRight)),
                '+' => Ok(self.make_token(TokenType::Plus)),
                '-' => Ok(self.make_token(TokenType::Minus)),
                '*' => Ok(self.make_token(TokenType::Multiply)),
                '/' => Ok(self.make_token(TokenType::Divide)),
                '=' => Ok(self.make_token(TokenType::Equal)),

                ':' => if self.expect('=') { Ok(self.make_token(TokenType::Assign)) } else {
                    Err(LexerError::ExpectedCharacter { pos: self.start_pos, expected: '=', got: self.peek() })
                },
                '<' => Ok(if self.expect('>') { self.make_token(TokenType::NotEqual) }
                    else if self.expect('=') { self.make_token(TokenType::LessEqual) }
                    else { self.make_token(TokenType::Less) }),
                '>' => Ok(if self.expect('=') { self.make_token(TokenType::GreaterEqual) } else {
                    self.make_token(TokenType::Greater)
                }),

                '0'..='9' => Ok(self.scan_number()),
                c if util::is_alphabetic(c) => Ok(self.scan_identifier()),

                _ => Err(LexerError::UnexpectedCharacter(self.start_pos, c)),
            };
        }
    }

    fn scan_number(&mut self) -> Token {
        while let Some('0'..='9') = self.peek() {
            let _ = self.consume();
        }

        // A '.' is consumed even when no digit follows it, so "3." scans as
        // a single REAL token whose text parses as 3.0.
        if let Some('.') = self.peek() {
            let _ = self.consume();

            while let Some('0'..='9') = self.peek() {
                let _ = self.consume();
            }
        }

        self.make_token(TokenType::Real)
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_alphanumeric(c) {
                break;
            }

            let _ = self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        let token_type = KEYWORDS.get(name).copied().unwrap_or(TokenType::Identifier);

        self.make_token(token_type)
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),

            start: self.start_pos, end: self.current_pos,
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peeked.take().or_else(|| self.chars.next())?;
        self.current_index += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }

        self.peeked
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            let _ = self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                return;
            }

            let _ = self.consume();
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.consume() {
            if c == '\n' {
                return;
            }
        }
    }
}
