//! Tokenizer for the literal grammar.
//!
//! The lexer walks the input once, tracking byte offset, line and column the
//! same way for every token so that later stages can cite exact locations.
//! Whitespace, newlines and `//` / `/* */` comments separate tokens and are
//! otherwise dropped.

use crate::{Error, Position, Result};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// Integer text as written, minus `_` separators. Prefixed forms such
    /// as `0x10` keep their prefix.
    Int(String),
    /// Decimal float text exactly as written.
    Float(String),
    /// Imaginary literal such as `2i`.
    Imag(String),
    /// Rune literal text between the quotes.
    Char(String),
    /// String literal with quotes removed and escapes resolved.
    Str(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Assign,
    Amp,
    Minus,
    Plus,
    Star,
    /// Any other operator of the host grammar.
    Op(&'static str),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::Int(text) | TokenKind::Float(text) | TokenKind::Imag(text) => {
                write!(f, "number {}", text)
            }
            TokenKind::Char(_) => f.write_str("rune literal"),
            TokenKind::Str(_) => f.write_str("string literal"),
            TokenKind::LBrace => f.write_str("'{'"),
            TokenKind::RBrace => f.write_str("'}'"),
            TokenKind::LBracket => f.write_str("'['"),
            TokenKind::RBracket => f.write_str("']'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Semicolon => f.write_str("';'"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::Assign => f.write_str("'='"),
            TokenKind::Amp => f.write_str("'&'"),
            TokenKind::Minus => f.write_str("'-'"),
            TokenKind::Plus => f.write_str("'+'"),
            TokenKind::Star => f.write_str("'*'"),
            TokenKind::Op(op) => write!(f, "'{}'", op),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}

/// Splits `input` into tokens, ending with a single [`TokenKind::Eof`].
pub fn tokenize(filename: &str, input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(filename, input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    filename: &'a str,
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(filename: &'a str, input: &'a str) -> Self {
        Lexer {
            filename,
            input,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn pos(&self) -> Position {
        Position::new(self.filename, self.position, self.line, self.column)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.position..].chars();
        chars.next();
        chars.next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match (self.peek_char(), self.peek_second()) {
                (Some(ch), _) if ch.is_whitespace() => {
                    self.next_char();
                }
                (Some('/'), Some('/')) => {
                    while let Some(ch) = self.peek_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.next_char();
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos();
                    self.next_char();
                    self.next_char();
                    loop {
                        match self.next_char() {
                            Some('*') if self.peek_char() == Some('/') => {
                                self.next_char();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(Error::syntax(start, "comment not terminated")),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        let pos = self.pos();
        let Some(ch) = self.peek_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos,
            });
        };

        let kind = match ch {
            '"' => TokenKind::Str(self.lex_string()?),
            '`' => TokenKind::Str(self.lex_raw_string()?),
            '\'' => TokenKind::Char(self.lex_rune()?),
            c if c.is_ascii_digit() => self.lex_number(),
            '.' if self.peek_second().map_or(false, |c| c.is_ascii_digit()) => self.lex_number(),
            c if c == '_' || c.is_alphabetic() => TokenKind::Ident(self.lex_ident()),
            _ => {
                self.next_char();
                let next = self.peek_char();
                let op = match (ch, next) {
                    ('.', Some('.')) if self.peek_second() == Some('.') => Some("..."),
                    ('&', Some('&')) => Some("&&"),
                    ('&', Some('^')) => Some("&^"),
                    ('|', Some('|')) => Some("||"),
                    ('=', Some('=')) => Some("=="),
                    ('!', Some('=')) => Some("!="),
                    ('<', Some('=')) => Some("<="),
                    ('<', Some('<')) => Some("<<"),
                    ('<', Some('-')) => Some("<-"),
                    ('>', Some('=')) => Some(">="),
                    ('>', Some('>')) => Some(">>"),
                    _ => None,
                };
                if let Some(op) = op {
                    for _ in 1..op.len() {
                        self.next_char();
                    }
                    return Ok(Token {
                        kind: TokenKind::Op(op),
                        pos,
                    });
                }
                match ch {
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    ',' => TokenKind::Comma,
                    ':' => TokenKind::Colon,
                    ';' => TokenKind::Semicolon,
                    '.' => TokenKind::Dot,
                    '=' => TokenKind::Assign,
                    '&' => TokenKind::Amp,
                    '-' => TokenKind::Minus,
                    '+' => TokenKind::Plus,
                    '*' => TokenKind::Star,
                    '!' => TokenKind::Op("!"),
                    '/' => TokenKind::Op("/"),
                    '%' => TokenKind::Op("%"),
                    '|' => TokenKind::Op("|"),
                    '^' => TokenKind::Op("^"),
                    '<' => TokenKind::Op("<"),
                    '>' => TokenKind::Op(">"),
                    other => {
                        return Err(Error::syntax(
                            pos,
                            format!("illegal character {:?}", other),
                        ))
                    }
                }
            }
        };

        Ok(Token { kind, pos })
    }

    fn lex_ident(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch == '_' || ch.is_alphanumeric() {
                self.next_char();
            } else {
                break;
            }
        }
        self.input[start..self.position].to_string()
    }

    fn eat_digits(&mut self) -> usize {
        let mut count = 0;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() || (ch == '_' && count > 0) {
                self.next_char();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn lex_number(&mut self) -> TokenKind {
        let start = self.position;
        if self.peek_char() == Some('0')
            && matches!(
                self.peek_second(),
                Some('x') | Some('X') | Some('o') | Some('O') | Some('b') | Some('B')
            )
        {
            return self.lex_prefixed_number(start);
        }
        let mut is_float = false;

        self.eat_digits();
        if self.peek_char() == Some('.') {
            is_float = true;
            self.next_char();
            self.eat_digits();
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let signed = matches!(self.peek_second(), Some('+') | Some('-'));
            let mut lookahead = self.input[self.position..].chars().skip(if signed { 2 } else { 1 });
            if lookahead.next().map_or(false, |c| c.is_ascii_digit()) {
                is_float = true;
                self.next_char();
                if signed {
                    self.next_char();
                }
                self.eat_digits();
            }
        }

        let imaginary = self.peek_char() == Some('i');
        if imaginary {
            self.next_char();
        }

        let text: String = self.input[start..self.position]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        if imaginary {
            TokenKind::Imag(text)
        } else if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Int(text)
        }
    }

    /// `0x`, `0o` and `0b` literals, hexadecimal floats included. The digits
    /// are not checked here; the text simply fails to read as a decimal.
    fn lex_prefixed_number(&mut self, start: usize) -> TokenKind {
        self.next_char();
        self.next_char();
        let mut previous = ' ';
        while let Some(ch) = self.peek_char() {
            let exponent_sign = matches!(ch, '+' | '-') && matches!(previous, 'p' | 'P');
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || exponent_sign {
                previous = ch;
                self.next_char();
            } else {
                break;
            }
        }
        let text: String = self.input[start..self.position]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        if text.ends_with('i') {
            TokenKind::Imag(text)
        } else {
            TokenKind::Int(text)
        }
    }

    fn lex_string(&mut self) -> Result<String> {
        let start = self.pos();
        self.next_char(); // opening quote
        let mut result = String::new();

        loop {
            match self.next_char() {
                Some('"') => return Ok(result),
                Some('\n') | None => {
                    return Err(Error::syntax(start, "string literal not terminated"))
                }
                Some('\\') => {
                    let escape_pos = self.pos();
                    match self.next_char() {
                        Some('\\') => result.push('\\'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('n') => result.push('\n'),
                        Some('r') => result.push('\r'),
                        Some('t') => result.push('\t'),
                        Some('a') => result.push('\u{0007}'),
                        Some('b') => result.push('\u{0008}'),
                        Some('f') => result.push('\u{000C}'),
                        Some('v') => result.push('\u{000B}'),
                        Some(first @ '0'..='7') => {
                            result.push(self.lex_octal_escape(first, &escape_pos)?)
                        }
                        Some('x') => result.push(self.lex_hex_escape(2, &escape_pos)?),
                        Some('u') => result.push(self.lex_hex_escape(4, &escape_pos)?),
                        Some('U') => result.push(self.lex_hex_escape(8, &escape_pos)?),
                        Some(other) => {
                            return Err(Error::syntax(
                                escape_pos,
                                format!("unknown escape sequence '\\{}'", other),
                            ))
                        }
                        None => {
                            return Err(Error::unexpected_eof(self.pos(), "escape sequence"))
                        }
                    }
                }
                Some(other) => result.push(other),
            }
        }
    }

    fn lex_hex_escape(&mut self, digits: usize, escape_pos: &Position) -> Result<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            match self.next_char().and_then(|c| c.to_digit(16)) {
                Some(d) => code = code * 16 + d,
                None => {
                    return Err(Error::syntax(
                        escape_pos.clone(),
                        format!("escape sequence needs {} hex digits", digits),
                    ))
                }
            }
        }
        char::from_u32(code).ok_or_else(|| {
            Error::syntax(escape_pos.clone(), "escape sequence is an invalid code point")
        })
    }

    /// `\NNN`: exactly three octal digits, at most 255.
    fn lex_octal_escape(&mut self, first: char, escape_pos: &Position) -> Result<char> {
        let mut code = first.to_digit(8).unwrap_or(0);
        for _ in 0..2 {
            match self.next_char().and_then(|c| c.to_digit(8)) {
                Some(d) => code = code * 8 + d,
                None => {
                    return Err(Error::syntax(
                        escape_pos.clone(),
                        "escape sequence needs 3 octal digits",
                    ))
                }
            }
        }
        if code > 255 {
            return Err(Error::syntax(
                escape_pos.clone(),
                "octal escape value above 255",
            ));
        }
        char::from_u32(code).ok_or_else(|| {
            Error::syntax(escape_pos.clone(), "escape sequence is an invalid code point")
        })
    }

    /// Rune literals are read only to be skipped, so escapes are kept as
    /// written.
    fn lex_rune(&mut self) -> Result<String> {
        let start = self.pos();
        self.next_char(); // opening quote
        let begin = self.position;
        loop {
            match self.next_char() {
                Some('\'') => return Ok(self.input[begin..self.position - 1].to_string()),
                Some('\\') => {
                    self.next_char();
                }
                Some('\n') | None => {
                    return Err(Error::syntax(start, "rune literal not terminated"))
                }
                Some(_) => {}
            }
        }
    }

    fn lex_raw_string(&mut self) -> Result<String> {
        let start = self.pos();
        self.next_char(); // opening backquote
        let begin = self.position;
        while let Some(ch) = self.next_char() {
            if ch == '`' {
                // Carriage returns are discarded from raw strings.
                return Ok(self.input[begin..self.position - 1].replace('\r', ""));
            }
        }
        Err(Error::syntax(start, "raw string literal not terminated"))
    }
}
