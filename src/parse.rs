//! Recursive-descent parser for the literal grammar.
//!
//! ```text
//! file      = "package" ident { ";" } { decl { ";" } } EOF
//! decl      = "var" ( var_spec | "(" { var_spec { ";" } } ")" )
//! var_spec  = ident [ type ] [ "=" expr ]
//! type      = name | "[" [ int ] "]" type | "map" "[" type "]" type
//!           | "*" type | "interface" "{" "}" | "(" type ")"
//! name      = ident [ "." ident ]
//! expr      = unary { binary_op unary }
//! unary     = unary_op unary | primary { call | index | selector }
//! primary   = int | float | imag | rune | string | name | composite
//!           | type | "(" expr ")"
//! composite = [ type ] "{" [ element { "," element } [ "," ] ] "}"
//! element   = [ expr ":" ] expr
//! ```
//!
//! Only the `&`, `-` and `+` prefixes and plain operands have a value. Other
//! well-formed expressions parse to [`ExprKind::Unsupported`] and are skipped
//! later. A malformed document, or one nested more than [`MAX_DEPTH`] levels
//! deep, yields exactly one fatal [`Error`]; there is no recovery at this
//! stage.

use crate::ast::{Element, Expr, ExprKind, File, TypeExpr, UnaryOp, VarDecl};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::{Error, Position, Result};

/// Parses a complete document.
///
/// # Examples
///
/// ```rust
/// use goon::parse::parse;
///
/// let file = parse("package demo\n\nvar x = []int{1, 2}", "demo.goon").unwrap();
/// assert_eq!(file.package, "demo");
/// assert_eq!(file.decls[0].name, "x");
/// ```
pub fn parse(source: &str, filename: &str) -> Result<File> {
    let tokens = tokenize(filename, source)?;
    Parser {
        tokens,
        index: 0,
        depth: 0,
    }
    .parse_file()
}

/// Deepest nesting of expressions and types accepted.
pub const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize always terminates the stream with Eof
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn peek_nth(&self, n: usize) -> &TokenKind {
        &self.tokens[(self.index + n).min(self.tokens.len() - 1)].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
        token
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(name) if name == keyword)
    }

    fn unexpected(&self, expected: &str) -> Error {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            Error::unexpected_eof(token.pos.clone(), expected)
        } else {
            Error::syntax(
                token.pos.clone(),
                format!("expected {}, found {}", expected, token.kind),
            )
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.at(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Position)> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                let token = self.advance();
                Ok((name, token.pos))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::syntax(
                self.peek().pos.clone(),
                "expression nested too deeply",
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn skip_semicolons(&mut self) {
        while self.at(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn parse_file(&mut self) -> Result<File> {
        self.skip_semicolons();
        if !self.at_keyword("package") {
            return Err(self.unexpected("'package'"));
        }
        self.advance();
        let (package, package_pos) = self.expect_ident()?;
        self.skip_semicolons();

        let mut decls = Vec::new();
        while !self.at(&TokenKind::Eof) {
            if !self.at_keyword("var") {
                return Err(self.unexpected("'var' declaration"));
            }
            self.advance();

            if self.at(&TokenKind::LParen) {
                self.advance();
                self.skip_semicolons();
                while !self.at(&TokenKind::RParen) {
                    decls.push(self.parse_spec()?);
                    self.skip_semicolons();
                }
                self.expect(TokenKind::RParen)?;
            } else {
                decls.push(self.parse_spec()?);
            }
            self.skip_semicolons();
        }

        Ok(File {
            package,
            package_pos,
            decls,
        })
    }

    fn parse_spec(&mut self) -> Result<VarDecl> {
        let (name, pos) = self.expect_ident()?;

        let ty = if self.starts_type() {
            Some(self.parse_type()?)
        } else {
            None
        };

        let value = if self.at(&TokenKind::Assign) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };

        if ty.is_none() && value.is_none() {
            return Err(self.unexpected("type or '='"));
        }

        Ok(VarDecl {
            name,
            pos,
            ty,
            value,
        })
    }

    fn starts_type(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Ident(name) => name != "var",
            TokenKind::LBracket | TokenKind::Star | TokenKind::LParen => true,
            _ => false,
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr> {
        self.nested(Self::parse_type_inner)
    }

    fn parse_type_inner(&mut self) -> Result<TypeExpr> {
        match self.peek().kind.clone() {
            TokenKind::Star => {
                self.advance();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            TokenKind::LParen => {
                self.advance();
                let ty = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(ty)
            }
            TokenKind::LBracket => {
                self.advance();
                if self.at(&TokenKind::RBracket) {
                    self.advance();
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                // `[...]T` takes its length from the literal
                if self.at(&TokenKind::Op("...")) {
                    self.advance();
                    self.expect(TokenKind::RBracket)?;
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let len_token = self.advance();
                let len = match &len_token.kind {
                    TokenKind::Int(text) => text.parse::<u64>().map_err(|_| {
                        Error::syntax(len_token.pos.clone(), "array length out of range")
                    })?,
                    _ => {
                        return Err(Error::syntax(
                            len_token.pos.clone(),
                            format!("expected array length, found {}", len_token.kind),
                        ))
                    }
                };
                self.expect(TokenKind::RBracket)?;
                Ok(TypeExpr::Array(len, Box::new(self.parse_type()?)))
            }
            TokenKind::Ident(name) if name == "map" => {
                self.advance();
                self.expect(TokenKind::LBracket)?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBracket)?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map(Box::new(key), Box::new(value)))
            }
            TokenKind::Ident(name) if name == "interface" => {
                self.advance();
                self.expect(TokenKind::LBrace)?;
                self.expect(TokenKind::RBrace)?;
                Ok(TypeExpr::Interface)
            }
            TokenKind::Ident(_) => {
                let (first, _) = self.expect_ident()?;
                if self.at(&TokenKind::Dot) {
                    self.advance();
                    let (name, _) = self.expect_ident()?;
                    Ok(TypeExpr::Named {
                        namespace: Some(first),
                        name,
                    })
                } else {
                    Ok(TypeExpr::Named {
                        namespace: None,
                        name: first,
                    })
                }
            }
            _ => Err(self.unexpected("type")),
        }
    }

    fn at_binary_op(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Amp | TokenKind::Minus | TokenKind::Plus | TokenKind::Star => true,
            TokenKind::Op(op) => !matches!(*op, "!" | "<-" | "..."),
            _ => false,
        }
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let first = self.parse_unary()?;
        if !self.at_binary_op() {
            return Ok(first);
        }
        while self.at_binary_op() {
            self.advance();
            self.parse_unary()?;
        }
        Ok(Expr {
            kind: ExprKind::Unsupported,
            pos: first.pos,
        })
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        self.nested(Self::parse_unary_inner)
    }

    fn parse_unary_inner(&mut self) -> Result<Expr> {
        let op = match self.peek().kind {
            TokenKind::Amp => Some(UnaryOp::Ref),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Star | TokenKind::Op("!") | TokenKind::Op("^") | TokenKind::Op("<-") => {
                None
            }
            _ => {
                let primary = self.parse_primary()?;
                return self.parse_postfix(primary);
            }
        };
        let pos = self.advance().pos;
        let operand = self.parse_unary()?;
        let kind = match op {
            Some(op) => ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            None => ExprKind::Unsupported,
        };
        Ok(Expr { kind, pos })
    }

    /// Calls, indexing, slicing, selectors and type assertions.
    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr> {
        loop {
            match self.peek().kind {
                TokenKind::LParen => {
                    self.advance();
                    while !self.at(&TokenKind::RParen) {
                        self.parse_expr()?;
                        if self.at(&TokenKind::Op("...")) {
                            self.advance();
                        }
                        if self.at(&TokenKind::Comma) {
                            self.advance();
                        } else if !self.at(&TokenKind::RParen) {
                            return Err(self.unexpected("',' or ')'"));
                        }
                    }
                    self.advance(); // ')'
                }
                TokenKind::LBracket => {
                    self.advance();
                    if !self.at(&TokenKind::Colon) {
                        self.parse_expr()?;
                    }
                    while self.at(&TokenKind::Colon) {
                        self.advance();
                        if !self.at(&TokenKind::Colon) && !self.at(&TokenKind::RBracket) {
                            self.parse_expr()?;
                        }
                    }
                    self.expect(TokenKind::RBracket)?;
                }
                TokenKind::Dot => {
                    self.advance();
                    if self.at(&TokenKind::LParen) {
                        self.advance();
                        if self.at_keyword("type") {
                            self.advance();
                        } else {
                            self.parse_type()?;
                        }
                        self.expect(TokenKind::RParen)?;
                    } else {
                        self.expect_ident()?;
                    }
                }
                _ => return Ok(expr),
            }
            expr = Expr {
                kind: ExprKind::Unsupported,
                pos: expr.pos,
            };
        }
    }

    /// A composite if a body follows, otherwise a type used as a value,
    /// as in the conversion `[]byte("x")`.
    fn parse_typed_operand(&mut self, ty: TypeExpr, pos: Position) -> Result<Expr> {
        if self.at(&TokenKind::LBrace) {
            return self.parse_composite_body(Some(ty));
        }
        Ok(Expr {
            kind: ExprKind::Unsupported,
            pos,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Int(text) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Int(text),
                    pos: token.pos,
                })
            }
            TokenKind::Float(text) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Float(text),
                    pos: token.pos,
                })
            }
            TokenKind::Str(text) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Str(text),
                    pos: token.pos,
                })
            }
            TokenKind::Imag(_) | TokenKind::Char(_) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Unsupported,
                    pos: token.pos,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr {
                    kind: ExprKind::Paren(Box::new(inner)),
                    pos: token.pos,
                })
            }
            TokenKind::LBrace => self.parse_composite_body(None),
            TokenKind::LBracket => {
                let ty = self.parse_type()?;
                self.parse_typed_operand(ty, token.pos)
            }
            TokenKind::Ident(ref name) if name == "map" || name == "interface" => {
                let ty = self.parse_type()?;
                self.parse_typed_operand(ty, token.pos)
            }
            TokenKind::Ident(name) => {
                if *self.peek_nth(1) == TokenKind::Dot
                    && matches!(self.peek_nth(2), TokenKind::Ident(_))
                {
                    let ty = self.parse_type()?;
                    if self.at(&TokenKind::LBrace) {
                        return self.parse_composite_body(Some(ty));
                    }
                    match ty {
                        TypeExpr::Named {
                            namespace: Some(namespace),
                            name,
                        } => Ok(Expr {
                            kind: ExprKind::Selector { namespace, name },
                            pos: token.pos,
                        }),
                        _ => Err(Error::syntax(token.pos, "malformed selector")),
                    }
                } else {
                    self.advance();
                    if self.at(&TokenKind::LBrace) {
                        let ty = TypeExpr::Named {
                            namespace: None,
                            name,
                        };
                        return self.parse_composite_body(Some(ty));
                    }
                    Ok(Expr {
                        kind: ExprKind::Ident(name),
                        pos: token.pos,
                    })
                }
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_composite_body(&mut self, ty: Option<TypeExpr>) -> Result<Expr> {
        let lbrace = self.expect(TokenKind::LBrace)?.pos;
        let mut elements = Vec::new();

        while !self.at(&TokenKind::RBrace) {
            let first = self.parse_expr()?;
            let element = if self.at(&TokenKind::Colon) {
                self.advance();
                Element {
                    key: Some(first),
                    value: self.parse_expr()?,
                }
            } else {
                Element {
                    key: None,
                    value: first,
                }
            };
            elements.push(element);

            if self.at(&TokenKind::Comma) {
                self.advance();
            } else if !self.at(&TokenKind::RBrace) {
                return Err(self.unexpected("',' or '}'"));
            }
        }
        self.advance(); // '}'

        Ok(Expr {
            kind: ExprKind::Composite { ty, elements },
            pos: lbrace,
        })
    }
}
