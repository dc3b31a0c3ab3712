//! Syntax tree produced by [`parse`](crate::parse::parse).
//!
//! The tree knows nothing about destination types: composite literals keep
//! their written type expression only so that the interpreter can tell
//! records, sequences and mappings apart. Every expression carries the
//! position it was written at; composites carry their opening brace.

use crate::Position;
use std::fmt;

/// A parsed document: one package clause followed by variable declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct File {
    pub package: String,
    pub package_pos: Position,
    pub decls: Vec<VarDecl>,
}

/// `var <name> [Type] [= <expr>]`
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub pos: Position,
    pub ty: Option<TypeExpr>,
    pub value: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    /// `Name` or `namespace.Name`
    Named {
        namespace: Option<String>,
        name: String,
    },
    /// `[]Elem`
    Slice(Box<TypeExpr>),
    /// `[N]Elem`
    Array(u64, Box<TypeExpr>),
    /// `map[Key]Value`
    Map(Box<TypeExpr>, Box<TypeExpr>),
    /// `*Elem`
    Pointer(Box<TypeExpr>),
    /// `interface{}`
    Interface,
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named {
                namespace: Some(ns),
                name,
            } => write!(f, "{}.{}", ns, name),
            TypeExpr::Named { name, .. } => f.write_str(name),
            TypeExpr::Slice(elem) => write!(f, "[]{}", elem),
            TypeExpr::Array(len, elem) => write!(f, "[{}]{}", len, elem),
            TypeExpr::Map(key, value) => write!(f, "map[{}]{}", key, value),
            TypeExpr::Pointer(elem) => write!(f, "*{}", elem),
            TypeExpr::Interface => f.write_str("interface{}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `&`
    Ref,
    /// `-`
    Neg,
    /// `+`
    Plus,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Int(String),
    Float(String),
    Str(String),
    Ident(String),
    /// `namespace.name` used as a value rather than a type.
    Selector {
        namespace: String,
        name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Paren(Box<Expr>),
    /// `Type{ elements }`; `ty` is `None` for an elided `{ ... }` element.
    Composite {
        ty: Option<TypeExpr>,
        elements: Vec<Element>,
    },
    /// Well-formed but outside the value model: operators, calls, indexing,
    /// conversions, rune and imaginary literals.
    Unsupported,
}

/// One entry of a composite literal, keyed (`key: value`) or positional.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub key: Option<Expr>,
    pub value: Expr,
}
