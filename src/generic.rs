//! The untyped value model.
//!
//! [`Interpreter`] walks a parsed expression and produces a [`GenericValue`]:
//! a tagged tree that records what the text says without committing to any
//! destination type. The same tree can later be bound to different
//! destinations by the [`Binder`](crate::Binder).
//!
//! Interpretation never fails. Expression shapes with no meaning in the
//! value model (selectors, operators, calls, unknown identifiers, elided
//! composites, out of range or prefixed numbers) simply produce no value,
//! and containers skip the slot.

use crate::ast::{Element, Expr, ExprKind, TypeExpr, UnaryOp};
use crate::Position;

/// Untyped intermediate value.
#[derive(Clone, Debug, PartialEq)]
pub enum GenericValue {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Elements in source order, each with the position it was written at.
    Seq(Vec<(GenericValue, Position)>),
    /// Key/value pairs in source order.
    MapPairs(Vec<MapPair>),
    /// A record literal awaiting a factory-produced destination.
    Composite(Composite),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapPair {
    pub key: GenericValue,
    pub key_pos: Position,
    pub value: GenericValue,
    pub value_pos: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Composite {
    pub name: String,
    pub namespace: String,
    /// `(field name, value, value position)` for every identifier-keyed element.
    pub fields: Vec<(String, GenericValue, Position)>,
}

impl GenericValue {
    /// Short name of the value's kind, as used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GenericValue::Nil => "nil",
            GenericValue::Bool(_) => "bool",
            GenericValue::Int(_) => "int",
            GenericValue::Float(_) => "float",
            GenericValue::Str(_) => "string",
            GenericValue::Seq(_) => "sequence",
            GenericValue::MapPairs(_) => "map",
            GenericValue::Composite(_) => "composite",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, GenericValue::Nil)
    }
}

/// Turns expressions into [`GenericValue`]s.
///
/// `typed` selects how named composites are read: with a type factory
/// available they become [`GenericValue::Composite`], without one they fall
/// back to ordered key/value pairs.
#[derive(Clone, Copy, Debug)]
pub struct Interpreter<'a> {
    namespace: &'a str,
    typed: bool,
}

impl<'a> Interpreter<'a> {
    /// `namespace` is the document's package name, used for unqualified
    /// record names.
    pub fn new(namespace: &'a str, typed: bool) -> Self {
        Interpreter { namespace, typed }
    }

    /// Interprets one expression, returning the value and the position it
    /// should be reported at.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use goon::generic::{GenericValue, Interpreter};
    /// use goon::parse::parse;
    ///
    /// let file = parse("package p\nvar x = -12", "p.goon").unwrap();
    /// let expr = file.decls[0].value.as_ref().unwrap();
    /// let (value, _) = Interpreter::new("p", false).interpret(expr).unwrap();
    /// assert_eq!(value, GenericValue::Int(-12));
    /// ```
    #[must_use]
    pub fn interpret(&self, expr: &Expr) -> Option<(GenericValue, Position)> {
        match &expr.kind {
            ExprKind::Unary { op, operand } => self.interpret_unary(*op, operand),
            ExprKind::Paren(inner) => self.interpret(inner),
            ExprKind::Int(text) => Some((GenericValue::Int(parse_int(text)?), expr.pos.clone())),
            ExprKind::Float(text) => {
                let value = text.parse::<f64>().ok()?;
                Some((GenericValue::Float(value), expr.pos.clone()))
            }
            ExprKind::Str(text) => Some((GenericValue::Str(text.clone()), expr.pos.clone())),
            ExprKind::Ident(name) => Some((ident_value(name)?, expr.pos.clone())),
            ExprKind::Selector { .. } | ExprKind::Unsupported => None,
            ExprKind::Composite { ty, elements } => {
                let value = self.interpret_composite(ty.as_ref()?, elements)?;
                Some((value, expr.pos.clone()))
            }
        }
    }

    fn interpret_unary(&self, op: UnaryOp, operand: &Expr) -> Option<(GenericValue, Position)> {
        match op {
            UnaryOp::Ref => self.interpret(operand),
            UnaryOp::Plus => match self.interpret(operand)? {
                (value @ (GenericValue::Int(_) | GenericValue::Float(_)), pos) => {
                    Some((value, pos))
                }
                _ => None,
            },
            UnaryOp::Neg => {
                // Negate integer literals textually so i64::MIN is representable.
                if let ExprKind::Int(text) = &operand.kind {
                    let value = format!("-{}", text).parse::<i64>().ok()?;
                    return Some((GenericValue::Int(value), operand.pos.clone()));
                }
                match self.interpret(operand)? {
                    (GenericValue::Int(i), pos) => Some((GenericValue::Int(i.wrapping_neg()), pos)),
                    (GenericValue::Float(f), pos) => Some((GenericValue::Float(-f), pos)),
                    _ => None,
                }
            }
        }
    }

    fn interpret_composite(&self, ty: &TypeExpr, elements: &[Element]) -> Option<GenericValue> {
        match ty {
            TypeExpr::Named { namespace, name } => {
                if self.typed {
                    let namespace = namespace.as_deref().unwrap_or(self.namespace);
                    Some(self.interpret_record(name, namespace, elements))
                } else {
                    Some(self.interpret_map(elements, true))
                }
            }
            TypeExpr::Slice(_) | TypeExpr::Array(..) => Some(self.interpret_seq(elements)),
            TypeExpr::Map(..) => Some(self.interpret_map(elements, false)),
            TypeExpr::Pointer(_) | TypeExpr::Interface => None,
        }
    }

    fn interpret_record(&self, name: &str, namespace: &str, elements: &[Element]) -> GenericValue {
        let mut fields = Vec::with_capacity(elements.len());
        for element in elements {
            let Some(Expr {
                kind: ExprKind::Ident(field),
                ..
            }) = &element.key
            else {
                continue;
            };
            if let Some((value, pos)) = self.interpret(&element.value) {
                fields.push((field.clone(), value, pos));
            }
        }
        GenericValue::Composite(Composite {
            name: name.to_string(),
            namespace: namespace.to_string(),
            fields,
        })
    }

    fn interpret_seq(&self, elements: &[Element]) -> GenericValue {
        GenericValue::Seq(
            elements
                .iter()
                .filter_map(|element| self.interpret(&element.value))
                .collect(),
        )
    }

    /// A bare identifier key is read as its name. Mapping literals make one
    /// exception: exactly `true` and `false` stay booleans so `map[bool]T`
    /// reads back what it wrote.
    fn interpret_map(&self, elements: &[Element], field_keys: bool) -> GenericValue {
        let mut pairs = Vec::with_capacity(elements.len());
        for element in elements {
            let Some(key_expr) = &element.key else {
                continue;
            };
            let key = match &key_expr.kind {
                ExprKind::Ident(name) => {
                    let key = match name.as_str() {
                        "true" if !field_keys => GenericValue::Bool(true),
                        "false" if !field_keys => GenericValue::Bool(false),
                        _ => GenericValue::Str(name.clone()),
                    };
                    Some((key, key_expr.pos.clone()))
                }
                _ => self.interpret(key_expr),
            };
            let Some((key, key_pos)) = key else {
                continue;
            };
            if let Some((value, value_pos)) = self.interpret(&element.value) {
                pairs.push(MapPair {
                    key,
                    key_pos,
                    value,
                    value_pos,
                });
            }
        }
        GenericValue::MapPairs(pairs)
    }
}

/// Decimal integer text; values past `i64::MAX` that fit in `u64` keep their
/// bit pattern so unsigned destinations read them back unchanged.
fn parse_int(text: &str) -> Option<i64> {
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<u64>().ok().map(|u| u as i64))
}

fn ident_value(name: &str) -> Option<GenericValue> {
    match name {
        "nil" => Some(GenericValue::Nil),
        "true" | "True" | "TRUE" | "t" | "T" => Some(GenericValue::Bool(true)),
        "false" | "False" | "FALSE" | "f" | "F" => Some(GenericValue::Bool(false)),
        _ => None,
    }
}
