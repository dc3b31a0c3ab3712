//! Dynamically typed values.
//!
//! [`Dynamic`] is the destination for slots whose type is not known in
//! advance: every variable of a [`Document`](crate::Document), and any
//! record field that may hold "anything". It can hold each kind of value the
//! literal grammar can express, including records produced by the type
//! factory.
//!
//! ## Creating Values
//!
//! ```rust
//! use goon::Dynamic;
//!
//! let nil = Dynamic::Nil;
//! let flag = Dynamic::from(true);
//! let number = Dynamic::from(42);
//! let text = Dynamic::from("hello");
//! let list = Dynamic::from(vec![Dynamic::from(1), Dynamic::from(2)]);
//!
//! assert!(nil.is_nil());
//! assert!(list.is_seq());
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use goon::Dynamic;
//! use std::convert::TryFrom;
//!
//! let value = Dynamic::from(42);
//! assert_eq!(value.as_i64(), Some(42));
//!
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```
//!
//! ### Records
//!
//! ```rust
//! use goon::{record, Dynamic};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Point { x: i64 }
//!
//! record! {
//!     Point as "Point" in "geo" {
//!         "X" => x,
//!     }
//! }
//!
//! let value = Dynamic::record(Point { x: 3 });
//! assert_eq!(value.as_record::<Point>(), Some(&Point { x: 3 }));
//! assert_eq!(value.into_record::<Point>(), Some(Point { x: 3 }));
//! ```

use crate::bind::{Bind, BindError, Binder};
use crate::generic::GenericValue;
use crate::record::Record;
use crate::ser::{Encode, Encoder, GoType};
use crate::{DynamicMap, Error, Position, Result};

/// A dynamically typed goon value.
///
/// Integers are held as `i64` and floats as `f64`, matching the widths the
/// decoder reads literals at. Records always encode as `&Name{...}`.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Dynamic {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Dynamic>),
    Map(DynamicMap),
    Record(Box<dyn Record>),
}

impl Dynamic {
    /// Wraps a concrete record.
    pub fn record<T: Record>(record: T) -> Self {
        Dynamic::Record(Box::new(record))
    }

    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Dynamic::Nil)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Dynamic::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Dynamic::Int(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Dynamic::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Dynamic::Str(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_seq(&self) -> bool {
        matches!(self, Dynamic::Seq(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Dynamic::Map(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_record(&self) -> bool {
        matches!(self, Dynamic::Record(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Dynamic::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Dynamic::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats as-is, integers widened.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use goon::Dynamic;
    ///
    /// assert_eq!(Dynamic::from(2.5).as_f64(), Some(2.5));
    /// assert_eq!(Dynamic::from(10).as_f64(), Some(10.0));
    /// assert_eq!(Dynamic::from("10").as_f64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Dynamic::Float(f) => Some(*f),
            Dynamic::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_seq(&self) -> Option<&Vec<Dynamic>> {
        match self {
            Dynamic::Seq(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&DynamicMap> {
        match self {
            Dynamic::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The held record, if it is a `T`.
    #[must_use]
    pub fn as_record<T: Record>(&self) -> Option<&T> {
        match self {
            Dynamic::Record(record) => record.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Takes the held record out, if it is a `T`.
    #[must_use]
    pub fn into_record<T: Record>(self) -> Option<T> {
        match self {
            Dynamic::Record(record) => record.downcast::<T>().map(|boxed| *boxed),
            _ => None,
        }
    }

    /// Short name of the value's kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Dynamic::Nil => "nil",
            Dynamic::Bool(_) => "bool",
            Dynamic::Int(_) => "int",
            Dynamic::Float(_) => "float",
            Dynamic::Str(_) => "string",
            Dynamic::Seq(_) => "sequence",
            Dynamic::Map(_) => "map",
            Dynamic::Record(_) => "record",
        }
    }
}

impl GoType for Dynamic {
    fn go_type(_namespace: &str) -> String {
        "interface{}".to_string()
    }
}

impl Encode for Dynamic {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        match self {
            Dynamic::Nil => {
                enc.write_nil();
                Ok(())
            }
            Dynamic::Bool(b) => b.encode(enc),
            Dynamic::Int(i) => i.encode(enc),
            Dynamic::Float(f) => f.encode(enc),
            Dynamic::Str(s) => s.encode(enc),
            Dynamic::Seq(items) => {
                enc.write_seq("interface{}", items.iter().map(|item| item as &dyn Encode))
            }
            Dynamic::Map(map) => map.encode(enc),
            Dynamic::Record(record) => record.encode(enc),
        }
    }

    fn is_absent(&self) -> bool {
        self.is_nil()
    }
}

impl Bind for Dynamic {
    const OPTIONAL: bool = true;

    fn bind(
        value: &GenericValue,
        pos: &Position,
        binder: &mut Binder<'_>,
    ) -> std::result::Result<Self, BindError> {
        Ok(match value {
            GenericValue::Nil => Dynamic::Nil,
            GenericValue::Bool(b) => Dynamic::Bool(*b),
            GenericValue::Int(i) => Dynamic::Int(*i),
            GenericValue::Float(f) => Dynamic::Float(*f),
            GenericValue::Str(s) => Dynamic::Str(s.clone()),
            GenericValue::Seq(items) => Dynamic::Seq(
                items
                    .iter()
                    .filter_map(|(item, item_pos)| binder.bind::<Dynamic>(item, item_pos))
                    .collect(),
            ),
            GenericValue::MapPairs(_) => Dynamic::Map(DynamicMap::bind(value, pos, binder)?),
            GenericValue::Composite(composite) => {
                Dynamic::Record(binder.instantiate(composite, pos)?)
            }
        })
    }
}

impl TryFrom<Dynamic> for i64 {
    type Error = Error;

    fn try_from(value: Dynamic) -> Result<Self> {
        match value {
            Dynamic::Int(i) => Ok(i),
            other => Err(Error::custom(format!(
                "expected integer, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Dynamic> for f64 {
    type Error = Error;

    fn try_from(value: Dynamic) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| Error::custom(format!("expected number, found {}", value.kind())))
    }
}

impl TryFrom<Dynamic> for bool {
    type Error = Error;

    fn try_from(value: Dynamic) -> Result<Self> {
        match value {
            Dynamic::Bool(b) => Ok(b),
            other => Err(Error::custom(format!("expected bool, found {}", other.kind()))),
        }
    }
}

impl TryFrom<Dynamic> for String {
    type Error = Error;

    fn try_from(value: Dynamic) -> Result<Self> {
        match value {
            Dynamic::Str(s) => Ok(s),
            other => Err(Error::custom(format!(
                "expected string, found {}",
                other.kind()
            ))),
        }
    }
}

impl From<bool> for Dynamic {
    fn from(value: bool) -> Self {
        Dynamic::Bool(value)
    }
}

macro_rules! from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Dynamic {
                fn from(value: $ty) -> Self {
                    Dynamic::Int(i64::from(value))
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Dynamic {
    fn from(value: f32) -> Self {
        Dynamic::Float(f64::from(value))
    }
}

impl From<f64> for Dynamic {
    fn from(value: f64) -> Self {
        Dynamic::Float(value)
    }
}

impl From<String> for Dynamic {
    fn from(value: String) -> Self {
        Dynamic::Str(value)
    }
}

impl From<&str> for Dynamic {
    fn from(value: &str) -> Self {
        Dynamic::Str(value.to_string())
    }
}

impl From<Vec<Dynamic>> for Dynamic {
    fn from(value: Vec<Dynamic>) -> Self {
        Dynamic::Seq(value)
    }
}

impl From<DynamicMap> for Dynamic {
    fn from(value: DynamicMap) -> Self {
        Dynamic::Map(value)
    }
}

impl From<Box<dyn Record>> for Dynamic {
    fn from(value: Box<dyn Record>) -> Self {
        Dynamic::Record(value)
    }
}
