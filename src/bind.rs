//! Type-directed binding of [`GenericValue`]s into typed destinations.
//!
//! [`Bind`] is implemented for every destination type the codec supports:
//! scalars, `String`, `Vec`, the standard maps, `Option`/`Box` (pointer-like
//! slots), [`Dynamic`](crate::Dynamic) and records generated with
//! [`record!`](crate::record). [`Binder`] drives it and owns the recovery
//! policy: a slot that fails to bind is left untouched and a
//! [`Diagnostic`](crate::Diagnostic) is recorded, while the rest of the
//! document keeps binding.
//!
//! ## Coercions
//!
//! | destination | accepts |
//! |---|---|
//! | `bool` | `Bool` |
//! | integers (any width, signed or not) | `Int`, cast to the destination width |
//! | `f32`, `f64` | `Float`, or `Int` widened to float |
//! | `String` | `Str` |
//! | `Vec<T>` | `Seq` (failing elements dropped), `Nil` (empty) |
//! | maps | `MapPairs` (failing pairs dropped, last key wins), `Nil` (empty) |
//! | `Option<T>` | `Nil` (`None`), or anything `T` accepts |
//! | records | `Composite` of the same type |

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::generic::{Composite, GenericValue};
use crate::record::{Record, TypeFactory};
use crate::ser::GoType;
use crate::Position;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use thiserror::Error;
use tracing::trace;

/// Why one slot could not be bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("unable to assign {found} value to {expected}")]
    Mismatch { found: String, expected: String },

    #[error("unable to assign nil value to {expected}")]
    Nil { expected: String },

    /// The type factory has no record of this name.
    #[error("unknown type {namespace}.{name}")]
    UnknownType { name: String, namespace: String },
}

impl BindError {
    /// Mismatch between `value` and the destination type `T`.
    pub fn mismatch<T: GoType>(value: &GenericValue, binder: &Binder<'_>) -> Self {
        let expected = T::go_type(binder.namespace());
        match value {
            GenericValue::Nil => BindError::Nil { expected },
            other => BindError::Mismatch {
                found: other.kind().to_string(),
                expected,
            },
        }
    }
}

/// A destination type for decoded values.
pub trait Bind: GoType + Sized {
    /// Optional slots absorb factory misses without a diagnostic.
    const OPTIONAL: bool = false;

    fn bind(value: &GenericValue, pos: &Position, binder: &mut Binder<'_>)
        -> Result<Self, BindError>;
}

/// Binding state for one decode call.
pub struct Binder<'a> {
    factory: Option<&'a dyn TypeFactory>,
    namespace: &'a str,
    diagnostics: Diagnostics,
}

impl<'a> Binder<'a> {
    /// `namespace` is the document's package name; `factory` instantiates
    /// records and may be absent for untyped decoding.
    pub fn new(namespace: &'a str, factory: Option<&'a dyn TypeFactory>) -> Self {
        Binder {
            factory,
            namespace,
            diagnostics: Diagnostics::new(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &'a str {
        self.namespace
    }

    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Binds one slot, recording any failure at `pos`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use goon::{Binder, GenericValue, Position};
    ///
    /// let mut binder = Binder::new("demo", None);
    /// let pos = Position::new("demo.goon", 0, 3, 9);
    ///
    /// assert_eq!(binder.bind::<f32>(&GenericValue::Int(10), &pos), Some(10.0));
    /// assert_eq!(binder.bind::<i64>(&GenericValue::Str("x".into()), &pos), None);
    /// assert_eq!(
    ///     binder.diagnostics().messages(),
    ///     vec!["unable to assign string value to int64 (demo.goon:3:9)"]
    /// );
    /// ```
    pub fn bind<T: Bind>(&mut self, value: &GenericValue, pos: &Position) -> Option<T> {
        match T::bind(value, pos, self) {
            Ok(bound) => Some(bound),
            Err(BindError::UnknownType { name, namespace }) if T::OPTIONAL => {
                trace!(%name, %namespace, %pos, "dropping value of unknown type");
                None
            }
            Err(err) => {
                self.report(err, pos);
                None
            }
        }
    }

    /// Binds into an existing slot, leaving it unchanged on failure.
    pub fn bind_into<T: Bind>(&mut self, slot: &mut T, value: &GenericValue, pos: &Position) {
        if let Some(bound) = self.bind(value, pos) {
            *slot = bound;
        }
    }

    pub fn report(&mut self, err: BindError, pos: &Position) {
        self.diagnostics
            .push(Diagnostic::new(err.to_string(), pos.clone()));
    }

    /// Creates a record through the factory and binds its fields.
    ///
    /// Fields the record does not know are skipped. Fields it knows but that
    /// fail to bind keep their zero value and are reported.
    pub fn instantiate(
        &mut self,
        composite: &Composite,
        pos: &Position,
    ) -> Result<Box<dyn Record>, BindError> {
        let unknown = || BindError::UnknownType {
            name: composite.name.clone(),
            namespace: composite.namespace.clone(),
        };
        let factory = self.factory.ok_or_else(unknown)?;
        let Some(mut record) = factory.new_instance(&composite.name, &composite.namespace) else {
            trace!(name = %composite.name, namespace = %composite.namespace, %pos, "type factory miss");
            return Err(unknown());
        };
        if record.type_name().name != composite.name {
            trace!(
                requested = %composite.name,
                produced = %record.type_name(),
                "type factory returned a different type"
            );
            return Err(unknown());
        }

        for (field, value, field_pos) in &composite.fields {
            if !record.bind_field(field, value, field_pos, self) {
                trace!(%field, record = %record.type_name(), "skipping unknown field");
            }
        }
        Ok(record)
    }

    /// Binds a composite into the concrete record type `T`.
    pub fn bind_record<T: Record + GoType>(
        &mut self,
        value: &GenericValue,
        pos: &Position,
    ) -> Result<T, BindError> {
        match value {
            GenericValue::Composite(composite) => {
                let record = self.instantiate(composite, pos)?;
                let found = record.type_name().to_string();
                match record.downcast::<T>() {
                    Some(record) => Ok(*record),
                    None => Err(BindError::Mismatch {
                        found,
                        expected: T::go_type(self.namespace),
                    }),
                }
            }
            other => Err(BindError::mismatch::<T>(other, self)),
        }
    }
}

impl Bind for bool {
    fn bind(value: &GenericValue, _pos: &Position, binder: &mut Binder<'_>) -> Result<Self, BindError> {
        match value {
            GenericValue::Bool(b) => Ok(*b),
            other => Err(BindError::mismatch::<Self>(other, binder)),
        }
    }
}

macro_rules! bind_int {
    ($($ty:ty),*) => {
        $(
            impl Bind for $ty {
                fn bind(value: &GenericValue, _pos: &Position, binder: &mut Binder<'_>) -> Result<Self, BindError> {
                    match value {
                        GenericValue::Int(i) => Ok(*i as $ty),
                        other => Err(BindError::mismatch::<Self>(other, binder)),
                    }
                }
            }
        )*
    };
}

bind_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! bind_float {
    ($($ty:ty),*) => {
        $(
            impl Bind for $ty {
                fn bind(value: &GenericValue, _pos: &Position, binder: &mut Binder<'_>) -> Result<Self, BindError> {
                    match value {
                        GenericValue::Float(f) => Ok(*f as $ty),
                        GenericValue::Int(i) => Ok(*i as $ty),
                        other => Err(BindError::mismatch::<Self>(other, binder)),
                    }
                }
            }
        )*
    };
}

bind_float!(f32, f64);

impl Bind for String {
    fn bind(value: &GenericValue, _pos: &Position, binder: &mut Binder<'_>) -> Result<Self, BindError> {
        match value {
            GenericValue::Str(s) => Ok(s.clone()),
            other => Err(BindError::mismatch::<Self>(other, binder)),
        }
    }
}

impl<T: Bind> Bind for Option<T> {
    const OPTIONAL: bool = true;

    fn bind(value: &GenericValue, pos: &Position, binder: &mut Binder<'_>) -> Result<Self, BindError> {
        match value {
            GenericValue::Nil => Ok(None),
            other => T::bind(other, pos, binder).map(Some),
        }
    }
}

impl<T: Bind> Bind for Box<T> {
    const OPTIONAL: bool = T::OPTIONAL;

    fn bind(value: &GenericValue, pos: &Position, binder: &mut Binder<'_>) -> Result<Self, BindError> {
        T::bind(value, pos, binder).map(Box::new)
    }
}

impl<T: Bind> Bind for Vec<T> {
    fn bind(value: &GenericValue, _pos: &Position, binder: &mut Binder<'_>) -> Result<Self, BindError> {
        match value {
            GenericValue::Nil => Ok(Vec::new()),
            GenericValue::Seq(items) => Ok(items
                .iter()
                .filter_map(|(item, item_pos)| binder.bind::<T>(item, item_pos))
                .collect()),
            other => Err(BindError::mismatch::<Self>(other, binder)),
        }
    }
}

/// Shared body of the map impls: bind key then value, skipping the pair if
/// either side fails, and let later pairs overwrite earlier ones.
fn bind_pairs<K, V, M>(
    value: &GenericValue,
    binder: &mut Binder<'_>,
    mut insert: impl FnMut(&mut M, K, V),
) -> Result<M, BindError>
where
    K: Bind,
    V: Bind,
    M: Default + GoType,
{
    let mut map = M::default();
    match value {
        GenericValue::Nil => Ok(map),
        GenericValue::MapPairs(pairs) => {
            for pair in pairs {
                let Some(key) = binder.bind::<K>(&pair.key, &pair.key_pos) else {
                    continue;
                };
                if let Some(val) = binder.bind::<V>(&pair.value, &pair.value_pos) {
                    insert(&mut map, key, val);
                }
            }
            Ok(map)
        }
        other => Err(BindError::mismatch::<M>(other, binder)),
    }
}

impl<K, V, S> Bind for HashMap<K, V, S>
where
    K: Bind + Eq + Hash,
    V: Bind,
    S: BuildHasher + Default,
{
    fn bind(value: &GenericValue, _pos: &Position, binder: &mut Binder<'_>) -> Result<Self, BindError> {
        bind_pairs(value, binder, |map: &mut Self, k, v| {
            map.insert(k, v);
        })
    }
}

impl<K, V> Bind for BTreeMap<K, V>
where
    K: Bind + Ord,
    V: Bind,
{
    fn bind(value: &GenericValue, _pos: &Position, binder: &mut Binder<'_>) -> Result<Self, BindError> {
        bind_pairs(value, binder, |map: &mut Self, k, v| {
            map.insert(k, v);
        })
    }
}

impl<K, V, S> Bind for IndexMap<K, V, S>
where
    K: Bind + Eq + Hash,
    V: Bind,
    S: BuildHasher + Default,
{
    fn bind(value: &GenericValue, _pos: &Position, binder: &mut Binder<'_>) -> Result<Self, BindError> {
        bind_pairs(value, binder, |map: &mut Self, k, v| {
            map.insert(k, v);
        })
    }
}
