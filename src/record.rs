//! Record types and the type factory.
//!
//! A record is any struct that can appear as `Name{Field: value, ...}` in
//! goon text. Records implement [`Record`], which is both halves of the
//! codec's contract for user types:
//!
//! - introspection for encoding: [`Record::fields`] lists `(name, value,
//!   excluded)` triples in declaration order;
//! - binding for decoding: [`Record::bind_field`] accepts one parsed field
//!   value by name.
//!
//! Implementations are normally generated with the [`record!`](crate::record)
//! macro. Decoding creates record instances through a caller-supplied
//! [`TypeFactory`]; [`Registry`] is a ready-made one.

use crate::generic::GenericValue;
use crate::ser::Encode;
use crate::{Binder, Position};
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// The `(namespace, name)` pair identifying a record type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeName {
    pub namespace: &'static str,
    pub name: &'static str,
}

impl TypeName {
    pub const fn new(namespace: &'static str, name: &'static str) -> Self {
        TypeName { namespace, name }
    }

    /// The name as written inside a document whose package is `namespace`:
    /// qualified only when the namespaces differ.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use goon::TypeName;
    ///
    /// let name = TypeName::new("geo", "Point");
    /// assert_eq!(name.qualified("geo"), "Point");
    /// assert_eq!(name.qualified("demo"), "geo.Point");
    /// ```
    #[must_use]
    pub fn qualified(&self, namespace: &str) -> String {
        if self.namespace.is_empty() || self.namespace == namespace {
            self.name.to_string()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// One field of a record as seen by the encoder.
pub struct Field<'a> {
    pub name: &'static str,
    pub value: &'a dyn Encode,
    /// Excluded fields are never written and never bound.
    pub excluded: bool,
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("excluded", &self.excluded)
            .finish_non_exhaustive()
    }
}

/// A user-defined record type.
pub trait Record: fmt::Debug + Send + Sync + 'static {
    fn type_name(&self) -> TypeName;

    /// Fields in declaration order, excluded ones included and flagged.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Binds `value` into the field called `name`.
    ///
    /// Returns `false` when the record has no bindable field of that name.
    /// A field that exists but rejects the value still returns `true`; the
    /// failure is recorded by `binder` and the field keeps its value.
    fn bind_field(
        &mut self,
        name: &str,
        value: &GenericValue,
        pos: &Position,
        binder: &mut Binder<'_>,
    ) -> bool;

    fn clone_record(&self) -> Box<dyn Record>;

    fn eq_record(&self, other: &dyn Record) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl dyn Record {
    #[must_use]
    pub fn is<T: Record>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[must_use]
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Recovers the concrete record, or `None` when it is another type.
    #[must_use]
    pub fn downcast<T: Record>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

impl Clone for Box<dyn Record> {
    fn clone(&self) -> Self {
        self.clone_record()
    }
}

impl PartialEq for dyn Record {
    fn eq(&self, other: &Self) -> bool {
        self.eq_record(other)
    }
}

/// Creates zero-valued record instances by name while decoding.
///
/// Implementations are shared by every decode call they are passed to and
/// are invoked without any locking.
pub trait TypeFactory: Send + Sync {
    fn new_instance(&self, type_name: &str, namespace: &str) -> Option<Box<dyn Record>>;
}

impl<F> TypeFactory for F
where
    F: Fn(&str, &str) -> Option<Box<dyn Record>> + Send + Sync,
{
    fn new_instance(&self, type_name: &str, namespace: &str) -> Option<Box<dyn Record>> {
        self(type_name, namespace)
    }
}

type Constructor = fn() -> Box<dyn Record>;

fn construct<T: Record + Default>() -> Box<dyn Record> {
    Box::new(T::default())
}

/// A [`TypeFactory`] built from registered record types.
///
/// Lookups match the requested namespace exactly; when no registration has
/// that namespace but exactly one type of that name is registered, it is
/// used. This lets documents written under another package name still find
/// their records.
///
/// # Examples
///
/// ```rust
/// use goon::{record, Registry, TypeFactory};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Point { x: i64, y: i64 }
///
/// record! {
///     Point as "Point" in "geo" {
///         "X" => x,
///         "Y" => y,
///     }
/// }
///
/// let registry = Registry::new().with::<Point>();
/// assert!(registry.new_instance("Point", "geo").is_some());
/// assert!(registry.new_instance("Line", "geo").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Registry {
    constructors: HashMap<&'static str, Vec<(&'static str, Constructor)>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under the type name its instances report.
    pub fn register<T: Record + Default>(&mut self) -> &mut Self {
        let type_name = T::default().type_name();
        let entries = self.constructors.entry(type_name.name).or_default();
        entries.retain(|(namespace, _)| *namespace != type_name.namespace);
        entries.push((type_name.namespace, construct::<T> as Constructor));
        self
    }

    /// Builder form of [`Registry::register`].
    #[must_use]
    pub fn with<T: Record + Default>(mut self) -> Self {
        self.register::<T>();
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeFactory for Registry {
    fn new_instance(&self, type_name: &str, namespace: &str) -> Option<Box<dyn Record>> {
        let entries = self.constructors.get(type_name)?;
        let constructor = entries
            .iter()
            .find(|(registered, _)| *registered == namespace)
            .or_else(|| match entries.as_slice() {
                [only] => Some(only),
                _ => None,
            })?;
        Some((constructor.1)())
    }
}
