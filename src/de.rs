//! goon decoding.
//!
//! Decoding runs in three stages, each available on its own through
//! [`Decoder`]:
//!
//! 1. [`Decoder::parse_file`]: text to syntax tree. The only stage that can
//!    fail; a malformed document is rejected as a whole.
//! 2. [`Decoder::interpret`]: syntax tree to [`GenericValue`]s, one per
//!    declared variable.
//! 3. binding: generic values to typed destinations, recording a
//!    [`Diagnostic`](crate::Diagnostic) for every slot that does not fit.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use goon::decode;
//!
//! let (doc, diagnostics) = decode("in.goon", "package demo\n\nvar n = 10\n").unwrap();
//! assert_eq!(doc.namespace(), "demo");
//! assert_eq!(doc.get("n").and_then(|v| v.as_i64()), Some(10));
//! assert!(diagnostics.is_empty());
//! ```
//!
//! ## Binding one variable
//!
//! ```rust
//! use goon::Decoder;
//! use std::collections::BTreeMap;
//!
//! let text = "package demo\nvar limits = map[string]float32{\"cpu\": 2, \"mem\": 0.5}";
//! let (limits, diagnostics) = Decoder::new("in.goon")
//!     .bind_var::<BTreeMap<String, f32>>(text, "limits")
//!     .unwrap();
//! assert_eq!(limits.unwrap()["cpu"], 2.0);
//! assert!(diagnostics.is_empty());
//! ```

use crate::ast::File;
use crate::bind::{Bind, Binder};
use crate::generic::{GenericValue, Interpreter};
use crate::parse::parse;
use crate::record::TypeFactory;
use crate::{Diagnostics, Dynamic, Position, Result};
use indexmap::IndexMap;
use tracing::debug;

/// The decoded variables of one document, in declaration order.
///
/// A variable declared twice keeps its last value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    namespace: String,
    values: IndexMap<String, Dynamic>,
}

impl Document {
    pub fn new(namespace: impl Into<String>) -> Self {
        Document {
            namespace: namespace.into(),
            values: IndexMap::new(),
        }
    }

    /// The document's package name.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Dynamic> {
        self.values.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Dynamic) -> Option<Dynamic> {
        self.values.insert(name.into(), value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Dynamic> {
        self.values.iter()
    }

    pub fn into_values(self) -> IndexMap<String, Dynamic> {
        self.values
    }
}

impl IntoIterator for Document {
    type Item = (String, Dynamic);
    type IntoIter = indexmap::map::IntoIter<String, Dynamic>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Dynamic);
    type IntoIter = indexmap::map::Iter<'a, String, Dynamic>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// One declared variable after interpretation.
#[derive(Clone, Debug, PartialEq)]
pub struct Declared {
    pub name: String,
    /// `Nil` for a declaration without a usable value.
    pub value: GenericValue,
    pub pos: Position,
}

/// Runs the decode pipeline for one input.
///
/// Without a factory, record literals decode as key/value maps.
#[derive(Clone, Copy)]
pub struct Decoder<'a> {
    filename: &'a str,
    factory: Option<&'a dyn TypeFactory>,
}

impl<'a> Decoder<'a> {
    /// `filename` is only used in positions.
    pub fn new(filename: &'a str) -> Self {
        Decoder {
            filename,
            factory: None,
        }
    }

    #[must_use]
    pub fn with_factory(mut self, factory: &'a dyn TypeFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn parse_file(&self, source: &str) -> Result<File> {
        parse(source, self.filename)
    }

    /// Interprets every declaration's value.
    #[must_use]
    pub fn interpret(&self, file: &File) -> Vec<Declared> {
        let interpreter = Interpreter::new(&file.package, self.factory.is_some());
        file.decls
            .iter()
            .map(|decl| {
                let (value, pos) = decl
                    .value
                    .as_ref()
                    .and_then(|expr| interpreter.interpret(expr))
                    .unwrap_or_else(|| (GenericValue::Nil, decl.pos.clone()));
                Declared {
                    name: decl.name.clone(),
                    value,
                    pos,
                }
            })
            .collect()
    }

    /// Decodes every variable into a [`Document`].
    ///
    /// A variable whose value cannot be represented decodes to
    /// [`Dynamic::Nil`].
    pub fn decode(&self, source: &str) -> Result<(Document, Diagnostics)> {
        debug!(
            filename = self.filename,
            bytes = source.len(),
            typed = self.factory.is_some(),
            "decoding"
        );
        let file = self.parse_file(source)?;
        let mut binder = Binder::new(&file.package, self.factory);
        let mut document = Document::new(file.package.as_str());
        for declared in self.interpret(&file) {
            let value = binder
                .bind::<Dynamic>(&declared.value, &declared.pos)
                .unwrap_or_default();
            document.insert(declared.name, value);
        }
        let diagnostics = binder.into_diagnostics();
        debug!(
            filename = self.filename,
            variables = document.len(),
            diagnostics = diagnostics.len(),
            "decoded"
        );
        Ok((document, diagnostics))
    }

    /// Binds the last declaration of `name` straight into a `T`.
    ///
    /// Returns `None` when the variable is not declared or does not bind.
    pub fn bind_var<T: Bind>(&self, source: &str, name: &str) -> Result<(Option<T>, Diagnostics)> {
        let file = self.parse_file(source)?;
        let mut binder = Binder::new(&file.package, self.factory);
        let value = self
            .interpret(&file)
            .into_iter()
            .rev()
            .find(|declared| declared.name == name)
            .and_then(|declared| binder.bind::<T>(&declared.value, &declared.pos));
        Ok((value, binder.into_diagnostics()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const SOURCE: &str = "package demo

var (
	a = 1
	b = \"two\"
)
var c []int
var a = 3.5
";

    #[test]
    fn test_later_declarations_win() {
        let (doc, diagnostics) = Decoder::new("d.goon").decode(SOURCE).unwrap();
        assert!(diagnostics.is_empty());
        let names: Vec<_> = doc.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(doc.get("a"), Some(&Dynamic::Float(3.5)));
        assert_eq!(doc.get("c"), Some(&Dynamic::Nil));
    }

    #[test]
    fn test_interpret_positions() {
        let decoder = Decoder::new("d.goon");
        let file = decoder.parse_file(SOURCE).unwrap();
        let declared = decoder.interpret(&file);
        assert_eq!(declared.len(), 4);
        assert_eq!(declared[1].value, GenericValue::Str("two".into()));
        assert_eq!((declared[1].pos.line, declared[1].pos.column), (5, 6));
        // no value: reported at the declared name
        assert_eq!(declared[2].value, GenericValue::Nil);
        assert_eq!((declared[2].pos.line, declared[2].pos.column), (7, 5));
    }

    #[test]
    fn test_bind_var() {
        let decoder = Decoder::new("d.goon");
        let (value, _) = decoder.bind_var::<f64>(SOURCE, "a").unwrap();
        assert_eq!(value, Some(3.5));
        let (missing, diagnostics) = decoder.bind_var::<f64>(SOURCE, "zzz").unwrap();
        assert_eq!(missing, None);
        assert!(diagnostics.is_empty());
        let (wrong, diagnostics) = decoder.bind_var::<bool>(SOURCE, "b").unwrap();
        assert_eq!(wrong, None);
        assert_eq!(
            diagnostics.messages(),
            vec!["unable to assign string value to bool (d.goon:5:6)"]
        );
    }

    #[test]
    fn test_parse_failure_is_fatal() {
        let err = Decoder::new("d.goon").decode("package demo\nvar = 1").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }
}
