//! # goon
//!
//! An encoder and decoder for goon, a data format written as the package,
//! variable and composite literal syntax of Go source files.
//!
//! ## What is goon?
//!
//! A goon document is a package clause followed by variable declarations
//! whose values are literals: scalars, `[]T{...}` sequences,
//! `map[K]V{...}` mappings and `Name{Field: value}` records. Documents are
//! easy to read and edit by hand, and every document is also valid source
//! text for the grammar it borrows.
//!
//! ```text
//! package demo
//!
//! var x = &Record{
//!     Name: "a",
//!     Count: 3,
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Typed records**: structs opt in with the [`record!`] macro and are
//!   rebuilt on decode through a [`TypeFactory`] such as [`Registry`]
//! - **Untyped decoding**: without a factory, records decode as ordered
//!   key/value maps inside [`Dynamic`] values
//! - **Soft failures**: a value that does not fit its destination is
//!   reported as a [`Diagnostic`] with its source position, and the rest of
//!   the document still decodes
//! - **Round trips**: floats are written in shortest round-trip form,
//!   strings are escaped, and records held by `Option`/`Box` keep their `&`
//!
//! ## Quick Start
//!
//! ```rust
//! use goon::{decode_typed, encode, record, Encode, Registry};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Record {
//!     name: String,
//!     count: i64,
//! }
//!
//! record! {
//!     Record as "Record" in "demo" {
//!         "Name" => name,
//!         "Count" => count,
//!     }
//! }
//!
//! let x = Some(Record { name: "a".into(), count: 3 });
//! let text = encode([("x", &x as &dyn Encode)], "demo").unwrap();
//! assert!(text.starts_with("package demo\n\nvar x = &Record{\n\tName: \"a\",\n\tCount: 3,\n}"));
//!
//! let registry = Registry::new().with::<Record>();
//! let (doc, diagnostics) = decode_typed("demo.goon", &text, &registry).unwrap();
//! assert!(diagnostics.is_empty());
//! assert_eq!(doc.get("x").and_then(|v| v.as_record::<Record>()), x.as_ref());
//! ```
//!
//! ### Untyped decoding
//!
//! ```rust
//! use goon::decode;
//!
//! let text = "package demo\nvar cfg = Config{Port: 8080, Hosts: []string{\"a\", \"b\"}}";
//! let (doc, _) = decode("cfg.goon", text).unwrap();
//!
//! let cfg = doc.get("cfg").and_then(|v| v.as_map()).unwrap();
//! assert_eq!(cfg.get_str("Port").and_then(|v| v.as_i64()), Some(8080));
//! ```
//!
//! ### Diagnostics
//!
//! ```rust
//! use goon::{decode_typed, record, Registry};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Limits { cpu: i64, mem: i64 }
//!
//! record! {
//!     Limits as "Limits" in "demo" {
//!         "CPU" => cpu,
//!         "Mem" => mem,
//!     }
//! }
//!
//! let text = "package demo\nvar l = Limits{CPU: \"lots\", Mem: 512}";
//! let registry = Registry::new().with::<Limits>();
//! let (doc, diagnostics) = decode_typed("l.goon", text, &registry).unwrap();
//!
//! assert_eq!(
//!     diagnostics.messages(),
//!     vec!["unable to assign string value to int64 (l.goon:2:21)"]
//! );
//! let limits = doc.get("l").and_then(|v| v.as_record::<Limits>()).unwrap();
//! assert_eq!(limits, &Limits { cpu: 0, mem: 512 });
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]: decode start and end and every
//! diagnostic at `debug`, factory misses and unknown fields at `trace`.
//! No subscriber is installed.
//!
//! ## Format Reference
//!
//! See the [`format`] module for the grammar and encoding rules.

#[macro_use]
mod macros;

pub mod ast;
pub mod bind;
pub mod de;
pub mod diagnostics;
pub mod dynamic;
pub mod error;
pub mod format;
pub mod generic;
pub mod lexer;
pub mod map;
pub mod options;
pub mod parse;
pub mod position;
pub mod record;
pub mod ser;

pub use bind::{Bind, BindError, Binder};
pub use de::{Declared, Decoder, Document};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use dynamic::Dynamic;
pub use error::{Error, Result};
pub use generic::GenericValue;
pub use map::DynamicMap;
pub use options::{EncodeOptions, Indent, MapOrder};
pub use position::Position;
pub use record::{Field, Record, Registry, TypeFactory, TypeName};
pub use ser::{Encode, Encoder, GoType};

use std::io;
use tracing::debug;

/// Decode goon text without a type factory.
///
/// Record literals become [`Dynamic::Map`]s keyed by field name.
///
/// # Examples
///
/// ```rust
/// use goon::{decode, Dynamic};
///
/// let (doc, diagnostics) = decode("in.goon", "package p\nvar xs = []int{1, 2}").unwrap();
/// assert_eq!(
///     doc.get("xs"),
///     Some(&Dynamic::from(vec![Dynamic::from(1), Dynamic::from(2)]))
/// );
/// assert!(diagnostics.is_empty());
/// ```
///
/// # Errors
///
/// Returns an error only if the text does not follow the literal grammar.
/// Values that do not bind are reported in the returned [`Diagnostics`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(filename: &str, source: &str) -> Result<(Document, Diagnostics)> {
    Decoder::new(filename).decode(source)
}

/// Decode goon text, building records through `factory`.
///
/// # Errors
///
/// Returns an error only if the text does not follow the literal grammar.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_typed(
    filename: &str,
    source: &str,
    factory: &dyn TypeFactory,
) -> Result<(Document, Diagnostics)> {
    Decoder::new(filename).with_factory(factory).decode(source)
}

/// Decode goon text from bytes.
///
/// # Examples
///
/// ```rust
/// use goon::{decode_slice, Error};
///
/// let (doc, _) = decode_slice("in.goon", b"package p\nvar ok = true", None).unwrap();
/// assert_eq!(doc.get("ok").and_then(|v| v.as_bool()), Some(true));
///
/// let err = decode_slice("in.goon", b"package p\nvar s = \"\xff\"", None).unwrap_err();
/// assert!(matches!(err, Error::InvalidUtf8(_)));
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not UTF-8 or the text does not follow
/// the literal grammar.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_slice(
    filename: &str,
    bytes: &[u8],
    factory: Option<&dyn TypeFactory>,
) -> Result<(Document, Diagnostics)> {
    let source = std::str::from_utf8(bytes).map_err(|e| Error::InvalidUtf8(e.to_string()))?;
    let decoder = Decoder::new(filename);
    match factory {
        Some(factory) => decoder.with_factory(factory).decode(source),
        None => decoder.decode(source),
    }
}

/// Decode goon text read to the end of `reader`.
///
/// # Examples
///
/// ```rust
/// use goon::decode_reader;
/// use std::io::Cursor;
///
/// let cursor = Cursor::new(b"package p\nvar n = -3");
/// let (doc, _) = decode_reader("in.goon", cursor, None).unwrap();
/// assert_eq!(doc.get("n").and_then(|v| v.as_i64()), Some(-3));
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not UTF-8, or the text
/// does not follow the literal grammar.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_reader<R>(
    filename: &str,
    mut reader: R,
    factory: Option<&dyn TypeFactory>,
) -> Result<(Document, Diagnostics)>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    decode_slice(filename, &bytes, factory)
}

/// Encode named values as a goon document in package `namespace`.
///
/// Variables are written in iteration order.
///
/// # Examples
///
/// ```rust
/// use goon::{encode, Encode};
///
/// let count = 3u32;
/// let names = vec!["a".to_string()];
/// let text = encode(
///     [("count", &count as &dyn Encode), ("names", &names as &dyn Encode)],
///     "demo",
/// )
/// .unwrap();
/// assert_eq!(
///     text,
///     "package demo\n\nvar count = 3\n\nvar names = []string{\n\t\"a\",\n}\n\n"
/// );
/// ```
///
/// # Errors
///
/// Returns an error if a value has no literal form (a non-finite float).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode<'a, I>(values: I, namespace: &str) -> Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a dyn Encode)>,
{
    encode_with_options(values, namespace, EncodeOptions::default())
}

/// Encode named values with custom options.
///
/// # Errors
///
/// Returns an error if a value has no literal form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_with_options<'a, I>(
    values: I,
    namespace: &str,
    options: EncodeOptions,
) -> Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a dyn Encode)>,
{
    let mut encoder = Encoder::new(namespace, options);
    let mut count = 0usize;
    for (name, value) in values {
        encoder.write_var(name, value)?;
        count += 1;
    }
    let output = encoder.into_inner();
    debug!(namespace, variables = count, bytes = output.len(), "encoded");
    Ok(output)
}

/// Encode a decoded [`Document`] back to text under its own namespace.
///
/// # Examples
///
/// ```rust
/// use goon::{decode, to_string};
///
/// let text = "package p\n\nvar m = map[interface{}]interface{}{\n\t\"k\": 1.5,\n}\n\n";
/// let (doc, _) = decode("in.goon", text).unwrap();
/// assert_eq!(to_string(&doc).unwrap(), text);
/// ```
///
/// # Errors
///
/// Returns an error if a value has no literal form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(document: &Document) -> Result<String> {
    to_string_with_options(document, EncodeOptions::default())
}

/// Encode a [`Document`] with custom options.
///
/// # Errors
///
/// Returns an error if a value has no literal form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(document: &Document, options: EncodeOptions) -> Result<String> {
    encode_with_options(
        document
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn Encode)),
        document.namespace(),
        options,
    )
}

/// Encode a [`Document`] to a writer.
///
/// # Errors
///
/// Returns an error if a value has no literal form or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, document: &Document) -> Result<()>
where
    W: io::Write,
{
    let text = to_string(document)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}
