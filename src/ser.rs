//! goon encoding.
//!
//! This module provides the [`Encoder`], which writes literal text, and the
//! two traits that describe how a value is written:
//!
//! - [`GoType`]: the type expression used in composite literal heads
//!   (`[]int64{`, `map[string]float64{`)
//! - [`Encode`]: the value expression itself
//!
//! ## Output shape
//!
//! ```text
//! package demo
//!
//! var x = &Record{
//!     Name: "a",
//!     Count: 3,
//! }
//!
//! ```
//!
//! Every block entry sits on its own line one level deeper than its block
//! and ends with a comma. Empty blocks are written `{}`. Records are named
//! with their namespace only when it differs from the document's. `&` is
//! written before records held through `Option` or `Box`; scalars behind a
//! pointer are written bare.
//!
//! ## Direct Encoder Usage
//!
//! ```rust
//! use goon::{EncodeOptions, Encoder};
//! use std::collections::BTreeMap;
//!
//! let mut scores = BTreeMap::new();
//! scores.insert("b".to_string(), 2.5);
//! scores.insert("a".to_string(), 1.0);
//!
//! let mut encoder = Encoder::new("demo", EncodeOptions::new());
//! encoder.write_var("scores", &scores).unwrap();
//! encoder.write_var("name", &"goon").unwrap();
//!
//! assert_eq!(
//!     encoder.into_inner(),
//!     "package demo\n\nvar scores = map[string]float64{\n\t\"a\": 1.0,\n\t\"b\": 2.5,\n}\n\nvar name = \"goon\"\n\n"
//! );
//! ```

use crate::options::MapOrder;
use crate::record::Record;
use crate::{EncodeOptions, Error, Result};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// The type expression naming a Rust type in literal text.
pub trait GoType {
    /// `namespace` is the package of the document being written, used to
    /// decide whether record names need qualifying.
    fn go_type(namespace: &str) -> String;
}

/// A value that can be written as a goon expression.
pub trait Encode {
    fn encode(&self, enc: &mut Encoder) -> Result<()>;

    /// Writes the value as held by reference. Records prefix `&`; everything
    /// else is written as by [`Encode::encode`].
    fn encode_ref(&self, enc: &mut Encoder) -> Result<()> {
        self.encode(enc)
    }

    /// `true` when the value carries nothing to write at all.
    fn is_absent(&self) -> bool {
        false
    }
}

/// Writes goon literal text.
///
/// Created with [`Encoder::new`], which writes the package clause. Each
/// [`Encoder::write_var`] call then appends one declaration.
pub struct Encoder {
    output: String,
    namespace: String,
    options: EncodeOptions,
    indent_level: usize,
}

impl Encoder {
    pub fn new(namespace: impl Into<String>, options: EncodeOptions) -> Self {
        let namespace = namespace.into();
        let mut output = String::with_capacity(256);
        output.push_str("package ");
        output.push_str(&namespace);
        output.push_str("\n\n");
        Encoder {
            output,
            namespace,
            options,
            indent_level: 0,
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends `var <name> = <expr>` followed by a blank line.
    ///
    /// A value with nothing to write becomes `var <name> interface{}`.
    pub fn write_var(&mut self, name: &str, value: &dyn Encode) -> Result<()> {
        self.output.push_str("var ");
        self.output.push_str(name);
        if value.is_absent() {
            self.output.push_str(" interface{}");
        } else {
            self.output.push_str(" = ");
            value.encode(self)?;
        }
        self.output.push_str("\n\n");
        Ok(())
    }

    /// Appends text verbatim.
    pub fn write_raw(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn write_nil(&mut self) {
        self.output.push_str("nil");
    }

    pub fn write_bool(&mut self, value: bool) {
        self.output.push_str(if value { "true" } else { "false" });
    }

    pub fn write_int(&mut self, value: i64) {
        self.output.push_str(&value.to_string());
    }

    pub fn write_uint(&mut self, value: u64) {
        self.output.push_str(&value.to_string());
    }

    /// Writes the shortest text that reads back as the same `f64`, always
    /// with a fractional part or exponent.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::unsupported_value(format!(
                "float {} has no literal form",
                value
            )));
        }
        self.output.push_str(&format!("{:?}", value));
        Ok(())
    }

    /// Like [`Encoder::write_f64`], but shortest for `f32`.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::unsupported_value(format!(
                "float {} has no literal form",
                value
            )));
        }
        self.output.push_str(&format!("{:?}", value));
        Ok(())
    }

    /// Writes a double-quoted string literal.
    pub fn write_str(&mut self, value: &str) {
        self.output.push('"');
        for ch in value.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c if c.is_control() => {
                    self.output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }

    /// Writes `Type{ Field: value, ... }` for every non-excluded field.
    pub fn write_record(&mut self, record: &dyn Record) -> Result<()> {
        let type_name = record.type_name().qualified(&self.namespace);
        self.output.push_str(&type_name);
        let fields: Vec<_> = record
            .fields()
            .into_iter()
            .filter(|field| !field.excluded)
            .collect();
        self.write_block(fields, |enc, field| {
            enc.output.push_str(field.name);
            enc.output.push_str(": ");
            field.value.encode(enc)
        })
    }

    /// Writes `[]<elem_type>{ value, ... }`.
    pub fn write_seq<'v, I>(&mut self, elem_type: &str, items: I) -> Result<()>
    where
        I: IntoIterator<Item = &'v dyn Encode>,
    {
        self.output.push_str("[]");
        self.output.push_str(elem_type);
        let items: Vec<_> = items.into_iter().collect();
        self.write_block(items, |enc, item| item.encode(enc))
    }

    /// Writes `map[<key_type>]<value_type>{ key: value, ... }`.
    ///
    /// With `sort` set, entries are ordered by their encoded key text.
    pub fn write_map<'v, I>(
        &mut self,
        key_type: &str,
        value_type: &str,
        entries: I,
        sort: bool,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (&'v dyn Encode, &'v dyn Encode)>,
    {
        self.output.push_str("map[");
        self.output.push_str(key_type);
        self.output.push(']');
        self.output.push_str(value_type);

        // Entries are rendered one level deep, where the block will put them.
        self.indent_level += 1;
        let rendered = entries
            .into_iter()
            .map(|(key, value)| -> Result<(String, String)> {
                Ok((self.render(key)?, self.render(value)?))
            })
            .collect::<Result<Vec<_>>>();
        self.indent_level -= 1;

        let mut rendered = rendered?;
        if sort {
            rendered.sort_by(|a, b| a.0.cmp(&b.0));
        }
        self.write_block(rendered, |enc, (key, value)| {
            enc.output.push_str(&key);
            enc.output.push_str(": ");
            enc.output.push_str(&value);
            Ok(())
        })
    }

    fn render(&mut self, value: &dyn Encode) -> Result<String> {
        let saved = std::mem::take(&mut self.output);
        let result = value.encode(self);
        let rendered = std::mem::replace(&mut self.output, saved);
        result.map(|()| rendered)
    }

    fn write_block<T>(
        &mut self,
        entries: Vec<T>,
        mut write_entry: impl FnMut(&mut Self, T) -> Result<()>,
    ) -> Result<()> {
        self.output.push('{');
        if entries.is_empty() {
            self.output.push('}');
            return Ok(());
        }

        self.indent_level += 1;
        let mut result = Ok(());
        for entry in entries {
            self.write_newline();
            if let Err(err) = write_entry(self, entry) {
                result = Err(err);
                break;
            }
            self.output.push(',');
        }
        self.indent_level -= 1;
        result?;

        self.write_newline();
        self.output.push('}');
        Ok(())
    }

    fn write_newline(&mut self) {
        self.output.push('\n');
        let indent = self.options.indent.as_str();
        for _ in 0..self.indent_level {
            self.output.push_str(indent);
        }
    }
}

macro_rules! encode_scalar {
    ($($ty:ty => $name:literal, |$enc:ident, $v:ident| $body:expr;)*) => {
        $(
            impl GoType for $ty {
                fn go_type(_namespace: &str) -> String {
                    $name.to_string()
                }
            }

            impl Encode for $ty {
                fn encode(&self, $enc: &mut Encoder) -> Result<()> {
                    let $v = *self;
                    $body
                }
            }
        )*
    };
}

encode_scalar! {
    bool => "bool", |enc, v| { enc.write_bool(v); Ok(()) };
    i8 => "int8", |enc, v| { enc.write_int(i64::from(v)); Ok(()) };
    i16 => "int16", |enc, v| { enc.write_int(i64::from(v)); Ok(()) };
    i32 => "int32", |enc, v| { enc.write_int(i64::from(v)); Ok(()) };
    i64 => "int64", |enc, v| { enc.write_int(v); Ok(()) };
    isize => "int", |enc, v| { enc.write_int(v as i64); Ok(()) };
    u8 => "uint8", |enc, v| { enc.write_uint(u64::from(v)); Ok(()) };
    u16 => "uint16", |enc, v| { enc.write_uint(u64::from(v)); Ok(()) };
    u32 => "uint32", |enc, v| { enc.write_uint(u64::from(v)); Ok(()) };
    u64 => "uint64", |enc, v| { enc.write_uint(v); Ok(()) };
    usize => "uint", |enc, v| { enc.write_uint(v as u64); Ok(()) };
    f32 => "float32", |enc, v| enc.write_f32(v);
    f64 => "float64", |enc, v| enc.write_f64(v);
}

impl GoType for String {
    fn go_type(_namespace: &str) -> String {
        "string".to_string()
    }
}

impl Encode for String {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_str(self);
        Ok(())
    }
}

impl GoType for &str {
    fn go_type(_namespace: &str) -> String {
        "string".to_string()
    }
}

impl Encode for str {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_str(self);
        Ok(())
    }
}

impl<T: GoType> GoType for Option<T> {
    fn go_type(namespace: &str) -> String {
        format!("*{}", T::go_type(namespace))
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        match self {
            Some(value) => value.encode_ref(enc),
            None => {
                enc.write_nil();
                Ok(())
            }
        }
    }
}

impl<T: GoType> GoType for Box<T> {
    fn go_type(namespace: &str) -> String {
        format!("*{}", T::go_type(namespace))
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        (**self).encode_ref(enc)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        (**self).encode(enc)
    }

    fn encode_ref(&self, enc: &mut Encoder) -> Result<()> {
        (**self).encode_ref(enc)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: GoType> GoType for Vec<T> {
    fn go_type(namespace: &str) -> String {
        format!("[]{}", T::go_type(namespace))
    }
}

impl<T: Encode + GoType> Encode for Vec<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        let elem_type = T::go_type(enc.namespace());
        enc.write_seq(&elem_type, self.iter().map(|item| item as &dyn Encode))
    }
}

impl<K: GoType, V: GoType, S> GoType for HashMap<K, V, S> {
    fn go_type(namespace: &str) -> String {
        format!("map[{}]{}", K::go_type(namespace), V::go_type(namespace))
    }
}

impl<K: Encode + GoType, V: Encode + GoType, S> Encode for HashMap<K, V, S> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        let key_type = K::go_type(enc.namespace());
        let value_type = V::go_type(enc.namespace());
        let sort = enc.options().map_order == MapOrder::Sorted;
        enc.write_map(
            &key_type,
            &value_type,
            self.iter().map(|(k, v)| (k as &dyn Encode, v as &dyn Encode)),
            sort,
        )
    }
}

impl<K: GoType, V: GoType> GoType for BTreeMap<K, V> {
    fn go_type(namespace: &str) -> String {
        format!("map[{}]{}", K::go_type(namespace), V::go_type(namespace))
    }
}

impl<K: Encode + GoType, V: Encode + GoType> Encode for BTreeMap<K, V> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        let key_type = K::go_type(enc.namespace());
        let value_type = V::go_type(enc.namespace());
        enc.write_map(
            &key_type,
            &value_type,
            self.iter().map(|(k, v)| (k as &dyn Encode, v as &dyn Encode)),
            false,
        )
    }
}

impl<K: GoType, V: GoType, S> GoType for IndexMap<K, V, S> {
    fn go_type(namespace: &str) -> String {
        format!("map[{}]{}", K::go_type(namespace), V::go_type(namespace))
    }
}

impl<K: Encode + GoType, V: Encode + GoType, S> Encode for IndexMap<K, V, S> {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        let key_type = K::go_type(enc.namespace());
        let value_type = V::go_type(enc.namespace());
        enc.write_map(
            &key_type,
            &value_type,
            self.iter().map(|(k, v)| (k as &dyn Encode, v as &dyn Encode)),
            false,
        )
    }
}

impl GoType for Box<dyn Record> {
    fn go_type(_namespace: &str) -> String {
        "interface{}".to_string()
    }
}

impl Encode for dyn Record {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_record(self)
    }

    fn encode_ref(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_raw("&");
        enc.write_record(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record, Indent};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Inner {
        value: f32,
    }

    record! {
        Inner as "Inner" in "demo" {
            "Value" => value,
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Point {
        x: i64,
    }

    record! {
        Point as "Point" in "geo" {
            "X" => x,
        }
    }

    fn encode_one(value: &dyn Encode) -> String {
        let mut enc = Encoder::new("demo", EncodeOptions::new());
        enc.write_var("v", value).unwrap();
        enc.into_inner()
            .strip_prefix("package demo\n\nvar v = ")
            .and_then(|s| s.strip_suffix("\n\n"))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encode_one(&true), "true");
        assert_eq!(encode_one(&-42i32), "-42");
        assert_eq!(encode_one(&u64::MAX), "18446744073709551615");
        assert_eq!(encode_one(&10.0f64), "10.0");
        assert_eq!(encode_one(&0.1f32), "0.1");
        assert_eq!(encode_one(&1e-7f64), "1e-7");
        assert_eq!(encode_one(&"say \"hi\"\n"), r#""say \"hi\"\n""#);
        assert_eq!(encode_one(&"a\0\u{7f}"), r#""a\u0000\u007f""#);
    }

    #[test]
    fn test_non_finite_float_is_error() {
        let mut enc = Encoder::new("demo", EncodeOptions::new());
        let err = enc.write_var("v", &f64::NAN).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue(_)));
    }

    #[test]
    fn test_pointers() {
        assert_eq!(encode_one(&None::<Inner>), "nil");
        assert_eq!(encode_one(&Some(5i64)), "5");
        assert_eq!(
            encode_one(&Some(Inner { value: 1.5 })),
            "&Inner{\n\tValue: 1.5,\n}"
        );
        assert_eq!(
            encode_one(&Box::new(Point { x: 1 })),
            "&geo.Point{\n\tX: 1,\n}"
        );
        assert_eq!(encode_one(&Point { x: 1 }), "geo.Point{\n\tX: 1,\n}");
    }

    #[test]
    fn test_nested_blocks() {
        let value = vec![vec![1u8], vec![]];
        assert_eq!(
            encode_one(&value),
            "[][]uint8{\n\t[]uint8{\n\t\t1,\n\t},\n\t[]uint8{},\n}"
        );
    }

    #[test]
    fn test_hash_map_sorted_by_key_text() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), Some(Inner { value: 2.0 }));
        map.insert("a".to_string(), None);
        assert_eq!(
            encode_one(&map),
            "map[string]*Inner{\n\t\"a\": nil,\n\t\"b\": &Inner{\n\t\tValue: 2.0,\n\t},\n}"
        );
    }

    #[test]
    fn test_index_map_keeps_order() {
        let mut map = IndexMap::new();
        map.insert(3i64, "c".to_string());
        map.insert(1i64, "a".to_string());
        assert_eq!(
            encode_one(&map),
            "map[int64]string{\n\t3: \"c\",\n\t1: \"a\",\n}"
        );
    }

    #[test]
    fn test_space_indent() {
        let mut enc = Encoder::new("demo", EncodeOptions::new().with_indent(Indent::Spaces(2)));
        enc.write_var("v", &vec![Inner { value: 0.5 }]).unwrap();
        assert_eq!(
            enc.into_inner(),
            "package demo\n\nvar v = []Inner{\n  Inner{\n    Value: 0.5,\n  },\n}\n\n"
        );
    }

    #[test]
    fn test_error_restores_indentation() {
        let mut enc = Encoder::new("demo", EncodeOptions::new());
        assert!(enc.write_var("bad", &vec![vec![f64::INFINITY]]).is_err());
        enc.write_var("ok", &vec![1i64]).unwrap();
        assert!(enc.into_inner().ends_with("var ok = []int64{\n\t1,\n}\n\n"));
    }
}
