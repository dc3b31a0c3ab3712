//! goon Format Reference
//!
//! This module documents the goon text format as read and written by this
//! library. It contains no code.
//!
//! # Overview
//!
//! A goon document is a subset of Go source: one package clause followed by
//! variable declarations whose values are literals. Any document this crate
//! writes is also a syntactically valid Go file.
//!
//! ```text
//! package demo
//!
//! var limits = map[string]float64{
//!     "cpu": 2.0,
//!     "mem": 0.5,
//! }
//!
//! var owner = &Person{
//!     Name: "ann",
//!     Tags: []string{"admin"},
//! }
//! ```
//!
//! # Grammar
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
//! Operators, calls, indexing, conversions and type assertions are accepted
//! so that any well-formed Go literal expression parses, but only the `&`,
//! `-` and `+` prefixes carry a value. Expressions and types may nest at
//! most [`MAX_DEPTH`](crate::parse::MAX_DEPTH) levels deep.
//!
//! Newlines are plain whitespace; `;` may separate declarations but is never
//! required. `//` and `/* */` comments are skipped. A document that does not match the grammar
//! is rejected as a whole with [`Error::Syntax`](crate::Error::Syntax).
//!
//! ## Lexical rules
//!
//! | Token | Examples | Notes |
//! |-------|----------|-------|
//! | Integer | `42`, `-7`, `1_000`, `0x1F` | only decimal integers have a value; `-` binds to the digits, so `-9223372036854775808` is read exactly |
//! | Float | `1.5`, `1e-7`, `.5`, `2.` | any literal with `.` or an exponent |
//! | Imaginary | `2i`, `1.5i` | no value |
//! | Rune | `'x'`, `'\n'` | no value |
//! | String | `"a\tb"`, `` `raw\n` `` | escapes `\\ \" \' \a \b \f \n \r \t \v \NNN \xNN \uNNNN \UNNNNNNNN`; raw strings drop `\r` |
//! | Identifier | `Name`, `true`, `nil` | letters, digits and `_` |
//!
//! Integers above `i64::MAX` that fit in 64 bits are kept as their
//! two's-complement bit pattern, so `u64` values round-trip.
//!
//! Positions count lines and columns from 1. Columns count characters, and
//! a tab is one column.
//!
//! # Value Model
//!
//! Interpretation turns every expression into a
//! [`GenericValue`](crate::GenericValue):
//!
//! | Expression | Value |
//! |------------|-------|
//! | integer literal | `Int` |
//! | float literal | `Float` |
//! | string literal | `Str` |
//! | `true True TRUE t T` | `Bool(true)` |
//! | `false False FALSE f F` | `Bool(false)` |
//! | `nil` | `Nil` |
//! | `[]T{a, b}`, `[N]T{...}` | `Seq` |
//! | `map[K]V{k: v}` | `MapPairs`, in source order |
//! | `Name{F: v}`, `pkg.Name{F: v}` | `Composite` when decoding with a factory, `MapPairs` keyed by field name otherwise |
//! | `&x`, `+x`, `(x)` | the value of `x` |
//!
//! Any other identifier has no value, and neither has an operator, a call,
//! a rune, or a literal without a type such as the inner `{X: 1}` of
//! `[]Point{{X: 1}}`. Elements without a
//! value are skipped. A declaration without a value, including one without
//! `= expr`, decodes to [`Dynamic::Nil`](crate::Dynamic::Nil).
//!
//! A bare identifier key is read as its name, so `map[string]int{T: 1}`
//! has the key `"T"`. In mapping literals exactly `true` and `false` are
//! the one exception and stay booleans.
//!
//! An unqualified composite name belongs to the document's package. A
//! qualified name `pkg.Name` belongs to `pkg`.
//!
//! # Binding Rules
//!
//! Binding never aborts a decode. A value that does not fit its destination
//! leaves the destination unchanged and adds a
//! [`Diagnostic`](crate::Diagnostic) positioned at the value:
//!
//! ```text
//! unable to assign string value to int64 (cfg.goon:4:9)
//! ```
//!
//! | Destination | Accepts |
//! |-------------|---------|
//! | `bool` | `Bool` |
//! | integers | `Int`, truncated to the destination width |
//! | `f32`, `f64` | `Float` or `Int` |
//! | `String` | `Str` |
//! | `Vec<T>` | `Seq` (failed elements are dropped), `Nil` as empty |
//! | maps | `MapPairs` (failed pairs are dropped, later keys win), `Nil` as empty |
//! | `Option<T>` | whatever `T` accepts; `Nil` as `None` |
//! | `Box<T>` | whatever `T` accepts |
//! | records | `Composite` of the same type name |
//! | [`Dynamic`](crate::Dynamic) | anything |
//!
//! A composite whose type the factory cannot build is dropped without a
//! report when its destination is optional (`Option`, `Box<Option>` or
//! [`Dynamic`](crate::Dynamic)): an element or pair leaves its container, a
//! record field keeps its value and a variable decodes to `Nil`. A required
//! record destination reports the miss like any other mismatch. Unknown field names are ignored.
//!
//! # Encoding Rules
//!
//! - The package clause and every declaration are followed by a blank line.
//! - Blocks open on the head line; each entry is on its own line, one indent
//!   deeper, and ends with `,`. Empty blocks are written `{}`.
//! - The indent is a tab unless [`Indent::Spaces`](crate::Indent::Spaces)
//!   is set.
//! - Floats are written in the shortest form that reads back as the same
//!   value and always carry a `.` or an exponent. NaN and infinities cannot
//!   be written.
//! - Strings are double-quoted. Quote, backslash and control characters are
//!   escaped.
//! - Records held through `Option`, `Box` or [`Dynamic`](crate::Dynamic)
//!   are written with `&`. Scalars are written bare wherever they are held.
//! - Record names are qualified only when their namespace differs from the
//!   document's.
//! - Fields marked `[skip]` in [`record!`](crate::record) are never written.
//! - Hash maps are sorted by encoded key text unless
//!   [`MapOrder::Insertion`](crate::MapOrder::Insertion) is set. Ordered
//!   maps keep their own order.
//! - A variable with nothing to write is declared `var name interface{}`.
//!
//! | Rust type | Type expression |
//! |-----------|-----------------|
//! | `bool` | `bool` |
//! | `i8` .. `i64`, `isize` | `int8` .. `int64`, `int` |
//! | `u8` .. `u64`, `usize` | `uint8` .. `uint64`, `uint` |
//! | `f32`, `f64` | `float32`, `float64` |
//! | `String`, `&str` | `string` |
//! | `Vec<T>` | `[]T` |
//! | `HashMap<K, V>`, `BTreeMap<K, V>`, `IndexMap<K, V>` | `map[K]V` |
//! | `Option<T>`, `Box<T>` | `*T` |
//! | [`Dynamic`](crate::Dynamic), `Box<dyn Record>` | `interface{}` |
