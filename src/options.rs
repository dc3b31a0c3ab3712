//! Configuration options for goon encoding.
//!
//! - [`EncodeOptions`]: Main configuration struct
//! - [`Indent`]: Indentation unit for nested blocks
//! - [`MapOrder`]: Entry order for unordered maps
//!
//! Decoding has no options: the grammar is fixed, and everything that
//! varies between decode calls is the type factory.
//!
//! ## Examples
//!
//! ```rust
//! use goon::{encode, EncodeOptions, Encoder, Indent};
//!
//! let options = EncodeOptions::new().with_indent(Indent::Spaces(2));
//! let mut encoder = Encoder::new("demo", options);
//! encoder.write_var("xs", &vec![1, 2]).unwrap();
//!
//! assert_eq!(
//!     encoder.into_inner(),
//!     "package demo\n\nvar xs = []int32{\n  1,\n  2,\n}\n\n"
//! );
//! ```

/// Indentation unit written once per nesting level.
///
/// # Examples
///
/// ```rust
/// use goon::Indent;
///
/// assert_eq!(Indent::Tab.as_str(), "\t");
/// assert_eq!(Indent::Spaces(4).as_str(), "    ");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tab,
    Spaces(u8),
}

impl Indent {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        const SPACES: &str = "                                ";
        match self {
            Indent::Tab => "\t",
            Indent::Spaces(n) => &SPACES[..usize::from(*n).min(SPACES.len())],
        }
    }
}

/// Entry order used when writing hash maps.
///
/// Ordered containers (`BTreeMap`, `IndexMap`, [`DynamicMap`](crate::DynamicMap))
/// always write their own order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MapOrder {
    /// Lexicographic order of each entry's encoded key text, so equal maps
    /// always produce identical output.
    #[default]
    Sorted,
    /// Whatever order the map iterates in.
    Insertion,
}

/// Configuration options for goon encoding.
///
/// # Examples
///
/// ```rust
/// use goon::{EncodeOptions, Indent, MapOrder};
///
/// let options = EncodeOptions::new();
/// assert_eq!(options.indent, Indent::Tab);
/// assert_eq!(options.map_order, MapOrder::Sorted);
///
/// let options = EncodeOptions::new()
///     .with_indent(Indent::Spaces(4))
///     .with_map_order(MapOrder::Insertion);
/// assert_eq!(options.indent.as_str(), "    ");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub indent: Indent,
    pub map_order: MapOrder,
}

impl EncodeOptions {
    /// Creates default options (tab indentation, sorted hash maps).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_map_order(mut self, map_order: MapOrder) -> Self {
        self.map_order = map_order;
        self
    }
}
