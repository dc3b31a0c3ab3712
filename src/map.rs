//! Ordered map for untyped decoding.
//!
//! [`DynamicMap`] is what a mapping literal becomes when it is bound to
//! [`Dynamic`]. Keys are themselves [`Dynamic`] values, so integer, boolean
//! and record keys survive alongside string ones. The pairs live in an
//! [`IndexMap`] in source order. Float keys hash and compare by their bits,
//! so `NaN` finds itself and `0.0` and `-0.0` are distinct keys.
//!
//! ## Examples
//!
//! ```rust
//! use goon::{Dynamic, DynamicMap};
//!
//! let mut map = DynamicMap::new();
//! map.insert(Dynamic::from("name"), Dynamic::from("Alice"));
//! map.insert(Dynamic::from(1), Dynamic::from(true));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get(&Dynamic::from("name")).and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::bind::{Bind, BindError, Binder};
use crate::generic::GenericValue;
use crate::ser::{Encode, Encoder, GoType};
use crate::{Dynamic, Position, Result};
use indexmap::map::{IntoIter as IndexMapIntoIter, IndexMap};
use indexmap::Equivalent;
use std::hash::{Hash, Hasher};

/// Insertion-ordered map of [`Dynamic`] keys to [`Dynamic`] values.
///
/// Inserting an existing key replaces its value in place, keeping the key's
/// original position.
///
/// # Examples
///
/// ```rust
/// use goon::{Dynamic, DynamicMap};
///
/// let mut map = DynamicMap::new();
/// map.insert(Dynamic::from("first"), Dynamic::from(1));
/// map.insert(Dynamic::from("second"), Dynamic::from(2));
/// assert_eq!(map.insert(Dynamic::from("first"), Dynamic::from(3)), Some(Dynamic::from(1)));
///
/// let keys: Vec<_> = map.keys().filter_map(|k| k.as_str()).collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicMap(IndexMap<DynamicKey, Dynamic>);

impl DynamicMap {
    #[must_use]
    pub fn new() -> Self {
        DynamicMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        DynamicMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the value it replaced.
    pub fn insert(&mut self, key: Dynamic, value: Dynamic) -> Option<Dynamic> {
        self.0.insert(DynamicKey(key), value)
    }

    #[must_use]
    pub fn get(&self, key: &Dynamic) -> Option<&Dynamic> {
        self.0.get(&KeyRef(key))
    }

    /// Looks up a string key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Dynamic> {
        self.get(&Dynamic::from(key))
    }

    #[must_use]
    pub fn contains_key(&self, key: &Dynamic) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Dynamic> {
        self.0.keys().map(|k| &k.0)
    }

    pub fn values(&self) -> impl Iterator<Item = &Dynamic> {
        self.0.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Dynamic, &Dynamic)> {
        self.0.iter().map(|(k, v)| (&k.0, v))
    }
}

impl IntoIterator for DynamicMap {
    type Item = (Dynamic, Dynamic);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.0.into_iter())
    }
}

/// Owning iterator over the pairs of a [`DynamicMap`], in order.
pub struct IntoIter(IndexMapIntoIter<DynamicKey, Dynamic>);

impl Iterator for IntoIter {
    type Item = (Dynamic, Dynamic);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, value)| (key.0, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

/// A [`Dynamic`] used as a map key.
#[derive(Debug, Clone)]
struct DynamicKey(Dynamic);

/// Borrowed lookup form of [`DynamicKey`].
struct KeyRef<'a>(&'a Dynamic);

impl Hash for DynamicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_key(&self.0, state);
    }
}

impl Hash for KeyRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_key(self.0, state);
    }
}

impl PartialEq for DynamicKey {
    fn eq(&self, other: &Self) -> bool {
        key_eq(&self.0, &other.0)
    }
}

impl Eq for DynamicKey {}

impl Equivalent<DynamicKey> for KeyRef<'_> {
    fn equivalent(&self, key: &DynamicKey) -> bool {
        key_eq(self.0, &key.0)
    }
}

fn hash_key<H: Hasher>(key: &Dynamic, state: &mut H) {
    std::mem::discriminant(key).hash(state);
    match key {
        Dynamic::Nil => {}
        Dynamic::Bool(b) => b.hash(state),
        Dynamic::Int(i) => i.hash(state),
        Dynamic::Float(f) => f.to_bits().hash(state),
        Dynamic::Str(s) => s.hash(state),
        Dynamic::Seq(items) => {
            items.len().hash(state);
            for item in items {
                hash_key(item, state);
            }
        }
        // pair order does not take part in map equality
        Dynamic::Map(map) => map.len().hash(state),
        Dynamic::Record(record) => record.type_name().hash(state),
    }
}

fn key_eq(a: &Dynamic, b: &Dynamic) -> bool {
    match (a, b) {
        (Dynamic::Float(x), Dynamic::Float(y)) => x.to_bits() == y.to_bits(),
        (Dynamic::Seq(xs), Dynamic::Seq(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| key_eq(x, y))
        }
        _ => a == b,
    }
}

impl FromIterator<(Dynamic, Dynamic)> for DynamicMap {
    fn from_iter<T: IntoIterator<Item = (Dynamic, Dynamic)>>(iter: T) -> Self {
        let mut map = DynamicMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl GoType for DynamicMap {
    fn go_type(_namespace: &str) -> String {
        "map[interface{}]interface{}".to_string()
    }
}

impl Encode for DynamicMap {
    fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_map(
            "interface{}",
            "interface{}",
            self.0.iter().map(|(k, v)| (&k.0 as &dyn Encode, v as &dyn Encode)),
            false,
        )
    }
}

impl Bind for DynamicMap {
    fn bind(value: &GenericValue, _pos: &Position, binder: &mut Binder<'_>) -> std::result::Result<Self, BindError> {
        match value {
            GenericValue::Nil => Ok(DynamicMap::new()),
            GenericValue::MapPairs(pairs) => {
                let mut map = DynamicMap::with_capacity(pairs.len());
                for pair in pairs {
                    let Some(key) = binder.bind::<Dynamic>(&pair.key, &pair.key_pos) else {
                        continue;
                    };
                    if let Some(value) = binder.bind::<Dynamic>(&pair.value, &pair.value_pos) {
                        map.insert(key, value);
                    }
                }
                Ok(map)
            }
            other => Err(BindError::mismatch::<Self>(other, binder)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map: DynamicMap = vec![
            (Dynamic::from(1), Dynamic::from("a")),
            (Dynamic::from(2), Dynamic::from("b")),
        ]
        .into_iter()
        .collect();
        map.insert(Dynamic::from(1), Dynamic::from("c"));
        let pairs: Vec<_> = map.into_iter().collect();
        assert_eq!(
            pairs,
            vec![
                (Dynamic::from(1), Dynamic::from("c")),
                (Dynamic::from(2), Dynamic::from("b")),
            ]
        );
    }

    #[test]
    fn test_float_and_composite_keys() {
        let mut map = DynamicMap::new();
        map.insert(Dynamic::from(f64::NAN), Dynamic::from(1));
        map.insert(Dynamic::from(0.0), Dynamic::from(2));
        map.insert(Dynamic::from(-0.0), Dynamic::from(3));
        map.insert(Dynamic::from(vec![Dynamic::from(1.5)]), Dynamic::from(4));
        assert_eq!(map.len(), 4);
        assert_eq!(map.get(&Dynamic::from(f64::NAN)), Some(&Dynamic::from(1)));
        assert_eq!(map.get(&Dynamic::from(-0.0)), Some(&Dynamic::from(3)));
        assert_eq!(
            map.get(&Dynamic::from(vec![Dynamic::from(1.5)])),
            Some(&Dynamic::from(4))
        );
    }

    #[test]
    fn test_large_map_keeps_source_order() {
        let map: DynamicMap = (0..10_000)
            .rev()
            .map(|i| (Dynamic::from(format!("k{}", i)), Dynamic::from(i)))
            .collect();
        assert_eq!(map.len(), 10_000);
        assert_eq!(map.keys().next().and_then(|k| k.as_str()), Some("k9999"));
        assert_eq!(map.get_str("k0"), Some(&Dynamic::from(0)));
    }

    #[test]
    fn test_mixed_keys() {
        let mut map = DynamicMap::new();
        map.insert(Dynamic::from("1"), Dynamic::from(1));
        map.insert(Dynamic::from(1), Dynamic::from(2));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_str("1"), Some(&Dynamic::from(1)));
        assert!(map.contains_key(&Dynamic::from(1)));
        assert!(!map.contains_key(&Dynamic::from(2)));
    }
}
