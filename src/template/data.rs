//! Structured template data
//!
//! Parse results and key conventions are small insertion-ordered mappings
//! keyed by placeholder key. Iteration follows the order keys first appeared
//! in the pattern; equality ignores that order.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::convention::StringConvention;

/// A captured value together with the convention it was validated against
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ParsedValue {
    pub value: String,
    pub convention: StringConvention,
}

impl ParsedValue {
    pub fn new(value: impl Into<String>, convention: StringConvention) -> Self {
        ParsedValue {
            value: value.into(),
            convention,
        }
    }
}

/// Insertion-ordered mapping from placeholder key to `V`
#[derive(Debug, Clone)]
pub struct KeyMap<V> {
    entries: Vec<(String, V)>,
}

/// Parse result: placeholder key to captured value
pub type TemplateData = KeyMap<ParsedValue>;

/// Placeholder key to its effective convention
pub type TemplateKeys = KeyMap<StringConvention>;

impl<V> KeyMap<V> {
    pub fn new() -> Self {
        KeyMap {
            entries: Vec::new(),
        }
    }

    /// Inserts or replaces the value for `key`
    ///
    /// A replaced key keeps its original position. Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl KeyMap<ParsedValue> {
    /// The captured string for `key`
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(|parsed| parsed.value.as_str())
    }

    /// Drops the conventions, keeping key to captured string
    pub fn to_values(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(key, parsed)| (key.to_string(), parsed.value.clone()))
            .collect()
    }
}

impl<V> Default for KeyMap<V> {
    fn default() -> Self {
        KeyMap::new()
    }
}

impl<V: PartialEq> PartialEq for KeyMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<V: Eq> Eq for KeyMap<V> {}

impl<K: Into<String>, V> FromIterator<(K, V)> for KeyMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = KeyMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K: Into<String>, V, const N: usize> From<[(K, V); N]> for KeyMap<V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<V: Serialize> Serialize for KeyMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Anything `Template::format` can read placeholder values from
pub trait FormatSource {
    /// The value to substitute for `key`, if present
    fn lookup(&self, key: &str) -> Option<&str>;
}

impl FormatSource for KeyMap<ParsedValue> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.value(key)
    }
}

impl FormatSource for KeyMap<String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<K, V, S> FormatSource for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(AsRef::as_ref)
    }
}

impl<K, V> FormatSource for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(AsRef::as_ref)
    }
}

impl<T: FormatSource + ?Sized> FormatSource for &T {
    fn lookup(&self, key: &str) -> Option<&str> {
        (**self).lookup(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut data = TemplateData::new();
        data.insert("a", ParsedValue::new("first", StringConvention::None));
        data.insert("b", ParsedValue::new("second", StringConvention::None));
        let previous = data.insert("a", ParsedValue::new("third", StringConvention::None));

        assert_eq!(previous.map(|p| p.value), Some("first".to_string()));
        assert_eq!(data.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(data.value("a"), Some("third"));
    }

    #[test]
    fn test_equality_ignores_order() {
        let left = TemplateKeys::from([
            ("a", StringConvention::SnakeCase),
            ("b", StringConvention::None),
        ]);
        let right = TemplateKeys::from([
            ("b", StringConvention::None),
            ("a", StringConvention::SnakeCase),
        ]);
        let different = TemplateKeys::from([("a", StringConvention::SnakeCase)]);

        assert_eq!(left, right);
        assert_ne!(left, different);
    }

    #[test]
    fn test_format_sources() {
        let mut hash = HashMap::new();
        hash.insert("key".to_string(), "value".to_string());
        assert_eq!(hash.lookup("key"), Some("value"));

        let tree: BTreeMap<&str, &str> = BTreeMap::from([("key", "value")]);
        assert_eq!(tree.lookup("key"), Some("value"));
        assert_eq!(tree.lookup("missing"), None);

        let data = TemplateData::from([("key", ParsedValue::new("value", StringConvention::None))]);
        assert_eq!(data.lookup("key"), Some("value"));
    }

    #[test]
    fn test_serialize_preserves_order() {
        let data = TemplateData::from([
            ("z", ParsedValue::new("last", StringConvention::None)),
            ("a", ParsedValue::new("first", StringConvention::SnakeCase)),
        ]);
        let yaml = serde_yaml::to_string(&data).unwrap();
        let z = yaml.find("z:").unwrap();
        let a = yaml.find("a:").unwrap();
        assert!(z < a, "Keys should serialise in insertion order: {yaml}");
        assert!(yaml.contains("snake"));
    }
}
