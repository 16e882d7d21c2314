//! Case-insensitive header field map.

use std::collections::HashMap;
use std::collections::hash_map::Iter;

use bytes::Bytes;
use http::header::CONTENT_LENGTH;

/// Header fields keyed by lowercased name.
///
/// Names are folded to lowercase (ASCII `A-Z` only) on insert and on lookup,
/// values are kept exactly as received. Inserting a name twice keeps the
/// last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    map: HashMap<Bytes, Bytes>,
}

impl HeaderFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing any earlier value under the same name.
    pub fn insert(&mut self, name: &[u8], value: Bytes) -> Option<Bytes> {
        self.map.insert(Bytes::from(name.to_ascii_lowercase()), value)
    }

    /// Looks up a field by name, in any casing.
    pub fn get<K: AsRef<[u8]>>(&self, name: K) -> Option<&Bytes> {
        let name = name.as_ref();
        if name.iter().any(u8::is_ascii_uppercase) {
            self.map.get(name.to_ascii_lowercase().as_slice())
        } else {
            self.map.get(name)
        }
    }

    /// Looks up a field and returns its value if it is valid UTF-8.
    pub fn get_str<K: AsRef<[u8]>>(&self, name: K) -> Option<&str> {
        self.get(name).and_then(|value| std::str::from_utf8(value).ok())
    }

    pub fn contains<K: AsRef<[u8]>>(&self, name: K) -> bool {
        self.get(name).is_some()
    }

    /// The declared body length.
    ///
    /// A missing field, or one whose value (after trimming ASCII whitespace)
    /// is not a non-negative integer, counts as 0.
    pub fn content_length(&self) -> u64 {
        self.get_str(CONTENT_LENGTH.as_str()).and_then(|value| value.trim_ascii().parse::<u64>().ok()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates `(lowercased name, value)` pairs in no particular order.
    pub fn iter(&self) -> Iter<'_, Bytes, Bytes> {
        self.map.iter()
    }
}

impl<'a> IntoIterator for &'a HeaderFields {
    type Item = (&'a Bytes, &'a Bytes);
    type IntoIter = Iter<'a, Bytes, Bytes>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
