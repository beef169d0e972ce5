//! Flat `key=value` text store using the standard `.properties` escaping.
//!
//! Entries live in an unordered map; [`Properties::sorted_entries`] is the
//! single place that imposes an order, so serialized output is stable no
//! matter how the map iterates.

use std::collections::HashMap;

use thiserror::Error;

mod parse;
mod write;


/// Errors raised while decoding properties text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertiesError {
    /// A `\uXXXX` escape was truncated or held non-hex digits.
    #[error("Malformed \\uXXXX escape on line {line}")]
    MalformedEscape {
        /// 1-based line where the logical entry starts.
        line: usize,
    },
}

/// String-to-string mapping loaded from and flushed to properties text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode properties text. Later duplicates of a key win.
    pub fn parse(text: &str) -> Result<Self, PropertiesError> {
        Ok(parse::entries(text)?.into_iter().collect())
    }

    /// Serialize with an optional `#` header comment, keys sorted.
    pub fn to_text(&self, comment: Option<&str>) -> String {
        write::render(self, comment)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries ordered lexicographically by key.
    pub fn sorted_entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}
