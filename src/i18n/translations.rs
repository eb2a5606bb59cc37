//! Language-grouped translation mapping.

use indexmap::IndexMap;
use serde::Serialize;

/// Key → text entries of one language, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextTable(IndexMap<String, String>);

impl TextTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a text. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.0.insert(key.into(), text.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Translations grouped by language tag, languages in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Translations(IndexMap<String, TextTable>);

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table of a language, created empty on first use.
    pub fn language_mut(&mut self, tag: &str) -> &mut TextTable {
        self.0.entry(tag.to_string()).or_default()
    }

    /// Insert a text for a language. Empty texts are ignored.
    pub fn insert(&mut self, tag: &str, key: &str, text: &str) {
        if text.is_empty() {
            return;
        }
        self.language_mut(tag).insert(key, text);
    }

    pub fn get(&self, tag: &str) -> Option<&TextTable> {
        self.0.get(tag)
    }

    /// Number of languages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Languages and their tables in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TextTable)> {
        self.0.iter().map(|(tag, table)| (tag.as_str(), table))
    }
}
