//! Enumeration values for dictionary columns.
//!
//! A dictionary is a closed list of labeled positions supplied by the caller.
//! Search words are matched against labels and resolved to position ids.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::expr::{FilterExpr, Operator};
use crate::schema::ColumnDescriptor;

use super::word::WordFilter;

/// One labeled position of a dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Identifier stored in the column.
    pub id: String,
    /// Display label matched against search words.
    pub label: String,
}

impl DictionaryEntry {
    /// Creates a dictionary entry.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Dictionary entries keyed by dictionary id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionaries {
    dictionaries: BTreeMap<String, Vec<DictionaryEntry>>,
}

impl Dictionaries {
    /// Creates an empty dictionary set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a dictionary.
    pub fn insert(&mut self, id: impl Into<String>, entries: Vec<DictionaryEntry>) {
        self.dictionaries.insert(id.into(), entries);
    }

    /// Returns the entries of a dictionary.
    pub fn get(&self, id: &str) -> Option<&[DictionaryEntry]> {
        self.dictionaries.get(id).map(Vec::as_slice)
    }

    /// Returns true if no dictionary is loaded.
    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<DictionaryEntry>)> for Dictionaries {
    fn from_iter<I: IntoIterator<Item = (K, Vec<DictionaryEntry>)>>(iter: I) -> Self {
        Self {
            dictionaries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Outcome of matching one word against a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every entry matched.
    All,
    /// No entry matched.
    Nothing,
    /// Some entries matched; their ids in dictionary order.
    Ids(Vec<String>),
}

/// Matches `filter` against every label of `entries`.
pub fn resolve(entries: &[DictionaryEntry], filter: &WordFilter) -> Resolution {
    let ids: Vec<String> = entries
        .iter()
        .filter(|e| filter.matches(&e.label))
        .map(|e| e.id.clone())
        .collect();

    if ids.is_empty() {
        Resolution::Nothing
    } else if ids.len() == entries.len() {
        Resolution::All
    } else {
        Resolution::Ids(ids)
    }
}

/// Builds the condition a word contributes on a dictionary column.
///
/// Returns `None` when no label matches; callers decide whether that means
/// "skip this column" or "never".
pub(crate) fn dictionary_condition(
    column: &ColumnDescriptor,
    entries: &[DictionaryEntry],
    filter: &WordFilter,
) -> Option<FilterExpr> {
    match resolve(entries, filter) {
        Resolution::Nothing => None,
        Resolution::All => Some(FilterExpr::not_null(&column.name)),
        Resolution::Ids(ids) => {
            let op = if column.column_type.is_list() {
                Operator::HasAny
            } else {
                Operator::In
            };
            Some(FilterExpr::condition(&column.name, op, ids))
        }
    }
}
