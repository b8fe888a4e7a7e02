//! Filter tree builders.
//!
//! [`build_column_filter`] and [`build_dictionary_filter`] compile search text
//! typed into a single column's search box. [`GlobalFilterBuilder`] compiles
//! text typed into a cross-column search box, where each word either ORs
//! across the candidate columns or addresses one column through a prefix.
//!
//! The builders produce raw expressions (empty AND/OR nodes, `in` lists with a
//! single id, ...). Pass the result through [`crate::reduce`] before sending it.

use std::collections::BTreeMap;

use crate::error::{FilterError, FilterResult};
use crate::expr::{FilterExpr, FilterValue, Operator};
use crate::schema::{ColumnDescriptor, ColumnType, Schema};

use super::dictionary::{dictionary_condition, Dictionaries, DictionaryEntry};
use super::lexer::{Lexer, Word};
use super::word::{fuzzy_word_filter, strip_quotes, MatchMode, ReservedCode};

/// Builds the filter for text typed into one text column's search box.
///
/// Reserved codes compile to null checks; otherwise the result is the AND of
/// one condition per word. Text without words yields an empty AND.
///
/// # Example
///
/// ```
/// use fuzzy_filter_rs::filter::{build_column_filter, MatchMode};
/// use fuzzy_filter_rs::{ColumnDescriptor, ColumnType, FilterExpr, Operator};
///
/// let title = ColumnDescriptor::new("title", ColumnType::Text, true);
/// assert_eq!(
///     build_column_filter(&title, "*", MatchMode::Fuzzy),
///     FilterExpr::not_null("title")
/// );
/// assert_eq!(
///     build_column_filter(&title, "abc*", MatchMode::Fuzzy),
///     FilterExpr::and(vec![FilterExpr::condition("title", Operator::StartsWith, "abc")])
/// );
/// ```
pub fn build_column_filter(
    column: &ColumnDescriptor,
    text: &str,
    mode: MatchMode,
) -> FilterExpr {
    if let Some(code) = ReservedCode::parse(text) {
        return code.to_condition(&column.name);
    }

    FilterExpr::and(
        Lexer::new(text)
            .tokenize()
            .iter()
            .map(|w| fuzzy_word_filter(&w.value, mode).to_condition(column))
            .collect(),
    )
}

/// Builds the filter for text typed into one dictionary column's search box.
///
/// Each word resolves to the ids whose labels it matches. A word matching no
/// label makes the whole filter `never`.
pub fn build_dictionary_filter(
    column: &ColumnDescriptor,
    text: &str,
    entries: &[DictionaryEntry],
    mode: MatchMode,
) -> FilterExpr {
    if let Some(code) = ReservedCode::parse(text) {
        return code.to_condition(&column.name);
    }

    FilterExpr::and(
        Lexer::new(text)
            .tokenize()
            .iter()
            .map(|w| {
                let filter = fuzzy_word_filter(&w.value, mode);
                dictionary_condition(column, entries, &filter).unwrap_or(FilterExpr::NEVER)
            })
            .collect(),
    )
}

/// Builds an equality filter on a column that has no text semantics.
///
/// Integer and boolean words that do not parse can never match. On list
/// columns each word must be an element of the list.
fn build_scalar_filter(column: &ColumnDescriptor, text: &str) -> FilterExpr {
    if let Some(code) = ReservedCode::parse(text) {
        return code.to_condition(&column.name);
    }

    let op = if column.column_type.is_list() {
        Operator::Has
    } else {
        Operator::Eq
    };

    FilterExpr::and(
        Lexer::new(text)
            .tokenize()
            .iter()
            .map(|w| match scalar_value(&column.column_type, strip_quotes(&w.value)) {
                Some(value) => FilterExpr::condition(&column.name, op, value),
                None => FilterExpr::NEVER,
            })
            .collect(),
    )
}

fn scalar_value(column_type: &ColumnType, text: &str) -> Option<FilterValue> {
    match column_type {
        ColumnType::Integer => text.parse::<i64>().ok().map(FilterValue::Integer),
        ColumnType::Boolean => match text.to_lowercase().as_str() {
            "true" | "1" => Some(FilterValue::Bool(true)),
            "false" | "0" => Some(FilterValue::Bool(false)),
            _ => None,
        },
        _ => Some(FilterValue::Text(text.to_string())),
    }
}

/// Which schema columns a global search covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    /// Every schema column.
    #[default]
    All,
    /// Only the listed columns, in list order.
    Only(Vec<String>),
    /// Every schema column except the listed ones.
    Except(Vec<String>),
}

impl ColumnSelection {
    /// Builds a selection from an optional explicit list and an optional
    /// skip list.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::ConflictingColumnSelection` if both are given.
    pub fn from_lists(only: Option<Vec<String>>, skip: Option<Vec<String>>) -> FilterResult<Self> {
        match (only, skip) {
            (Some(_), Some(_)) => Err(FilterError::ConflictingColumnSelection),
            (Some(only), None) => Ok(ColumnSelection::Only(only)),
            (None, Some(skip)) => Ok(ColumnSelection::Except(skip)),
            (None, None) => Ok(ColumnSelection::All),
        }
    }

    fn resolve<'a>(&self, schema: &'a Schema) -> FilterResult<Vec<&'a ColumnDescriptor>> {
        match self {
            ColumnSelection::All => Ok(schema.columns().iter().collect()),
            ColumnSelection::Only(names) => names
                .iter()
                .map(|name| {
                    schema
                        .column(name)
                        .ok_or_else(|| FilterError::unknown_column(name))
                })
                .collect(),
            ColumnSelection::Except(names) => {
                if let Some(missing) = names.iter().find(|n| schema.column(n).is_none()) {
                    return Err(FilterError::unknown_skip_column(missing));
                }
                Ok(schema
                    .columns()
                    .iter()
                    .filter(|c| !names.contains(&c.name))
                    .collect())
            }
        }
    }
}

/// Callback invoked with `(prefix, column)` whenever a column prefix is used.
pub type PrefixCallback<'a> = Box<dyn Fn(&str, &str) + 'a>;

/// Compiles cross-column search text.
///
/// Per word, in order:
/// 1. A known column prefix (`name:value` or `name=value`) restricts the word
///    to that column; `=` switches to exact matching.
/// 2. Otherwise the word is ORed across the candidate columns that support
///    word filtering: text columns directly, dictionary columns through their
///    labels. Other column types are skipped.
///
/// The result is the AND across words.
///
/// # Example
///
/// ```
/// use fuzzy_filter_rs::filter::{ColumnSelection, GlobalFilterBuilder};
/// use fuzzy_filter_rs::schema::{ColumnDescriptor, ColumnType, Schema};
/// use fuzzy_filter_rs::reduce;
///
/// let schema = Schema::new(vec![
///     ColumnDescriptor::new("title", ColumnType::Text, true),
///     ColumnDescriptor::new("body", ColumnType::Text, true),
/// ]);
/// let builder = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
///     .unwrap()
///     .with_prefixes([("t", "title")])
///     .unwrap();
///
/// let filter = reduce(&schema, &builder.build("t:abc*"));
/// assert_eq!(filter.to_string(), r#"title starts_with "abc""#);
/// ```
pub struct GlobalFilterBuilder<'a> {
    schema: &'a Schema,
    columns: Vec<&'a ColumnDescriptor>,
    dictionaries: Option<&'a Dictionaries>,
    prefixes: BTreeMap<String, &'a ColumnDescriptor>,
    on_prefix: Option<PrefixCallback<'a>>,
}

impl<'a> GlobalFilterBuilder<'a> {
    /// Creates a builder over the selected candidate columns.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownColumn` / `FilterError::UnknownSkipColumn`
    /// if the selection names a column the schema does not have.
    pub fn new(schema: &'a Schema, selection: &ColumnSelection) -> FilterResult<Self> {
        Ok(Self {
            schema,
            columns: selection.resolve(schema)?,
            dictionaries: None,
            prefixes: BTreeMap::new(),
            on_prefix: None,
        })
    }

    /// Supplies dictionary entries for dictionary columns.
    pub fn with_dictionaries(mut self, dictionaries: &'a Dictionaries) -> Self {
        self.dictionaries = Some(dictionaries);
        self
    }

    /// Adds column prefixes mapping user-typed prefixes to column names.
    ///
    /// Prefixed columns need not be candidate columns.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownPrefixTarget` if a prefix maps to a column
    /// the schema does not have.
    pub fn with_prefixes<I, P, C>(mut self, prefixes: I) -> FilterResult<Self>
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: AsRef<str>,
    {
        for (prefix, column) in prefixes {
            let prefix = prefix.into();
            let column = column.as_ref();
            let descriptor = self
                .schema
                .column(column)
                .ok_or_else(|| FilterError::unknown_prefix_target(&prefix, column))?;
            self.prefixes.insert(prefix, descriptor);
        }
        Ok(self)
    }

    /// Registers a callback invoked whenever a column prefix is used.
    pub fn on_prefix(mut self, callback: impl Fn(&str, &str) + 'a) -> Self {
        self.on_prefix = Some(Box::new(callback));
        self
    }

    /// Returns the candidate column names in search order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Compiles search text into a raw (unreduced) filter expression.
    pub fn build(&self, text: &str) -> FilterExpr {
        FilterExpr::and(
            Lexer::with_prefixes(text)
                .tokenize()
                .iter()
                .map(|w| self.word_filter(w))
                .collect(),
        )
    }

    fn word_filter(&self, word: &Word) -> FilterExpr {
        if let Some(prefix) = &word.prefix {
            if let Some(column) = self.prefixes.get(&prefix.name) {
                tracing::debug!(prefix = %prefix.name, column = %column.name, "column prefix matched");
                if let Some(callback) = &self.on_prefix {
                    callback(&prefix.name, &column.name);
                }
                return self.column_filter(column, &word.value, prefix.op.mode());
            }
        }

        let filter = fuzzy_word_filter(&word.raw, MatchMode::Fuzzy);
        FilterExpr::or(
            self.columns
                .iter()
                .filter_map(|column| match &column.column_type {
                    t if t.supports_word_filter() => Some(filter.to_condition(column)),
                    ColumnType::Dict { dict } | ColumnType::DictList { dict } => {
                        let Some(entries) = self.dictionary(dict) else {
                            tracing::debug!(column = %column.name, dict = %dict, "no dictionary data, skipping column");
                            return None;
                        };
                        dictionary_condition(column, entries, &filter)
                    }
                    _ => None,
                })
                .collect(),
        )
    }

    /// Builds the filter for a prefixed word on a single column.
    fn column_filter(&self, column: &ColumnDescriptor, text: &str, mode: MatchMode) -> FilterExpr {
        match &column.column_type {
            t if t.supports_word_filter() => build_column_filter(column, text, mode),
            ColumnType::Dict { dict } | ColumnType::DictList { dict } => {
                let entries = self.dictionary(dict).unwrap_or(&[]);
                build_dictionary_filter(column, text, entries, mode)
            }
            _ => build_scalar_filter(column, text),
        }
    }

    fn dictionary(&self, id: &str) -> Option<&'a [DictionaryEntry]> {
        self.dictionaries.and_then(|d| d.get(id))
    }
}

/// Compiles cross-column search text without dictionaries or prefixes.
///
/// # Errors
///
/// Returns a configuration error if `selection` names unknown columns.
pub fn build_global_filter(
    schema: &Schema,
    selection: &ColumnSelection,
    text: &str,
) -> FilterResult<FilterExpr> {
    Ok(GlobalFilterBuilder::new(schema, selection)?.build(text))
}
