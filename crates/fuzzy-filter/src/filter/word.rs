//! Single-word filter semantics.
//!
//! A word compiles to a [`WordFilter`]: an operator and the text to compare.
//! In fuzzy mode a leading and/or trailing `*` selects the operator; in exact
//! mode the word is compared for equality as typed.

use crate::expr::{FilterExpr, Operator};
use crate::schema::ColumnDescriptor;

use super::lexer::Lexer;

/// The wildcard marker.
pub const WILDCARD: char = '*';

const QUOTE: char = '\'';

/// Whole-filter code meaning "column is not empty".
pub const NOT_EMPTY_CODE: &str = "*";

/// Whole-filter code meaning "column is empty".
pub const EMPTY_CODE: &str = "''";

/// How a word is compared against column values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Wildcard markers select contains / starts-with / ends-with.
    #[default]
    Fuzzy,
    /// The word must equal the value; `*` is ordinary text.
    Exact,
}

/// The comparison a word performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOp {
    Contains,
    StartsWith,
    EndsWith,
    Equals,
}

impl WordOp {
    /// Returns the column operator this comparison compiles to.
    pub fn operator(self) -> Operator {
        match self {
            WordOp::Contains => Operator::Contains,
            WordOp::StartsWith => Operator::StartsWith,
            WordOp::EndsWith => Operator::EndsWith,
            WordOp::Equals => Operator::Eq,
        }
    }
}

/// The compiled meaning of one word of search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFilter {
    pub op: WordOp,
    pub value: String,
}

impl WordFilter {
    /// Creates a word filter.
    pub fn new(op: WordOp, value: impl Into<String>) -> Self {
        Self {
            op,
            value: value.into(),
        }
    }

    /// Returns the condition applying this word to `column`.
    ///
    /// List columns take equality as element membership (`has`).
    pub fn to_condition(&self, column: &ColumnDescriptor) -> FilterExpr {
        let op = match self.op {
            WordOp::Equals if column.column_type.is_list() => Operator::Has,
            op => op.operator(),
        };
        FilterExpr::condition(&column.name, op, self.value.as_str())
    }

    /// Tests a string value in memory (case-insensitive).
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        let value = self.value.to_lowercase();
        match self.op {
            WordOp::Contains => candidate.contains(&value),
            WordOp::StartsWith => candidate.starts_with(&value),
            WordOp::EndsWith => candidate.ends_with(&value),
            WordOp::Equals => candidate == value,
        }
    }
}

/// A search text that is one of the two reserved whole-filter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedCode {
    /// `*` - the column holds a value.
    NotEmpty,
    /// `''` - the column holds nothing.
    Empty,
}

impl ReservedCode {
    /// Recognizes a reserved code in untrimmed search text.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            NOT_EMPTY_CODE => Some(ReservedCode::NotEmpty),
            EMPTY_CODE => Some(ReservedCode::Empty),
            _ => None,
        }
    }

    /// Returns the null check this code compiles to on `column`.
    pub fn to_condition(self, column: &str) -> FilterExpr {
        match self {
            ReservedCode::NotEmpty => FilterExpr::not_null(column),
            ReservedCode::Empty => FilterExpr::is_null(column),
        }
    }

    /// Tests a string value in memory.
    pub fn matches(self, candidate: &str) -> bool {
        match self {
            ReservedCode::NotEmpty => !candidate.is_empty(),
            ReservedCode::Empty => candidate.is_empty(),
        }
    }
}

/// Strips one pair of enclosing single quotes from text longer than two chars.
pub(crate) fn strip_quotes(text: &str) -> &str {
    if text.chars().count() > 2 && text.starts_with(QUOTE) && text.ends_with(QUOTE) {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Compiles one word into a [`WordFilter`].
///
/// # Example
///
/// ```
/// use fuzzy_filter_rs::filter::{fuzzy_word_filter, MatchMode, WordOp};
///
/// let filter = fuzzy_word_filter("abc*", MatchMode::Fuzzy);
/// assert_eq!(filter.op, WordOp::StartsWith);
/// assert_eq!(filter.value, "abc");
///
/// let filter = fuzzy_word_filter("abc*", MatchMode::Exact);
/// assert_eq!(filter.op, WordOp::Equals);
/// assert_eq!(filter.value, "abc*");
/// ```
pub fn fuzzy_word_filter(word: &str, mode: MatchMode) -> WordFilter {
    if mode == MatchMode::Exact {
        return WordFilter::new(WordOp::Equals, strip_quotes(word));
    }

    // A bare `*` or `**` is text, not a pattern.
    if word == "*" || word == "**" {
        return WordFilter::new(WordOp::Contains, word);
    }

    let leading = word.starts_with(WILDCARD);
    let after_leading = word.strip_prefix(WILDCARD).unwrap_or(word);
    let trailing = after_leading.ends_with(WILDCARD);
    let text = after_leading.strip_suffix(WILDCARD).unwrap_or(after_leading);

    let op = match (leading, trailing) {
        (true, false) => WordOp::EndsWith,
        (false, true) => WordOp::StartsWith,
        _ => WordOp::Contains,
    };
    WordFilter::new(op, strip_quotes(text))
}

/// An in-memory predicate over string values built from search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalPredicate {
    /// The text held no words.
    AcceptAll,
    /// The text was a reserved whole-filter code.
    Reserved(ReservedCode),
    /// Every word must match.
    Words(Vec<WordFilter>),
}

impl LocalPredicate {
    /// Tests a string value.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            LocalPredicate::AcceptAll => true,
            LocalPredicate::Reserved(code) => code.matches(candidate),
            LocalPredicate::Words(words) => words.iter().all(|w| w.matches(candidate)),
        }
    }
}

/// Builds an in-memory predicate with the same word semantics as the column
/// filters, e.g. for narrowing dictionary labels locally.
///
/// # Example
///
/// ```
/// use fuzzy_filter_rs::filter::{build_local_predicate, MatchMode};
///
/// let predicate = build_local_predicate("in* 'pro'", MatchMode::Fuzzy);
/// assert!(predicate.matches("In progress"));
/// assert!(!predicate.matches("Done"));
/// assert!(build_local_predicate("  ", MatchMode::Fuzzy).matches("anything"));
/// ```
pub fn build_local_predicate(text: &str, mode: MatchMode) -> LocalPredicate {
    if let Some(code) = ReservedCode::parse(text) {
        return LocalPredicate::Reserved(code);
    }

    let words: Vec<WordFilter> = Lexer::new(text)
        .tokenize()
        .iter()
        .map(|w| fuzzy_word_filter(&w.value, mode))
        .collect();
    if words.is_empty() {
        LocalPredicate::AcceptAll
    } else {
        LocalPredicate::Words(words)
    }
}
