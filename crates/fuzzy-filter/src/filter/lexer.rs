//! Word tokenizer for search text.
//!
//! Search text is split into whitespace-separated words. A word that starts
//! with a single quote (optionally behind a `*` wildcard) and closes it before
//! the next whitespace keeps its inner whitespace, e.g. `*'a b'*` is one word.
//! Quotes that never close are ordinary characters, so tokenizing never fails.
//!
//! In global search a word may also carry a column prefix, `name:value` or
//! `name=value`.

use std::sync::LazyLock;

use regex::Regex;

use super::word::MatchMode;

static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\p{L}\p{N}._]+)([:=])\S").expect("valid prefix regex"));

const QUOTE: char = '\'';

/// How a column prefix compares its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// `name:value` - the value keeps its wildcard semantics.
    Fuzzy,
    /// `name=value` - the value must match exactly.
    Exact,
}

impl PrefixOp {
    /// Returns the match mode the prefixed value is compiled with.
    pub fn mode(self) -> MatchMode {
        match self {
            PrefixOp::Fuzzy => MatchMode::Fuzzy,
            PrefixOp::Exact => MatchMode::Exact,
        }
    }
}

/// A `name:` or `name=` marker in front of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPrefix {
    /// The prefix text as typed.
    pub name: String,
    /// The separator that followed it.
    pub op: PrefixOp,
}

/// A word of search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// The word as typed, including any column prefix.
    pub raw: String,
    /// The column prefix, if one was recognized.
    pub prefix: Option<ColumnPrefix>,
    /// The word text following the prefix (equal to `raw` without one).
    pub value: String,
}

/// Tokenizer splitting search text into [`Word`]s.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    position: usize,
    recognize_prefixes: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer that treats every word as plain text.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            recognize_prefixes: false,
        }
    }

    /// Creates a lexer that also recognizes `name:` / `name=` column prefixes.
    pub fn with_prefixes(input: &'a str) -> Self {
        Self {
            recognize_prefixes: true,
            ..Self::new(input)
        }
    }

    /// Returns the unconsumed input.
    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.position += rest.len() - rest.trim_start().len();
    }

    /// Consumes a column prefix and its separator, if present.
    fn read_prefix(&mut self) -> Option<ColumnPrefix> {
        let caps = PREFIX_RE.captures(self.rest())?;
        let name = caps.get(1)?.as_str().to_string();
        let op = match caps.get(2)?.as_str() {
            "=" => PrefixOp::Exact,
            _ => PrefixOp::Fuzzy,
        };
        self.position += name.len() + 1;
        Some(ColumnPrefix { name, op })
    }

    /// Length of a quoted run at the start of `rest`: an optional `*`, a
    /// closed single-quoted string, an optional `*`, then whitespace or end.
    fn quoted_len(rest: &str) -> Option<usize> {
        let body = rest.strip_prefix('*').unwrap_or(rest);
        let lead = rest.len() - body.len();
        let inner = body.strip_prefix(QUOTE)?;
        let close = inner.find(QUOTE)?;

        let mut end = lead + 1 + close + 1;
        if rest[end..].starts_with('*') {
            end += 1;
        }
        match rest[end..].chars().next() {
            None => Some(end),
            Some(c) if c.is_whitespace() => Some(end),
            Some(_) => None,
        }
    }

    /// Length of the non-whitespace run at the start of `rest`.
    fn plain_len(rest: &str) -> usize {
        rest.find(char::is_whitespace).unwrap_or(rest.len())
    }

    /// Returns the next word, or None if at end of input.
    pub fn next_word(&mut self) -> Option<Word> {
        self.skip_whitespace();
        if self.rest().is_empty() {
            return None;
        }

        let start = self.position;
        let prefix = if self.recognize_prefixes {
            self.read_prefix()
        } else {
            None
        };

        let value_start = self.position;
        let rest = self.rest();
        self.position += Self::quoted_len(rest).unwrap_or_else(|| Self::plain_len(rest));

        Some(Word {
            raw: self.input[start..self.position].to_string(),
            prefix,
            value: self.input[value_start..self.position].to_string(),
        })
    }

    /// Collects all words.
    pub fn tokenize(mut self) -> Vec<Word> {
        let mut words = Vec::new();
        while let Some(word) = self.next_word() {
            words.push(word);
        }
        words
    }
}
