//! Search text to filter expression compiler.
//!
//! # Supported Syntax
//!
//! ## Words
//! - `abc` - value contains `abc`
//! - `abc*` - value starts with `abc`
//! - `*abc` - value ends with `abc`
//! - `*abc*` - value contains `abc`
//! - `'a b'` - quoted words keep their whitespace (`*'a b'` etc. also work)
//!
//! Several words are ANDed together.
//!
//! ## Whole-Filter Codes
//! - `*` - column is not empty
//! - `''` - column is empty
//!
//! ## Column Prefixes (global search)
//! - `name:value` - match `value` on the column mapped to `name`
//! - `name=value` - same, but `value` must match exactly (`*` is literal)
//!
//! Unknown prefixes are searched as ordinary text.
//!
//! # Example
//!
//! ```
//! use fuzzy_filter_rs::filter::{build_column_filter, MatchMode};
//! use fuzzy_filter_rs::schema::{ColumnDescriptor, ColumnType, Schema};
//! use fuzzy_filter_rs::{reduce, FilterExpr, Operator};
//!
//! let schema = Schema::new(vec![ColumnDescriptor::new("col1", ColumnType::Text, true)]);
//!
//! let col1 = schema.column("col1").unwrap();
//! let filter = reduce(&schema, &build_column_filter(col1, "abc def", MatchMode::Fuzzy));
//! assert_eq!(
//!     filter,
//!     FilterExpr::and(vec![
//!         FilterExpr::condition("col1", Operator::Contains, "abc"),
//!         FilterExpr::condition("col1", Operator::Contains, "def"),
//!     ])
//! );
//! ```

mod builder;
mod dictionary;
mod lexer;
mod word;

pub use builder::{
    build_column_filter, build_dictionary_filter, build_global_filter, ColumnSelection,
    GlobalFilterBuilder, PrefixCallback,
};
pub use dictionary::{resolve, Dictionaries, DictionaryEntry, Resolution};
pub use lexer::{ColumnPrefix, Lexer, PrefixOp, Word};
pub use word::{
    build_local_predicate, fuzzy_word_filter, LocalPredicate, MatchMode, ReservedCode,
    WordFilter, WordOp, EMPTY_CODE, NOT_EMPTY_CODE, WILDCARD,
};

#[cfg(test)]
mod tests;
