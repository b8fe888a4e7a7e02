//! Fuzzy filter compiler for column-oriented query backends.
//!
//! This crate turns free-form search text into structured filter expressions
//! and normalizes expression trees into a minimal, canonical form before they
//! are sent to a remote query endpoint.
//!
//! - [`filter`] - word tokenizer, single-column and global filter builders,
//!   and the in-memory word predicate
//! - [`reducer`] - schema-aware reduction of filter expressions
//! - [`expr`] - the tri-state filter expression tree and its wire format
//! - [`schema`] - column descriptors consumed by the builders and the reducer
//!
//! # Example
//!
//! ```
//! use fuzzy_filter_rs::filter::{build_column_filter, MatchMode};
//! use fuzzy_filter_rs::schema::{ColumnDescriptor, ColumnType, Schema};
//! use fuzzy_filter_rs::{reduce, Const, FilterExpr};
//!
//! let schema = Schema::new(vec![ColumnDescriptor::new("title", ColumnType::Text, true)]);
//!
//! let title = schema.column("title").unwrap();
//!
//! let raw = build_column_filter(title, "", MatchMode::Fuzzy);
//! assert_eq!(reduce(&schema, &raw), FilterExpr::Const(Const::Always));
//!
//! let raw = build_column_filter(title, "abc*", MatchMode::Fuzzy);
//! assert_eq!(reduce(&schema, &raw).to_string(), r#"title starts_with "abc""#);
//! ```

pub mod error;
pub mod expr;
pub mod filter;
pub mod reducer;
pub mod schema;

pub use error::{FilterError, FilterResult};
pub use expr::{BoolOp, BoolOperator, ColumnCondition, Const, FilterExpr, FilterValue, Operator};
pub use reducer::reduce;
pub use schema::{ColumnDescriptor, ColumnType, Schema};
