//! Output formatting utilities for the ff CLI.
//!
//! - [`filters`] - Filter expression output (compile, reduce)
//! - [`matches`] - Local predicate output (match)

mod filters;
mod matches;

pub use filters::{format_filter_json, format_filter_text, PrefixUse};
pub use matches::{format_matches_json, format_matches_text};
