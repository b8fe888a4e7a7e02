//! Match command implementation.
//!
//! Applies search text to candidate values in memory, the same way a
//! dictionary's labels are narrowed before a query is built.

use fuzzy_filter_rs::filter::{build_local_predicate, MatchMode};

use super::{CommandContext, Result};
use crate::output::{format_matches_json, format_matches_text};

/// Options for the match command.
#[derive(Debug)]
pub struct MatchOptions {
    /// Search text.
    pub text: String,
    /// Candidate values.
    pub values: Vec<String>,
    /// Exact matching.
    pub exact: bool,
}

/// Executes the match command.
pub fn execute(ctx: &CommandContext, opts: &MatchOptions) -> Result<()> {
    let (matched, rejected) = partition(opts);

    if ctx.json_output {
        println!("{}", format_matches_json(&matched, &rejected)?);
    } else {
        print!(
            "{}",
            format_matches_text(&matched, &rejected, ctx.use_colors, ctx.verbose)
        );
    }

    Ok(())
}

/// Splits the candidate values into accepted and rejected, keeping order.
pub fn partition(opts: &MatchOptions) -> (Vec<&str>, Vec<&str>) {
    let mode = if opts.exact {
        MatchMode::Exact
    } else {
        MatchMode::Fuzzy
    };
    let predicate = build_local_predicate(&opts.text, mode);

    opts.values
        .iter()
        .map(String::as_str)
        .partition(|value| predicate.matches(value))
}
