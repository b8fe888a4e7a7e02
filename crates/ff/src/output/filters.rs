//! Filter expression output formatting.

use fuzzy_filter_rs::{Const, FilterExpr};
use owo_colors::OwoColorize;
use serde::Serialize;

/// A column prefix recognized while compiling search text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixUse {
    pub prefix: String,
    pub column: String,
}

/// JSON output structure for compile and reduce commands.
#[derive(Serialize)]
struct FilterOutput<'a> {
    filter: &'a FilterExpr,
    reduced: bool,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    prefixes: &'a [PrefixUse],
}

/// Formats a filter expression as JSON.
pub fn format_filter_json(
    filter: &FilterExpr,
    reduced: bool,
    prefixes: &[PrefixUse],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&FilterOutput {
        filter,
        reduced,
        prefixes,
    })
}

/// Formats a filter expression as one line of text.
///
/// With `verbose`, recognized prefixes are listed after the expression.
pub fn format_filter_text(
    filter: &FilterExpr,
    prefixes: &[PrefixUse],
    use_colors: bool,
    verbose: bool,
) -> String {
    let line = match (filter.as_const(), use_colors) {
        (Some(Const::Always), true) => filter.green().bold().to_string(),
        (Some(Const::Never), true) => filter.red().bold().to_string(),
        _ => filter.to_string(),
    };

    let mut output = format!("{line}\n");
    if verbose {
        for used in prefixes {
            let note = format!("prefix {}: -> {}", used.prefix, used.column);
            if use_colors {
                output.push_str(&format!("{}\n", note.dimmed()));
            } else {
                output.push_str(&note);
                output.push('\n');
            }
        }
    }
    output
}
