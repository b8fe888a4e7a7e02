//! Local predicate output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output structure for the match command.
#[derive(Serialize)]
struct MatchOutput<'a> {
    matched: &'a [&'a str],
    rejected: &'a [&'a str],
}

/// Formats matched and rejected values as JSON.
pub fn format_matches_json(
    matched: &[&str],
    rejected: &[&str],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&MatchOutput { matched, rejected })
}

/// Formats matched values one per line.
///
/// With `verbose`, rejected values follow, marked with `-`.
pub fn format_matches_text(
    matched: &[&str],
    rejected: &[&str],
    use_colors: bool,
    verbose: bool,
) -> String {
    if matched.is_empty() && !verbose {
        return "No values matched.\n".to_string();
    }

    let mut output = String::new();
    for value in matched {
        output.push_str(value);
        output.push('\n');
    }
    if verbose {
        for value in rejected {
            let line = format!("- {value}");
            if use_colors {
                output.push_str(&format!("{}\n", line.dimmed()));
            } else {
                output.push_str(&line);
                output.push('\n');
            }
        }
    }
    output
}
