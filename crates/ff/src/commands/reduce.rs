//! Reduce command implementation.
//!
//! Reads a filter expression in wire format and prints its reduced form.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use fuzzy_filter_rs::{reduce, FilterExpr};

use super::config::{self, Config};
use super::{CommandContext, Result};
use crate::output::{format_filter_json, format_filter_text};

/// Options for the reduce command.
#[derive(Debug)]
pub struct ReduceOptions {
    /// Input file; stdin when absent.
    pub file: Option<PathBuf>,
}

/// Executes the reduce command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a filter expression.
pub fn execute(ctx: &CommandContext, opts: &ReduceOptions) -> Result<()> {
    let input = match &opts.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let config = config::load(ctx)?;
    let reduced = reduce_input(&config, &input)?;

    if ctx.json_output {
        println!("{}", format_filter_json(&reduced, true, &[])?);
    } else {
        print!(
            "{}",
            format_filter_text(&reduced, &[], ctx.use_colors, ctx.verbose)
        );
    }

    Ok(())
}

/// Parses and reduces a JSON filter expression.
pub fn reduce_input(config: &Config, input: &str) -> Result<FilterExpr> {
    let expr: FilterExpr = serde_json::from_str(input)?;
    let schema = config.schema();
    if schema.is_empty() {
        tracing::warn!("no columns configured, conditions are left as is");
    }
    Ok(reduce(&schema, &expr))
}
