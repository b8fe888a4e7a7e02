//! Compile command implementation.
//!
//! Compiles search text with the configured schema, either as a global search
//! across the configured columns or for a single column's search box.

use std::cell::RefCell;

use fuzzy_filter_rs::filter::{
    build_column_filter, build_dictionary_filter, GlobalFilterBuilder, MatchMode,
};
use fuzzy_filter_rs::{reduce, FilterExpr, Schema};

use super::config::{self, Config};
use super::{CommandContext, CommandError, Result};
use crate::output::{format_filter_json, format_filter_text, PrefixUse};

/// Options for the compile command.
#[derive(Debug)]
pub struct CompileOptions {
    /// Search text.
    pub text: String,
    /// Compile for this column only.
    pub column: Option<String>,
    /// Exact matching (single column only).
    pub exact: bool,
    /// Skip reduction.
    pub raw: bool,
}

/// Result of compiling search text.
#[derive(Debug)]
pub struct CompileResult {
    /// The compiled (and unless raw, reduced) expression.
    pub filter: FilterExpr,
    /// Column prefixes recognized in the text, in order of use.
    pub prefixes: Vec<PrefixUse>,
}

/// Executes the compile command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or names unknown columns.
pub fn execute(ctx: &CommandContext, opts: &CompileOptions) -> Result<()> {
    let config = config::load(ctx)?;
    let result = compile(&config, opts)?;

    if ctx.json_output {
        println!(
            "{}",
            format_filter_json(&result.filter, !opts.raw, &result.prefixes)?
        );
    } else {
        print!(
            "{}",
            format_filter_text(&result.filter, &result.prefixes, ctx.use_colors, ctx.verbose)
        );
    }

    Ok(())
}

/// Compiles search text against a loaded config.
pub fn compile(config: &Config, opts: &CompileOptions) -> Result<CompileResult> {
    let schema = config.schema();
    if schema.is_empty() {
        tracing::warn!("no columns configured");
    }

    let mode = if opts.exact {
        MatchMode::Exact
    } else {
        MatchMode::Fuzzy
    };

    let (raw, prefixes) = match &opts.column {
        Some(name) => (compile_column(config, &schema, name, &opts.text, mode)?, Vec::new()),
        None => compile_global(config, &schema, &opts.text)?,
    };

    let filter = if opts.raw { raw } else { reduce(&schema, &raw) };
    Ok(CompileResult { filter, prefixes })
}

fn compile_column(
    config: &Config,
    schema: &Schema,
    name: &str,
    text: &str,
    mode: MatchMode,
) -> Result<FilterExpr> {
    let column = schema
        .column(name)
        .ok_or_else(|| CommandError::Usage(format!("unknown column '{}'", name)))?;

    if column.column_type.supports_word_filter() {
        return Ok(build_column_filter(column, text, mode));
    }

    match column.column_type.dictionary() {
        Some(dict) => {
            let entries = config.dictionaries.get(dict).unwrap_or(&[]);
            Ok(build_dictionary_filter(column, text, entries, mode))
        }
        None => Err(CommandError::Usage(format!(
            "column '{}' of type {} does not support search text",
            name,
            column.column_type.name()
        ))),
    }
}

fn compile_global(
    config: &Config,
    schema: &Schema,
    text: &str,
) -> Result<(FilterExpr, Vec<PrefixUse>)> {
    let selection = config.selection()?;
    let used = RefCell::new(Vec::new());

    let filter = {
        let builder = GlobalFilterBuilder::new(schema, &selection)?
            .with_dictionaries(&config.dictionaries)
            .with_prefixes(&config.prefixes)?
            .on_prefix(|prefix, column| {
                used.borrow_mut().push(PrefixUse {
                    prefix: prefix.to_string(),
                    column: column.to_string(),
                })
            });
        tracing::debug!(columns = ?builder.columns().collect::<Vec<_>>(), "global search columns");
        builder.build(text)
    };

    Ok((filter, used.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzzy_filter_rs::{FilterError, Operator};

    fn config() -> Config {
        toml::from_str(
            r#"
[[columns]]
name = "title"
type = "text"
nullable = true

[[columns]]
name = "body"
type = "text"
nullable = true

[[columns]]
name = "state"
type = "dict"
dict = "states"

[[columns]]
name = "size"
type = "integer"

[prefixes]
t = "title"
st = "state"

[[dictionaries.states]]
id = "1"
label = "Open"

[[dictionaries.states]]
id = "2"
label = "Closed"
"#,
        )
        .unwrap()
    }

    fn opts(text: &str) -> CompileOptions {
        CompileOptions {
            text: text.to_string(),
            column: None,
            exact: false,
            raw: false,
        }
    }

    #[test]
    fn test_compile_global() {
        let result = compile(&config(), &opts("clo*")).unwrap();
        assert_eq!(
            result.filter,
            FilterExpr::or(vec![
                FilterExpr::condition("title", Operator::StartsWith, "clo"),
                FilterExpr::condition("body", Operator::StartsWith, "clo"),
                FilterExpr::condition("state", Operator::Eq, "2"),
            ])
        );
        assert!(result.prefixes.is_empty());
    }

    #[test]
    fn test_compile_records_prefixes() {
        let result = compile(&config(), &opts("t:abc st=open")).unwrap();
        assert_eq!(
            result.filter,
            FilterExpr::and(vec![
                FilterExpr::condition("title", Operator::Contains, "abc"),
                FilterExpr::condition("state", Operator::Eq, "1"),
            ])
        );
        assert_eq!(
            result.prefixes,
            vec![
                PrefixUse {
                    prefix: "t".to_string(),
                    column: "title".to_string()
                },
                PrefixUse {
                    prefix: "st".to_string(),
                    column: "state".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_compile_raw_skips_reduction() {
        let options = CompileOptions {
            raw: true,
            ..opts("")
        };
        assert_eq!(
            compile(&config(), &options).unwrap().filter,
            FilterExpr::and(vec![])
        );
    }

    #[test]
    fn test_compile_single_column() {
        let options = CompileOptions {
            column: Some("title".to_string()),
            exact: true,
            ..opts("ab*")
        };
        assert_eq!(
            compile(&config(), &options).unwrap().filter,
            FilterExpr::condition("title", Operator::Eq, "ab*")
        );
    }

    #[test]
    fn test_compile_single_dictionary_column() {
        let options = CompileOptions {
            column: Some("state".to_string()),
            ..opts("''")
        };
        assert_eq!(
            compile(&config(), &options).unwrap().filter,
            FilterExpr::NEVER
        );
    }

    #[test]
    fn test_compile_column_errors() {
        let unknown = CompileOptions {
            column: Some("nope".to_string()),
            ..opts("x")
        };
        assert!(matches!(
            compile(&config(), &unknown),
            Err(CommandError::Usage(msg)) if msg.contains("unknown column 'nope'")
        ));

        let scalar = CompileOptions {
            column: Some("size".to_string()),
            ..opts("x")
        };
        assert!(matches!(
            compile(&config(), &scalar),
            Err(CommandError::Usage(msg)) if msg.contains("type integer")
        ));
    }

    #[test]
    fn test_compile_bad_prefix_target() {
        let mut config = config();
        config
            .prefixes
            .insert("x".to_string(), "missing".to_string());

        assert!(matches!(
            compile(&config, &opts("x")),
            Err(CommandError::Filter(FilterError::UnknownPrefixTarget { .. }))
        ));
    }
}
