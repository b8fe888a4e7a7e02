//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::compile::CompileOptions;
use crate::commands::matching::MatchOptions;
use crate::commands::reduce::ReduceOptions;
use crate::commands::{self, CommandContext, CommandError, Result};

/// A parsed command with its handler options.
#[derive(Debug)]
pub enum Dispatch<'a> {
    Compile(CompileOptions),
    Reduce(ReduceOptions),
    Match(MatchOptions),
    Config(&'a Option<ConfigCommands>),
    Completions(Shell),
    Help,
}

impl<'a> Dispatch<'a> {
    /// Creates a dispatch from the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Self {
        match &cli.command {
            Some(Commands::Compile {
                text,
                column,
                exact,
                raw,
            }) => Self::Compile(CompileOptions {
                text: text.clone(),
                column: column.clone(),
                exact: *exact,
                raw: *raw,
            }),
            Some(Commands::Reduce { file }) => Self::Reduce(ReduceOptions { file: file.clone() }),
            Some(Commands::Match {
                text,
                values,
                exact,
            }) => Self::Match(MatchOptions {
                text: text.clone(),
                values: values.clone(),
                exact: *exact,
            }),
            Some(Commands::Config { command }) => Self::Config(command),
            Some(Commands::Completions { shell }) => Self::Completions(*shell),
            None => Self::Help,
        }
    }

    /// Runs the handler.
    pub fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Compile(opts) => commands::compile::execute(ctx, opts),
            Self::Reduce(opts) => commands::reduce::execute(ctx, opts),
            Self::Match(opts) => commands::matching::execute(ctx, opts),
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(*shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("ff - fuzzy filter compiler");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}
