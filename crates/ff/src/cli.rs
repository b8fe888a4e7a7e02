//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the ff CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// ff - Compile fuzzy search text into filter expressions
#[derive(Parser, Debug)]
#[command(name = "ff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file path (default: ~/.config/ff/config.toml)
    #[arg(long, global = true, env = "FF_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile search text into a filter expression
    #[command(alias = "c")]
    Compile {
        /// Search text (e.g., "title:abc* 'a b'")
        text: String,

        /// Compile for a single column instead of global search
        #[arg(short, long)]
        column: Option<String>,

        /// Match words exactly (`*` is ordinary text)
        #[arg(short, long, requires = "column")]
        exact: bool,

        /// Print the expression before reduction
        #[arg(long)]
        raw: bool,
    },

    /// Reduce a JSON filter expression against the configured schema
    #[command(alias = "r")]
    Reduce {
        /// Read the expression from a file (default: stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print the values accepted by search text
    #[command(alias = "m")]
    Match {
        /// Search text
        text: String,

        /// Candidate values
        #[arg(required = true)]
        values: Vec<String>,

        /// Match words exactly (`*` is ordinary text)
        #[arg(short, long)]
        exact: bool,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,
}

/// Shells supported for completion generation
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
