//! Config command implementation.
//!
//! The config file describes the query target: its columns, which of them a
//! global search covers, the column prefixes users may type, and the
//! dictionaries behind enumeration columns.
//! Config file is located at ~/.config/ff/config.toml.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use fuzzy_filter_rs::filter::{ColumnSelection, Dictionaries};
use fuzzy_filter_rs::{ColumnDescriptor, Schema};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Columns of the query target, in search order.
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,

    /// Global search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// User-typed prefix to column name.
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,

    /// Dictionary entries keyed by dictionary id.
    #[serde(default)]
    pub dictionaries: Dictionaries,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            columns: Vec::new(),
            search: SearchConfig::default(),
            prefixes: BTreeMap::new(),
            dictionaries: Dictionaries::new(),
        }
    }
}

impl Config {
    /// Returns the configured columns as a schema.
    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.clone())
    }

    /// Returns the columns a global search covers.
    pub fn selection(&self) -> Result<ColumnSelection> {
        Ok(ColumnSelection::from_lists(
            self.search.columns.clone(),
            self.search.skip_columns.clone(),
        )?)
    }
}

/// Global search configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search only these columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    /// Search every column except these.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_columns: Option<Vec<String>>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/ff/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("ff"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("ff"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path, preferring an explicit override.
pub fn get_config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
///
/// A missing file yields the default (empty) configuration.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    let config = migrate_config(config)?;
    validate_config(&config)?;
    Ok(config)
}

/// Loads the configuration selected by the command context.
pub fn load(ctx: &CommandContext) -> Result<Config> {
    let path = get_config_path(ctx.config_path.as_deref())?;
    load_config(&path)
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial version; later migrations go here in order.
    if config.version > CONFIG_VERSION {
        tracing::warn!(
            version = config.version,
            supported = CONFIG_VERSION,
            "config file is newer than this ff, reading it as version {}",
            CONFIG_VERSION
        );
    }

    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Rejects duplicate column names; warns about dictionary columns without data.
fn validate_config(config: &Config) -> Result<()> {
    let mut seen = BTreeSet::new();
    for column in &config.columns {
        if !seen.insert(column.name.as_str()) {
            return Err(CommandError::Config(format!(
                "Duplicate column '{}'",
                column.name
            )));
        }
        if let Some(dict) = column.column_type.dictionary() {
            if config.dictionaries.get(dict).is_none() {
                tracing::warn!(column = %column.name, dict, "dictionary not defined in config");
            }
        }
    }
    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;
    let config = load_config(&path)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    let header = "Configuration";
    if ctx.use_colors {
        println!("{}\n", header.green().bold());
    } else {
        println!("{}\n", header);
    }

    println!("File: {}", path.display());
    println!("Exists: {}\n", path.exists());

    if !path.exists() {
        println!("(No config file exists. Create one at the path above.)");
        return Ok(());
    }

    println!("[columns]");
    let width = config.columns.iter().map(|c| c.name.len()).max().unwrap_or(0);
    for column in &config.columns {
        let kind = match column.column_type.dictionary() {
            Some(dict) => format!("{}({})", column.column_type.name(), dict),
            None => column.column_type.name().to_string(),
        };
        let nullable = if column.nullable { " nullable" } else { "" };
        println!("  {:width$}  {}{}", column.name, kind, nullable);
    }

    println!("\n[search]");
    match (&config.search.columns, &config.search.skip_columns) {
        (Some(columns), _) => println!("  columns: {}", columns.join(", ")),
        (None, Some(skip)) => println!("  skip_columns: {}", skip.join(", ")),
        (None, None) => println!("  columns: (all)"),
    }

    if !config.prefixes.is_empty() {
        println!("\n[prefixes]");
        for (prefix, column) in &config.prefixes {
            println!("  {} -> {}", prefix, column);
        }
    }

    let dictionary_ids: BTreeSet<&str> = config
        .columns
        .iter()
        .filter_map(|c| c.column_type.dictionary())
        .collect();
    if !dictionary_ids.is_empty() {
        println!("\n[dictionaries]");
        for id in dictionary_ids {
            match config.dictionaries.get(id) {
                Some(entries) => println!("  {}: {} entries", id, entries.len()),
                None => println!("  {}: (missing)", id),
            }
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}
