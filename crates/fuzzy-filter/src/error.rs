//! Error types for filter construction.
//!
//! Free-form search text never produces an error: any text compiles to a
//! (possibly vacuous) filter. The variants here describe a caller or schema
//! mismatch detected while configuring a builder.

use thiserror::Error;

/// A specialized Result type for filter builder configuration.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while configuring a filter builder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A candidate column list names a column the schema does not have.
    #[error("unknown column in candidate list: {column}")]
    UnknownColumn {
        /// The column name absent from the schema.
        column: String,
    },

    /// A skip list names a column the schema does not have.
    #[error("unknown column in skip list: {column}")]
    UnknownSkipColumn {
        /// The column name absent from the schema.
        column: String,
    },

    /// A prefix maps to a column the schema does not have.
    #[error("prefix '{prefix}' targets unknown column: {column}")]
    UnknownPrefixTarget {
        /// The user-facing prefix.
        prefix: String,
        /// The column name absent from the schema.
        column: String,
    },

    /// Both an explicit column list and a skip list were supplied.
    #[error("an explicit column list and a skip list are mutually exclusive")]
    ConflictingColumnSelection,
}

impl FilterError {
    /// Creates an unknown candidate column error.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        FilterError::UnknownColumn {
            column: column.into(),
        }
    }

    /// Creates an unknown skip-list column error.
    pub fn unknown_skip_column(column: impl Into<String>) -> Self {
        FilterError::UnknownSkipColumn {
            column: column.into(),
        }
    }

    /// Creates an unknown prefix target error.
    pub fn unknown_prefix_target(prefix: impl Into<String>, column: impl Into<String>) -> Self {
        FilterError::UnknownPrefixTarget {
            prefix: prefix.into(),
            column: column.into(),
        }
    }
}
