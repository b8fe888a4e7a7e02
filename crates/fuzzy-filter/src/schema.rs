//! Column metadata for a query target.
//!
//! The schema is supplied once per query target and is read-only to the
//! builders and the reducer. Columns deserialize from TOML or JSON:
//!
//! ```toml
//! [[columns]]
//! name = "status"
//! type = "dict"
//! dict = "statuses"
//! nullable = true
//! ```

use serde::{Deserialize, Serialize};

use crate::expr::Operator;

/// The declared type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnType {
    Boolean,
    Date,
    Datetime,
    Integer,
    String,
    Text,
    StringList,
    Uuid,
    UuidList,
    /// Enumeration column holding one identifier from a dictionary.
    Dict {
        /// Dictionary id the values are drawn from.
        dict: String,
    },
    /// Enumeration column holding a list of identifiers from a dictionary.
    DictList {
        /// Dictionary id the values are drawn from.
        dict: String,
    },
}

impl ColumnType {
    /// Returns the type tag as written in schema files.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Datetime => "datetime",
            ColumnType::Integer => "integer",
            ColumnType::String => "string",
            ColumnType::Text => "text",
            ColumnType::StringList => "string_list",
            ColumnType::Uuid => "uuid",
            ColumnType::UuidList => "uuid_list",
            ColumnType::Dict { .. } => "dict",
            ColumnType::DictList { .. } => "dict_list",
        }
    }

    /// Returns true if free-text word filters apply to this column directly.
    pub fn supports_word_filter(&self) -> bool {
        matches!(
            self,
            ColumnType::String | ColumnType::Text | ColumnType::StringList
        )
    }

    /// Returns the dictionary id for enumeration columns.
    pub fn dictionary(&self) -> Option<&str> {
        match self {
            ColumnType::Dict { dict } | ColumnType::DictList { dict } => Some(dict),
            _ => None,
        }
    }

    /// Returns true if the column holds a list of values.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ColumnType::StringList | ColumnType::UuidList | ColumnType::DictList { .. }
        )
    }

    /// Returns true if the query endpoint accepts `op` on this column type.
    ///
    /// `is_null` is accepted by every type; whether it is meaningful depends on
    /// the column's nullability, see [`ColumnDescriptor::supports`].
    pub fn supports(&self, op: Operator) -> bool {
        use Operator::*;

        if op == IsNull {
            return true;
        }
        match self {
            ColumnType::String | ColumnType::Text => matches!(
                op,
                Eq | BinaryEq
                    | Lt
                    | Le
                    | Gt
                    | Ge
                    | StartsWith
                    | EndsWith
                    | Contains
                    | Like
                    | Regexp
                    | In
            ),
            ColumnType::Integer => matches!(op, Eq | Lt | Le | Gt | Ge | Contains | Like | In),
            ColumnType::Date | ColumnType::Datetime => {
                matches!(op, Eq | Lt | Le | Gt | Ge | In)
            }
            ColumnType::Boolean => op == Eq,
            ColumnType::Uuid | ColumnType::Dict { .. } => matches!(op, Eq | In),
            ColumnType::StringList => {
                matches!(op, Has | HasAny | HasOnly | StartsWith | EndsWith | Contains)
            }
            ColumnType::UuidList | ColumnType::DictList { .. } => {
                matches!(op, Has | HasAny | HasOnly)
            }
        }
    }
}

/// A single column of a query target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, unique within a schema.
    pub name: String,

    /// Declared column type.
    #[serde(flatten)]
    pub column_type: ColumnType,

    /// Whether the column may hold null.
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// Creates a new column descriptor.
    pub fn new(name: impl Into<String>, column_type: ColumnType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable,
        }
    }

    /// Returns true if a condition with `op` is valid for this column.
    pub fn supports(&self, op: Operator) -> bool {
        if op == Operator::IsNull {
            return self.nullable;
        }
        self.column_type.supports(op)
    }
}

/// An ordered collection of column descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<ColumnDescriptor>,
}

impl Schema {
    /// Creates a schema from column descriptors.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// Finds a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns all columns in declaration order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns true if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<ColumnDescriptor> for Schema {
    fn from_iter<I: IntoIterator<Item = ColumnDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
