//! Tri-state filter expression tree.
//!
//! A [`FilterExpr`] is either a constant ([`Const::Always`] / [`Const::Never`]),
//! a boolean combination of sub-expressions, or a condition on a single column.
//! Constants are first-class values so every consumer has to handle them when
//! matching.
//!
//! # Wire Format
//!
//! Expressions serialize to the JSON accepted by the query endpoint:
//!
//! ```text
//! "always"
//! {"op": "and", "val": [...], "not": true}
//! {"col": "title", "op": "contains", "val": "abc"}
//! {"col": "title", "op": "is_null", "not": true}
//! ```
//!
//! `not` is omitted when false and `val` when the operator takes no value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A boolean constant of the filter algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Const {
    /// Matches every row.
    Always,
    /// Matches no row.
    Never,
}

impl Const {
    /// Returns the logical negation of the constant.
    pub fn invert(self) -> Self {
        match self {
            Const::Always => Const::Never,
            Const::Never => Const::Always,
        }
    }
}

/// Boolean operator of a [`BoolOp`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOperator {
    And,
    Or,
}

impl BoolOperator {
    /// The constant that can be dropped from this operator's children.
    pub fn identity(self) -> Const {
        match self {
            BoolOperator::And => Const::Always,
            BoolOperator::Or => Const::Never,
        }
    }

    /// The constant that decides the whole node on its own.
    pub fn absorbing(self) -> Const {
        self.identity().invert()
    }
}

/// Comparison operator of a [`ColumnCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    /// Case- and collation-sensitive equality.
    #[serde(rename = "==")]
    BinaryEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    StartsWith,
    EndsWith,
    Contains,
    /// SQL LIKE pattern.
    Like,
    Regexp,
    IsNull,
    /// Scalar value is one of the listed values.
    In,
    /// List column contains the value.
    Has,
    /// List column contains at least one of the listed values.
    HasAny,
    /// Every element of the list column is one of the listed values.
    /// An empty list counts as null.
    HasOnly,
}

impl Operator {
    /// Returns the wire name of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::BinaryEq => "==",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::Contains => "contains",
            Operator::Like => "like",
            Operator::Regexp => "regexp",
            Operator::IsNull => "is_null",
            Operator::In => "in",
            Operator::Has => "has",
            Operator::HasAny => "has_any",
            Operator::HasOnly => "has_only",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-specific value payload of a [`ColumnCondition`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    List(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::List(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        FilterValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{b}"),
            FilterValue::Integer(i) => write!(f, "{i}"),
            FilterValue::Text(s) => write!(f, "{s:?}"),
            FilterValue::List(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v:?}")?;
                }
                f.write_str("]")
            }
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// An AND/OR combination of sub-expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoolOp {
    pub op: BoolOperator,
    pub val: Vec<FilterExpr>,
    /// Logical NOT applied to the whole node.
    #[serde(default, skip_serializing_if = "is_false")]
    pub not: bool,
}

/// A condition on a single column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnCondition {
    pub col: String,
    pub op: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val: Option<FilterValue>,
    /// Logical NOT applied to the condition.
    #[serde(default, skip_serializing_if = "is_false")]
    pub not: bool,
}

impl ColumnCondition {
    /// Creates a non-inverted condition.
    pub fn new(col: impl Into<String>, op: Operator, val: Option<FilterValue>) -> Self {
        Self {
            col: col.into(),
            op,
            val,
            not: false,
        }
    }
}

/// A filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterExpr {
    Const(Const),
    Bool(BoolOp),
    Column(ColumnCondition),
}

impl FilterExpr {
    /// The expression matching every row.
    pub const ALWAYS: FilterExpr = FilterExpr::Const(Const::Always);

    /// The expression matching no row.
    pub const NEVER: FilterExpr = FilterExpr::Const(Const::Never);

    /// Creates an AND node over the given expressions.
    ///
    /// # Example
    ///
    /// ```
    /// use fuzzy_filter_rs::{FilterExpr, Operator};
    ///
    /// let filter = FilterExpr::and(vec![
    ///     FilterExpr::condition("title", Operator::Contains, "abc"),
    ///     FilterExpr::not_null("owner"),
    /// ]);
    /// assert!(matches!(filter, FilterExpr::Bool(_)));
    /// ```
    pub fn and(val: Vec<FilterExpr>) -> Self {
        FilterExpr::Bool(BoolOp {
            op: BoolOperator::And,
            val,
            not: false,
        })
    }

    /// Creates an OR node over the given expressions.
    pub fn or(val: Vec<FilterExpr>) -> Self {
        FilterExpr::Bool(BoolOp {
            op: BoolOperator::Or,
            val,
            not: false,
        })
    }

    /// Creates a column condition with a value.
    pub fn condition(col: impl Into<String>, op: Operator, val: impl Into<FilterValue>) -> Self {
        FilterExpr::Column(ColumnCondition::new(col, op, Some(val.into())))
    }

    /// Creates an "is null" condition.
    pub fn is_null(col: impl Into<String>) -> Self {
        FilterExpr::Column(ColumnCondition::new(col, Operator::IsNull, None))
    }

    /// Creates an "is not null" condition.
    pub fn not_null(col: impl Into<String>) -> Self {
        Self::is_null(col).negate()
    }

    /// Returns the logical negation of the expression.
    ///
    /// Constants swap; any other node toggles its own `not` flag. AND and OR
    /// are never rewritten into each other.
    ///
    /// # Example
    ///
    /// ```
    /// use fuzzy_filter_rs::FilterExpr;
    ///
    /// assert_eq!(FilterExpr::ALWAYS.negate(), FilterExpr::NEVER);
    /// assert_eq!(FilterExpr::is_null("c").negate().negate(), FilterExpr::is_null("c"));
    /// ```
    pub fn negate(self) -> Self {
        match self {
            FilterExpr::Const(c) => FilterExpr::Const(c.invert()),
            FilterExpr::Bool(mut node) => {
                node.not = !node.not;
                FilterExpr::Bool(node)
            }
            FilterExpr::Column(mut cond) => {
                cond.not = !cond.not;
                FilterExpr::Column(cond)
            }
        }
    }

    /// Negates the expression when `invert` is set.
    pub fn negate_if(self, invert: bool) -> Self {
        if invert {
            self.negate()
        } else {
            self
        }
    }

    /// Returns the constant if this expression is one.
    pub fn as_const(&self) -> Option<Const> {
        match self {
            FilterExpr::Const(c) => Some(*c),
            _ => None,
        }
    }
}

impl From<Const> for FilterExpr {
    fn from(c: Const) -> Self {
        FilterExpr::Const(c)
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Const(Const::Always) => f.write_str("always"),
            FilterExpr::Const(Const::Never) => f.write_str("never"),
            FilterExpr::Bool(node) => {
                if node.not {
                    f.write_str("NOT ")?;
                }
                let sep = match node.op {
                    BoolOperator::And => " AND ",
                    BoolOperator::Or => " OR ",
                };
                f.write_str("(")?;
                for (i, child) in node.val.iter().enumerate() {
                    if i > 0 {
                        f.write_str(sep)?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
            FilterExpr::Column(cond) if cond.op == Operator::IsNull => {
                if cond.not {
                    write!(f, "{} is not null", cond.col)
                } else {
                    write!(f, "{} is null", cond.col)
                }
            }
            FilterExpr::Column(cond) => {
                if cond.not {
                    f.write_str("NOT ")?;
                }
                write!(f, "{} {}", cond.col, cond.op)?;
                if let Some(val) = &cond.val {
                    write!(f, " {val}")?;
                }
                Ok(())
            }
        }
    }
}
