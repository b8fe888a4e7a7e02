//! Schema-aware reduction of filter expressions.
//!
//! [`reduce`] rewrites an expression into a minimal equivalent that the query
//! endpoint accepts:
//!
//! - constants inside AND/OR nodes are absorbed or dropped
//! - nested nodes of the same operator are flattened
//! - empty nodes collapse to their identity constant, single-child nodes to
//!   the child
//! - negation is pushed onto constants (swap) or onto the node (toggle)
//! - column conditions are normalized using the column's nullability: an empty
//!   string stored in a column reads as null, and stored values are trimmed
//!
//! Reduction is pure and idempotent. `always` / `never` only appear as the
//! whole result.

use std::collections::BTreeSet;

use crate::expr::{BoolOp, BoolOperator, ColumnCondition, FilterExpr, FilterValue, Operator};
use crate::schema::Schema;

/// Reduces `expr` to its canonical, minimal form.
///
/// Conditions on columns missing from `schema` are left unchanged.
///
/// # Example
///
/// ```
/// use fuzzy_filter_rs::schema::{ColumnDescriptor, ColumnType, Schema};
/// use fuzzy_filter_rs::{reduce, FilterExpr, Operator};
///
/// let schema = Schema::new(vec![ColumnDescriptor::new("n", ColumnType::Text, true)]);
///
/// let expr = FilterExpr::and(vec![
///     FilterExpr::ALWAYS,
///     FilterExpr::condition("n", Operator::Eq, ""),
/// ]);
/// assert_eq!(reduce(&schema, &expr), FilterExpr::is_null("n"));
/// ```
pub fn reduce(schema: &Schema, expr: &FilterExpr) -> FilterExpr {
    let reduced = reduce_expr(schema, expr);
    tracing::trace!(%reduced, "filter reduced");
    reduced
}

fn reduce_expr(schema: &Schema, expr: &FilterExpr) -> FilterExpr {
    match expr {
        FilterExpr::Const(c) => FilterExpr::Const(*c),
        FilterExpr::Bool(node) => reduce_bool(schema, node.op, &node.val).negate_if(node.not),
        FilterExpr::Column(cond) => reduce_condition(schema, cond).negate_if(cond.not),
    }
}

/// Reduces the children of an AND/OR node, ignoring the node's own `not`.
fn reduce_bool(schema: &Schema, op: BoolOperator, children: &[FilterExpr]) -> FilterExpr {
    let absorbing = op.absorbing();
    let mut kept = Vec::with_capacity(children.len());

    for child in children {
        match reduce_expr(schema, child) {
            FilterExpr::Const(c) if c == absorbing => return FilterExpr::Const(c),
            // Identity constant
            FilterExpr::Const(_) => {}
            FilterExpr::Bool(inner) if inner.op == op && !inner.not => kept.extend(inner.val),
            other => kept.push(other),
        }
    }

    combine(op, kept)
}

/// Builds a node from already reduced, non-constant children.
fn combine(op: BoolOperator, mut children: Vec<FilterExpr>) -> FilterExpr {
    match children.len() {
        0 => FilterExpr::Const(op.identity()),
        1 => children.remove(0),
        _ => FilterExpr::Bool(BoolOp {
            op,
            val: children,
            not: false,
        }),
    }
}

/// Reduces a column condition, ignoring the condition's own `not`.
fn reduce_condition(schema: &Schema, cond: &ColumnCondition) -> FilterExpr {
    let Some(column) = schema.column(&cond.col) else {
        tracing::debug!(column = %cond.col, "column not in schema, condition left as is");
        return pass_through(cond);
    };
    let col = cond.col.as_str();
    let nullable = column.nullable;

    match (cond.op, &cond.val) {
        (Operator::IsNull, _) => null_check(col, nullable),
        (op, Some(FilterValue::Text(s))) if s.is_empty() => {
            reduce_empty_comparison(cond, op, nullable)
        }
        (Operator::Eq | Operator::BinaryEq | Operator::Has, Some(FilterValue::Text(s)))
            if s.trim() != s =>
        {
            FilterExpr::NEVER
        }
        (op @ (Operator::In | Operator::HasAny | Operator::HasOnly), Some(FilterValue::List(values))) => {
            reduce_membership(col, op, values, nullable)
        }
        _ => pass_through(cond),
    }
}

fn pass_through(cond: &ColumnCondition) -> FilterExpr {
    FilterExpr::Column(ColumnCondition {
        not: false,
        ..cond.clone()
    })
}

/// "is null", or `never` when the column cannot hold null.
fn null_check(col: &str, nullable: bool) -> FilterExpr {
    if nullable {
        FilterExpr::is_null(col)
    } else {
        FilterExpr::NEVER
    }
}

/// Comparisons against `""`, where an empty stored string reads as null.
fn reduce_empty_comparison(cond: &ColumnCondition, op: Operator, nullable: bool) -> FilterExpr {
    match op {
        Operator::Eq | Operator::BinaryEq | Operator::Le | Operator::StartsWith => {
            null_check(&cond.col, nullable)
        }
        Operator::Gt => null_check(&cond.col, nullable).negate(),
        Operator::Ge | Operator::Contains | Operator::EndsWith | Operator::Like | Operator::Regexp => {
            FilterExpr::ALWAYS
        }
        // List elements are never empty.
        Operator::Lt | Operator::Has => FilterExpr::NEVER,
        Operator::IsNull | Operator::In | Operator::HasAny | Operator::HasOnly => pass_through(cond),
    }
}

/// Membership lists: untrimmed and duplicate members are dropped. An empty
/// member of a scalar `in` list becomes an "is null" alternative.
fn reduce_membership(col: &str, op: Operator, values: &[String], nullable: bool) -> FilterExpr {
    let mut had_empty = false;
    let mut seen = BTreeSet::new();
    let mut members: Vec<String> = Vec::with_capacity(values.len());

    for value in values {
        if value.is_empty() {
            had_empty = true;
        } else if value.trim() == value && seen.insert(value.as_str()) {
            members.push(value.clone());
        }
    }

    match op {
        Operator::In => {
            let base = match members.len() {
                0 => FilterExpr::NEVER,
                1 => FilterExpr::condition(col, Operator::Eq, members.remove(0)),
                _ => FilterExpr::condition(col, Operator::In, members),
            };
            if had_empty && nullable {
                combine(
                    BoolOperator::Or,
                    [base, FilterExpr::is_null(col)]
                        .into_iter()
                        .filter(|e| *e != FilterExpr::NEVER)
                        .collect(),
                )
            } else {
                base
            }
        }
        Operator::HasAny => match members.len() {
            0 => FilterExpr::NEVER,
            1 => FilterExpr::condition(col, Operator::Has, members.remove(0)),
            _ => FilterExpr::condition(col, Operator::HasAny, members),
        },
        _ => {
            if members.is_empty() {
                null_check(col, nullable)
            } else {
                FilterExpr::condition(col, op, members)
            }
        }
    }
}
