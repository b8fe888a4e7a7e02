//! Tests for the filter builders.

use std::cell::RefCell;

use super::*;
use crate::error::FilterError;
use crate::expr::{FilterExpr, Operator};
use crate::reducer::reduce;
use crate::schema::{ColumnDescriptor, ColumnType, Schema};

// ==================== Test Helpers ====================

fn dict(id: &str) -> ColumnType {
    ColumnType::Dict {
        dict: id.to_string(),
    }
}

fn schema() -> Schema {
    Schema::new(vec![
        ColumnDescriptor::new("col1", ColumnType::Text, true),
        ColumnDescriptor::new("col2", ColumnType::Text, true),
        ColumnDescriptor::new("count", ColumnType::Integer, true),
        ColumnDescriptor::new("status", dict("statuses"), true),
        ColumnDescriptor::new(
            "tags",
            ColumnType::DictList {
                dict: "tags".to_string(),
            },
            true,
        ),
        ColumnDescriptor::new("done", ColumnType::Boolean, false),
    ])
}

fn dictionaries() -> Dictionaries {
    [
        (
            "statuses",
            vec![
                DictionaryEntry::new("1", "Open"),
                DictionaryEntry::new("2", "In progress"),
                DictionaryEntry::new("3", "Done"),
            ],
        ),
        (
            "tags",
            vec![
                DictionaryEntry::new("t1", "urgent"),
                DictionaryEntry::new("t2", "bug"),
                DictionaryEntry::new("t3", "feature"),
            ],
        ),
    ]
    .into_iter()
    .collect()
}

fn contains(col: &str, value: &str) -> FilterExpr {
    FilterExpr::condition(col, Operator::Contains, value)
}

fn col1() -> ColumnDescriptor {
    ColumnDescriptor::new("col1", ColumnType::Text, true)
}

fn column_filter(text: &str) -> FilterExpr {
    reduce(&schema(), &build_column_filter(&col1(), text, MatchMode::Fuzzy))
}

fn text_only_schema() -> Schema {
    Schema::new(vec![
        ColumnDescriptor::new("col1", ColumnType::Text, true),
        ColumnDescriptor::new("col2", ColumnType::Text, true),
    ])
}

// ==================== Single Column ====================

#[test]
fn test_column_filter_empty_is_always() {
    assert_eq!(column_filter(""), FilterExpr::ALWAYS);
    assert_eq!(column_filter("   "), FilterExpr::ALWAYS);
}

#[test]
fn test_column_filter_reserved_codes() {
    assert_eq!(column_filter("*"), FilterExpr::not_null("col1"));
    assert_eq!(column_filter(" * "), FilterExpr::not_null("col1"));
    assert_eq!(column_filter("''"), FilterExpr::is_null("col1"));
}

#[test]
fn test_column_filter_starts_with() {
    assert_eq!(
        column_filter("abc*"),
        FilterExpr::condition("col1", Operator::StartsWith, "abc")
    );
}

#[test]
fn test_column_filter_ends_with() {
    assert_eq!(
        column_filter("*abc"),
        FilterExpr::condition("col1", Operator::EndsWith, "abc")
    );
}

#[test]
fn test_column_filter_contains() {
    assert_eq!(column_filter("*abc*"), contains("col1", "abc"));
    assert_eq!(column_filter("abc"), contains("col1", "abc"));
}

#[test]
fn test_column_filter_quoted() {
    assert_eq!(column_filter("'a b'"), contains("col1", "a b"));
}

#[test]
fn test_column_filter_multiple_words() {
    assert_eq!(
        column_filter("abc def"),
        FilterExpr::and(vec![contains("col1", "abc"), contains("col1", "def")])
    );
}

#[test]
fn test_column_filter_reserved_code_inside_text_is_literal() {
    assert_eq!(
        column_filter("abc *"),
        FilterExpr::and(vec![contains("col1", "abc"), contains("col1", "*")])
    );
    assert_eq!(
        column_filter("abc ''"),
        FilterExpr::and(vec![contains("col1", "abc"), contains("col1", "''")])
    );
}

#[test]
fn test_column_filter_exact_mode() {
    assert_eq!(
        reduce(
            &schema(),
            &build_column_filter(&col1(), "ab* 'c d'", MatchMode::Exact)
        ),
        FilterExpr::and(vec![
            FilterExpr::condition("col1", Operator::Eq, "ab*"),
            FilterExpr::condition("col1", Operator::Eq, "c d"),
        ])
    );
}

#[test]
fn test_column_filter_raw_shape() {
    assert_eq!(
        build_column_filter(&col1(), "", MatchMode::Fuzzy),
        FilterExpr::and(vec![])
    );
}

// ==================== Dictionary Column ====================

#[test]
fn test_dictionary_filter_some_matches() {
    let schema = schema();
    let dicts = dictionaries();
    let column = schema.column("status").unwrap();
    let entries = dicts.get("statuses").unwrap();

    assert_eq!(
        reduce(
            &schema,
            &build_dictionary_filter(column, "o*", entries, MatchMode::Fuzzy)
        ),
        FilterExpr::condition("status", Operator::Eq, "1")
    );
    assert_eq!(
        reduce(
            &schema,
            &build_dictionary_filter(column, "*e", entries, MatchMode::Fuzzy)
        ),
        FilterExpr::condition("status", Operator::Eq, "3")
    );
    assert_eq!(
        reduce(
            &schema,
            &build_dictionary_filter(column, "n", entries, MatchMode::Fuzzy)
        ),
        FilterExpr::not_null("status")
    );
}

#[test]
fn test_dictionary_filter_no_match_is_never() {
    let schema = schema();
    let dicts = dictionaries();
    let column = schema.column("status").unwrap();
    let entries = dicts.get("statuses").unwrap();

    assert_eq!(
        reduce(
            &schema,
            &build_dictionary_filter(column, "open zzz", entries, MatchMode::Fuzzy)
        ),
        FilterExpr::NEVER
    );
}

#[test]
fn test_dictionary_filter_exact() {
    let schema = schema();
    let dicts = dictionaries();
    let column = schema.column("status").unwrap();
    let entries = dicts.get("statuses").unwrap();

    assert_eq!(
        reduce(
            &schema,
            &build_dictionary_filter(column, "'in progress'", entries, MatchMode::Exact)
        ),
        FilterExpr::condition("status", Operator::Eq, "2")
    );
    assert_eq!(
        reduce(
            &schema,
            &build_dictionary_filter(column, "in", entries, MatchMode::Exact)
        ),
        FilterExpr::NEVER
    );
}

#[test]
fn test_dictionary_filter_reserved_codes() {
    let schema = schema();
    let column = schema.column("status").unwrap();

    assert_eq!(
        build_dictionary_filter(column, "*", &[], MatchMode::Exact),
        FilterExpr::not_null("status")
    );
    assert_eq!(
        build_dictionary_filter(column, "''", &[], MatchMode::Fuzzy),
        FilterExpr::is_null("status")
    );
}

// ==================== Global ====================

#[test]
fn test_global_or_fanout() {
    let schema = text_only_schema();
    let filter = build_global_filter(&schema, &ColumnSelection::All, "abc").unwrap();

    assert_eq!(
        reduce(&schema, &filter),
        FilterExpr::or(vec![contains("col1", "abc"), contains("col2", "abc")])
    );
}

#[test]
fn test_global_multiple_words() {
    let schema = text_only_schema();
    let filter = build_global_filter(&schema, &ColumnSelection::All, "abc* def").unwrap();

    assert_eq!(
        reduce(&schema, &filter),
        FilterExpr::and(vec![
            FilterExpr::or(vec![
                FilterExpr::condition("col1", Operator::StartsWith, "abc"),
                FilterExpr::condition("col2", Operator::StartsWith, "abc"),
            ]),
            FilterExpr::or(vec![contains("col1", "def"), contains("col2", "def")]),
        ])
    );
}

#[test]
fn test_global_empty_text_is_always() {
    let schema = schema();
    let filter = build_global_filter(&schema, &ColumnSelection::All, "  ").unwrap();
    assert_eq!(reduce(&schema, &filter), FilterExpr::ALWAYS);
}

#[test]
fn test_global_bare_wildcard_is_literal() {
    let schema = text_only_schema();
    let filter = build_global_filter(&schema, &ColumnSelection::All, "*").unwrap();
    assert_eq!(
        reduce(&schema, &filter),
        FilterExpr::or(vec![contains("col1", "*"), contains("col2", "*")])
    );
}

#[test]
fn test_global_without_searchable_columns_is_never() {
    let schema = schema();
    let selection = ColumnSelection::Only(vec!["count".to_string(), "done".to_string()]);
    let filter = build_global_filter(&schema, &selection, "abc").unwrap();
    assert_eq!(reduce(&schema, &filter), FilterExpr::NEVER);
}

#[test]
fn test_global_skip_list() {
    let schema = schema();
    let selection = ColumnSelection::Except(vec!["col2".to_string()]);
    let builder = GlobalFilterBuilder::new(&schema, &selection).unwrap();

    assert_eq!(
        builder.columns().collect::<Vec<_>>(),
        vec!["col1", "count", "status", "tags", "done"]
    );
    assert_eq!(reduce(&schema, &builder.build("abc")), contains("col1", "abc"));
}

#[test]
fn test_global_explicit_list_keeps_order() {
    let schema = schema();
    let selection = ColumnSelection::Only(vec!["col2".to_string(), "col1".to_string()]);
    let filter = build_global_filter(&schema, &selection, "x").unwrap();

    assert_eq!(
        reduce(&schema, &filter),
        FilterExpr::or(vec![contains("col2", "x"), contains("col1", "x")])
    );
}

#[test]
fn test_global_dictionary_columns() {
    let schema = schema();
    let dicts = dictionaries();
    let builder = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
        .unwrap()
        .with_dictionaries(&dicts);

    assert_eq!(
        reduce(&schema, &builder.build("bug")),
        FilterExpr::or(vec![
            contains("col1", "bug"),
            contains("col2", "bug"),
            FilterExpr::condition("tags", Operator::Has, "t2"),
        ])
    );
    assert_eq!(
        reduce(&schema, &builder.build("*e")),
        FilterExpr::or(vec![
            FilterExpr::condition("col1", Operator::EndsWith, "e"),
            FilterExpr::condition("col2", Operator::EndsWith, "e"),
            FilterExpr::condition("status", Operator::Eq, "3"),
            FilterExpr::condition("tags", Operator::Has, "t3"),
        ])
    );
}

#[test]
fn test_global_dictionary_all_matching_is_not_null() {
    let schema = schema();
    let dicts = dictionaries();
    let selection = ColumnSelection::Only(vec!["tags".to_string()]);
    let builder = GlobalFilterBuilder::new(&schema, &selection)
        .unwrap()
        .with_dictionaries(&dicts);

    assert_eq!(
        reduce(&schema, &builder.build("*")),
        FilterExpr::NEVER,
        "a literal '*' matches no tag label"
    );
    assert_eq!(
        reduce(&schema, &builder.build("u")),
        FilterExpr::not_null("tags")
    );
}

#[test]
fn test_global_dictionary_without_data_is_skipped() {
    let schema = schema();
    let selection = ColumnSelection::Only(vec!["col1".to_string(), "status".to_string()]);
    let filter = build_global_filter(&schema, &selection, "open").unwrap();

    assert_eq!(reduce(&schema, &filter), contains("col1", "open"));
}

// ==================== Column Prefixes ====================

#[test]
fn test_prefix_restricts_to_column() {
    let schema = text_only_schema();
    let builder = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
        .unwrap()
        .with_prefixes([("c1", "col1")])
        .unwrap();

    assert_eq!(
        reduce(&schema, &builder.build("c1:abc* def")),
        FilterExpr::and(vec![
            FilterExpr::condition("col1", Operator::StartsWith, "abc"),
            FilterExpr::or(vec![contains("col1", "def"), contains("col2", "def")]),
        ])
    );
}

#[test]
fn test_prefix_exact_mode() {
    let schema = text_only_schema();
    let builder = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
        .unwrap()
        .with_prefixes([("c1", "col1")])
        .unwrap();

    assert_eq!(
        reduce(&schema, &builder.build("c1=ab*")),
        FilterExpr::condition("col1", Operator::Eq, "ab*")
    );
    assert_eq!(
        reduce(&schema, &builder.build("c1='a b'")),
        FilterExpr::condition("col1", Operator::Eq, "a b")
    );
}

#[test]
fn test_prefix_reserved_codes() {
    let schema = text_only_schema();
    let builder = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
        .unwrap()
        .with_prefixes([("c1", "col1"), ("c2", "col2")])
        .unwrap();

    assert_eq!(
        reduce(&schema, &builder.build("c1:* c2=''")),
        FilterExpr::and(vec![FilterExpr::not_null("col1"), FilterExpr::is_null("col2")])
    );
}

#[test]
fn test_prefix_exact_on_dictionary_without_label_is_never() {
    let schema = Schema::new(vec![
        ColumnDescriptor::new("col1", dict("d"), true),
        ColumnDescriptor::new("col2", ColumnType::Text, true),
    ]);
    let dicts: Dictionaries = [(
        "d",
        vec![
            DictionaryEntry::new("1", "www"),
            DictionaryEntry::new("2", "wwx"),
        ],
    )]
    .into_iter()
    .collect();
    let builder = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
        .unwrap()
        .with_dictionaries(&dicts)
        .with_prefixes([("c1", "col1")])
        .unwrap();

    assert_eq!(reduce(&schema, &builder.build("c1=ww*")), FilterExpr::NEVER);
    assert_eq!(
        reduce(&schema, &builder.build("c1:ww*")),
        FilterExpr::not_null("col1")
    );
    assert_eq!(
        reduce(&schema, &builder.build("c1=WWX")),
        FilterExpr::condition("col1", Operator::Eq, "2")
    );
}

#[test]
fn test_unknown_prefix_is_full_text() {
    let schema = text_only_schema();
    let builder = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
        .unwrap()
        .with_prefixes([("c1", "col1")])
        .unwrap();

    assert_eq!(
        reduce(&schema, &builder.build("zz:abc*")),
        FilterExpr::or(vec![
            FilterExpr::condition("col1", Operator::StartsWith, "zz:abc"),
            FilterExpr::condition("col2", Operator::StartsWith, "zz:abc"),
        ])
    );
}

#[test]
fn test_prefix_on_scalar_columns() {
    let schema = schema();
    let builder = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
        .unwrap()
        .with_prefixes([("n", "count"), ("d", "done")])
        .unwrap();

    assert_eq!(
        reduce(&schema, &builder.build("n=42")),
        FilterExpr::condition("count", Operator::Eq, 42i64)
    );
    assert_eq!(reduce(&schema, &builder.build("n:forty")), FilterExpr::NEVER);
    assert_eq!(
        reduce(&schema, &builder.build("d:TRUE")),
        FilterExpr::condition("done", Operator::Eq, true)
    );
    assert_eq!(reduce(&schema, &builder.build("d:*")), FilterExpr::ALWAYS);
}

#[test]
fn test_prefix_callback_invoked_per_use() {
    let schema = text_only_schema();
    let seen = RefCell::new(Vec::new());
    let builder = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
        .unwrap()
        .with_prefixes([("c1", "col1"), ("c2", "col2")])
        .unwrap()
        .on_prefix(|prefix, column| {
            seen.borrow_mut()
                .push((prefix.to_string(), column.to_string()))
        });

    let filter = builder.build("c1:a plain zz:b c2=c c1:d");
    drop(builder);

    assert!(matches!(filter, FilterExpr::Bool(_)));
    assert_eq!(
        seen.into_inner(),
        vec![
            ("c1".to_string(), "col1".to_string()),
            ("c2".to_string(), "col2".to_string()),
            ("c1".to_string(), "col1".to_string()),
        ]
    );
}

#[test]
fn test_build_is_deterministic() {
    let schema = schema();
    let dicts = dictionaries();
    let builder = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
        .unwrap()
        .with_dictionaries(&dicts)
        .with_prefixes([("s", "status"), ("t", "tags")])
        .unwrap();

    let text = "s:o* t=bug 'in pro'* x";
    let first = serde_json::to_string(&reduce(&schema, &builder.build(text))).unwrap();
    let second = serde_json::to_string(&reduce(&schema, &builder.build(text))).unwrap();
    assert_eq!(first, second);
}

// ==================== List Columns ====================

fn list_schema() -> Schema {
    Schema::new(vec![
        ColumnDescriptor::new("tags", ColumnType::StringList, true),
        ColumnDescriptor::new("refs", ColumnType::UuidList, true),
    ])
}

fn assert_supported(schema: &Schema, expr: &FilterExpr) {
    match expr {
        FilterExpr::Const(_) => {}
        FilterExpr::Bool(node) => node.val.iter().for_each(|e| assert_supported(schema, e)),
        FilterExpr::Column(cond) => {
            let column = schema.column(&cond.col).expect("known column");
            assert!(
                column.supports(cond.op),
                "{} invalid for {}",
                cond.op,
                column.column_type.name()
            );
        }
    }
}

#[test]
fn test_exact_column_filter_on_string_list_uses_has() {
    let schema = list_schema();
    let tags = schema.column("tags").unwrap();
    let filter = reduce(&schema, &build_column_filter(tags, "foo", MatchMode::Exact));

    assert_eq!(filter, FilterExpr::condition("tags", Operator::Has, "foo"));
    assert_supported(&schema, &filter);
}

#[test]
fn test_fuzzy_column_filter_on_string_list_keeps_text_ops() {
    let schema = list_schema();
    let tags = schema.column("tags").unwrap();
    let filter = reduce(&schema, &build_column_filter(tags, "fo* bar", MatchMode::Fuzzy));

    assert_eq!(
        filter,
        FilterExpr::and(vec![
            FilterExpr::condition("tags", Operator::StartsWith, "fo"),
            contains("tags", "bar"),
        ])
    );
    assert_supported(&schema, &filter);
}

#[test]
fn test_prefixes_on_list_columns_use_has() {
    let schema = list_schema();
    let builder = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
        .unwrap()
        .with_prefixes([("t", "tags"), ("r", "refs")])
        .unwrap();

    let cases = [
        ("t=foo", FilterExpr::condition("tags", Operator::Has, "foo")),
        ("r:abc", FilterExpr::condition("refs", Operator::Has, "abc")),
        ("r='abc'", FilterExpr::condition("refs", Operator::Has, "abc")),
        ("r:*", FilterExpr::not_null("refs")),
        ("foo", contains("tags", "foo")),
    ];
    for (text, expected) in cases {
        let filter = reduce(&schema, &builder.build(text));
        assert_eq!(filter, expected, "compiling {text}");
        assert_supported(&schema, &filter);
    }
}

// ==================== Configuration Errors ====================

#[test]
fn test_unknown_candidate_column_fails() {
    let schema = schema();
    let selection = ColumnSelection::Only(vec!["col1".to_string(), "nope".to_string()]);
    assert_eq!(
        GlobalFilterBuilder::new(&schema, &selection).err(),
        Some(FilterError::unknown_column("nope"))
    );
}

#[test]
fn test_unknown_skip_column_fails() {
    let schema = schema();
    let selection = ColumnSelection::Except(vec!["nope".to_string()]);
    assert_eq!(
        build_global_filter(&schema, &selection, "x").err(),
        Some(FilterError::unknown_skip_column("nope"))
    );
}

#[test]
fn test_unknown_prefix_target_fails() {
    let schema = schema();
    let result = GlobalFilterBuilder::new(&schema, &ColumnSelection::All)
        .unwrap()
        .with_prefixes([("x", "nope")]);
    assert_eq!(
        result.err(),
        Some(FilterError::unknown_prefix_target("x", "nope"))
    );
}

#[test]
fn test_conflicting_selection_fails() {
    assert_eq!(
        ColumnSelection::from_lists(Some(vec!["a".to_string()]), Some(vec![])),
        Err(FilterError::ConflictingColumnSelection)
    );
    assert_eq!(
        ColumnSelection::from_lists(None, None),
        Ok(ColumnSelection::All)
    );
    assert_eq!(
        ColumnSelection::from_lists(None, Some(vec!["a".to_string()])),
        Ok(ColumnSelection::Except(vec!["a".to_string()]))
    );
}
