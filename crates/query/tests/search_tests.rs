//! Keyword search integration tests.

mod common;

use serde_json::{Value, json};

use bazaar_query::search::{score, search, search_filter_and_sort};
use bazaar_query::types::{Pagination, Projection, SearchQuery};
use bazaar_query::{ArgumentError, EngineConfig, FieldPath};

use common::*;

fn query(value: Value) -> SearchQuery {
    SearchQuery::try_from(value).expect("valid query")
}

// ============================================================================
// Ranking Tests
// ============================================================================

#[test]
fn test_apple_outranks_pineapple() {
    let page = search(
        &fruits(),
        &query(json!({"keyword": "apple", "searchPaths": ["name"]})),
    )
    .unwrap();

    assert_names(&page.results, &["Apple", "Pineapple"]);

    let apple = score(Some(&json!("Apple")), "apple");
    let pineapple = score(Some(&json!("Pineapple")), "apple");
    assert!(apple >= 3.0);
    assert!(pineapple > 1.0 && pineapple < 3.0);
}

#[test]
fn test_scores_sum_across_search_paths() {
    let records = vec![
        json!({"name": "Red", "description": "an apple a day"}),
        json!({"name": "Apple", "description": "apple pie"}),
        json!({"name": "Green", "description": "pineapples"}),
    ];
    let page = search(
        &records,
        &query(json!({"keyword": "APPLE", "searchPaths": ["name", "description"]})),
    )
    .unwrap();
    assert_names(&page.results, &["Apple", "Red", "Green"]);
}

#[test]
fn test_nested_and_indexed_search_paths() {
    let page = search(
        &clubs(),
        &query(json!({
            "keyword": "oslo",
            "searchPaths": ["address.city", "emails[0]"]
        })),
    )
    .unwrap();
    assert_eq!(field_values(&page.results, "firstName"), vec!["Chess", "Math"]);
}

#[test]
fn test_numbers_are_searchable() {
    let records = vec![json!({"sku": 100200}), json!({"sku": 300400}), json!({"sku": "x"})];
    let page = search(
        &records,
        &query(json!({"keyword": "200", "searchPaths": ["sku"]})),
    )
    .unwrap();
    assert_eq!(page.results, vec![json!({"sku": 100200})]);
}

#[test]
fn test_ties_keep_input_order() {
    let records = vec![
        json!({"id": 1, "name": "Chess club"}),
        json!({"id": 2, "name": "Book club"}),
        json!({"id": 3, "name": "Club house"}),
        json!({"id": 4, "name": "Cycling club"}),
    ];
    let page = search(
        &records,
        &query(json!({"keyword": "club", "searchPaths": ["name"]})),
    )
    .unwrap();
    let ids: Vec<_> = page.results.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![3, 1, 2, 4]);
}

#[test]
fn test_records_are_not_annotated() {
    let records = fruits();
    let page = search(
        &records,
        &query(json!({"keyword": "apple", "searchPaths": ["name"]})),
    )
    .unwrap();
    assert!(page.results.iter().all(|r| r.get("relevance").is_none()));
    assert_eq!(records, fruits());
}

// ============================================================================
// Keyword Validation Tests
// ============================================================================

#[test]
fn test_two_character_keyword_is_rejected() {
    let err = expect_argument_error(search(
        &fruits(),
        &query(json!({"keyword": "ab", "searchPaths": ["name"]})),
    ));
    assert!(matches!(err, ArgumentError::KeywordTooShort { min: 3, .. }));
}

#[test]
fn test_three_character_keyword_is_accepted() {
    assert!(
        search(
            &fruits(),
            &query(json!({"keyword": "abc", "searchPaths": ["name"]}))
        )
        .is_ok()
    );
}

#[test]
fn test_non_string_keyword_is_rejected() {
    let err = SearchQuery::try_from(json!({"keyword": ["apple"]})).unwrap_err();
    assert!(matches!(err, ArgumentError::InvalidKeyword { .. }));
}

// ============================================================================
// Pagination Tests
// ============================================================================

#[test]
fn test_null_keyword_returns_everything_in_order() {
    let records: Vec<Value> = (1..=7).map(|i| json!({"name": format!("item {}", i)})).collect();

    let first = search(
        &records,
        &query(json!({"keyword": null, "pageNumber": 1, "pageSize": 3})),
    )
    .unwrap();
    assert_eq!(first.total_pages, 3);
    assert_names(&first.results, &["item 1", "item 2", "item 3"]);

    let last = search(
        &records,
        &query(json!({"keyword": null, "pageNumber": 3, "pageSize": 3})),
    )
    .unwrap();
    assert_names(&last.results, &["item 7"]);
    assert!(!last.has_next());
}

#[test]
fn test_default_page_size_is_one_hundred() {
    let records: Vec<Value> = (0..150).map(|i| json!({"i": i})).collect();
    let page = search(&records, &SearchQuery::new()).unwrap();
    assert_eq!(page.page_size, 100);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.len(), 100);
}

#[test]
fn test_empty_collection() {
    let records: Vec<Value> = vec![];
    let page = search(&records, &query(json!({"keyword": "apple"}))).unwrap();
    assert_eq!(page.total_pages, 0);
    assert!(page.is_empty());
}

#[test]
fn test_zero_page_size_is_rejected() {
    let query = SearchQuery::new().with_pagination(Pagination::new(1, 0));
    let err = expect_argument_error(search(&fruits(), &query));
    assert_eq!(err, ArgumentError::InvalidPageSize { page_size: 0 });
}

// ============================================================================
// Projection Tests
// ============================================================================

#[test]
fn test_include_projection() {
    let page = search(
        &users(),
        &query(json!({
            "keyword": "ada",
            "searchPaths": ["name"],
            "fields": {"include": ["name", "clubs[1]", "nickname"]}
        })),
    )
    .unwrap();
    assert_eq!(
        page.results,
        vec![
            json!({"name": "Ada Lovelace", "clubs": [null, "math"]}),
            json!({"name": "Adam Smith", "clubs": [null, "chess"]}),
        ]
    );
}

#[test]
fn test_exclude_projection_leaves_input_intact() {
    let records = users();
    let page = search(
        &records,
        &SearchQuery::new()
            .with_pagination(Pagination::new(1, 1))
            .with_projection(Projection::Exclude(vec![
                FieldPath::parse("password").unwrap(),
                FieldPath::parse("clubs[0]").unwrap(),
            ])),
    )
    .unwrap();

    assert!(page.results[0].get("password").is_none());
    assert_eq!(page.results[0]["clubs"], json!([null, "math"]));
    assert_eq!(records[0]["password"], "$2b$10$hash");
    assert_eq!(records[0]["clubs"], json!(["chess", "math"]));
}

// ============================================================================
// Combined Search Tests
// ============================================================================

#[test]
fn test_search_filter_and_sort_without_keyword_keeps_sort_order() {
    let page = search_filter_and_sort(
        &users(),
        &query(json!({
            "filter": {"field": "age", "type": "number", "operator": "greater", "value": 18},
            "sort": {"age": "desc"},
            "fields": {"include": ["name"]}
        })),
    )
    .unwrap();
    assert_names(&page.results, &["Grace Hopper", "Alan Turing", "Ada Lovelace"]);
}

#[test]
fn test_search_filter_and_sort_ranks_filtered_subset() {
    let config = EngineConfig::default();
    let query = query(json!({
        "keyword": "ada",
        "filter": {"field": "role", "type": "string", "operator": "notIn", "value": ["guest"]}
    }))
    .with_search_paths(config.search_paths.paths_for("user").unwrap().to_vec());

    let page = search_filter_and_sort(&users(), &query).unwrap();
    assert_names(&page.results, &["Ada Lovelace"]);
}

#[test]
fn test_search_filter_and_sort_defaults_to_pages_of_ten() {
    let records: Vec<Value> = (0..25).map(|i| json!({"i": i})).collect();

    let page = search_filter_and_sort(&records, &SearchQuery::new()).unwrap();
    assert_eq!(page.page_size, 10);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.len(), 10);

    let page = search_filter_and_sort(&records, &query(json!({"pageSize": 25}))).unwrap();
    assert_eq!(page.page_size, 25);
    assert_eq!(page.total_pages, 1);

    let page = search(&records, &SearchQuery::new()).unwrap();
    assert_eq!(page.page_size, 100);
    assert_eq!(page.len(), 25);
}

#[test]
fn test_search_ignores_filter_and_sort() {
    let page = search(
        &fruits(),
        &query(json!({
            "filter": {"field": "name", "type": "string", "operator": "equals", "value": "Banana"},
            "sort": {"name": "desc"}
        })),
    )
    .unwrap();
    assert_names(&page.results, &["Apple", "Pineapple", "Banana"]);
}
