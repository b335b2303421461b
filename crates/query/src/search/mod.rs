//! In-memory search over record collections.
//!
//! Three entry points:
//!
//! - [`search`] ranks records by keyword relevance across declared search
//!   paths, then paginates and projects the ranked list.
//! - [`filter_and_sort`] keeps the records that pass a [`FilterNode`] and
//!   orders them by a [`SortDescriptor`].
//! - [`search_filter_and_sort`] runs the query's filter and sort first, then
//!   [`search`] over what remains.
//!
//! Records are plain JSON values and are never modified. Scores are carried
//! next to the records, and every returned page holds fresh copies.
//!
//! # Examples
//!
//! ```
//! use bazaar_query::search::search;
//! use bazaar_query::types::SearchQuery;
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({"name": "Apple"}),
//!     json!({"name": "Pineapple"}),
//!     json!({"name": "Banana"}),
//! ];
//! let query = SearchQuery::try_from(json!({
//!     "keyword": "apple",
//!     "searchPaths": ["name"]
//! }))
//! .unwrap();
//!
//! let page = search(&records, &query).unwrap();
//! assert_eq!(page.total_pages, 1);
//! assert_eq!(page.results, vec![json!({"name": "Apple"}), json!({"name": "Pineapple"})]);
//! ```

pub mod coercion;
mod evaluator;
mod keyword;
mod projection;
mod relevance;
mod sort;

use std::borrow::Borrow;

use serde_json::Value;
use tracing::debug;

use crate::error::{ArgumentError, QueryResult};
use crate::types::{
    DEFAULT_PAGE_SIZE, FILTERED_PAGE_SIZE, FilterNode, SearchPage, SearchQuery, SortDescriptor,
};

pub use keyword::{MIN_KEYWORD_LENGTH, rank, relevance, validate_keyword};
pub use projection::include;
pub use relevance::score;
pub use sort::{compare_records, sort_records};

/// Ranks, paginates and projects `records` according to `query`.
///
/// Without a keyword every record is kept in input order. With one, only
/// records scoring above zero are kept, highest score first and input order
/// among equal scores. The query's filter and sort are not applied here; see
/// [`search_filter_and_sort`].
///
/// # Errors
///
/// - [`ArgumentError::KeywordTooShort`] for a keyword under three characters
/// - [`ArgumentError::InvalidPageNumber`] / [`ArgumentError::InvalidPageSize`]
///   for a zero page number or size
pub fn search<R: Borrow<Value>>(records: &[R], query: &SearchQuery) -> QueryResult<SearchPage> {
    let candidates: Vec<&Value> = records.iter().map(<R as Borrow<Value>>::borrow).collect();
    paginate(candidates, query, DEFAULT_PAGE_SIZE)
}

/// Keeps the records passing `filter`, ordered by `sort`.
///
/// Returns references into `records` in the new order. Pass
/// [`FilterNode::pass_all`] or an empty [`SortDescriptor`] to skip either step.
///
/// # Errors
///
/// [`ArgumentError::SortKeyNotFound`] if a sort key is missing from a kept
/// record.
pub fn filter_and_sort<'a, R: Borrow<Value>>(
    records: &'a [R],
    filter: &FilterNode,
    sort: &SortDescriptor,
) -> QueryResult<Vec<&'a Value>> {
    let mut kept: Vec<&Value> = records
        .iter()
        .map(<R as Borrow<Value>>::borrow)
        .filter(|record| filter.matches(record))
        .collect();
    debug!(
        total = records.len(),
        kept = kept.len(),
        sort_keys = sort.keys().len(),
        "Filtered records"
    );

    sort_records(&mut kept, sort)?;
    Ok(kept)
}

/// Applies the query's filter and sort, then ranks and paginates the rest.
///
/// Without a keyword the sorted order carries through to the page. A query
/// without a page size gets pages of [`FILTERED_PAGE_SIZE`] records, not the
/// [`DEFAULT_PAGE_SIZE`] used by [`search`].
pub fn search_filter_and_sort<R: Borrow<Value>>(
    records: &[R],
    query: &SearchQuery,
) -> QueryResult<SearchPage> {
    let filter = query.filter.clone().unwrap_or_default();
    let sort = query.sort.clone().unwrap_or_default();
    let candidates = filter_and_sort(records, &filter, &sort)?;
    paginate(candidates, query, FILTERED_PAGE_SIZE)
}

/// Splits a JSON array into records.
///
/// # Errors
///
/// [`ArgumentError::NotASequence`] if `value` is not an array.
pub fn records_from_value(value: Value) -> Result<Vec<Value>, ArgumentError> {
    match value {
        Value::Array(records) => Ok(records),
        _ => Err(ArgumentError::NotASequence {
            what: "records".to_string(),
        }),
    }
}

fn paginate(
    candidates: Vec<&Value>,
    query: &SearchQuery,
    default_page_size: u64,
) -> QueryResult<SearchPage> {
    let pagination = query.pagination.or_page_size(default_page_size);
    pagination.validate()?;
    let keyword = validate_keyword(query.keyword.as_deref())?;

    let results: Vec<&Value> = match keyword {
        Some(keyword) => rank(candidates.iter().copied(), keyword, &query.search_paths)
            .into_iter()
            .map(|(record, _)| record)
            .collect(),
        None => candidates,
    };

    let range = pagination.range(results.len());
    let page = SearchPage {
        total_pages: pagination.total_pages(results.len()),
        page_number: pagination.page_number,
        page_size: pagination.effective_page_size(),
        results: results[range]
            .iter()
            .map(|record| query.projection.apply((*record).clone()))
            .collect(),
    };

    debug!(
        keyword = keyword.unwrap_or_default(),
        matched = results.len(),
        returned = page.results.len(),
        page_number = page.page_number,
        total_pages = page.total_pages,
        "Search completed"
    );

    Ok(page)
}
