//! Keyword search descriptors.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ArgumentError;
use crate::path::FieldPath;

use super::filter::FilterNode;
use super::pagination::Pagination;
use super::sort::SortDescriptor;

/// Which fields of each result record to return.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Projection {
    /// The whole record.
    #[default]
    All,
    /// Only these paths; paths absent from the record are skipped.
    Include(Vec<FieldPath>),
    /// Everything except these paths.
    Exclude(Vec<FieldPath>),
}

/// A keyword search request.
///
/// Parsed from the request-shaped JSON descriptor:
///
/// ```json
/// {
///     "keyword": "apple",
///     "searchPaths": ["name", "owner.email"],
///     "pageNumber": 1,
///     "pageSize": 20,
///     "fields": {"exclude": ["password"]},
///     "filter": {"field": "age", "type": "number", "operator": "greater", "value": 17},
///     "sort": {"age": "asc"}
/// }
/// ```
///
/// Every key is optional. An empty or missing keyword disables ranking.
/// `filter` and `sort` are only applied by
/// [`search_filter_and_sort`](crate::search::search_filter_and_sort).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "Value")]
pub struct SearchQuery {
    /// Keyword to rank by. `None` returns every record in input order.
    pub keyword: Option<String>,

    /// Paths whose values are scored against the keyword.
    pub search_paths: Vec<FieldPath>,

    /// Page to return.
    pub pagination: Pagination,

    /// Fields to return for each record.
    pub projection: Projection,

    /// Filter applied before ranking.
    pub filter: Option<FilterNode>,

    /// Sort applied before ranking.
    pub sort: Option<SortDescriptor>,
}

impl SearchQuery {
    /// Creates an unranked query for the first page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the keyword. An empty keyword disables ranking.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.keyword = (!keyword.is_empty()).then_some(keyword);
        self
    }

    /// Sets the scored paths.
    pub fn with_search_paths(mut self, paths: Vec<FieldPath>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Sets the page.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Sets the projection.
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Sets the pre-ranking filter.
    pub fn with_filter(mut self, filter: FilterNode) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the pre-ranking sort.
    pub fn with_sort(mut self, sort: SortDescriptor) -> Self {
        self.sort = Some(sort);
        self
    }
}

impl TryFrom<&Value> for SearchQuery {
    type Error = ArgumentError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let descriptor = value.as_object().ok_or_else(|| ArgumentError::NotAnObject {
            what: "search query".to_string(),
        })?;

        let keyword = match descriptor.get("keyword") {
            None | Some(Value::Null) => None,
            Some(Value::String(keyword)) if keyword.is_empty() => None,
            Some(Value::String(keyword)) => Some(keyword.clone()),
            Some(other) => {
                return Err(ArgumentError::InvalidKeyword {
                    value: other.to_string(),
                });
            }
        };

        let search_paths = match descriptor.get("searchPaths") {
            None => Vec::new(),
            Some(paths) => path_list("searchPaths", paths)?,
        };

        let mut pagination = Pagination::default();
        if let Some(page_number) = page_field(descriptor, "pageNumber")? {
            pagination.page_number = page_number;
        }
        if let Some(page_size) = page_field(descriptor, "pageSize")? {
            pagination.page_size = Some(page_size);
        }

        let projection = match descriptor.get("fields") {
            None | Some(Value::Null) => Projection::All,
            Some(Value::Object(fields)) => {
                if let Some(include) = fields.get("include") {
                    Projection::Include(path_list("fields.include", include)?)
                } else if let Some(exclude) = fields.get("exclude") {
                    Projection::Exclude(path_list("fields.exclude", exclude)?)
                } else {
                    Projection::All
                }
            }
            Some(_) => {
                return Err(ArgumentError::NotAnObject {
                    what: "fields".to_string(),
                });
            }
        };

        let filter = descriptor
            .get("filter")
            .filter(|filter| !filter.is_null())
            .map(FilterNode::try_from)
            .transpose()?;
        let sort = descriptor
            .get("sort")
            .filter(|sort| !sort.is_null())
            .map(SortDescriptor::try_from)
            .transpose()?;

        Ok(Self {
            keyword,
            search_paths,
            pagination,
            projection,
            filter,
            sort,
        })
    }
}

impl TryFrom<Value> for SearchQuery {
    type Error = ArgumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        SearchQuery::try_from(&value)
    }
}

fn path_list(what: &str, value: &Value) -> Result<Vec<FieldPath>, ArgumentError> {
    let items = value.as_array().ok_or_else(|| ArgumentError::NotASequence {
        what: what.to_string(),
    })?;
    items
        .iter()
        .map(|item| match item {
            Value::String(path) => FieldPath::parse(path),
            other => Err(ArgumentError::InvalidPath {
                path: other.to_string(),
                message: "expected a string".to_string(),
            }),
        })
        .collect()
}

fn page_field(descriptor: &Map<String, Value>, key: &str) -> Result<Option<u64>, ArgumentError> {
    match descriptor.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| ArgumentError::InvalidQuery {
            message: format!("{} must be a positive integer, got {}", key, value),
        }),
    }
}
