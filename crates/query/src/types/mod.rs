//! Typed inputs and outputs of the engine.
//!
//! - [`SearchQuery`], [`Projection`] - keyword search requests
//! - [`Pagination`], [`SearchPage`] - page selection and page results
//! - [`FilterNode`], [`Condition`] - validated filter trees
//! - [`SortDescriptor`] - multi-key sorts
//! - [`FilterPreset`] - stored filter presets
//!
//! Every type that arrives as request JSON implements `TryFrom<Value>` (and
//! `Deserialize` through it), so malformed input is rejected once, up front.
//!
//! # Examples
//!
//! ```
//! use bazaar_query::types::{FilterNode, SearchQuery, SortDescriptor};
//! use serde_json::json;
//!
//! let query = SearchQuery::try_from(json!({
//!     "keyword": "apple",
//!     "searchPaths": ["name"],
//!     "pageSize": 10
//! }))
//! .unwrap();
//! assert_eq!(query.pagination.page_size, Some(10));
//!
//! let filter = FilterNode::try_from(json!({
//!     "$or": [
//!         {"field": "stock", "type": "number", "operator": "greater", "value": 0},
//!         {"field": "preorder", "type": "string", "operator": "equals", "value": "true"}
//!     ]
//! }))
//! .unwrap();
//! assert!(!filter.is_pass_all());
//!
//! let sort = SortDescriptor::try_from(json!({"price": "asc"})).unwrap();
//! assert_eq!(sort.keys().len(), 1);
//! ```

mod filter;
mod pagination;
mod preset;
mod search_query;
mod sort;

pub use filter::{
    ArrayTest, Condition, DateTest, FieldType, FilterNode, NumberTest, Operator, StringTest,
    ValueTest,
};
pub use pagination::{DEFAULT_PAGE_SIZE, FILTERED_PAGE_SIZE, Pagination, SearchPage};
pub use preset::{Combinator, FilterPreset, PresetOperator};
pub use search_query::{Projection, SearchQuery};
pub use sort::{SortDescriptor, SortDirection, SortKey};
