use std::fmt;

use serde_json::{Map, Value};

use crate::aggregation::Aggregation;
use crate::body::Embodied;
use crate::filter::Filter;

/// Top-level query document: an accumulator over ordered `filter`,
/// `sort`, `aggregation` and `highlight` lists plus the `offset`,
/// `limit` and `type` scalars.
///
/// List keys are created on first use, so the top-level key order of
/// the serialized document reflects call order. Scalars overwrite on
/// repeat; list setters append.
///
/// ```
/// use lagoon_core::{Filter, Query};
///
/// let query = Query::new().filter(Filter::gt("age", 12)).sort_desc("age");
/// assert_eq!(
///     query.to_string(),
///     r#"{"filter":[{"age":{"operator":">","value":12}}],"sort":[{"age":"desc"}]}"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    body: Value,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

fn push_to(body: &mut Value, key: &str, value: Value) {
    if let Value::Object(map) = body {
        let list = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = list {
            items.push(value);
        }
    }
}

fn set_on(body: &mut Value, key: &str, value: Value) {
    if let Value::Object(map) = body {
        map.insert(key.to_string(), value);
    }
}

impl Query {
    pub fn new() -> Self {
        Self {
            body: Value::Object(Map::new()),
        }
    }

    /// Append a filter to the `filter` list.
    pub fn filter(mut self, filter: Filter) -> Self {
        push_to(&mut self.body, "filter", filter.into_body());
        self
    }

    /// Build a predicate inline and append it to the `filter` list.
    pub fn filter_field(
        self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.filter(Filter::field(field, operator, value))
    }

    /// Mark the query as a search without adding a filter.
    pub fn search(mut self) -> Self {
        set_on(&mut self.body, "type", Value::String("search".to_string()));
        self
    }

    /// Mark as a search and append a filter.
    pub fn search_filter(self, filter: Filter) -> Self {
        self.search().filter(filter)
    }

    /// Mark as a search matching `text` across all fields.
    pub fn search_match(self, text: impl Into<Value>) -> Self {
        self.search_filter(Filter::match_any(text))
    }

    /// Mark as a search matching `text` on one field.
    pub fn search_field(self, field: impl Into<String>, text: impl Into<Value>) -> Self {
        self.search_filter(Filter::match_field(field, text))
    }

    fn sort_entry(mut self, field: String, direction: &str) -> Self {
        let mut entry = Map::new();
        entry.insert(field, Value::String(direction.to_string()));
        push_to(&mut self.body, "sort", Value::Object(entry));
        self
    }

    /// Append an ascending sort key.
    pub fn sort(self, field: impl Into<String>) -> Self {
        self.sort_entry(field.into(), "asc")
    }

    /// Append a descending sort key.
    pub fn sort_desc(self, field: impl Into<String>) -> Self {
        self.sort_entry(field.into(), "desc")
    }

    /// Append a field to highlight in results.
    pub fn highlight(mut self, field: impl Into<String>) -> Self {
        push_to(&mut self.body, "highlight", Value::String(field.into()));
        self
    }

    /// Skip the first `offset` results.
    pub fn offset(mut self, offset: u64) -> Self {
        set_on(&mut self.body, "offset", Value::from(offset));
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: u64) -> Self {
        set_on(&mut self.body, "limit", Value::from(limit));
        self
    }

    /// Set the query type. Any string is accepted; the named variants
    /// below cover the service's own types.
    pub fn query_type(mut self, query_type: impl Into<String>) -> Self {
        set_on(&mut self.body, "type", Value::String(query_type.into()));
        self
    }

    /// `type = "fetch"`
    pub fn fetch(self) -> Self {
        self.query_type("fetch")
    }

    /// `type = "count"`
    pub fn count(self) -> Self {
        self.query_type("count")
    }

    /// Append a named aggregation, re-shaped to the wire form
    /// `{field: {name, operator, value?}}`.
    pub fn aggregate(mut self, name: impl Into<String>, aggregation: impl Into<Aggregation>) -> Self {
        let (field, operator, value) = aggregation.into().into_parts();
        let mut spec = Map::new();
        spec.insert("name".to_string(), Value::String(name.into()));
        spec.insert("operator".to_string(), Value::String(operator));
        if let Some(value) = value {
            spec.insert("value".to_string(), value);
        }
        let mut entry = Map::new();
        entry.insert(field, Value::Object(spec));
        push_to(&mut self.body, "aggregation", Value::Object(entry));
        self
    }

    /// Append a plain field/operator aggregation.
    pub fn aggregate_field(
        self,
        name: impl Into<String>,
        field: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        self.aggregate(name, Aggregation::new(field, operator))
    }
}

impl Embodied for Query {
    fn body(&self) -> &Value {
        &self.body
    }

    fn into_body(self) -> Value {
        self.body
    }
}

impl From<Query> for Value {
    fn from(query: Query) -> Value {
        query.body
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.body, f)
    }
}

/// Sibling top-level document for search requests: independent
/// `pre_filter` / `post_filter` / `query` filter buckets, a result
/// cursor, and per-field highlight specs with optional fragment size
/// and count.
#[derive(Debug, Clone)]
pub struct Search {
    body: Value,
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

impl Search {
    pub fn new() -> Self {
        Self {
            body: Value::Object(Map::new()),
        }
    }

    /// Append a filter applied before scoring.
    pub fn pre_filter(mut self, filter: Filter) -> Self {
        push_to(&mut self.body, "pre_filter", filter.into_body());
        self
    }

    /// Append a filter applied after scoring.
    pub fn post_filter(mut self, filter: Filter) -> Self {
        push_to(&mut self.body, "post_filter", filter.into_body());
        self
    }

    /// Append a scoring query filter.
    pub fn query(mut self, filter: Filter) -> Self {
        push_to(&mut self.body, "query", filter.into_body());
        self
    }

    /// Resume from a previously returned cursor.
    pub fn cursor(mut self, cursor: impl Into<Value>) -> Self {
        set_on(&mut self.body, "cursor", cursor.into());
        self
    }

    fn highlight_entry(mut self, field: String, spec: Value) -> Self {
        if let Value::Object(map) = &mut self.body {
            let highlight = map
                .entry("highlight".to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(fields) = highlight {
                fields.insert(field, spec);
            }
        }
        self
    }

    /// Highlight a field with default fragments.
    pub fn highlight(self, field: impl Into<String>) -> Self {
        self.highlight_entry(field.into(), Value::Object(Map::new()))
    }

    /// Highlight a field with a fragment size.
    pub fn highlight_size(self, field: impl Into<String>, size: u64) -> Self {
        let mut spec = Map::new();
        spec.insert("size".to_string(), Value::from(size));
        self.highlight_entry(field.into(), Value::Object(spec))
    }

    /// Highlight a field with a fragment size and count.
    pub fn highlight_count(self, field: impl Into<String>, size: u64, count: u64) -> Self {
        let mut spec = Map::new();
        spec.insert("size".to_string(), Value::from(size));
        spec.insert("count".to_string(), Value::from(count));
        self.highlight_entry(field.into(), Value::Object(spec))
    }
}

impl Embodied for Search {
    fn body(&self) -> &Value {
        &self.body
    }

    fn into_body(self) -> Value {
        self.body
    }
}

impl From<Search> for Value {
    fn from(search: Search) -> Value {
        search.body
    }
}

impl fmt::Display for Search {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.body, f)
    }
}
