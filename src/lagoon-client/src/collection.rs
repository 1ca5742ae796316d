use lagoon_core::{Aggregation, Filter, Query};
use serde_json::Value;

use crate::client::Client;
use crate::{ClientError, Result};

/// Fluent handle on one collection path, accumulating a condition and
/// a [`Query`] before sending.
///
/// Conditions added through the `where_*` methods are composed under
/// `and`; [`Collection::or`] requires at least one prior condition.
pub struct Collection<'a> {
    client: &'a Client,
    path: String,
    query: Query,
    condition: Option<Filter>,
    has_limit: bool,
}

impl<'a> Collection<'a> {
    pub(crate) fn new(client: &'a Client, path: String) -> Self {
        Self {
            client,
            path,
            query: Query::new(),
            condition: None,
            has_limit: false,
        }
    }

    /// Add a condition, composed with any previous ones under `and`.
    pub fn where_filter(mut self, filter: Filter) -> Self {
        self.condition = Some(match self.condition.take() {
            Some(condition) => condition.and(filter),
            None => filter,
        });
        self
    }

    /// Add an inline field/operator/value condition.
    pub fn where_field(
        self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.where_filter(Filter::field(field, operator, value))
    }

    /// Add an equality condition.
    pub fn where_equal(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_filter(Filter::equal(field, value))
    }

    /// Compose the accumulated condition with `filter` under `or`.
    ///
    /// Fails with [`ClientError::MissingPrecondition`] when no
    /// condition exists yet.
    pub fn or(mut self, filter: Filter) -> Result<Self> {
        match self.condition.take() {
            Some(condition) => {
                self.condition = Some(condition.or(filter));
                Ok(self)
            }
            None => Err(ClientError::MissingPrecondition(
                "a where condition is required before or()".to_string(),
            )),
        }
    }

    /// Append an ascending sort key.
    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.query = self.query.sort(field);
        self
    }

    /// Append a descending sort key.
    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.query = self.query.sort_desc(field);
        self
    }

    /// Append a field to highlight.
    pub fn highlight(mut self, field: impl Into<String>) -> Self {
        self.query = self.query.highlight(field);
        self
    }

    /// Append a named aggregation.
    pub fn aggregate(mut self, name: impl Into<String>, aggregation: impl Into<Aggregation>) -> Self {
        self.query = self.query.aggregate(name, aggregation);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.query = self.query.offset(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query = self.query.limit(limit);
        self.has_limit = true;
        self
    }

    /// The query document that would be sent right now.
    fn finalize(mut self) -> (String, Query) {
        if let Some(condition) = self.condition.take() {
            self.query = self.query.filter(condition);
        }
        if !self.has_limit {
            self.query = self.query.limit(self.client.default_limit());
        }
        (self.path, self.query)
    }

    /// Fetch matching documents (GET, query spread over parameters).
    pub async fn get(self) -> Result<Value> {
        let client = self.client;
        let (path, query) = self.finalize();
        client.get(&path, &query).await
    }

    /// Count matching documents.
    pub async fn count(mut self) -> Result<Value> {
        self.query = self.query.count();
        self.has_limit = true; // counts carry no limit of their own
        let client = self.client;
        let (path, query) = self.finalize();
        client.get(&path, &query).await
    }

    /// Run as a search request (POST, document as body).
    pub async fn search(mut self) -> Result<Value> {
        self.query = self.query.search();
        let client = self.client;
        let (path, query) = self.finalize();
        client.post(&path, &query).await
    }

    #[cfg(test)]
    pub(crate) fn into_query(self) -> Query {
        self.finalize().1
    }
}
