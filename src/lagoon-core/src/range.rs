use std::fmt;

use serde_json::{Map, Value};

use crate::body::Embodied;

/// An optional `[from, to)` interval document.
///
/// Absent bounds are absent keys, never `null`; a range with neither
/// bound is legal and serializes as `{}`.
#[derive(Debug, Clone)]
pub struct Range {
    body: Value,
}

impl Range {
    fn with_bounds(from: Option<Value>, to: Option<Value>) -> Self {
        let mut body = Map::new();
        if let Some(from) = from {
            body.insert("from".to_string(), from);
        }
        if let Some(to) = to {
            body.insert("to".to_string(), to);
        }
        Self {
            body: Value::Object(body),
        }
    }

    /// Range bounded on both ends.
    pub fn range(from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self::with_bounds(Some(from.into()), Some(to.into()))
    }

    /// Range with only a lower bound.
    pub fn from(from: impl Into<Value>) -> Self {
        Self::with_bounds(Some(from.into()), None)
    }

    /// Range with only an upper bound.
    pub fn to(to: impl Into<Value>) -> Self {
        Self::with_bounds(None, Some(to.into()))
    }

    /// The empty range, a building block for aggregations.
    pub fn none() -> Self {
        Self::with_bounds(None, None)
    }

    /// The bounds currently present, if any.
    pub fn bounds(&self) -> (Option<&Value>, Option<&Value>) {
        (self.body.get("from"), self.body.get("to"))
    }
}

impl Embodied for Range {
    fn body(&self) -> &Value {
        &self.body
    }

    fn into_body(self) -> Value {
        self.body
    }
}

impl From<Range> for Value {
    fn from(range: Range) -> Value {
        range.body
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // serde_json renders Value compactly through Display
        fmt::Display::fmt(&self.body, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_both_bounds() {
        assert_eq!(Range::range(10, 20).to_string(), r#"{"from":10,"to":20}"#);
    }

    #[test]
    fn test_range_from_omits_to_key() {
        let range = Range::from(10);
        assert_eq!(range.to_string(), r#"{"from":10}"#);
        assert!(range.body().get("to").is_none());
    }

    #[test]
    fn test_range_to_omits_from_key() {
        assert_eq!(Range::to(20).to_string(), r#"{"to":20}"#);
    }

    #[test]
    fn test_empty_range_is_legal() {
        assert_eq!(Range::none().to_string(), "{}");
    }

    #[test]
    fn test_range_accepts_string_bounds() {
        assert_eq!(
            Range::range("2024-01-01", "2024-12-31").to_string(),
            r#"{"from":"2024-01-01","to":"2024-12-31"}"#
        );
    }

    #[test]
    fn test_bounds_accessor() {
        let range = Range::from(10);
        let (from, to) = range.bounds();
        assert!(from.is_some());
        assert!(to.is_none());
    }
}
