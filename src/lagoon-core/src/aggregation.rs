use serde_json::{Map, Value};

use crate::range::Range;

/// A named summary computation requested alongside a query: a
/// `{field, operator, value?}` tuple. [`crate::Query::aggregate`]
/// re-shapes it into the wire form.
#[derive(Debug, Clone)]
pub struct Aggregation {
    field: String,
    operator: String,
    value: Option<Value>,
}

impl Aggregation {
    /// An aggregation without a value.
    pub fn new(field: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: None,
        }
    }

    /// An aggregation with a value.
    pub fn of(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: Some(value.into()),
        }
    }

    pub fn avg(field: impl Into<String>) -> Self {
        Self::new(field, "avg")
    }

    pub fn count(field: impl Into<String>) -> Self {
        Self::new(field, "count")
    }

    pub fn extended_stats(field: impl Into<String>) -> Self {
        Self::new(field, "extendedStats")
    }

    /// Histogram over `field` with the given bucket interval.
    pub fn histogram(field: impl Into<String>, interval: impl Into<Value>) -> Self {
        Self::of(field, "histogram", interval)
    }

    pub fn max(field: impl Into<String>) -> Self {
        Self::new(field, "max")
    }

    pub fn min(field: impl Into<String>) -> Self {
        Self::new(field, "min")
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "missing")
    }

    pub fn stats(field: impl Into<String>) -> Self {
        Self::new(field, "stats")
    }

    pub fn sum(field: impl Into<String>) -> Self {
        Self::new(field, "sum")
    }

    pub fn terms(field: impl Into<String>) -> Self {
        Self::new(field, "terms")
    }

    /// Geo-distance aggregation around `location`; add bands with
    /// [`DistanceAggregation::range`].
    pub fn distance(field: impl Into<String>, location: impl Into<Value>) -> DistanceAggregation {
        DistanceAggregation::new(field, location.into())
    }

    /// Bucketed range aggregation seeded with one range; add more with
    /// [`RangeAggregation::range`].
    pub fn range(field: impl Into<String>, range: impl Into<Value>) -> RangeAggregation {
        RangeAggregation::new(field).range(range)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn into_parts(self) -> (String, String, Option<Value>) {
        (self.field, self.operator, self.value)
    }
}

/// `geoDistance` aggregation: value `{location, ranges: [...], unit?}`.
#[derive(Debug, Clone)]
pub struct DistanceAggregation {
    inner: Aggregation,
}

impl DistanceAggregation {
    fn new(field: impl Into<String>, location: Value) -> Self {
        let mut value = Map::new();
        value.insert("location".to_string(), location);
        value.insert("ranges".to_string(), Value::Array(Vec::new()));
        Self {
            inner: Aggregation {
                field: field.into(),
                operator: "geoDistance".to_string(),
                value: Some(Value::Object(value)),
            },
        }
    }

    /// Append one distance band.
    pub fn range(mut self, range: impl Into<Value>) -> Self {
        if let Some(Value::Object(value)) = self.inner.value.as_mut() {
            if let Some(Value::Array(ranges)) = value.get_mut("ranges") {
                ranges.push(range.into());
            }
        }
        self
    }

    /// Append a `[from, to)` distance band.
    pub fn range_bounds(self, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        self.range(Range::range(from, to))
    }

    /// Set the distance unit (e.g. `"km"`).
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        if let Some(Value::Object(value)) = self.inner.value.as_mut() {
            value.insert("unit".to_string(), Value::String(unit.into()));
        }
        self
    }
}

impl From<DistanceAggregation> for Aggregation {
    fn from(aggregation: DistanceAggregation) -> Aggregation {
        aggregation.inner
    }
}

/// `range` aggregation: value is a flat list of range documents.
#[derive(Debug, Clone)]
pub struct RangeAggregation {
    inner: Aggregation,
}

impl RangeAggregation {
    fn new(field: impl Into<String>) -> Self {
        Self {
            inner: Aggregation {
                field: field.into(),
                operator: "range".to_string(),
                value: Some(Value::Array(Vec::new())),
            },
        }
    }

    /// Append one bucket range.
    pub fn range(mut self, range: impl Into<Value>) -> Self {
        if let Some(Value::Array(ranges)) = self.inner.value.as_mut() {
            ranges.push(range.into());
        }
        self
    }

    /// Append a `[from, to)` bucket.
    pub fn range_bounds(self, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        self.range(Range::range(from, to))
    }
}

impl From<RangeAggregation> for Aggregation {
    fn from(aggregation: RangeAggregation) -> Aggregation {
        aggregation.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Geo;
    use serde_json::json;

    #[test]
    fn test_named_constructors_map_to_operator_strings() {
        assert_eq!(Aggregation::avg("age").operator(), "avg");
        assert_eq!(Aggregation::count("age").operator(), "count");
        assert_eq!(Aggregation::extended_stats("age").operator(), "extendedStats");
        assert_eq!(Aggregation::max("age").operator(), "max");
        assert_eq!(Aggregation::min("age").operator(), "min");
        assert_eq!(Aggregation::missing("age").operator(), "missing");
        assert_eq!(Aggregation::stats("age").operator(), "stats");
        assert_eq!(Aggregation::sum("age").operator(), "sum");
        assert_eq!(Aggregation::terms("age").operator(), "terms");
        assert!(Aggregation::terms("age").value().is_none());
    }

    #[test]
    fn test_histogram_carries_interval_as_value() {
        let aggregation = Aggregation::histogram("age", 100);
        assert_eq!(aggregation.operator(), "histogram");
        assert_eq!(aggregation.value(), Some(&json!(100)));
    }

    #[test]
    fn test_distance_aggregation_accumulates_ranges() {
        let aggregation: Aggregation = Aggregation::distance("point", Geo::point(0, 0))
            .range(Range::to(100))
            .range_bounds(100, 200)
            .range(Range::from(200))
            .into();
        assert_eq!(aggregation.operator(), "geoDistance");
        assert_eq!(
            aggregation.value(),
            Some(&json!({
                "location": [0, 0],
                "ranges": [{"to": 100}, {"from": 100, "to": 200}, {"from": 200}]
            }))
        );
    }

    #[test]
    fn test_distance_aggregation_unit() {
        let aggregation: Aggregation = Aggregation::distance("point", Geo::point(0, 0))
            .range_bounds(0, 10)
            .unit("km")
            .into();
        assert_eq!(
            aggregation.value(),
            Some(&json!({
                "location": [0, 0],
                "ranges": [{"from": 0, "to": 10}],
                "unit": "km"
            }))
        );
    }

    #[test]
    fn test_range_aggregation_is_flat_range_list() {
        let aggregation: Aggregation = Aggregation::range("age", Range::to(18))
            .range_bounds(18, 65)
            .range(Range::from(65))
            .into();
        assert_eq!(aggregation.operator(), "range");
        assert_eq!(
            aggregation.value(),
            Some(&json!([{"to": 18}, {"from": 18, "to": 65}, {"from": 65}]))
        );
    }
}
