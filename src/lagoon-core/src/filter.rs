use std::fmt;

use serde_json::{Map, Value};

use crate::body::Embodied;
use crate::geo::{BoundingBox, Circle};
use crate::range::Range;

/// Low-level filter composition engine.
///
/// A body holds exactly one top-level key at any time: either a leaf
/// predicate `{field: {"operator": op, "value"?: v}}` or a composed
/// `{boolean_op: [...]}` / `{boolean_op: {...}}`. Composing replaces
/// the top-level key and nests the previous body under the new
/// operator.
#[derive(Debug, Clone)]
pub struct FilterBody {
    body: Value,
}

impl FilterBody {
    /// The empty composable root, `{"and": []}`.
    pub fn root() -> Self {
        let mut body = Map::new();
        body.insert("and".to_string(), Value::Array(Vec::new()));
        Self {
            body: Value::Object(body),
        }
    }

    /// A leaf predicate. The `value` key is omitted entirely when no
    /// value is given, so unary-value operators like `exists` and
    /// `missing` serialize without it.
    pub fn of(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: Option<Value>,
    ) -> Self {
        let mut predicate = Map::new();
        predicate.insert("operator".to_string(), Value::String(operator.into()));
        if let Some(value) = value {
            predicate.insert("value".to_string(), value);
        }
        let mut body = Map::new();
        body.insert(field.into(), Value::Object(predicate));
        Self {
            body: Value::Object(body),
        }
    }

    /// Compose another filter under `operator`.
    ///
    /// When the current top-level value under `operator` is not already
    /// an array, the whole previous body is re-wrapped as its first
    /// element. Repeated composition under the same operator therefore
    /// accumulates one flat array, while switching operators nests the
    /// previous composition as a single operand. The asymmetry is a
    /// behavioral contract of the wire format.
    pub fn add(&mut self, operator: &str, filter: FilterBody) {
        let seeded = matches!(self.body.get(operator), Some(Value::Array(_)));
        if !seeded {
            let previous = std::mem::take(&mut self.body);
            let mut composed = Map::new();
            composed.insert(operator.to_string(), Value::Array(vec![previous]));
            self.body = Value::Object(composed);
        }
        if let Some(Value::Array(operands)) = self.body.get_mut(operator) {
            operands.push(filter.body);
        }
    }

    /// Unary composition: wrap the entire current body as
    /// `{operator: <previous body>}` (a map, not an array).
    pub fn add_unary(&mut self, operator: &str) {
        let previous = std::mem::take(&mut self.body);
        let mut composed = Map::new();
        composed.insert(operator.to_string(), previous);
        self.body = Value::Object(composed);
    }

    /// Compose each filter in order under `operator`. After the first
    /// call seeds the array, every subsequent filter appends to it, so
    /// N filters plus the existing body end up under one operator key.
    pub fn add_many(&mut self, operator: &str, filters: impl IntoIterator<Item = FilterBody>) {
        for filter in filters {
            self.add(operator, filter);
        }
    }
}

impl Embodied for FilterBody {
    fn body(&self) -> &Value {
        &self.body
    }

    fn into_body(self) -> Value {
        self.body
    }
}

impl From<FilterBody> for Value {
    fn from(body: FilterBody) -> Value {
        body.body
    }
}

/// User-facing filter factory and fluent composition API.
///
/// One named constructor per operator; no field or operator string is
/// validated here; semantic validation belongs to the server.
///
/// ```
/// use lagoon_core::Filter;
///
/// let filter = Filter::gt("age", 12).and(Filter::lt("age", 15));
/// assert_eq!(
///     filter.to_string(),
///     r#"{"and":[{"age":{"operator":">","value":12}},{"age":{"operator":"<","value":15}}]}"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Filter {
    body: FilterBody,
}

impl Filter {
    /// Sentinel field for all-fields text operators.
    pub const ALL_FIELDS: &'static str = "*";

    fn with_value(field: impl Into<String>, operator: &str, value: Value) -> Self {
        Self {
            body: FilterBody::of(field, operator, Some(value)),
        }
    }

    fn without_value(field: impl Into<String>, operator: &str) -> Self {
        Self {
            body: FilterBody::of(field, operator, None),
        }
    }

    /// A predicate with an explicit operator string.
    pub fn field(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            body: FilterBody::of(field, operator, Some(value.into())),
        }
    }

    /// `=`, the default operator.
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with_value(field, "=", value.into())
    }

    /// `!=`
    pub fn not_equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with_value(field, "!=", value.into())
    }

    /// `>`
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with_value(field, ">", value.into())
    }

    /// `>=`
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with_value(field, ">=", value.into())
    }

    /// `<`
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with_value(field, "<", value.into())
    }

    /// `<=`
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with_value(field, "<=", value.into())
    }

    /// Matches documents whose field holds any of the given values.
    pub fn any<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::with_value(field, "any", Value::Array(values))
    }

    /// Matches documents whose field holds none of the given values.
    pub fn none<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::with_value(field, "none", Value::Array(values))
    }

    /// The field is present, whatever its value.
    pub fn exists(field: impl Into<String>) -> Self {
        Self::without_value(field, "exists")
    }

    /// The field is absent.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::without_value(field, "missing")
    }

    /// The field falls inside the given range.
    pub fn range(field: impl Into<String>, range: Range) -> Self {
        Self::with_value(field, "range", range.into_body())
    }

    /// The field falls inside `[from, to)`.
    pub fn range_bounds(
        field: impl Into<String>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        Self::range(field, Range::range(from, to))
    }

    // Text operators. Each has a field-scoped form and an all-fields
    // form that targets the `*` sentinel.

    /// Full-text match against one field.
    pub fn match_field(field: impl Into<String>, query: impl Into<Value>) -> Self {
        Self::with_value(field, "match", query.into())
    }

    /// Full-text match against all fields.
    pub fn match_any(query: impl Into<Value>) -> Self {
        Self::match_field(Self::ALL_FIELDS, query)
    }

    /// Exact phrase match against one field.
    pub fn phrase_field(field: impl Into<String>, query: impl Into<Value>) -> Self {
        Self::with_value(field, "phrase", query.into())
    }

    /// Exact phrase match against all fields.
    pub fn phrase_any(query: impl Into<Value>) -> Self {
        Self::phrase_field(Self::ALL_FIELDS, query)
    }

    /// Prefix match against one field.
    pub fn prefix_field(field: impl Into<String>, query: impl Into<Value>) -> Self {
        Self::with_value(field, "prefix", query.into())
    }

    /// Prefix match against all fields.
    pub fn prefix_any(query: impl Into<Value>) -> Self {
        Self::prefix_field(Self::ALL_FIELDS, query)
    }

    /// More-like-this similarity match against one field.
    pub fn similar_field(field: impl Into<String>, query: impl Into<Value>) -> Self {
        let mut value = Map::new();
        value.insert("query".to_string(), query.into());
        Self::with_value(field, "similar", Value::Object(value))
    }

    /// More-like-this similarity match against all fields.
    pub fn similar_any(query: impl Into<Value>) -> Self {
        Self::similar_field(Self::ALL_FIELDS, query)
    }

    /// Fuzzy match against one field.
    pub fn fuzzy_field(field: impl Into<String>, query: impl Into<Value>) -> Self {
        let mut value = Map::new();
        value.insert("query".to_string(), query.into());
        Self::with_value(field, "fuzzy", Value::Object(value))
    }

    /// Fuzzy match against all fields.
    pub fn fuzzy_any(query: impl Into<Value>) -> Self {
        Self::fuzzy_field(Self::ALL_FIELDS, query)
    }

    /// Fuzzy match with an explicit fuzziness.
    pub fn fuzzy_field_with(
        field: impl Into<String>,
        query: impl Into<Value>,
        fuzziness: impl Into<Value>,
    ) -> Self {
        let mut value = Map::new();
        value.insert("query".to_string(), query.into());
        value.insert("fuzziness".to_string(), fuzziness.into());
        Self::with_value(field, "fuzzy", Value::Object(value))
    }

    /// Fuzzy match with an explicit fuzziness against all fields.
    pub fn fuzzy_any_with(query: impl Into<Value>, fuzziness: impl Into<Value>) -> Self {
        Self::fuzzy_field_with(Self::ALL_FIELDS, query, fuzziness)
    }

    // Geo operators.

    /// The field's point lies inside a bounding box (`gp`).
    pub fn bounding_box(field: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self::with_value(field, "gp", Value::Array(bounding_box.points()))
    }

    /// Bounding box given as its two corner points.
    pub fn bounding_box_corners(
        field: impl Into<String>,
        upper_left: impl Into<Value>,
        lower_right: impl Into<Value>,
    ) -> Self {
        Self::with_value(
            field,
            "gp",
            Value::Array(vec![upper_left.into(), lower_right.into()]),
        )
    }

    /// The field's point lies within `max` of `center` (`gd`).
    pub fn distance(
        field: impl Into<String>,
        center: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        let mut value = Map::new();
        value.insert("location".to_string(), center.into());
        value.insert("max".to_string(), max.into());
        Self::with_value(field, "gd", Value::Object(value))
    }

    /// Distance filter taken from a circle's center and radius.
    pub fn distance_circle(field: impl Into<String>, circle: Circle) -> Self {
        Self::distance(field, circle.center(), circle.radius())
    }

    /// Distance filter with the distance band given as a range; the
    /// lower bound becomes `min`, the upper bound `max`, each omitted
    /// when absent.
    pub fn distance_range(
        field: impl Into<String>,
        center: impl Into<Value>,
        range: Range,
    ) -> Self {
        let mut value = Map::new();
        value.insert("location".to_string(), center.into());
        let (from, to) = range.bounds();
        if let Some(min) = from {
            value.insert("min".to_string(), min.clone());
        }
        if let Some(max) = to {
            value.insert("max".to_string(), max.clone());
        }
        Self::with_value(field, "gd", Value::Object(value))
    }

    /// The field's point lies inside the polygon (`gp`).
    pub fn polygon<I, V>(field: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let points: Vec<Value> = points.into_iter().map(Into::into).collect();
        Self::with_value(field, "gp", Value::Array(points))
    }

    /// The field's geometry intersects any of the given shapes (`gs`).
    pub fn shape<I, V>(field: impl Into<String>, shapes: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let shapes: Vec<Value> = shapes.into_iter().map(Into::into).collect();
        let mut value = Map::new();
        value.insert(
            "type".to_string(),
            Value::String("geometricshape".to_string()),
        );
        value.insert("shapes".to_string(), Value::Array(shapes));
        Self::with_value(field, "gs", Value::Object(value))
    }

    // Composition.

    /// Compose with another filter under `and`.
    pub fn and(mut self, filter: Filter) -> Self {
        self.body.add("and", filter.body);
        self
    }

    /// Build a predicate inline and compose it under `and`.
    pub fn and_field(
        self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.and(Filter::field(field, operator, value))
    }

    /// Compose with another filter under `or`.
    pub fn or(mut self, filter: Filter) -> Self {
        self.body.add("or", filter.body);
        self
    }

    /// Build a predicate inline and compose it under `or`.
    pub fn or_field(
        self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.or(Filter::field(field, operator, value))
    }

    /// Negate a filter: wraps its whole body as `{"not": ...}`.
    pub fn not(filter: Filter) -> Self {
        let mut body = filter.body;
        body.add_unary("not");
        Self { body }
    }

    /// Negate an inline predicate.
    pub fn not_field(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self::not(Filter::field(field, operator, value))
    }

    /// Disjunction-max of N filters: the first filter absorbs the rest
    /// under a `disMax` array. A single filter stays unwrapped; an
    /// empty input yields the empty composable root.
    pub fn dis_max_of(filters: impl IntoIterator<Item = Filter>) -> Self {
        let mut filters = filters.into_iter();
        match filters.next() {
            Some(mut first) => {
                first.body.add_many("disMax", filters.map(|f| f.body));
                first
            }
            None => Self {
                body: FilterBody::root(),
            },
        }
    }
}

impl Embodied for Filter {
    fn body(&self) -> &Value {
        self.body.body()
    }

    fn into_body(self) -> Value {
        self.body.into_body()
    }
}

impl From<Filter> for Value {
    fn from(filter: Filter) -> Value {
        filter.into_body()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.body(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Geo;
    use serde_json::json;

    #[test]
    fn test_leaf_predicate_shape() {
        assert_eq!(
            Filter::field("age", ">", 12).body(),
            &json!({"age": {"operator": ">", "value": 12}})
        );
    }

    #[test]
    fn test_equal_is_default_operator() {
        assert_eq!(
            Filter::equal("age", 12).body(),
            &json!({"age": {"operator": "=", "value": 12}})
        );
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(Filter::gt("age", 12).to_string(), r#"{"age":{"operator":">","value":12}}"#);
        assert_eq!(Filter::gte("age", 12).to_string(), r#"{"age":{"operator":">=","value":12}}"#);
        assert_eq!(Filter::lt("age", 12).to_string(), r#"{"age":{"operator":"<","value":12}}"#);
        assert_eq!(Filter::lte("age", 12).to_string(), r#"{"age":{"operator":"<=","value":12}}"#);
        assert_eq!(
            Filter::not_equal("age", 12).to_string(),
            r#"{"age":{"operator":"!=","value":12}}"#
        );
    }

    #[test]
    fn test_exists_omits_value_key() {
        assert_eq!(
            Filter::exists("age").to_string(),
            r#"{"age":{"operator":"exists"}}"#
        );
        assert_eq!(
            Filter::missing("age").to_string(),
            r#"{"age":{"operator":"missing"}}"#
        );
    }

    #[test]
    fn test_any_and_none() {
        assert_eq!(
            Filter::any("age", [12, 21, 25]).to_string(),
            r#"{"age":{"operator":"any","value":[12,21,25]}}"#
        );
        assert_eq!(
            Filter::none("age", [12, 21]).to_string(),
            r#"{"age":{"operator":"none","value":[12,21]}}"#
        );
    }

    #[test]
    fn test_range_filter_embeds_range_body() {
        assert_eq!(
            Filter::range("age", Range::range(12, 15)).to_string(),
            r#"{"age":{"operator":"range","value":{"from":12,"to":15}}}"#
        );
        assert_eq!(
            Filter::range_bounds("age", 12, 15).to_string(),
            r#"{"age":{"operator":"range","value":{"from":12,"to":15}}}"#
        );
    }

    #[test]
    fn test_same_operator_composition_accumulates_flat() {
        let filter = Filter::gt("age", 12)
            .and(Filter::lt("age", 15))
            .and(Filter::equal("name", "x"));
        assert_eq!(
            filter.body(),
            &json!({"and": [
                {"age": {"operator": ">", "value": 12}},
                {"age": {"operator": "<", "value": 15}},
                {"name": {"operator": "=", "value": "x"}}
            ]})
        );
    }

    #[test]
    fn test_cross_operator_composition_rewraps() {
        let filter = Filter::gt("age", 12)
            .and(Filter::lt("age", 15))
            .or(Filter::equal("x", 1));
        assert_eq!(
            filter.body(),
            &json!({"or": [
                {"and": [
                    {"age": {"operator": ">", "value": 12}},
                    {"age": {"operator": "<", "value": 15}}
                ]},
                {"x": {"operator": "=", "value": 1}}
            ]})
        );
    }

    #[test]
    fn test_not_wraps_whole_body_as_map() {
        assert_eq!(
            Filter::not(Filter::field("age", ">", 12)).to_string(),
            r#"{"not":{"age":{"operator":">","value":12}}}"#
        );
    }

    #[test]
    fn test_not_of_composed_filter() {
        let filter = Filter::not(Filter::gt("age", 12).and(Filter::lt("age", 15)));
        assert_eq!(
            filter.body(),
            &json!({"not": {"and": [
                {"age": {"operator": ">", "value": 12}},
                {"age": {"operator": "<", "value": 15}}
            ]}})
        );
    }

    #[test]
    fn test_dis_max_of() {
        let filter = Filter::dis_max_of(vec![
            Filter::equal("name", "a"),
            Filter::equal("name", "b"),
            Filter::equal("name", "c"),
        ]);
        assert_eq!(
            filter.body(),
            &json!({"disMax": [
                {"name": {"operator": "=", "value": "a"}},
                {"name": {"operator": "=", "value": "b"}},
                {"name": {"operator": "=", "value": "c"}}
            ]})
        );
    }

    #[test]
    fn test_dis_max_of_single_filter_stays_unwrapped() {
        let filter = Filter::dis_max_of(vec![Filter::equal("name", "a")]);
        assert_eq!(filter.body(), &json!({"name": {"operator": "=", "value": "a"}}));
    }

    #[test]
    fn test_root_accumulates_under_and() {
        let mut root = FilterBody::root();
        root.add("and", FilterBody::of("age", ">", Some(json!(12))));
        assert_eq!(
            root.body(),
            &json!({"and": [{"age": {"operator": ">", "value": 12}}]})
        );
    }

    #[test]
    fn test_text_operators_default_to_all_fields() {
        assert_eq!(
            Filter::match_any("foo").to_string(),
            r#"{"*":{"operator":"match","value":"foo"}}"#
        );
        assert_eq!(
            Filter::match_field("name", "foo").to_string(),
            r#"{"name":{"operator":"match","value":"foo"}}"#
        );
        assert_eq!(
            Filter::prefix_any("fo").to_string(),
            r#"{"*":{"operator":"prefix","value":"fo"}}"#
        );
        assert_eq!(
            Filter::phrase_field("name", "foo bar").to_string(),
            r#"{"name":{"operator":"phrase","value":"foo bar"}}"#
        );
    }

    #[test]
    fn test_similar_and_fuzzy_wrap_query() {
        assert_eq!(
            Filter::similar_field("name", "foo").to_string(),
            r#"{"name":{"operator":"similar","value":{"query":"foo"}}}"#
        );
        assert_eq!(
            Filter::fuzzy_any_with("foo", 2).to_string(),
            r#"{"*":{"operator":"fuzzy","value":{"query":"foo","fuzziness":2}}}"#
        );
    }

    #[test]
    fn test_bounding_box_filter_takes_corner_points() {
        let filter = Filter::bounding_box("shape", Geo::bounding_box(Geo::point(20, 0), Geo::point(0, 20)));
        assert_eq!(
            filter.to_string(),
            r#"{"shape":{"operator":"gp","value":[[20,0],[0,20]]}}"#
        );
        let corners = Filter::bounding_box_corners("shape", Geo::point(20, 0), Geo::point(0, 20));
        assert_eq!(corners.to_string(), filter.to_string());
    }

    #[test]
    fn test_distance_filters() {
        assert_eq!(
            Filter::distance("point", Geo::point(0, 0), "2km").to_string(),
            r#"{"point":{"operator":"gd","value":{"location":[0,0],"max":"2km"}}}"#
        );
        assert_eq!(
            Filter::distance_circle("point", Geo::circle(Geo::point(0, 0), "2km")).to_string(),
            r#"{"point":{"operator":"gd","value":{"location":[0,0],"max":"2km"}}}"#
        );
        assert_eq!(
            Filter::distance_range("point", Geo::point(0, 0), Range::range("1km", "2km")).to_string(),
            r#"{"point":{"operator":"gd","value":{"location":[0,0],"min":"1km","max":"2km"}}}"#
        );
        // An open lower bound leaves min out entirely.
        assert_eq!(
            Filter::distance_range("point", Geo::point(0, 0), Range::to("2km")).to_string(),
            r#"{"point":{"operator":"gd","value":{"location":[0,0],"max":"2km"}}}"#
        );
    }

    #[test]
    fn test_polygon_and_shape_filters() {
        let filter = Filter::polygon("shape", vec![Geo::point(0, 0), Geo::point(0, 10), Geo::point(10, 0)]);
        assert_eq!(
            filter.to_string(),
            r#"{"shape":{"operator":"gp","value":[[0,0],[0,10],[10,0]]}}"#
        );
        let shapes = Filter::shape("shape", vec![Geo::circle(Geo::point(0, 0), "2km")]);
        assert_eq!(
            shapes.to_string(),
            r#"{"shape":{"operator":"gs","value":{"type":"geometricshape","shapes":[{"type":"circle","coordinates":[0,0],"radius":"2km"}]}}}"#
        );
    }

    #[test]
    fn test_serialization_is_idempotent() {
        let filter = Filter::gt("age", 12).and(Filter::lt("age", 15));
        assert_eq!(filter.to_string(), filter.to_string());
    }

    #[test]
    fn test_arbitrary_operator_strings_accepted() {
        assert_eq!(
            Filter::field("age", "definitely-not-an-operator", 1).to_string(),
            r#"{"age":{"operator":"definitely-not-an-operator","value":1}}"#
        );
    }
}
