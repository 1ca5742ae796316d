use std::fmt;

use serde_json::{Map, Value};

use crate::body::Embodied;

/// Factory for geometry documents consumed by filters and aggregations.
///
/// Point arguments throughout accept anything `Into<Value>`: a raw
/// `[lat, lon]` array, a `"lat,lon"` string, or a built [`Point`]. No
/// shape validation is performed; malformed coordinates pass through
/// to the server unchanged.
pub struct Geo;

macro_rules! embodied_shape {
    ($name:ident) => {
        impl Embodied for $name {
            fn body(&self) -> &Value {
                &self.body
            }

            fn into_body(self) -> Value {
                self.body
            }
        }

        impl From<$name> for Value {
            fn from(shape: $name) -> Value {
                shape.body
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.body, f)
            }
        }
    };
}

/// A coordinate pair, serialized as a bare `[lat, lon]` array.
#[derive(Debug, Clone)]
pub struct Point {
    body: Value,
}

embodied_shape!(Point);

/// `{"type":"linestring","coordinates":[...]}`
#[derive(Debug, Clone)]
pub struct Line {
    body: Value,
}

embodied_shape!(Line);

/// `{"type":"envelope","coordinates":[upper_left, lower_right]}`
#[derive(Debug, Clone)]
pub struct BoundingBox {
    body: Value,
}

embodied_shape!(BoundingBox);

/// `{"type":"circle","coordinates":center,"radius":radius}`
#[derive(Debug, Clone)]
pub struct Circle {
    body: Value,
}

embodied_shape!(Circle);

/// `{"type":"polygon","coordinates":[[...outer], [...holes]]}`
#[derive(Debug, Clone)]
pub struct Polygon {
    body: Value,
}

embodied_shape!(Polygon);

fn shape_body(kind: &str, coordinates: Value) -> Value {
    let mut body = Map::new();
    body.insert("type".to_string(), Value::String(kind.to_string()));
    body.insert("coordinates".to_string(), coordinates);
    Value::Object(body)
}

fn collect<I, V>(points: I) -> Vec<Value>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    points.into_iter().map(Into::into).collect()
}

impl Geo {
    /// A point, represented directly as a two-element array.
    pub fn point(lat: impl Into<Value>, lon: impl Into<Value>) -> Point {
        Point {
            body: Value::Array(vec![lat.into(), lon.into()]),
        }
    }

    /// A line through the given points.
    pub fn line<I, V>(points: I) -> Line
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Line {
            body: shape_body("linestring", Value::Array(collect(points))),
        }
    }

    /// An envelope between an upper-left and a lower-right corner.
    pub fn bounding_box(upper_left: impl Into<Value>, lower_right: impl Into<Value>) -> BoundingBox {
        BoundingBox {
            body: shape_body(
                "envelope",
                Value::Array(vec![upper_left.into(), lower_right.into()]),
            ),
        }
    }

    /// A circle around `center` with the given radius (e.g. `"2km"`).
    pub fn circle(center: impl Into<Value>, radius: impl Into<Value>) -> Circle {
        let mut body = Map::new();
        body.insert("type".to_string(), Value::String("circle".to_string()));
        body.insert("coordinates".to_string(), center.into());
        body.insert("radius".to_string(), radius.into());
        Circle {
            body: Value::Object(body),
        }
    }

    /// A polygon whose outer ring passes through the given points.
    pub fn polygon<I, V>(points: I) -> Polygon
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Polygon {
            body: shape_body(
                "polygon",
                Value::Array(vec![Value::Array(collect(points))]),
            ),
        }
    }
}

impl BoundingBox {
    /// The two corner points of the envelope.
    pub fn points(&self) -> Vec<Value> {
        match self.body.get("coordinates") {
            Some(Value::Array(points)) => points.clone(),
            _ => Vec::new(),
        }
    }
}

impl Circle {
    /// The center coordinate.
    pub fn center(&self) -> Value {
        self.body.get("coordinates").cloned().unwrap_or(Value::Null)
    }

    /// The radius value.
    pub fn radius(&self) -> Value {
        self.body.get("radius").cloned().unwrap_or(Value::Null)
    }
}

impl Polygon {
    /// Append another ring (a hole) to the polygon.
    pub fn hole<I, V>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if let Some(Value::Array(rings)) = self.body.get_mut("coordinates") {
            rings.push(Value::Array(collect(points)));
        }
        self
    }
}
