//! Lagoon Core Library
//!
//! This crate provides the query construction core for the Lagoon SDK,
//! including:
//! - Filter predicates and boolean composition
//! - Range and geometry value builders
//! - Aggregation specs
//! - Query and Search top-level documents
//!
//! Everything here is pure data construction. Builders accumulate a
//! JSON document and serialize it compactly for the request layer; they
//! never perform I/O. Each builder instance owns its document and must
//! not be shared across concurrent call sites while being composed.

pub mod aggregation;
pub mod body;
pub mod filter;
pub mod geo;
pub mod query;
pub mod range;

// Re-export commonly used types
pub use aggregation::{Aggregation, DistanceAggregation, RangeAggregation};
pub use body::Embodied;
pub use filter::{Filter, FilterBody};
pub use geo::{BoundingBox, Circle, Geo, Line, Point, Polygon};
pub use query::{Query, Search};
pub use range::Range;
