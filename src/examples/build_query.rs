//! Query Builder Example
//!
//! Builds filter, aggregation and query documents without touching the
//! network, printing the exact wire form of each.
//!
//! Run with: cargo run --example build_query

use lagoon_client::{Aggregation, Filter, Geo, Query, Range, Search};

fn main() {
    // Leaf predicates
    println!("gt:      {}", Filter::gt("age", 12));
    println!("exists:  {}", Filter::exists("email"));
    println!("range:   {}", Filter::range("age", Range::range(12, 15)));

    // Boolean composition: same operator flattens, switching operators
    // nests the previous composition as one operand.
    let flat = Filter::gt("age", 12)
        .and(Filter::lt("age", 15))
        .and(Filter::equal("name", "x"));
    println!("and:     {flat}");

    let rewrapped = Filter::gt("age", 12)
        .and(Filter::lt("age", 15))
        .or(Filter::equal("admin", true));
    println!("or:      {rewrapped}");

    println!("not:     {}", Filter::not(Filter::equal("banned", true)));

    // Geo
    let nearby = Filter::distance("location", Geo::point(40.7, -74.0), "10km");
    println!("geo:     {nearby}");

    // A whole query document
    let query = Query::new()
        .filter(Filter::gt("rating", 3))
        .sort_desc("rating")
        .aggregate("by_decade", Aggregation::histogram("year", 10))
        .offset(0)
        .limit(20);
    println!("query:   {query}");

    // And its search-shaped sibling
    let search = Search::new()
        .pre_filter(Filter::equal("visible", true))
        .query(Filter::match_any("science fiction"))
        .highlight_size("title", 120)
        .cursor("page-2");
    println!("search:  {search}");
}
