//! Collection Search Example
//!
//! Queries a running Lagoon API server through the collection helper.
//!
//! Run with: cargo run --example collection_search

use lagoon_client::{Client, Filter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lagoon_client=debug")),
        )
        .init();

    let client = Client::new("http://localhost:8080");

    // Fetch: condition + sort spread over URL query parameters.
    let movies = client
        .collection("movies")?
        .where_field("year", ">", 2000)
        .or(Filter::equal("genre", "classic"))?
        .sort_desc("rating")
        .limit(5)
        .get()
        .await?;
    println!("fetch results: {movies}");

    // Count the whole collection.
    let total = client.collection("movies")?.count().await?;
    println!("total: {total}");

    // Search: document posted as the request body.
    let hits = client
        .collection("movies")?
        .where_filter(Filter::match_field("title", "star"))
        .highlight("title")
        .search()
        .await?;
    println!("search results: {hits}");

    Ok(())
}
