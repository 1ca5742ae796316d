//! Lagoon Client Library
//!
//! HTTP client for the Lagoon data/search REST API. Query documents are
//! built with `lagoon-core` and attached here either as URL query
//! parameters (fetch/count requests) or as the JSON request body
//! (search requests).

mod client;
mod collection;
mod config;

pub use client::Client;
pub use collection::Collection;
pub use config::Config;
pub use lagoon_core::{Aggregation, Embodied, Filter, Geo, Query, Range, Search};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Missing precondition: {0}")]
    MissingPrecondition(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
