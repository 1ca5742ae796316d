use lagoon_core::{Embodied, Query, Search};
use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::collection::Collection;
use crate::config::Config;
use crate::{ClientError, Result};

/// Lagoon REST API client.
///
/// Finished query documents are attached to outgoing requests in one of
/// two ways: each top-level key of a [`Query`] becomes a URL query
/// parameter holding that key's compact JSON (GET), or the whole
/// document is sent as the JSON body (search POST).
pub struct Client {
    base_url: String,
    default_limit: u64,
    http: HttpClient,
}

impl Client {
    /// Create a new client connected to the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(Config {
            base_url: base_url.into(),
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            base_url: config.base_url,
            default_limit: config.default_limit,
            http: HttpClient::new(),
        }
    }

    pub(crate) fn default_limit(&self) -> u64 {
        self.default_limit
    }

    /// A fluent handle on one collection path.
    pub fn collection(&self, path: impl Into<String>) -> Result<Collection<'_>> {
        let path = path.into();
        if path.is_empty() {
            return Err(ClientError::InvalidArguments(
                "collection path must not be empty".to_string(),
            ));
        }
        Ok(Collection::new(self, path))
    }

    /// GET with the query document spread over URL parameters.
    pub async fn get(&self, path: &str, query: &Query) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self.http.get(&url);
        if let Value::Object(map) = query.body() {
            for (key, value) in map {
                // Compact JSON per parameter; reqwest percent-encodes.
                request = request.query(&[(key.as_str(), value.to_string())]);
            }
        }
        tracing::debug!(%url, query = %query, "fetching collection");

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Server {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }

    /// POST with the whole query document as the JSON body.
    pub async fn post(&self, path: &str, query: &Query) -> Result<Value> {
        self.post_body(path, query.body()).await
    }

    /// POST a search document as the JSON body.
    pub async fn search(&self, path: &str, search: &Search) -> Result<Value> {
        self.post_body(path, search.body()).await
    }

    async fn post_body(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, "sending search request");

        let response = self.http.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Server {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_path_rejected() {
        let client = Client::new("http://localhost:8080");
        assert!(matches!(
            client.collection(""),
            Err(ClientError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_collection_path_accepted() {
        let client = Client::new("http://localhost:8080");
        assert!(client.collection("movies").is_ok());
    }
}
