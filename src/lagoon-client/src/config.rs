use serde::{Deserialize, Serialize};

/// Client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub base_url: String,

    /// Applied to collection fetches that set no explicit limit.
    #[serde(default = "default_limit")]
    pub default_limit: u64,
}

fn default_limit() -> u64 {
    10
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            default_limit: default_limit(),
        }
    }
}
