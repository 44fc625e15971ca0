use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; when absent the catalog is served from the seed file
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL; when absent preference profiles are kept in memory
    #[serde(default)]
    pub redis_url: Option<String>,

    /// JSON catalog loaded by the in-memory catalog, or seeded into an empty `movies` table
    #[serde(default = "default_catalog_seed_path")]
    pub catalog_seed_path: String,

    /// Seconds the cold-start list stays cached in Redis
    #[serde(default = "default_top_rated_cache_ttl")]
    pub top_rated_cache_ttl: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_seed_path() -> String {
    "data/movies.json".to_string()
}

fn default_top_rated_cache_ttl() -> u64 {
    300
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.catalog_seed_path, "data/movies.json");
        assert_eq!(config.top_rated_cache_ttl, 300);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("HOST".to_string(), "0.0.0.0".to_string()),
            ("REDIS_URL".to_string(), "redis://cache:6379".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
    }
}
