use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; takes precedence over Supabase when set
    #[serde(default)]
    pub database_url: Option<String>,

    /// Supabase project URL
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// Supabase service role key
    #[serde(default)]
    pub supabase_service_key: Option<String>,

    /// Redis connection URL for the catalog cache
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Catalog cache lifetime in seconds, 0 disables caching
    #[serde(default)]
    pub catalog_cache_ttl_secs: u64,

    /// Number of exercises in each community template
    #[serde(default = "default_community_template_size")]
    pub community_template_size: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where workout data is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataBackend {
    Postgres { database_url: String },
    Supabase { url: String, service_key: String },
}

fn default_community_template_size() -> usize {
    6
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

    /// Selects the data backend: Postgres first, then Supabase
    pub fn data_backend(&self) -> anyhow::Result<DataBackend> {
        if let Some(database_url) = &self.database_url {
            return Ok(DataBackend::Postgres {
                database_url: database_url.clone(),
            });
        }

        match (&self.supabase_url, &self.supabase_service_key) {
            (Some(url), Some(service_key)) => Ok(DataBackend::Supabase {
                url: url.trim_end_matches('/').to_string(),
                service_key: service_key.clone(),
            }),
            _ => Err(anyhow::anyhow!(
                "Either DATABASE_URL or both SUPABASE_URL and SUPABASE_SERVICE_KEY must be set"
            )),
        }
    }

    /// Redis URL and TTL when the catalog cache is enabled
    pub fn catalog_cache(&self) -> Option<(&str, u64)> {
        match &self.redis_url {
            Some(url) if self.catalog_cache_ttl_secs > 0 => {
                Some((url.as_str(), self.catalog_cache_ttl_secs))
            }
            _ => None,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        envy::from_iter::<_, Config>(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.community_template_size, 6);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.catalog_cache().is_none());
    }

    #[test]
    fn test_postgres_takes_precedence() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/heronfit"),
            ("SUPABASE_URL", "https://example.supabase.co"),
            ("SUPABASE_SERVICE_KEY", "secret"),
        ]);

        assert_eq!(
            config.data_backend().unwrap(),
            DataBackend::Postgres {
                database_url: "postgres://localhost/heronfit".to_string()
            }
        );
    }

    #[test]
    fn test_supabase_backend_trims_trailing_slash() {
        let config = config_from(&[
            ("SUPABASE_URL", "https://example.supabase.co/"),
            ("SUPABASE_SERVICE_KEY", "secret"),
        ]);

        assert_eq!(
            config.data_backend().unwrap(),
            DataBackend::Supabase {
                url: "https://example.supabase.co".to_string(),
                service_key: "secret".to_string()
            }
        );
    }

    #[test]
    fn test_missing_backend_is_an_error() {
        let config = config_from(&[("SUPABASE_URL", "https://example.supabase.co")]);
        assert!(config.data_backend().is_err());
    }

    #[test]
    fn test_catalog_cache_requires_url_and_ttl() {
        let config = config_from(&[("REDIS_URL", "redis://localhost:6379")]);
        assert!(config.catalog_cache().is_none());

        let config = config_from(&[
            ("REDIS_URL", "redis://localhost:6379"),
            ("CATALOG_CACHE_TTL_SECS", "300"),
        ]);
        assert_eq!(config.catalog_cache(), Some(("redis://localhost:6379", 300)));
    }
}
