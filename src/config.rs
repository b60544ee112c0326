use crate::dotenv;
use crate::error::Error;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
pub const MAX_CONNECTIONS: &str = "MAX_CONNECTIONS";
pub const TEMPLATE_DIR: &str = "TEMPLATE_DIR";
pub const STATIC_DIR: &str = "STATIC_DIR";

/// `DATABASE_URL` prefix selecting the in-process store.
pub const MEMORY_URL: &str = "memory://";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub max_connections: u32,
    pub template_dir: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL).ok_or_else(|| Error::ServerError(format!("environment variable {} not been set", DATABASE_URL)))?;
        let max_connections = match lookup(MAX_CONNECTIONS) {
            Some(v) => v
                .parse()
                .map_err(|_| Error::ServerError(format!("invalid {}: {}", MAX_CONNECTIONS, v)))?,
            None => 5,
        };
        Ok(Self {
            database_url,
            bind_address: lookup(BIND_ADDRESS).unwrap_or_else(|| "0.0.0.0:8000".into()),
            max_connections,
            template_dir: lookup(TEMPLATE_DIR).unwrap_or_else(|| "templates".into()),
            static_dir: lookup(STATIC_DIR).unwrap_or_else(|| "static".into()),
        })
    }

    pub fn is_memory(&self) -> bool {
        self.database_url.starts_with(MEMORY_URL)
    }
}
