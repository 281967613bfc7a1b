use std::env;

use crate::domain::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Allowed CORS origin for the web client; any origin when unset
    pub client_url: Option<String>,
    /// Page size used when a listing request has no usable `limit`
    pub default_page_size: usize,
    /// Largest page a client may ask for
    pub max_page_size: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        Ok(Self {
            database_url,
            port: parse_var("PORT").unwrap_or(8080),
            client_url: env::var("CLIENT_URL").ok().filter(|v| !v.is_empty()),
            default_page_size: parse_var("DEFAULT_PAGE_SIZE")
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            max_page_size: parse_var("MAX_PAGE_SIZE")
                .filter(|n| *n > 0)
                .unwrap_or(MAX_PAGE_SIZE),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            port: 8080,
            client_url: None,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
