use std::{net::SocketAddr, num::NonZeroUsize, str::FromStr};

use anyhow::Context;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub session_inactivity: time::Duration,
    pub secure_cookies: bool,
    pub broadcast_capacity: NonZeroUsize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://splinterstice.db".to_owned(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_connections: 16,
            session_inactivity: time::Duration::minutes(60),
            secure_cookies: false,
            broadcast_capacity: NonZeroUsize::new(64).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            database_url: dotenv::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: parse_var("BIND_ADDR", defaults.bind_addr)?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            session_inactivity: time::Duration::minutes(
                parse_var("SESSION_INACTIVITY_MINUTES", defaults.session_inactivity.whole_minutes())?
            ),
            secure_cookies: parse_var("SECURE_COOKIES", defaults.secure_cookies)?,
            broadcast_capacity: parse_var("BROADCAST_CAPACITY", defaults.broadcast_capacity)?,
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match dotenv::var(key) {
        Ok(raw) => parse_raw(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_raw<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().with_context(|| format!("parse {key}={raw}"))
}
