// ⚙️ Configuration - environment driven
//
// PLANT_DB_PATH  SQLite database file     (default: plants.db)
// HOST           bind address             (default: 0.0.0.0)
// PORT           bind port                (default: 3000)

use std::env;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "plants.db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("PLANT_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = lookup("PORT")
            .map(|port| port.trim().parse::<u16>().unwrap_or(DEFAULT_PORT))
            .unwrap_or(DEFAULT_PORT);

        Config {
            database_path,
            host,
            port,
        }
    }

    /// "host:port" for the TCP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
