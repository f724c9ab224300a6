//! Application configuration.

#![allow(missing_docs)]

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication and authorization settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Public ticket lookup settings.
    #[serde(default)]
    pub lookup: LookupConfig,
    /// Admin account seeded at start-up.
    #[serde(default)]
    pub admin: Option<AdminSeedConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for client identity. Enable
    /// only behind a reverse proxy that sets these headers itself.
    #[serde(default)]
    pub trust_proxy: bool,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL. `postgres://` and `sqlite://` schemes are supported.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Require an admin session on review routes and an owning session on
    /// history routes.
    #[serde(default = "default_true")]
    pub enforce_admin: bool,
}

/// Ticket lookup configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// Shortest ticket suffix accepted by the public status lookup.
    #[serde(default = "default_min_suffix_len")]
    pub min_suffix_len: usize,
}

/// Admin account to create (or reset) when the server starts.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeedConfig {
    /// Login email.
    pub email: String,
    /// Plain-text password, hashed before storage.
    pub password: String,
    /// Username.
    #[serde(default = "default_admin_username")]
    pub username: String,
    /// Display name.
    #[serde(default = "default_admin_full_name")]
    pub full_name: String,
    /// Department.
    #[serde(default = "default_admin_department")]
    pub department: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

fn default_database_url() -> String {
    "sqlite://yellowshield.db?mode=rwc".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_min_connections() -> u32 {
    1
}

const fn default_true() -> bool {
    true
}

const fn default_min_suffix_len() -> usize {
    6
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_full_name() -> String {
    "System Admin".to_string()
}

fn default_admin_department() -> String {
    "IT".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            trust_proxy: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enforce_admin: default_true(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            min_suffix_len: default_min_suffix_len(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            lookup: LookupConfig::default(),
            admin: None,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `YELLOWSHIELD_ENV`)
    /// 3. Environment variables with `YELLOWSHIELD__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env =
            std::env::var("YELLOWSHIELD_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("YELLOWSHIELD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("YELLOWSHIELD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
