//! Application configuration.
//!
//! Settings come either from a TOML file:
//!
//! ```toml
//! [database]
//! url = "postgresql://${DB_USER}@localhost/jobly"
//! pool_max_size = 16
//!
//! [auth]
//! secret_key = "${SECRET_KEY}"
//!
//! [server]
//! port = 3001
//! ```
//!
//! or from the environment (`DATABASE_URL`, `SECRET_KEY`, `PORT`,
//! `JOBLY_ENV`), after loading a `.env` file if one exists.

use crate::error::{JoblyError, JoblyResult};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_DATABASE_URL: &str = "postgresql:///jobly";
const TEST_DATABASE_URL: &str = "postgresql:///jobly_test";
const DEFAULT_SECRET_KEY: &str = "secret-dev";
const DEFAULT_POOL_MAX_SIZE: usize = 16;
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoblyConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_pool_max_size() -> usize {
    DEFAULT_POOL_MAX_SIZE
}

fn default_secret_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl JoblyConfig {
    /// Load and validate a TOML config file, expanding `${VAR}` references.
    pub fn load(path: impl AsRef<Path>) -> JoblyResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            JoblyError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse and validate TOML config text, expanding `${VAR}` references.
    pub fn from_toml_str(raw: &str) -> JoblyResult<Self> {
        let mut config: JoblyConfig = toml::from_str(raw)
            .map_err(|e| JoblyError::Config(format!("failed to parse config: {e}")))?;
        config.expand_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build the config from the process environment, reading `.env` first.
    pub fn from_env() -> JoblyResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JoblyResult<Self> {
        let is_test = lookup("JOBLY_ENV").is_some_and(|v| v == "test");

        let url = match lookup("DATABASE_URL") {
            Some(url) if !is_test => url,
            _ if is_test => TEST_DATABASE_URL.to_string(),
            _ => default_database_url(),
        };

        let pool_max_size = match lookup("DATABASE_POOL_MAX_SIZE") {
            Some(v) => v.parse().map_err(|_| {
                JoblyError::Config(format!("DATABASE_POOL_MAX_SIZE is not a number: {v}"))
            })?,
            None => DEFAULT_POOL_MAX_SIZE,
        };

        let port = match lookup("PORT") {
            Some(v) => v
                .parse()
                .map_err(|_| JoblyError::Config(format!("PORT is not a valid port: {v}")))?,
            None => DEFAULT_PORT,
        };

        let config = Self {
            database: DatabaseConfig { url, pool_max_size },
            auth: AuthConfig {
                secret_key: lookup("SECRET_KEY").unwrap_or_else(default_secret_key),
            },
            server: ServerConfig { port },
        };
        config.validate()?;
        Ok(config)
    }

    fn expand_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> JoblyResult<()> {
        self.database.url = expand_env_vars(&self.database.url, &lookup)?;
        self.auth.secret_key = expand_env_vars(&self.auth.secret_key, &lookup)?;
        Ok(())
    }

    fn validate(&self) -> JoblyResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(JoblyError::Config("database.url must not be empty".to_string()));
        }
        if self.database.pool_max_size == 0 {
            return Err(JoblyError::Config(
                "database.pool_max_size must be > 0".to_string(),
            ));
        }
        if self.auth.secret_key.is_empty() {
            return Err(JoblyError::Config("auth.secret_key must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Replace every `${NAME}` in `input` with `lookup(NAME)`.
///
/// A `$` not followed by `{` is kept as is. Unknown, empty and unclosed
/// references are config errors.
fn expand_env_vars(input: &str, lookup: &impl Fn(&str) -> Option<String>) -> JoblyResult<String> {
    let mut expanded = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        expanded.push_str(&rest[..start]);
        let reference = &rest[start + 2..];
        let Some(len) = reference.find('}') else {
            return Err(JoblyError::Config(format!(
                "unclosed `${{` in config value: {input}"
            )));
        };

        let name = &reference[..len];
        if name.is_empty() {
            return Err(JoblyError::Config(format!(
                "empty `${{}}` in config value: {input}"
            )));
        }
        let value = lookup(name)
            .ok_or_else(|| JoblyError::Config(format!("environment variable {name} is not set")))?;
        expanded.push_str(&value);
        rest = &reference[len + 1..];
    }

    expanded.push_str(rest);
    Ok(expanded)
}
