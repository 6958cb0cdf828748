use crate::error::{KanbanError, Result};
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(KanbanError::ConfigError(format!(
                "Invalid environment '{}'. Valid environments: development, production, test",
                s
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Where boards, columns and cards are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    /// SQLite database file; `None` for a private in-memory database
    Sqlite(Option<String>),
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub database_url: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    const DATABASE_URL: &'static str = "DATABASE_URL";
    const APP_ENV: &'static str = "APP_ENV";
    const LOG_LEVEL: &'static str = "LOG_LEVEL";

    /// Reads `DATABASE_URL` (required), `APP_ENV` and `LOG_LEVEL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, e.g. a map in tests
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup(Self::DATABASE_URL).ok_or_else(|| {
            KanbanError::ConfigError(format!("{} must be set", Self::DATABASE_URL))
        })?;
        let environment = match lookup(Self::APP_ENV) {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };
        let log_level = lookup(Self::LOG_LEVEL).unwrap_or_else(default_log_level);

        let config = Self {
            database_url,
            environment,
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| KanbanError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.storage_backend().map(|_| ())
    }

    /// Resolves `database_url` to a storage backend
    ///
    /// Accepted forms: `memory:`, `sqlite::memory:` and `sqlite:<path>`.
    pub fn storage_backend(&self) -> Result<StorageBackend> {
        let url = self.database_url.trim();
        if url == "memory:" {
            return Ok(StorageBackend::Memory);
        }
        match url.strip_prefix("sqlite:") {
            Some(":memory:") => Ok(StorageBackend::Sqlite(None)),
            Some(path) if !path.is_empty() => {
                let path = path.strip_prefix("//").unwrap_or(path);
                Ok(StorageBackend::Sqlite(Some(path.to_string())))
            }
            _ => Err(KanbanError::ConfigError(format!(
                "Unsupported database URL '{}'",
                self.database_url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "memory:")])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.storage_backend().unwrap(), StorageBackend::Memory);
    }

    #[test]
    fn test_from_lookup_requires_database_url() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, KanbanError::ConfigError(_)));
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite://data/kanban.db"),
            ("APP_ENV", "Production"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.storage_backend().unwrap(),
            StorageBackend::Sqlite(Some("data/kanban.db".to_string()))
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup(&[
            ("DATABASE_URL", "memory:"),
            ("APP_ENV", "staging"),
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://db")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DATABASE_URL", "sqlite:")])).is_err());
    }

    #[test]
    fn test_from_toml_str() {
        let config = Config::from_toml_str(
            r#"
            database_url = "sqlite::memory:"
            environment = "test"
            "#,
        )
        .unwrap();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.storage_backend().unwrap(), StorageBackend::Sqlite(None));

        assert!(Config::from_toml_str("environment = \"test\"").is_err());
    }
}
