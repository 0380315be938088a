use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    Mongo,
    InMemory,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            _ => Err(ConfigError::InvalidStorageMode(value.to_string())),
        }
    }
}

/// Resolved storage backend. A Mongo backend always carries its URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Mongo { uri: String },
    InMemory,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid STORAGE_MODE '{0}'. Expected 'mongo' or 'in_memory'")]
    InvalidStorageMode(String),

    #[error("MONGO_URI must be set when STORAGE_MODE=mongo")]
    MissingMongoUri,

    #[error("Invalid boolean for {name}: '{value}'")]
    InvalidFlag { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: Storage,
    pub database_name: String,
    pub tasks_collection: String,
    pub mongo_transactions: bool,
    pub bind_address: String,
    pub frontend_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let storage_mode = match var("STORAGE_MODE") {
            Some(value) => value.parse()?,
            None => StorageMode::default(),
        };

        let storage = match storage_mode {
            StorageMode::InMemory => Storage::InMemory,
            StorageMode::Mongo => Storage::Mongo {
                uri: var("MONGO_URI").ok_or(ConfigError::MissingMongoUri)?,
            },
        };

        let mongo_transactions = match var("MONGO_TRANSACTIONS") {
            Some(value) => value.parse::<bool>().map_err(|_| ConfigError::InvalidFlag {
                name: "MONGO_TRANSACTIONS",
                value,
            })?,
            None => true,
        };

        Ok(Self {
            storage,
            database_name: var("DATABASE_NAME").unwrap_or_else(|| "todolist".to_string()),
            tasks_collection: var("TASKS_COLLECTION").unwrap_or_else(|| "tasks".to_string()),
            mongo_transactions,
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            frontend_origin: var("FRONTEND_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use rstest::rstest;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_the_uri_is_set() {
        let config = config_from(&[("MONGO_URI", "mongodb://localhost:27017")]).unwrap();

        assert_eq!(
            config.storage,
            Storage::Mongo {
                uri: "mongodb://localhost:27017".to_string()
            }
        );
        assert_eq!(config.database_name, "todolist");
        assert_eq!(config.tasks_collection, "tasks");
        assert!(config.mongo_transactions);
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.frontend_origin, "http://localhost:3000");
    }

    #[test]
    fn mongo_mode_requires_a_uri() {
        assert_eq!(config_from(&[]).unwrap_err(), ConfigError::MissingMongoUri);
        assert_eq!(
            config_from(&[("MONGO_URI", "  ")]).unwrap_err(),
            ConfigError::MissingMongoUri
        );
    }

    #[rstest]
    #[case("in_memory")]
    #[case("memory")]
    #[case(" InMemory ")]
    fn in_memory_mode_needs_no_uri(#[case] mode: &str) {
        let config = config_from(&[("STORAGE_MODE", mode)]).unwrap();
        assert_eq!(config.storage, Storage::InMemory);
    }

    #[test]
    fn in_memory_mode_ignores_a_stray_uri() {
        let config = config_from(&[
            ("STORAGE_MODE", "in_memory"),
            ("MONGO_URI", "mongodb://localhost:27017"),
        ])
        .unwrap();
        assert_eq!(config.storage, Storage::InMemory);
    }

    #[test]
    fn rejects_unknown_storage_mode() {
        assert!(matches!(
            config_from(&[("STORAGE_MODE", "postgres")]),
            Err(ConfigError::InvalidStorageMode(_))
        ));
    }

    #[test]
    fn parses_transaction_flag() {
        let config = config_from(&[("STORAGE_MODE", "in_memory"), ("MONGO_TRANSACTIONS", "false")])
            .unwrap();
        assert!(!config.mongo_transactions);

        assert!(matches!(
            config_from(&[("STORAGE_MODE", "in_memory"), ("MONGO_TRANSACTIONS", "nope")]),
            Err(ConfigError::InvalidFlag { name: "MONGO_TRANSACTIONS", .. })
        ));
    }
}
