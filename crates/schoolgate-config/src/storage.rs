//! Access configuration storage settings.
//!
//! Selects the blob backend the access engine commits to and the prefix
//! used for its six logical keys.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Blob backend used to persist the access configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" | "local" => Ok(Self::File),
            "redis" => Ok(Self::Redis),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::File => "file",
            Self::Redis => "redis",
            Self::Postgres => "postgres",
        };
        f.write_str(name)
    }
}

/// Storage configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `STORAGE_BACKEND`: `memory`, `file`, `redis` or `postgres` (default: `file`)
/// - `STORAGE_DIR`: directory for the `file` backend (default: `storage/access`)
/// - `STORAGE_KEY_PREFIX`: prefix for every persisted key (default: `schoolgate`)
/// - `REDIS_URL`: Redis connection URL for the `redis` backend
/// - `DATABASE_URL`: PostgreSQL connection string for the `postgres` backend
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub dir: PathBuf,
    pub key_prefix: String,
    pub redis_url: String,
    pub database_url: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let backend = env::var("STORAGE_BACKEND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(StorageBackend::File);

        Self {
            backend,
            dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage/access")),
            key_prefix: env::var("STORAGE_KEY_PREFIX").unwrap_or_else(|_| "schoolgate".into()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into()),
            database_url: env::var("DATABASE_URL").ok(),
        }
    }

    /// In-memory configuration used by tests.
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            ..Self::default()
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            dir: PathBuf::from("storage/access"),
            key_prefix: "schoolgate".into(),
            redis_url: "redis://127.0.0.1:6379".into(),
            database_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert_eq!("LOCAL".parse::<StorageBackend>(), Ok(StorageBackend::File));
        assert_eq!("postgresql".parse::<StorageBackend>(), Ok(StorageBackend::Postgres));
        assert!("s3".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_memory_config_keeps_prefix() {
        let config = StorageConfig::memory();
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.key_prefix, "schoolgate");
    }
}
