//! Persistence backend selection.

use std::sync::Arc;

use anyhow::Context;
use schoolgate_access::{AccessConfig, ConfigurationStore};
use schoolgate_cache::RedisCache;
use schoolgate_config::{StorageBackend, StorageConfig};
use schoolgate_core::{BlobStore, LocalBlobStore, MemoryBlobStore};
use schoolgate_db::{PgBlobStore, init_db_pool};
use tracing::info;

/// Build the blob backend named by `config.backend`.
///
/// The Postgres backend runs its migrations before it is returned.
pub async fn open_backend(config: &StorageConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    let backend: Arc<dyn BlobStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryBlobStore::new()),
        StorageBackend::File => Arc::new(LocalBlobStore::new(config.dir.clone())),
        StorageBackend::Redis => Arc::new(
            RedisCache::new(&config.redis_url)
                .await
                .context("Failed to connect to Redis")?,
        ),
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres backend")?;
            let pool = init_db_pool(url)
                .await
                .context("Failed to connect to database")?;
            let store = PgBlobStore::new(pool);
            store.migrate().await.context("Failed to run migrations")?;
            Arc::new(store)
        }
    };

    info!(backend = backend.backend(), "Storage backend ready");
    Ok(backend)
}

/// Open the backend and load the committed configuration over `defaults`.
pub async fn open_store(
    config: &StorageConfig,
    defaults: AccessConfig,
) -> anyhow::Result<ConfigurationStore> {
    let backend = open_backend(config).await?;
    let store = ConfigurationStore::init(backend, &config.key_prefix, defaults)
        .await
        .context("Failed to load access configuration")?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolgate_access::defaults;

    #[tokio::test]
    async fn test_memory_backend() {
        let backend = open_backend(&StorageConfig::memory()).await.unwrap();
        assert_eq!(backend.backend(), "memory");
    }

    #[tokio::test]
    async fn test_file_backend_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::File,
            dir: dir.path().to_path_buf(),
            ..StorageConfig::memory()
        };

        let store = open_store(&config, defaults::shipped()).await.unwrap();
        store.flush().await.unwrap();

        let reopened = open_store(&config, defaults::shipped()).await.unwrap();
        assert_eq!(reopened.fingerprint(), store.fingerprint());
        assert!(std::fs::read_dir(dir.path()).unwrap().count() >= 6);
    }

    #[tokio::test]
    async fn test_postgres_without_url_is_an_error() {
        let config = StorageConfig {
            backend: StorageBackend::Postgres,
            database_url: None,
            ..StorageConfig::memory()
        };
        assert!(open_backend(&config).await.is_err());
    }
}
