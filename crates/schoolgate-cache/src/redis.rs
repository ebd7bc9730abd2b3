//! Redis persistence backend.
//!
//! Configuration payloads are stored as plain string keys with no expiry:
//! they are the source of truth, not a cache of one.

use redis::{AsyncCommands, Client, aio::ConnectionManager};
use schoolgate_core::{BlobFuture, BlobStore, StoreError};
use tracing::{debug, instrument};

const BACKEND: &str = "redis";

/// Redis client with a shared, auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

/// Error type for Redis operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),
}

impl From<CacheError> for StoreError {
    fn from(err: CacheError) -> Self {
        StoreError::backend(BACKEND, err)
    }
}

impl RedisCache {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the URL is invalid or the server
    /// cannot be reached.
    pub async fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }

    /// Reads the raw payload under `key`.
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;

        debug!(cache.key = %key, cache.hit = value.is_some(), "Payload read");
        Ok(value)
    }

    /// Writes `bytes` under `key` without expiry.
    #[instrument(skip(self, bytes), fields(cache.operation = "SET"))]
    pub async fn set_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, bytes).await?;

        debug!(cache.key = %key, cache.bytes = bytes.len(), "Payload written");
        Ok(())
    }

    /// Deletes `key`.
    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    pub async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;

        debug!(cache.key = %key, "Payload deleted");
        Ok(())
    }
}

impl BlobStore for RedisCache {
    fn load<'a>(&'a self, key: &'a str) -> BlobFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move { Ok(self.get_bytes(key).await?) })
    }

    fn save<'a>(&'a self, key: &'a str, bytes: &'a [u8]) -> BlobFuture<'a, ()> {
        Box::pin(async move { Ok(self.set_bytes(key, bytes).await?) })
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}
