//! Postgres persistence backend.
//!
//! Each logical key is one row of `access_config`, upserted on save.

use schoolgate_core::{BlobFuture, BlobStore, StoreError};
use sqlx::PgPool;
use tracing::{debug, instrument};

const BACKEND: &str = "postgres";

#[derive(Clone, Debug)]
pub struct PgBlobStore {
    pool: PgPool,
}

impl PgBlobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled migrations (creates `access_config`).
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::backend(BACKEND, e))
    }

    #[instrument(skip(self), fields(db.operation = "SELECT"))]
    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>, sqlx::Error> {
        let payload: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT payload FROM access_config WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(db.key = %key, db.hit = payload.is_some(), "Payload read");
        Ok(payload)
    }

    #[instrument(skip(self, bytes), fields(db.operation = "UPSERT"))]
    async fn upsert(&self, key: &str, bytes: &[u8]) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO access_config (key, payload, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE
            SET payload = EXCLUDED.payload, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(bytes)
        .execute(&self.pool)
        .await?;

        debug!(db.key = %key, db.bytes = bytes.len(), "Payload written");
        Ok(())
    }
}

impl BlobStore for PgBlobStore {
    fn load<'a>(&'a self, key: &'a str) -> BlobFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move {
            self.fetch(key)
                .await
                .map_err(|e| StoreError::backend(BACKEND, e))
        })
    }

    fn save<'a>(&'a self, key: &'a str, bytes: &'a [u8]) -> BlobFuture<'a, ()> {
        Box::pin(async move {
            self.upsert(key, bytes)
                .await
                .map_err(|e| StoreError::backend(BACKEND, e))
        })
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Requires a running Postgres reachable through DATABASE_URL

    #[tokio::test]
    #[ignore = "requires Postgres"]
    async fn test_upsert_and_load() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let store = PgBlobStore::new(crate::init_db_pool(&url).await.unwrap());
        store.migrate().await.unwrap();

        let key = "schoolgate-test:access:assignmentsControls";
        store.save(key, b"{}").await.unwrap();
        store.save(key, br#"{"Teacher":{"grading":false}}"#).await.unwrap();

        let loaded = store.load(key).await.unwrap();
        assert_eq!(
            loaded.as_deref(),
            Some(&br#"{"Teacher":{"grading":false}}"#[..])
        );
    }

    #[tokio::test]
    #[ignore = "requires Postgres"]
    async fn test_missing_key_is_absent() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let store = PgBlobStore::new(crate::init_db_pool(&url).await.unwrap());
        store.migrate().await.unwrap();

        assert!(store.load("schoolgate-test:access:missing").await.unwrap().is_none());
    }
}
