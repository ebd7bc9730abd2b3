//! # Schoolgate DB
//!
//! PostgreSQL pool initialization and a Postgres-backed
//! [`BlobStore`](schoolgate_core::BlobStore) for the access configuration.
//!
//! # Example
//!
//! ```ignore
//! use schoolgate_db::{PgBlobStore, init_db_pool};
//!
//! let pool = init_db_pool(&database_url).await?;
//! let store = PgBlobStore::new(pool);
//! store.migrate().await?;
//! ```

pub mod blob_store;

pub use blob_store::PgBlobStore;

/// Initializes a PostgreSQL connection pool.
///
/// The returned pool is cheaply cloneable and should be created once at
/// startup.
///
/// # Errors
///
/// Returns the connection error if the database cannot be reached.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    sqlx::PgPool::connect(database_url).await
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
