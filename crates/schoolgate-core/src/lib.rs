//! # Schoolgate Core
//!
//! Core types, errors, and the persistence contract for Schoolgate.
//!
//! This crate provides foundational types used throughout the workspace:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`blob_store`]: The key/value blob contract the access engine persists through,
//!   with in-memory and local filesystem implementations
//!
//! # Example
//!
//! ```ignore
//! use schoolgate_core::blob_store::{BlobStore, MemoryBlobStore};
//! use schoolgate_core::errors::AppError;
//!
//! let store = MemoryBlobStore::new();
//! store.save("schoolgate:access:rolePermissions", b"{}").await?;
//! let bytes = store.load("schoolgate:access:rolePermissions").await?;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Unknown registry"));
//! ```

pub mod blob_store;
pub mod errors;

// Re-export commonly used types at crate root
pub use blob_store::{BlobFuture, BlobStore, LocalBlobStore, MemoryBlobStore, StoreError};
pub use errors::AppError;
