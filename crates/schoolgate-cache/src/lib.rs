//! # Schoolgate Cache
//!
//! Redis-backed persistence and HTTP cache validation for the Schoolgate API.
//!
//! This crate provides:
//! - [`RedisCache`], a [`BlobStore`](schoolgate_core::BlobStore) over Redis
//!   for the committed access configuration
//! - HTTP middleware that lets clients revalidate access decisions cheaply
//!   (ETag / `If-None-Match`, `Cache-Control`)
//!
//! # Example
//!
//! ```ignore
//! use schoolgate_cache::RedisCache;
//! use schoolgate_core::BlobStore;
//!
//! let cache = RedisCache::new("redis://127.0.0.1:6379").await?;
//! cache.save("schoolgate:access:rolePermissions", b"{}").await?;
//! ```

pub mod middleware;
pub mod redis;

pub use middleware::{CacheControlConfig, cache_control, etag_middleware};
pub use redis::{CacheError, RedisCache};
