//! # Schoolgate CLI
//!
//! Administrative commands over the access engine, plus the storage backend
//! factory shared with the HTTP service.
//!
//! # Modules
//!
//! - [`storage`]: Opens the configured persistence backend and store
//! - [`commands`]: One function per subcommand, returning printable output

pub mod commands;
pub mod storage;

pub use storage::{open_backend, open_store};
