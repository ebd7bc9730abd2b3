//! Administrative path: edit sessions over the access configuration.
//!
//! One session per token subject, kept in [`AppState::sessions`](crate::state::AppState).

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
