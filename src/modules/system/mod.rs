//! Liveness and metrics endpoints.

pub mod controller;
pub mod router;
