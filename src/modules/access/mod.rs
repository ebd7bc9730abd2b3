//! Read path: access decisions for the calling role.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
