pub mod access;
pub mod admin_access;
pub mod system;
