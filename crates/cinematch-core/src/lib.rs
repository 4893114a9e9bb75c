//! Cross-cutting service plumbing shared by CineMatch services.

pub mod health;
pub mod identity;
pub mod middleware;
pub mod serde;
pub mod tracing;
