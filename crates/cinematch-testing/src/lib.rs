//! Test utilities for CineMatch services.
//!
//! Provides shared in-memory repository implementations with the same
//! concurrency semantics as the database-backed ones, a recording notifier,
//! and gateway identity header helpers. Import in `#[cfg(test)]` blocks and
//! integration tests only, never in production code.

pub mod identity;
pub mod memory;
