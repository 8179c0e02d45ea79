//! Integration test utilities for the Conduit server
//!
//! This crate provides an in-memory store implementing every repository
//! port, helpers for building services and spawning the REST API on it,
//! and request fixtures.

pub mod fixtures;
pub mod store;

pub use fixtures::*;
pub use helpers::*;
pub use store::MemoryStore;
