//! Storage layer for the capitals quiz service.
//!
//! Provides the SQLite-backed reference table of countries and capitals,
//! populated once from a static JSON seed file on first run.

pub mod models;
pub mod pool;
pub mod seed;
pub mod store;

pub use pool::DbPool;
pub use store::{CapitalStore, SeedReport, StoreError};
