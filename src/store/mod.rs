//! Persisted entity store.
//!
//! This module provides:
//! - SQLite initialization, pragmas, and schema migrations
//! - The `Repository` through which handlers read and write every entity

pub mod migrations;
pub mod repo;

pub use migrations::{init_db, run_migrations};
pub use repo::Repository;
