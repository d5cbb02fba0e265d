//! Database layer
//!
//! This module provides database access for the Inkshelf service. The service
//! is SQLite-only for single-binary deployment: repositories hold a
//! `SqlitePool` directly and all migrations are embedded in the binary.
//!
//! # Usage
//!
//! ```ignore
//! use inkshelf::config::DatabaseConfig;
//! use inkshelf::db::{create_pool, migrations};
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
