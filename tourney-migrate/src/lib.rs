//! Adds `playersPerTeam` to the `tournaments` table and backfills it from `numPots`.
//!
//! The migration is idempotent: the catalog is checked first and nothing is
//! executed when the column is already there. When it is missing, the `ALTER`
//! and the backfill `UPDATE` run in a single transaction.
//!
//! ```rust,ignore
//! use tourney_migrate::{Config, PgEngine, Runner};
//!
//! let outcome = Runner::new(Config::new("postgres://localhost/tourney"))
//!     .run(|url| async move { PgEngine::connect(&url).await })
//!     .await?;
//! ```
//!
//! # Features
//!
//! - **`pg`** - PostgreSQL engine backed by a single sqlx connection
//! - **`memory`** - In-process engine used to exercise the runner without a server

#![forbid(unsafe_code)]

mod config;
mod engine;
mod error;
mod migration;
mod runner;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use migration::*;
pub use runner::*;
