use async_trait::async_trait;

use crate::{error::Result, migration::AddColumn};

#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "pg")]
mod pg;

#[cfg(feature = "memory")]
pub use memory::*;
#[cfg(feature = "pg")]
pub use pg::*;

/// A single scoped database connection the runner drives a migration through.
#[async_trait]
pub trait Engine: Send {
    /// Looks `table.column` up in the catalog.
    async fn column_exists(&mut self, table: &str, column: &str) -> Result<bool>;

    /// Runs the `ALTER` and the backfill in one transaction and returns the
    /// number of backfilled rows. Nothing persists when either statement fails.
    async fn add_column(&mut self, migration: &AddColumn) -> Result<u64>;

    async fn close(self) -> Result<()>
    where
        Self: Sized;
}
