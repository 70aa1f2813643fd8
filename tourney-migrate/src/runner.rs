use std::future::Future;

use crate::{
    config::Config,
    engine::Engine,
    error::Result,
    migration::{self, AddColumn},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The column was already there; nothing was executed.
    AlreadyApplied,
    /// The column was added and `backfilled` rows were copied from the source column.
    Applied { backfilled: u64 },
    /// Dry run: the statements that would have been executed.
    Planned { statements: Vec<String> },
}

impl Outcome {
    /// Closing line printed once the connection is released.
    pub fn summary(&self) -> &'static str {
        match self {
            Outcome::AlreadyApplied | Outcome::Applied { .. } => {
                "🎉 Database update completed successfully!"
            }
            Outcome::Planned { .. } => "Dry run only, no changes were made to the database.",
        }
    }
}

/// Drives a single [`AddColumn`] migration through one engine connection.
#[derive(Debug, Clone)]
pub struct Runner {
    config: Config,
    migration: AddColumn,
}

impl Runner {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            migration: migration::players_per_team(),
        }
    }

    pub fn migration(mut self, migration: AddColumn) -> Self {
        self.migration = migration;
        self
    }

    /// Validates the configuration, connects through `connect` and applies the
    /// migration unless the column already exists.
    ///
    /// The connection is closed on every path once it has been opened. A
    /// failed close is logged and never hides the error of the run itself.
    pub async fn run<E, F, Fut>(&self, connect: F) -> Result<Outcome>
    where
        E: Engine,
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<E>>,
    {
        let database_url = self.config.database_url()?;

        println!("Connecting to database...");

        let mut engine = connect(database_url.to_owned()).await?;
        let outcome = self.apply(&mut engine).await;

        if let Err(e) = engine.close().await {
            tracing::warn!("failed to close connection: {e}");
        }

        let outcome = outcome?;

        println!("\n{}", outcome.summary());

        Ok(outcome)
    }

    async fn apply<E: Engine>(&self, engine: &mut E) -> Result<Outcome> {
        let AddColumn {
            table,
            column,
            backfill_from,
            ..
        } = &self.migration;

        if engine.column_exists(table, column).await? {
            tracing::info!(%table, %column, "column present, skipping");
            println!("Column '{column}' already exists!");

            return Ok(Outcome::AlreadyApplied);
        }

        if self.config.dry_run {
            let statements = self.migration.to_sql();

            println!("Column '{column}' is missing, would execute:");
            for statement in statements.iter() {
                println!("  {statement};");
            }

            return Ok(Outcome::Planned { statements });
        }

        println!("Adding '{column}' column...");

        let backfilled = engine.add_column(&self.migration).await?;

        tracing::info!(%table, %column, backfilled, "column added");
        println!("✅ Successfully added '{column}' column!");
        println!("✅ Updated existing {table} to use {backfill_from} as {column} ({backfilled} rows)");

        Ok(Outcome::Applied { backfilled })
    }
}
