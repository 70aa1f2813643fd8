use async_trait::async_trait;
use sea_query::PostgresQueryBuilder;
use sqlx::{Connection, PgConnection, Postgres, Transaction};

use crate::{engine::Engine, error::Result, migration::AddColumn};

#[derive(Debug)]
pub struct PgEngine {
    conn: PgConnection,
}

impl PgEngine {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let conn = PgConnection::connect(database_url).await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl Engine for PgEngine {
    async fn column_exists(&mut self, table: &str, column: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.columns
                WHERE table_name = $1 AND column_name = $2
            )
            "#,
        )
        .bind(table)
        .bind(column)
        .fetch_one(&mut self.conn)
        .await?;

        Ok(exists)
    }

    async fn add_column(&mut self, migration: &AddColumn) -> Result<u64> {
        let alter = migration.alter_statement().to_string(PostgresQueryBuilder);
        let backfill = migration.backfill_statement().to_string(PostgresQueryBuilder);

        let mut tx = self.conn.begin().await?;

        tracing::debug!(statement = %alter, "executing");

        if let Err(e) = sqlx::query(&alter).execute(&mut *tx).await {
            rollback(tx).await;

            return Err(e.into());
        }

        tracing::debug!(statement = %backfill, "executing");

        let rows = match sqlx::query(&backfill).execute(&mut *tx).await {
            Ok(done) => done.rows_affected(),
            Err(e) => {
                rollback(tx).await;

                return Err(e.into());
            }
        };

        tx.commit().await?;

        Ok(rows)
    }

    async fn close(self) -> Result<()>
    where
        Self: Sized,
    {
        self.conn.close().await?;

        Ok(())
    }
}

/// Rolls back after a failed statement. A failed rollback is only logged so
/// the statement error stays the one reported.
async fn rollback(tx: Transaction<'_, Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!("failed to roll back transaction: {e}");
    }
}
