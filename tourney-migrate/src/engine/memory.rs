use async_trait::async_trait;
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

use crate::{
    engine::Engine,
    error::{MigrateError, Result},
    migration::AddColumn,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub not_null: bool,
    pub default: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    pub columns: Vec<Column>,
    pub rows: Vec<HashMap<String, Option<i32>>>,
}

impl MemoryTable {
    fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Every call the runner made against a [`Memory`] engine, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    ColumnExists,
    AlterTable,
    Update,
    Commit,
    Rollback,
    Close,
}

/// In-process catalog of integer-only tables.
///
/// Clones share the same state, so a test can keep one handle while the
/// runner consumes another.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    tables: Arc<RwLock<HashMap<String, MemoryTable>>>,
    calls: Arc<RwLock<Vec<Call>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates (or replaces) a table of nullable integer columns.
    pub fn create_table(&self, name: impl Into<String>, columns: &[&str]) {
        let columns = columns
            .iter()
            .map(|column| Column {
                name: column.to_string(),
                not_null: false,
                default: None,
            })
            .collect();

        self.tables.write().insert(
            name.into(),
            MemoryTable {
                columns,
                rows: vec![],
            },
        );
    }

    /// Inserts a row. Columns left out take their default, or NULL.
    pub fn insert(&self, table: &str, values: &[(&str, i32)]) -> Result<()> {
        let mut tables = self.tables.write();
        let data = tables
            .get_mut(table)
            .ok_or_else(|| MigrateError::UndefinedTable(table.to_owned()))?;

        if let Some((name, _)) = values.iter().find(|(name, _)| data.column(name).is_none()) {
            return Err(MigrateError::UndefinedColumn {
                table: table.to_owned(),
                column: name.to_string(),
            });
        }

        let mut row = HashMap::new();

        for column in data.columns.iter() {
            let value = values
                .iter()
                .find(|(name, _)| *name == column.name)
                .map(|(_, value)| *value)
                .or(column.default);

            if value.is_none() && column.not_null {
                return Err(MigrateError::NotNullViolation {
                    table: table.to_owned(),
                    column: column.name.to_owned(),
                });
            }

            row.insert(column.name.to_owned(), value);
        }

        data.rows.push(row);

        Ok(())
    }

    pub fn column(&self, table: &str, column: &str) -> Option<Column> {
        self.tables
            .read()
            .get(table)
            .and_then(|data| data.column(column).cloned())
    }

    /// Values of `column` for every row of `table`, in insertion order.
    pub fn values(&self, table: &str, column: &str) -> Vec<Option<i32>> {
        self.tables
            .read()
            .get(table)
            .map(|data| {
                data.rows
                    .iter()
                    .map(|row| row.get(column).copied().flatten())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.read().clone()
    }

    fn record(&self, call: Call) {
        self.calls.write().push(call);
    }

    fn stage(&self, migration: &AddColumn) -> Result<(MemoryTable, u64)> {
        let AddColumn {
            table,
            column,
            default,
            backfill_from,
        } = migration;

        self.record(Call::AlterTable);

        let mut staged = self
            .tables
            .read()
            .get(table)
            .cloned()
            .ok_or_else(|| MigrateError::UndefinedTable(table.to_owned()))?;

        if staged.column(column).is_some() {
            return Err(MigrateError::DuplicateColumn {
                table: table.to_owned(),
                column: column.to_owned(),
            });
        }

        staged.columns.push(Column {
            name: column.to_owned(),
            not_null: true,
            default: Some(*default),
        });

        for row in staged.rows.iter_mut() {
            row.insert(column.to_owned(), Some(*default));
        }

        self.record(Call::Update);

        if staged.column(backfill_from).is_none() {
            return Err(MigrateError::UndefinedColumn {
                table: table.to_owned(),
                column: backfill_from.to_owned(),
            });
        }

        let mut rows = 0;

        for row in staged.rows.iter_mut() {
            if row.get(column).copied().flatten() != Some(*default) {
                continue;
            }

            let value = row.get(backfill_from).copied().flatten();

            if value.is_none() {
                return Err(MigrateError::NotNullViolation {
                    table: table.to_owned(),
                    column: column.to_owned(),
                });
            }

            row.insert(column.to_owned(), value);
            rows += 1;
        }

        Ok((staged, rows))
    }
}

#[async_trait]
impl Engine for Memory {
    async fn column_exists(&mut self, table: &str, column: &str) -> Result<bool> {
        self.record(Call::ColumnExists);

        Ok(self.column(table, column).is_some())
    }

    async fn add_column(&mut self, migration: &AddColumn) -> Result<u64> {
        let (staged, rows) = match self.stage(migration) {
            Ok(staged) => staged,
            Err(e) => {
                self.record(Call::Rollback);

                return Err(e);
            }
        };

        self.tables.write().insert(migration.table.to_owned(), staged);
        self.record(Call::Commit);

        Ok(rows)
    }

    async fn close(self) -> Result<()>
    where
        Self: Sized,
    {
        self.record(Call::Close);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_uses_column_default() {
        let mut memory = Memory::new();
        memory.create_table("tournaments", &["numPots"]);

        let migration = AddColumn::new("tournaments", "playersPerTeam", 4, "numPots");
        memory.add_column(&migration).await.unwrap();
        memory.insert("tournaments", &[("numPots", 2)]).unwrap();

        assert_eq!(memory.values("tournaments", "playersPerTeam"), vec![Some(4)]);
    }

    #[test]
    fn insert_rejects_unknown_column() {
        let memory = Memory::new();
        memory.create_table("tournaments", &["numPots"]);

        let err = memory
            .insert("tournaments", &[("numPots", 2), ("teams", 8)])
            .unwrap_err();

        assert!(matches!(err, MigrateError::UndefinedColumn { .. }));
    }

    #[tokio::test]
    async fn backfill_rejects_null_source() {
        let mut memory = Memory::new();
        memory.create_table("tournaments", &["numPots"]);
        memory.insert("tournaments", &[]).unwrap();

        let migration = AddColumn::new("tournaments", "playersPerTeam", 4, "numPots");
        let err = memory.add_column(&migration).await.unwrap_err();

        assert!(matches!(err, MigrateError::NotNullViolation { .. }));
        assert!(memory.column("tournaments", "playersPerTeam").is_none());
        assert_eq!(memory.calls().last(), Some(&Call::Rollback));
    }
}
