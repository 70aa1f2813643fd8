//! Description of the `playersPerTeam` migration.
//!
//! The migration adds a non-null integer column with a default value and then
//! copies an existing column into it for every row still holding that default.

use sea_query::{
    Alias, ColumnDef, Expr, PostgresQueryBuilder, Query, Table, TableAlterStatement,
    UpdateStatement,
};

/// Adds an integer column and backfills it from another column of the same table.
///
/// ## Backfill filter
///
/// The backfill only touches rows whose new column still equals [`default`](Self::default).
/// Right after the `ALTER` every existing row holds the default, so this selects
/// all pre-existing rows. The filter is always derived from the same `default`
/// field, so changing one changes the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddColumn {
    pub table: String,
    pub column: String,
    pub default: i32,
    pub backfill_from: String,
}

/// `tournaments."playersPerTeam"`, defaulting to 4 and backfilled from `"numPots"`.
pub fn players_per_team() -> AddColumn {
    AddColumn::new("tournaments", "playersPerTeam", 4, "numPots")
}

impl AddColumn {
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        default: i32,
        backfill_from: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            default,
            backfill_from: backfill_from.into(),
        }
    }

    pub fn alter_statement(&self) -> TableAlterStatement {
        Table::alter()
            .table(Alias::new(&self.table))
            .add_column(
                ColumnDef::new(Alias::new(&self.column))
                    .integer()
                    .not_null()
                    .default(self.default),
            )
            .to_owned()
    }

    pub fn backfill_statement(&self) -> UpdateStatement {
        Query::update()
            .table(Alias::new(&self.table))
            .value(
                Alias::new(&self.column),
                Expr::col(Alias::new(&self.backfill_from)),
            )
            .and_where(Expr::col(Alias::new(&self.column)).eq(self.default))
            .to_owned()
    }

    /// The `ALTER` and `UPDATE` statements, rendered for Postgres, in execution order.
    pub fn to_sql(&self) -> Vec<String> {
        vec![
            self.alter_statement().to_string(PostgresQueryBuilder),
            self.backfill_statement().to_string(PostgresQueryBuilder),
        ]
    }
}
