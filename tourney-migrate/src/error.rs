#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("DATABASE_URL not found in environment or .env file")]
    MissingDatabaseUrl,

    #[error("relation \"{0}\" does not exist")]
    UndefinedTable(String),

    #[error("column \"{column}\" of relation \"{table}\" does not exist")]
    UndefinedColumn { table: String, column: String },

    #[error("column \"{column}\" of relation \"{table}\" already exists")]
    DuplicateColumn { table: String, column: String },

    #[error("null value in column \"{column}\" of relation \"{table}\" violates not-null constraint")]
    NotNullViolation { table: String, column: String },

    #[cfg(feature = "pg")]
    #[error("sqlx `{0}`")]
    Sqlx(#[from] sqlx::Error),
}

impl MigrateError {
    /// Configuration errors are raised before any connection is attempted.
    pub fn is_config(&self) -> bool {
        matches!(self, MigrateError::MissingDatabaseUrl)
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
