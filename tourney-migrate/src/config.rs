//! Runtime configuration for a migration run.

use crate::error::{MigrateError, Result};

/// Settings collected from the command line and the environment.
///
/// The connection string is kept optional here so that a missing value is
/// reported by the runner as a [`MigrateError::MissingDatabaseUrl`] before
/// any connection is attempted.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub database_url: Option<String>,
    pub dry_run: bool,
}

impl Config {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: Some(database_url.into()),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the connection string, treating an empty or blank value as absent.
    pub fn database_url(&self) -> Result<&str> {
        match self.database_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(MigrateError::MissingDatabaseUrl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_is_config_error() {
        let err = Config::default().database_url().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn blank_url_is_config_error() {
        let err = Config::new("  ").database_url().unwrap_err();
        assert!(matches!(err, MigrateError::MissingDatabaseUrl));
    }

    #[test]
    fn url_is_trimmed() {
        let config = Config::new(" postgres://localhost/app\n").dry_run(true);

        assert_eq!(config.database_url().unwrap(), "postgres://localhost/app");
        assert!(config.dry_run);
    }
}
