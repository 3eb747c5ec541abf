//! Run settings assembled from the process environment and CLI flags.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable holding the PostgreSQL connection URI.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Migration file read before any connection is attempted.
pub const DEFAULT_MIGRATION_FILE: &str =
    "./apps/dashboard/supabase/migrations/20260123_add_orders_composite_index.sql";

/// Where the executed statement comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlSource {
    /// Execute the built-in statement; the migration file only gates the run.
    #[default]
    Embedded,
    /// Execute the first `CREATE INDEX` statement found in the migration file.
    File,
}

impl SqlSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::File => "file",
        }
    }
}

impl fmt::Display for SqlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "embedded" => Ok(Self::Embedded),
            "file" => Ok(Self::File),
            other => Err(format!("unknown sql source {other:?}, expected `embedded` or `file`")),
        }
    }
}

/// State of the `DATABASE_URL` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    Set(String),
    /// Unset or blank.
    Missing,
    /// Set, but not valid unicode; the value is ignored.
    NotUnicode,
}

impl DatabaseUrl {
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Set(url) => Some(url),
            Self::Missing | Self::NotUnicode => None,
        }
    }

    fn from_lookup(lookup: Result<String, std::env::VarError>) -> Self {
        match lookup {
            Ok(v) if !v.trim().is_empty() => Self::Set(v),
            Ok(_) | Err(std::env::VarError::NotPresent) => Self::Missing,
            Err(std::env::VarError::NotUnicode(_)) => Self::NotUnicode,
        }
    }
}

impl From<Option<String>> for DatabaseUrl {
    fn from(value: Option<String>) -> Self {
        Self::from_lookup(value.ok_or(std::env::VarError::NotPresent))
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: DatabaseUrl,
    pub migration_file: PathBuf,
    pub sql_source: SqlSource,
}

impl Settings {
    pub fn new(
        database_url: impl Into<DatabaseUrl>,
        migration_file: impl Into<PathBuf>,
        sql_source: SqlSource,
    ) -> Self {
        Self { database_url: database_url.into(), migration_file: migration_file.into(), sql_source }
    }

    /// Read `DATABASE_URL` from the environment; flags come from the caller.
    pub fn from_env(migration_file: impl Into<PathBuf>, sql_source: SqlSource) -> Self {
        let database_url = DatabaseUrl::from_lookup(std::env::var(DATABASE_URL_VAR));
        if database_url == DatabaseUrl::NotUnicode {
            tracing::warn!(var = DATABASE_URL_VAR, "env var is not valid unicode, ignoring it");
        }
        Self::new(database_url, migration_file, sql_source)
    }
}
