//! Error taxonomy for a migration run.
//!
//! Every variant is terminal: the runner prints it and exits non-zero.

use std::path::PathBuf;

use pg_index_migrate_core::StatementError;
use pg_index_migrate_storage::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum MigrationError {
    /// Required environment variable is unset or empty.
    #[error("{var} environment variable not set")]
    ConfigurationMissing { var: &'static str },

    /// Variable is set but not valid unicode, so its value was ignored.
    #[error("{var} environment variable is not valid unicode; value ignored")]
    ConfigurationInvalid { var: &'static str },

    #[error("Migration file not found: {}", path.display())]
    ResourceMissing { path: PathBuf },

    /// Connect, execute, or catalog query failed.
    #[error(transparent)]
    Database(#[from] DbError),

    /// The statement ran but the index is absent from the catalog.
    #[error("index {index} not found on table {table} after creation")]
    VerificationFailed { index: String, table: String },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl MigrationError {
    /// Process exit status for this failure. All failures share status 1.
    pub(crate) const fn exit_code(&self) -> u8 {
        1
    }

    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing { .. } => "configuration_missing",
            Self::ConfigurationInvalid { .. } => "configuration_invalid",
            Self::ResourceMissing { .. } => "resource_missing",
            Self::Database(_) => "database",
            Self::VerificationFailed { .. } => "verification_failed",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

impl From<StatementError> for MigrationError {
    fn from(err: StatementError) -> Self {
        Self::Unexpected(anyhow::Error::new(err).context("invalid migration file"))
    }
}

impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> Self {
        Self::Unexpected(err.into())
    }
}
