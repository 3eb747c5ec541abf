use thiserror::Error;

/// Errors raised while turning migration SQL into an [`crate::IndexStatement`].
#[derive(Debug, Error)]
pub enum StatementError {
    #[error("sql parse error: {0}")]
    Parse(String),

    #[error("no CREATE INDEX statement found in migration SQL")]
    NoCreateIndex,

    /// `CREATE INDEX ON t (...)` leaves the name to the server, so there is
    /// nothing to look up afterwards.
    #[error("CREATE INDEX statement has no index name")]
    UnnamedIndex,

    #[error("invalid identifier in CREATE INDEX statement: {0:?}")]
    InvalidIdentifier(String),
}
