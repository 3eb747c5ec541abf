//! Typed error enum for the database layer.
//!
//! Each variant names the step that failed so the runner can report it
//! without downcasting.

use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum DbError {
    /// Opening the connection failed.
    #[error("connect failed: {0}")]
    Connect(#[source] Source),

    /// The DDL statement was rejected.
    #[error("statement failed: {0}")]
    Execute(#[source] Source),

    /// The catalog lookup failed.
    #[error("catalog query failed: {0}")]
    Query(#[source] Source),

    /// Graceful shutdown of the connection failed.
    #[error("close failed: {0}")]
    Close(#[source] Source),
}

impl DbError {
    /// SQLSTATE code when the server returned one.
    #[cfg(feature = "postgres")]
    pub fn sqlstate(&self) -> Option<String> {
        let source = match self {
            Self::Connect(e) | Self::Execute(e) | Self::Query(e) | Self::Close(e) => e,
        };
        match source.downcast_ref::<sqlx::Error>() {
            Some(sqlx::Error::Database(db_err)) => db_err.code().map(|c| c.into_owned()),
            _ => None,
        }
    }
}
