//! Connection trait abstraction
//!
//! The runner only sees these traits, so tests can substitute a recording
//! fake for PostgreSQL.

use async_trait::async_trait;

use crate::DbError;

/// One row of `pg_indexes` for the verified index.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct IndexRow {
    pub index_name: String,
    pub table_name: String,
    pub index_definition: String,
}

/// Opens connections.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a single autocommit connection.
    async fn connect(&self, database_url: &str) -> Result<Box<dyn SchemaConnection>, DbError>;
}

/// An open connection. `close` consumes it, so it can run at most once.
#[async_trait]
pub trait SchemaConnection: Send {
    /// Execute one DDL statement outside any transaction.
    async fn execute(&mut self, sql: &str) -> Result<(), DbError>;

    /// Look up an index in the catalog by table and index name, restricted to
    /// `schema` when one is given.
    async fn find_index(
        &mut self,
        schema: Option<&str>,
        table: &str,
        index: &str,
    ) -> Result<Option<IndexRow>, DbError>;

    /// Terminate the session.
    async fn close(self: Box<Self>) -> Result<(), DbError>;
}
