//! PostgreSQL connection using sqlx.
//!
//! Uses a bare `PgConnection` rather than a pool: the runner needs exactly one
//! session. sqlx runs statements in autocommit mode unless a transaction is
//! begun, and none is.

use async_trait::async_trait;
use pg_index_migrate_core::redact_database_url;
use sqlx::{Connection, PgConnection};

use crate::traits::{Connector, IndexRow, SchemaConnection};
use crate::DbError;

const FIND_INDEX_SQL: &str = "SELECT indexname::text AS index_name, \
     tablename::text AS table_name, \
     indexdef AS index_definition \
     FROM pg_indexes \
     WHERE ($1::text IS NULL OR schemaname = $1) \
     AND tablename = $2 AND indexname = $3";

#[derive(Clone, Copy, Debug, Default)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self, database_url: &str) -> Result<Box<dyn SchemaConnection>, DbError> {
        let conn = PgConnection::connect(database_url)
            .await
            .map_err(|e| DbError::Connect(Box::new(e)))?;
        tracing::info!(database = %redact_database_url(database_url), "PostgreSQL connection opened");
        Ok(Box::new(PgSchemaConnection { conn }))
    }
}

#[derive(Debug)]
pub struct PgSchemaConnection {
    conn: PgConnection,
}

#[async_trait]
impl SchemaConnection for PgSchemaConnection {
    async fn execute(&mut self, sql: &str) -> Result<(), DbError> {
        // Simple-query protocol: DDL needs no parameters and may not be
        // preparable on every server version.
        let result = sqlx::Executor::execute(&mut self.conn, sqlx::raw_sql(sql))
            .await
            .map_err(|e| DbError::Execute(Box::new(e)))?;
        tracing::debug!(rows_affected = result.rows_affected(), "statement executed");
        Ok(())
    }

    async fn find_index(
        &mut self,
        schema: Option<&str>,
        table: &str,
        index: &str,
    ) -> Result<Option<IndexRow>, DbError> {
        sqlx::query_as::<_, IndexRow>(FIND_INDEX_SQL)
            .bind(schema)
            .bind(table)
            .bind(index)
            .fetch_optional(&mut self.conn)
            .await
            .map_err(|e| DbError::Query(Box::new(e)))
    }

    async fn close(self: Box<Self>) -> Result<(), DbError> {
        self.conn.close().await.map_err(|e| DbError::Close(Box::new(e)))?;
        tracing::debug!("PostgreSQL connection closed");
        Ok(())
    }
}
