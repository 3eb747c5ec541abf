//! Apply-and-verify sequence for the index migration.
//!
//! Steps run strictly in order and every failure is terminal. Once a
//! connection is open it is closed exactly once, whatever happened after.

use std::io::Write;
use std::path::Path;

use pg_index_migrate_core::{DATABASE_URL_VAR, DatabaseUrl, IndexStatement, Settings, SqlSource};
use pg_index_migrate_storage::{Connector, IndexRow, SchemaConnection};

use crate::error::MigrationError;
use crate::report;

pub(crate) struct MigrationRunner<C> {
    connector: C,
    settings: Settings,
}

impl<C: Connector> MigrationRunner<C> {
    pub(crate) fn new(connector: C, settings: Settings) -> Self {
        Self { connector, settings }
    }

    /// Run the migration, writing the report to `out`. Returns the process
    /// exit status.
    pub(crate) async fn run<W: Write>(&self, out: &mut W) -> u8 {
        match self.apply(out).await {
            Ok(row) => {
                tracing::info!(index = %row.index_name, table = %row.table_name, "migration applied");
                0
            },
            Err(err) => {
                tracing::error!(kind = err.kind(), error = %err, "migration failed");
                err.exit_code()
            },
        }
    }

    async fn apply<W: Write>(&self, out: &mut W) -> Result<IndexRow, MigrationError> {
        let (database_url, statement) = match self.prepare().await {
            Ok(prepared) => prepared,
            Err(err) => {
                write_or_warn(report::failure(out, &err));
                return Err(err);
            },
        };

        report::banner(
            out,
            &self.settings.migration_file,
            database_url,
            self.settings.sql_source,
            &statement,
        )?;
        writeln!(out, "\nConnecting to database...")?;

        let mut conn = match self.connector.connect(database_url).await {
            Ok(conn) => conn,
            Err(err) => {
                let err = MigrationError::from(err);
                write_or_warn(report::failure(out, &err));
                return Err(err);
            },
        };

        let outcome = execute_and_verify(conn.as_mut(), &statement, out).await;
        let reported = match &outcome {
            Ok(row) => report::verified(out, row),
            Err(err) => report::failure(out, err),
        };

        match conn.close().await {
            Ok(()) => write_or_warn(report::closed(out)),
            Err(err) => tracing::warn!(error = %err, "failed to close database connection"),
        }

        let row = outcome?;
        reported?;
        Ok(row)
    }

    /// Gate on configuration and the migration file before touching the
    /// database.
    async fn prepare(&self) -> Result<(&str, IndexStatement), MigrationError> {
        let database_url = match &self.settings.database_url {
            DatabaseUrl::Set(url) => url.as_str(),
            DatabaseUrl::Missing => {
                return Err(MigrationError::ConfigurationMissing { var: DATABASE_URL_VAR });
            },
            DatabaseUrl::NotUnicode => {
                return Err(MigrationError::ConfigurationInvalid { var: DATABASE_URL_VAR });
            },
        };

        let path = &self.settings.migration_file;
        let contents = read_migration_file(path).await?;

        let statement = match self.settings.sql_source {
            SqlSource::Embedded => {
                tracing::debug!(
                    path = %path.display(),
                    bytes = contents.len(),
                    "migration file read; executing embedded statement"
                );
                IndexStatement::embedded()
            },
            SqlSource::File => IndexStatement::parse(&contents)?,
        };
        Ok((database_url, statement))
    }
}

async fn read_migration_file(path: &Path) -> Result<String, MigrationError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(contents),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(MigrationError::ResourceMissing { path: path.to_path_buf() })
        },
        Err(err) => Err(anyhow::Error::new(err)
            .context(format!("failed to read migration file {}", path.display()))
            .into()),
    }
}

async fn execute_and_verify<W: Write>(
    conn: &mut dyn SchemaConnection,
    statement: &IndexStatement,
    out: &mut W,
) -> Result<IndexRow, MigrationError> {
    writeln!(out, "Executing migration SQL...")?;
    conn.execute(&statement.sql).await?;
    writeln!(out, "✓ Migration executed successfully!")?;

    writeln!(out, "\nVerifying index creation...")?;
    conn.find_index(statement.schema.as_deref(), &statement.table, &statement.name)
        .await?
        .ok_or_else(|| MigrationError::VerificationFailed {
            index: statement.name.clone(),
            table: statement.table.clone(),
        })
}

fn write_or_warn(result: std::io::Result<()>) {
    if let Err(err) = result {
        tracing::warn!(error = %err, "failed to write report");
    }
}
