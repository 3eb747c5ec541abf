//! Operator-facing stdout report.

use std::io::{self, Write};
use std::path::Path;

use pg_index_migrate_core::{IndexStatement, SqlSource, redact_database_url};
use pg_index_migrate_storage::IndexRow;

use crate::error::MigrationError;

const RULE_WIDTH: usize = 60;

fn rule<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

pub(crate) fn banner<W: Write>(
    out: &mut W,
    migration_file: &Path,
    database_url: &str,
    source: SqlSource,
    statement: &IndexStatement,
) -> io::Result<()> {
    rule(out)?;
    writeln!(out, "DATABASE MIGRATION - Apply Composite Index")?;
    rule(out)?;
    writeln!(out, "\nMigration file: {}", migration_file.display())?;
    writeln!(out, "Database: {}", redact_database_url(database_url))?;
    writeln!(out, "SQL source: {source}")?;
    writeln!(out, "\nSQL to execute:\n{}\n", statement.sql)?;
    rule(out)
}

pub(crate) fn verified<W: Write>(out: &mut W, row: &IndexRow) -> io::Result<()> {
    writeln!(out, "✓ Index verified successfully!")?;
    writeln!(out, "\n  Index name: {}", row.index_name)?;
    writeln!(out, "  Table name: {}", row.table_name)?;
    writeln!(out, "  Definition: {}", row.index_definition)?;
    writeln!(out)?;
    rule(out)?;
    writeln!(out, "MIGRATION COMPLETED SUCCESSFULLY")?;
    rule(out)
}

pub(crate) fn failure<W: Write>(out: &mut W, err: &MigrationError) -> io::Result<()> {
    match err {
        MigrationError::ConfigurationMissing { .. }
        | MigrationError::ConfigurationInvalid { .. }
        | MigrationError::ResourceMissing { .. } => writeln!(out, "ERROR: {err}"),
        MigrationError::Database(db) => writeln!(out, "\n✗ Database error: {db}"),
        MigrationError::VerificationFailed { .. } => {
            writeln!(out, "✗ WARNING: Index not found after creation")
        },
        MigrationError::Unexpected(e) => writeln!(out, "\n✗ Unexpected error: {e:#}"),
    }
}

pub(crate) fn closed<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\nDatabase connection closed.")
}
