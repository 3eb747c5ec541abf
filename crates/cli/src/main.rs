use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pg_index_migrate_core::{DEFAULT_MIGRATION_FILE, Settings, SqlSource};
use pg_index_migrate_storage::PgConnector;
use tracing_subscriber::EnvFilter;

mod error;
mod report;
mod runner;

use runner::MigrationRunner;

#[derive(Parser)]
#[command(name = "pg-index-migrate", version)]
#[command(
    about = "Apply the orders composite index to PostgreSQL and verify it in the catalog",
    long_about = None
)]
struct Cli {
    /// Migration file that must exist before the database is touched
    #[arg(short = 'f', long, default_value = DEFAULT_MIGRATION_FILE)]
    migration_file: PathBuf,

    /// Statement to execute: `embedded` or the first CREATE INDEX in the `file`
    #[arg(short = 's', long, default_value_t = SqlSource::Embedded)]
    sql_source: SqlSource,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env(cli.migration_file, cli.sql_source);
    let runner = MigrationRunner::new(PgConnector, settings);

    let mut stdout = std::io::stdout();
    ExitCode::from(runner.run(&mut stdout).await)
}
