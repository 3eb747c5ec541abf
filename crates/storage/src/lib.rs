//! Database access for pg-index-migrate
//!
//! A single owned connection behind async traits, with a PostgreSQL
//! implementation on sqlx.

mod error;
#[cfg(feature = "postgres")]
mod pg;
pub mod traits;

pub use error::DbError;
#[cfg(feature = "postgres")]
pub use pg::{PgConnector, PgSchemaConnection};
pub use traits::{Connector, IndexRow, SchemaConnection};
