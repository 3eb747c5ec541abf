//! Core types for pg-index-migrate
//!
//! Settings, the index statement applied by the runner, and helpers shared
//! by the storage and CLI crates.

mod error;
mod redact;
mod settings;
mod statement;

pub use error::*;
pub use redact::*;
pub use settings::*;
pub use statement::*;
