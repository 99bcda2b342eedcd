//! Persistence module split across logical submodules.

mod connection;
mod records;
mod sink;

pub use connection::{ensure_schema, open_database, resolve_database_path};
pub use records::{fetch_all_records, fetch_records, search_records};
pub use sink::SqliteSink;
