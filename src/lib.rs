//! Core library surface for the birthstats record manager.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the transactional bulk importer, the CSV exporter, and the SQLite
//! persistence layer behind them.
pub mod config;
pub mod db;
pub mod export;
pub mod import;
pub mod models;
pub mod store;

/// The bulk-import entry points and their result/error types.
pub use import::{import, import_with_progress, ImportError, ImportOutcome};

/// The two record shapes other layers manipulate.
pub use models::{BirthRecord, ImportRecord};

/// The transactional seam the importer writes through.
pub use store::{RecordSink, StoreError};
