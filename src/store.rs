//! The seam between the importer and whatever persists records. The importer
//! only ever talks to a [`RecordSink`], so the SQLite adapter in `db::sink`
//! can be swapped for an in-memory double in tests without touching the core.

use std::error::Error;
use std::fmt;

use thiserror::Error as ThisError;

use crate::models::ImportRecord;

/// Failure surfaced by the data store: a rejected batch, a failed commit, or
/// a transaction that could not be opened. The underlying driver error is kept
/// as the source so callers can still drill into it.
#[derive(Debug, ThisError)]
#[error("data store error: {source}")]
pub struct StoreError {
    #[source]
    source: Box<dyn Error + Send + Sync>,
}

impl StoreError {
    pub fn new(source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Build a store error from a bare message, for sinks that have no
    /// structured driver error to wrap.
    pub fn message(msg: impl fmt::Display) -> Self {
        Self::new(msg.to_string())
    }
}

/// Transactional sink for parsed records.
///
/// The contract mirrors what the importer needs and nothing more: one
/// transaction per import, batches submitted inside it, and an explicit
/// commit-or-rollback decision at the end. Taking `&mut self` everywhere makes
/// "one import per sink at a time" structural rather than documented.
pub trait RecordSink {
    /// Open the transaction that all subsequent batches land in.
    fn begin(&mut self) -> Result<(), StoreError>;

    /// Submit one batch inside the open transaction. The whole batch is
    /// accepted or the whole batch is rejected.
    fn insert_batch(&mut self, records: &[ImportRecord]) -> Result<(), StoreError>;

    /// Make every batch submitted since `begin` durable.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Discard every batch submitted since `begin`.
    fn rollback(&mut self) -> Result<(), StoreError>;
}
