use rusqlite::{params, Connection};

use crate::models::ImportRecord;
use crate::store::{RecordSink, StoreError};

/// SQLite implementation of the importer's transactional sink.
///
/// Batches are submitted by executing one cached prepared INSERT per record
/// inside the surrounding transaction, which is how SQLite wants bulk loads
/// done: the transaction boundary, not a multi-VALUES statement, is what
/// amortizes the per-row cost.
pub struct SqliteSink<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSink<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl RecordSink for SqliteSink<'_> {
    fn begin(&mut self) -> Result<(), StoreError> {
        // IMMEDIATE takes the write lock up front so a concurrent writer
        // fails here instead of midway through the batches.
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(StoreError::new)
    }

    fn insert_batch(&mut self, records: &[ImportRecord]) -> Result<(), StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "INSERT INTO birth_statistics
                     (stat_year, record_type, area_code, area_name,
                      gender, birth_weight, multiple_birth, birth_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .map_err(StoreError::new)?;

        for record in records {
            stmt.execute(params![
                record.year,
                record.record_type,
                record.area_code,
                record.area_name,
                record.gender,
                record.birth_weight,
                record.multiple_birth,
                record.birth_count,
            ])
            .map_err(StoreError::new)?;
        }

        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("COMMIT").map_err(StoreError::new)
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("ROLLBACK").map_err(StoreError::new)
    }
}
