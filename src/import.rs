//! Delimited bulk import: the one piece of this tool with a real contract.
//!
//! A CSV file is streamed line by line, tokenized with a quote-aware scanner,
//! mapped onto [`ImportRecord`]s, and submitted to a [`RecordSink`] in batches
//! inside a single transaction. A malformed line or a store failure anywhere
//! in the file rolls the whole import back, so the store either gains every
//! record or none of them.
//!
//! The scanner is deliberately not an RFC 4180 parser: it splits on commas
//! outside double quotes and strips one surrounding quote pair per field, but
//! it has no escaped-quote support. That matches the format `export` writes.

use std::io::BufRead;

use thiserror::Error;
use tracing::warn;

use crate::models::ImportRecord;
use crate::store::{RecordSink, StoreError};

/// Number of positional fields every data line must produce.
const FIELD_COUNT: usize = 8;

/// Why an import was aborted. Every variant is terminal for the invocation
/// and guarantees the transaction was rolled back before surfacing (except
/// `EmptyInput`, which fails before a transaction is ever opened).
#[derive(Debug, Error)]
pub enum ImportError {
    /// The stream held no header line at all.
    #[error("input is empty: expected a header line")]
    EmptyInput,

    /// A data line produced the wrong number of tokens or a numeric field
    /// that does not parse. Carries the 1-based data-line number and the raw
    /// text so the user can find and fix the offending line.
    #[error("malformed line {line_number}: {raw_line:?}")]
    MalformedLine { line_number: u64, raw_line: String },

    /// The sink rejected a batch, the commit, or the transaction open.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Reading from the source failed mid-file.
    #[error("failed to read from import source")]
    Io(#[from] std::io::Error),
}

/// Result of a completed import. Only produced on full success; any failure
/// path returns an [`ImportError`] instead and leaves the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Every data line seen, blank ones included. The header does not count.
    pub lines_read: u64,
    /// Records actually committed, i.e. the non-blank well-formed lines.
    pub records_committed: u64,
}

/// Import `source` into `sink`, flushing every `batch_size` records.
///
/// See [`import_with_progress`] for the full contract; this variant simply
/// drops the progress notifications.
pub fn import<R: BufRead, S: RecordSink>(
    source: R,
    sink: &mut S,
    batch_size: usize,
) -> Result<ImportOutcome, ImportError> {
    import_with_progress(source, sink, batch_size, |_| {})
}

/// Import `source` into `sink`, invoking `progress` with the running line
/// count after each flushed batch.
///
/// The first line is treated as a header and discarded without validation; an
/// entirely empty stream fails with [`ImportError::EmptyInput`] before any
/// transaction is opened. All data lines are written inside one transaction,
/// which is committed only after the final partial batch succeeds. On any
/// failure the transaction is rolled back before the error is returned, so no
/// partial import is ever observable.
pub fn import_with_progress<R, S, F>(
    mut source: R,
    sink: &mut S,
    batch_size: usize,
    progress: F,
) -> Result<ImportOutcome, ImportError>
where
    R: BufRead,
    S: RecordSink,
    F: FnMut(u64),
{
    // The CLI range-checks the flag; the clamp keeps a zero from looping
    // forever if the library is called directly.
    let batch_size = batch_size.max(1);

    let mut header = String::new();
    if source.read_line(&mut header)? == 0 {
        return Err(ImportError::EmptyInput);
    }

    sink.begin()?;

    let result = drain_lines(source, sink, batch_size, progress)
        .and_then(|outcome| {
            sink.commit()?;
            Ok(outcome)
        });

    match result {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            // Surface the original error even if the rollback itself fails;
            // SQLite may already have unwound the transaction on its own.
            if let Err(rb_err) = sink.rollback() {
                warn!("rollback after failed import also failed: {rb_err}");
            }
            Err(err)
        }
    }
}

/// Process every data line, flushing full batches as they accumulate. Returns
/// with the final partial batch already submitted but the transaction still
/// open; committing is the caller's decision.
fn drain_lines<R, S, F>(
    mut source: R,
    sink: &mut S,
    batch_size: usize,
    mut progress: F,
) -> Result<ImportOutcome, ImportError>
where
    R: BufRead,
    S: RecordSink,
    F: FnMut(u64),
{
    let mut batch: Vec<ImportRecord> = Vec::with_capacity(batch_size);
    let mut lines_read = 0u64;
    let mut records_committed = 0u64;
    let mut line = String::new();

    loop {
        line.clear();
        if source.read_line(&mut line)? == 0 {
            break;
        }
        lines_read += 1;

        let raw = line.trim_end_matches('\n').trim_end_matches('\r');
        if raw.trim().is_empty() {
            continue;
        }

        batch.push(parse_line(raw, lines_read)?);

        if batch.len() == batch_size {
            sink.insert_batch(&batch)?;
            records_committed += batch.len() as u64;
            batch.clear();
            progress(lines_read);
        }
    }

    if !batch.is_empty() {
        sink.insert_batch(&batch)?;
        records_committed += batch.len() as u64;
    }

    Ok(ImportOutcome {
        lines_read,
        records_committed,
    })
}

/// Map one non-blank data line onto a record. `line_number` is 1-based over
/// data lines, header excluded, and is echoed in the error on failure.
fn parse_line(raw: &str, line_number: u64) -> Result<ImportRecord, ImportError> {
    let malformed = || ImportError::MalformedLine {
        line_number,
        raw_line: raw.to_string(),
    };

    let fields = split_fields(raw);
    if fields.len() != FIELD_COUNT {
        return Err(malformed());
    }

    let year: i32 = fields[0].parse().map_err(|_| malformed())?;
    let birth_count: i64 = fields[7].parse().map_err(|_| malformed())?;

    let mut it = fields.into_iter().skip(1);
    Ok(ImportRecord {
        year,
        record_type: it.next().unwrap_or_default(),
        area_code: it.next().unwrap_or_default(),
        area_name: it.next().unwrap_or_default(),
        gender: it.next().unwrap_or_default(),
        birth_weight: it.next().unwrap_or_default(),
        multiple_birth: it.next().unwrap_or_default(),
        birth_count,
    })
}

/// Split a line on commas that fall outside double quotes, then clean each
/// token. Single pass, tracking only an "inside quotes" flag; no escaped
/// quotes, no multi-line fields.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);

    fields.iter().map(|f| clean_field(f)).collect()
}

/// Trim surrounding whitespace, then strip one leading and one trailing
/// double quote independently if present. Interior quotes are left alone.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let stripped = stripped.strip_suffix('"').unwrap_or(stripped);
    stripped.trim().to_string()
}
