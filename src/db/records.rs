use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::models::BirthRecord;

/// Cap applied to listing and search results. Matches the original tool's
/// behavior of never rendering more than 1000 rows at a time.
const RESULT_LIMIT: u32 = 1000;

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<BirthRecord> {
    Ok(BirthRecord {
        id: row.get(0)?,
        year: row.get(1)?,
        record_type: row.get(2)?,
        area_code: row.get(3)?,
        area_name: row.get(4)?,
        gender: row.get(5)?,
        birth_weight: row.get(6)?,
        multiple_birth: row.get(7)?,
        birth_count: row.get(8)?,
    })
}

/// Retrieve up to `limit` records ordered by id. The query doubles as the
/// single source of truth for how listings are ordered.
pub fn fetch_records(conn: &Connection, limit: u32) -> Result<Vec<BirthRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, stat_year, record_type, area_code, area_name,
                    gender, birth_weight, multiple_birth, birth_count
             FROM birth_statistics ORDER BY id LIMIT ?1",
        )
        .context("failed to prepare record query")?;

    let records = stmt
        .query_map([limit.min(RESULT_LIMIT)], record_from_row)
        .context("failed to load records")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect records")?;

    Ok(records)
}

/// Retrieve every record, uncapped. Only the export path uses this; listings
/// go through [`fetch_records`].
pub fn fetch_all_records(conn: &Connection) -> Result<Vec<BirthRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, stat_year, record_type, area_code, area_name,
                    gender, birth_weight, multiple_birth, birth_count
             FROM birth_statistics ORDER BY id",
        )
        .context("failed to prepare export query")?;

    let records = stmt
        .query_map([], record_from_row)
        .context("failed to load records for export")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect records for export")?;

    Ok(records)
}

/// Substring search across every column, integers included. A leading
/// wildcard means a full scan, which is acceptable at this table's scale.
pub fn search_records(conn: &Connection, term: &str) -> Result<Vec<BirthRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, stat_year, record_type, area_code, area_name,
                    gender, birth_weight, multiple_birth, birth_count
             FROM birth_statistics
             WHERE CAST(stat_year AS TEXT) LIKE ?1
                OR record_type LIKE ?1
                OR area_code LIKE ?1
                OR area_name LIKE ?1
                OR gender LIKE ?1
                OR birth_weight LIKE ?1
                OR multiple_birth LIKE ?1
                OR CAST(birth_count AS TEXT) LIKE ?1
             ORDER BY id LIMIT ?2",
        )
        .context("failed to prepare search query")?;

    let pattern = format!("%{term}%");
    let records = stmt
        .query_map(params![pattern, RESULT_LIMIT], record_from_row)
        .context("failed to run search")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect search results")?;

    Ok(records)
}
