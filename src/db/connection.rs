use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".birthstats";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "birthstats.sqlite";

/// Resolve where the database lives: an explicit override wins, otherwise a
/// fixed location under the user's home directory.
pub fn resolve_database_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

/// Ensure the database file exists, create the schema if needed, and return a
/// live connection.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the record table if it does not exist yet. Split out from
/// [`open_database`] so tests can run against an in-memory connection.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS birth_statistics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            stat_year INTEGER NOT NULL,
            record_type TEXT NOT NULL,
            area_code TEXT NOT NULL,
            area_name TEXT NOT NULL,
            gender TEXT NOT NULL,
            birth_weight TEXT NOT NULL,
            multiple_birth TEXT NOT NULL,
            birth_count INTEGER NOT NULL
        )",
        [],
    )
    .context("failed to create birth_statistics table")?;

    Ok(())
}
