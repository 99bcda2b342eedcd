//! Domain models that mirror the SQLite schema and get passed between the
//! importer, the persistence layer, and the CLI. The intent is that these
//! types stay light-weight data holders so other layers can focus on parsing
//! and persistence logic.

/// One parsed data line from a delimited import file. This is the unit of work
/// the importer buffers and hands to the store in batches; it carries no `id`
/// because the database assigns one on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// Reporting year for this stratum.
    pub year: i32,
    pub record_type: String,
    pub area_code: String,
    pub area_name: String,
    pub gender: String,
    pub birth_weight: String,
    pub multiple_birth: String,
    /// Count of births for this stratum.
    pub birth_count: i64,
}

/// A persisted row, as returned by queries. Identical to [`ImportRecord`] plus
/// the primary key, which listing and search output surface to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthRecord {
    /// Primary key from the database. Kept even where only display information
    /// is needed so callers can refer back to a specific row.
    pub id: i64,
    pub year: i32,
    pub record_type: String,
    pub area_code: String,
    pub area_name: String,
    pub gender: String,
    pub birth_weight: String,
    pub multiple_birth: String,
    pub birth_count: i64,
}

impl BirthRecord {
    /// Drop the primary key, leaving the eight data fields. Export and the
    /// round-trip tests compare records by value, where the id is noise.
    pub fn into_import_record(self) -> ImportRecord {
        ImportRecord {
            year: self.year,
            record_type: self.record_type,
            area_code: self.area_code,
            area_name: self.area_name,
            gender: self.gender,
            birth_weight: self.birth_weight,
            multiple_birth: self.multiple_birth,
            birth_count: self.birth_count,
        }
    }
}
