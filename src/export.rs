//! CSV export. The row format is the exact mirror of what the importer
//! accepts (text fields quoted, numeric fields bare), so a file produced here
//! can be re-imported to reproduce the same set of records.

use std::io::Write;

use anyhow::{Context, Result};

use crate::models::BirthRecord;

/// Header line written ahead of the data rows, matching the importer's
/// expected (and discarded) first line.
pub const CSV_HEADER: &str =
    "StatYear,RecordType,AreaCode,AreaName,Gender,BirthWeight,MultipleBirth,BirthCount";

/// Write `records` as CSV to `out`, returning how many rows were written.
pub fn write_csv<W: Write>(out: &mut W, records: &[BirthRecord]) -> Result<u64> {
    writeln!(out, "{CSV_HEADER}").context("failed to write CSV header")?;

    for record in records {
        writeln!(out, "{}", format_row(record)).context("failed to write CSV row")?;
    }

    out.flush().context("failed to flush CSV output")?;
    Ok(records.len() as u64)
}

/// Render one record as a data line. Text fields are wrapped in double quotes
/// so embedded commas survive the trip back through the importer; there is no
/// quote escaping, matching the importer's scanner.
fn format_row(record: &BirthRecord) -> String {
    format!(
        "{},\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",{}",
        record.year,
        record.record_type,
        record.area_code,
        record.area_name,
        record.gender,
        record.birth_weight,
        record.multiple_birth,
        record.birth_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BirthRecord {
        BirthRecord {
            id: 7,
            year: 2020,
            record_type: "Live".into(),
            area_code: "001".into(),
            area_name: "East, Riverside".into(),
            gender: "M".into(),
            birth_weight: "Normal".into(),
            multiple_birth: "No".into(),
            birth_count: 42,
        }
    }

    #[test]
    fn row_format_quotes_text_fields() {
        assert_eq!(
            format_row(&sample()),
            r#"2020,"Live","001","East, Riverside","M","Normal","No",42"#
        );
    }

    #[test]
    fn writes_header_then_rows() {
        let mut out = Vec::new();
        let written = write_csv(&mut out, &[sample()]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(written, 1);
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert!(lines.next().unwrap().starts_with("2020,\"Live\""));
        assert_eq!(lines.next(), None);
    }
}
