//! CSV export of the current filtered/sorted list.
//!
//! Written as UTF-8 with a byte-order mark so spreadsheet tools detect
//! the encoding; quoting and escaping per RFC 4180 via the csv crate.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

/// UTF-8 BOM, expected by Excel for comma-separated imports.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Writes a header record plus one record per row.
pub fn export_csv<P: AsRef<Path>>(
    path: P,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<(), csv::Error> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Timestamped file name in the working directory, e.g.
/// `watop-customers-20260829-142501.csv`.
pub fn default_export_path(entity: &str) -> PathBuf {
    PathBuf::from(format!(
        "watop-{}-{}.csv",
        entity,
        Utc::now().format("%Y%m%d-%H%M%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_export_writes_bom_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let headers = strings(&["NAME", "EMAIL", "PLAN"]);
        let rows = vec![
            strings(&["Acme", "ops@acme.example", "pro"]),
            strings(&["Borneo", "admin@borneo.example", "basic"]),
            strings(&["Celebes", "c@celebes.example", "trial"]),
        ];
        export_csv(&path, &headers, &rows).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);

        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // Header plus three data rows.
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "NAME,EMAIL,PLAN");
        assert_eq!(lines[2], "Borneo,admin@borneo.example,basic");
    }

    #[test]
    fn test_fields_with_commas_and_quotes_are_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quoted.csv");

        let headers = strings(&["NAME", "NOTE"]);
        let rows = vec![strings(&["Acme, Inc.", "said \"hello\""])];
        export_csv(&path, &headers, &rows).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(text.lines().nth(1).unwrap(), "\"Acme, Inc.\",\"said \"\"hello\"\"\"");

        // And it parses back to the original fields.
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Acme, Inc.");
        assert_eq!(&record[1], "said \"hello\"");
    }

    #[test]
    fn test_empty_row_list_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        export_csv(&path, &strings(&["ID"]), &[]).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(text.trim_end(), "ID");
    }

    #[test]
    fn test_default_export_path_shape() {
        let path = default_export_path("servers");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("watop-servers-"));
        assert!(name.ends_with(".csv"));
    }
}
