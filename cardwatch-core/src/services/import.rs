//! CSV import/export for transaction tables
//!
//! Uploads keep whatever columns the file carries; nothing is coerced at
//! read time. Ragged rows are rejected by the reader itself.

use std::io;
use std::path::Path;

use crate::domain::result::{Error, Result};
use crate::domain::TransactionTable;

/// Read a CSV file into a table. A file with only a header row (or nothing
/// at all) yields an empty table rather than an error.
pub fn read_table(path: &Path) -> Result<TransactionTable> {
    let file = std::fs::File::open(path)?;
    read_table_from_reader(file)
}

/// Read CSV from any reader. Exposed for callers holding in-memory uploads.
pub fn read_table_from_reader<R: io::Read>(reader: R) -> Result<TransactionTable> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    TransactionTable::new(headers, rows)
}

/// Write a table to a CSV file, headers first.
pub fn write_table(path: &Path, table: &TransactionTable) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(table.headers())?;
    for i in 0..table.len() {
        wtr.write_record(table.row(i))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render a table as an in-memory CSV string.
pub fn table_to_csv_string(table: &TransactionTable) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(table.headers())?;
    for i in 0..table.len() {
        wtr.write_record(table.row(i))?;
    }
    let bytes = wtr.into_inner().map_err(|e| Error::store(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::store(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_cells() {
        let input = "TransactionID,amount,channel\n1,500,online\n2,12.50,pos\n";
        let table = read_table_from_reader(input.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "amount"), Some("12.50"));

        let output = table_to_csv_string(&table).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_header_only_file_is_empty_table() {
        let table = read_table_from_reader("a,b,c\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers(), &["a", "b", "c"]);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let result = read_table_from_reader("a,b\n1,2,3\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_quoted_fields_survive() {
        let input = "id,memo\n1,\"coffee, beans\"\n";
        let table = read_table_from_reader(input.as_bytes()).unwrap();
        assert_eq!(table.get(0, "memo"), Some("coffee, beans"));
    }
}
