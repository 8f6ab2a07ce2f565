//! Tabular transaction data
//!
//! Uploads are arbitrary CSVs, so rows are kept as strings under an ordered
//! header; typed views (numeric matrices, boolean flags) are derived on
//! demand. Input columns are never mutated; derived columns are appended.

use ndarray::Array2;

use crate::domain::result::{Error, Result};

/// An uploaded (or derived) set of transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TransactionTable {
    /// Create a table, checking that every row matches the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(Error::validation(format!(
                    "row {} has {} fields, expected {}",
                    i + 1,
                    row.len(),
                    headers.len()
                )));
            }
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> &[String] {
        &self.rows[index]
    }

    /// Index of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell lookup by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Append a derived column. The value count must match the row count.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(Error::validation(format!(
                "derived column has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        self.headers.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Overwrite an existing column in place, or append it if absent.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        match self.column_index(name) {
            Some(idx) => {
                if values.len() != self.rows.len() {
                    return Err(Error::validation(format!(
                        "derived column has {} values for {} rows",
                        values.len(),
                        self.rows.len()
                    )));
                }
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
                Ok(())
            }
            None => self.push_column(name, values),
        }
    }

    /// First `n` rows (fewer if the table is shorter), same schema.
    pub fn head(&self, n: usize) -> TransactionTable {
        TransactionTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// New table containing only the given row indices, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> TransactionTable {
        TransactionTable {
            headers: self.headers.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// True if the column exists, the table has rows, and every cell parses
    /// to a finite number. Blank cells disqualify the column.
    pub fn is_numeric_column(&self, name: &str) -> bool {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => return false,
        };
        !self.rows.is_empty()
            && self
                .rows
                .iter()
                .all(|row| parse_numeric(&row[idx]).is_some())
    }

    /// Names of all numeric columns, in header order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.headers
            .iter()
            .filter(|h| self.is_numeric_column(h))
            .cloned()
            .collect()
    }

    /// Per-row flags from a 0/1 column; `None` when the column is absent.
    /// Cells that do not parse to exactly 1 count as unflagged.
    pub fn binary_flags(&self, name: &str) -> Option<Vec<bool>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| parse_numeric(&row[idx]) == Some(1.0))
                .collect(),
        )
    }

    /// Per-row flags from a boolean-ish column; all-false when absent.
    pub fn truthy_flags(&self, name: &str) -> Vec<bool> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|row| is_truthy(&row[idx])).collect(),
            None => vec![false; self.rows.len()],
        }
    }

    /// Assemble a row-major feature matrix from the named columns, in the
    /// given order. Missing columns produce a schema mismatch listing all
    /// of them; a non-numeric cell in a present column is a validation
    /// error naming the offending row.
    pub fn feature_matrix(&self, columns: &[String]) -> Result<Array2<f64>> {
        let mut indices = Vec::with_capacity(columns.len());
        let mut missing = Vec::new();
        for column in columns {
            match self.column_index(column) {
                Some(idx) => indices.push(idx),
                None => missing.push(column.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(Error::SchemaMismatch(missing));
        }

        let mut matrix = Array2::zeros((self.rows.len(), columns.len()));
        for (i, row) in self.rows.iter().enumerate() {
            for (j, &idx) in indices.iter().enumerate() {
                let value = parse_numeric(&row[idx]).ok_or_else(|| {
                    Error::validation(format!(
                        "column '{}' row {} is not numeric: '{}'",
                        columns[j],
                        i + 1,
                        row[idx]
                    ))
                })?;
                matrix[[i, j]] = value;
            }
        }
        Ok(matrix)
    }
}

/// Parse a cell as a finite number.
pub fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Boolean-ish cell: true/1/yes (any case) is true; everything else,
/// blanks included, is false.
pub fn is_truthy(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransactionTable {
        TransactionTable::new(
            vec![
                "TransactionID".to_string(),
                "amount".to_string(),
                "channel".to_string(),
                "location_mismatch".to_string(),
                "IsFraud".to_string(),
            ],
            vec![
                svec(&["1", "500", "online", "false", "1"]),
                svec(&["2", "12.50", "pos", "true", "0"]),
                svec(&["3", "89", "atm", "no", "1"]),
            ],
        )
        .unwrap()
    }

    fn svec(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let err = TransactionTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![svec(&["1"])],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_numeric_column_detection() {
        let table = sample();
        assert!(table.is_numeric_column("TransactionID"));
        assert!(table.is_numeric_column("amount"));
        assert!(table.is_numeric_column("IsFraud"));
        assert!(!table.is_numeric_column("channel"));
        assert!(!table.is_numeric_column("location_mismatch"));
        assert!(!table.is_numeric_column("no_such_column"));
        assert_eq!(
            table.numeric_columns(),
            vec!["TransactionID", "amount", "IsFraud"]
        );
    }

    #[test]
    fn test_blank_and_nan_cells_are_not_numeric() {
        let table = TransactionTable::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![svec(&["1", "NaN", ""]), svec(&["2", "3", "4"])],
        )
        .unwrap();
        assert!(table.is_numeric_column("a"));
        assert!(!table.is_numeric_column("b"));
        assert!(!table.is_numeric_column("c"));
    }

    #[test]
    fn test_binary_and_truthy_flags() {
        let table = sample();
        assert_eq!(
            table.binary_flags("IsFraud"),
            Some(vec![true, false, true])
        );
        assert_eq!(table.binary_flags("missing"), None);
        assert_eq!(
            table.truthy_flags("location_mismatch"),
            vec![false, true, false]
        );
        assert_eq!(table.truthy_flags("missing"), vec![false; 3]);
    }

    #[test]
    fn test_push_and_set_column() {
        let mut table = sample();
        table
            .push_column("fraud_type", svec(&["Card Not Present", "None", "Counterfeit"]))
            .unwrap();
        assert_eq!(table.get(0, "fraud_type"), Some("Card Not Present"));

        table
            .set_column("fraud_type", svec(&["None", "None", "None"]))
            .unwrap();
        assert_eq!(table.get(2, "fraud_type"), Some("None"));
        // set_column replaced in place, no duplicate header
        assert_eq!(
            table.headers().iter().filter(|h| *h == "fraud_type").count(),
            1
        );

        let err = table.push_column("bad", svec(&["only one"]));
        assert!(err.is_err());
    }

    #[test]
    fn test_select_rows_and_head() {
        let table = sample();
        let picked = table.select_rows(&[2, 0]);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked.get(0, "TransactionID"), Some("3"));
        assert_eq!(picked.get(1, "TransactionID"), Some("1"));

        assert_eq!(table.head(2).len(), 2);
        assert_eq!(table.head(10).len(), 3);
    }

    #[test]
    fn test_feature_matrix_by_name() {
        let table = sample();
        let matrix = table
            .feature_matrix(&["amount".to_string(), "IsFraud".to_string()])
            .unwrap();
        assert_eq!(matrix.shape(), &[3, 2]);
        assert_eq!(matrix[[0, 0]], 500.0);
        assert_eq!(matrix[[1, 0]], 12.5);
        assert_eq!(matrix[[2, 1]], 1.0);
    }

    #[test]
    fn test_feature_matrix_missing_columns() {
        let table = sample();
        let err = table
            .feature_matrix(&["amount".to_string(), "velocity".to_string()])
            .unwrap_err();
        match err {
            Error::SchemaMismatch(missing) => assert_eq!(missing, vec!["velocity"]),
            other => panic!("expected schema mismatch, got {other}"),
        }
    }

    #[test]
    fn test_feature_matrix_non_numeric_cell() {
        let table = sample();
        let err = table.feature_matrix(&["channel".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
