use crate::common::errors::{ProbNetError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, trace};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Header cell that marks the column whose values should be predicted.
pub const MISSING_MARKER: &str = "?";

/// A whole CSV table held in memory: one header row plus data rows of
/// string tokens. Cells are kept verbatim so prediction can pass rows
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        DataTable { header, rows }
    }

    /// Builds a table from string slices, mostly useful in tests.
    pub fn from_slices(header: &[&str], rows: &[&[&str]]) -> Self {
        DataTable {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    /// Reads the whole file at `path`. The first record is the header.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading table from {}", path.display());
        let file = fs::File::open(path).map_err(|e| ProbNetError::file_access(path, e))?;
        let table = Self::from_reader(file, path)?;
        debug!(
            "Read {} columns and {} rows from {}",
            table.header.len(),
            table.rows.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parses CSV text already in memory.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes(), Path::new("<memory>"))
    }

    fn from_reader<R: Read>(reader: R, source: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(false).from_reader(reader);
        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ProbNetError::Table {
                path: source.to_path_buf(),
                source: e,
            })?;
            records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }
        let mut records = records.into_iter();
        let header = records.next().ok_or_else(|| ProbNetError::EmptyTable {
            path: source.to_path_buf(),
        })?;
        Ok(DataTable {
            header,
            rows: records.collect(),
        })
    }

    /// Renders the table as CSV text.
    pub fn to_csv_string(&self) -> Result<String> {
        let memory = PathBuf::from("<memory>");
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        let table_error = |e: csv::Error| ProbNetError::Table {
            path: memory.clone(),
            source: e,
        };
        writer.write_record(&self.header).map_err(table_error)?;
        for row in &self.rows {
            writer.write_record(row).map_err(table_error)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ProbNetError::file_access(&memory, e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Writes the whole table to `path` in one go.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_csv_string()?;
        fs::write(path, text).map_err(|e| ProbNetError::file_access(path, e))?;
        trace!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }

    /// Index of the first header cell equal to [`MISSING_MARKER`].
    pub fn marker_column(&self) -> Option<usize> {
        self.column_index(MISSING_MARKER)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_rows() {
        let table = DataTable::from_csv_str("A,B,?\n0,1,x\n1,0,x\n").unwrap();
        assert_eq!(table.header, vec!["A", "B", "?"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 0), Some("1"));
        assert_eq!(table.column_index("B"), Some(1));
        assert_eq!(table.marker_column(), Some(2));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let err = DataTable::from_csv_str("").unwrap_err();
        assert!(matches!(err, ProbNetError::EmptyTable { .. }));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = DataTable::from_csv_str("A,B\n0\n").unwrap_err();
        assert!(matches!(err, ProbNetError::Table { .. }));
    }

    #[test]
    fn test_csv_text_round_trip() {
        let table = DataTable::from_slices(&["A", "?"], &[&["0", "1"], &["1", "?"]]);
        let text = table.to_csv_string().unwrap();
        assert_eq!(text, "A,?\n0,1\n1,?\n");
        assert_eq!(DataTable::from_csv_str(&text).unwrap(), table);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = DataTable::read_csv("/definitely/not/here.csv").unwrap_err();
        match err {
            ProbNetError::FileAccess { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.csv"))
            }
            other => panic!("Expected FileAccess, got {:?}", other),
        }
    }
}
