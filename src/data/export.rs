//! Tabular export of the current data.
//!
//! The exported workbook is CSV produced with the `csv` crate; the host decides
//! how to deliver it (download, clipboard, spreadsheet import).

use crate::domain::{Record, Result, ViewerError};
use serde::{Deserialize, Serialize};

/// Export request from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// File name without extension; defaults to the data entity or `"export"`.
    pub file_name: Option<String>,
    /// Export every page instead of only the current one.
    pub all_pages: bool,
    /// Include columns the user has hidden.
    pub include_hidden: bool,
}

/// Header and field path of one exported column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportColumn {
    pub field: String,
    pub header: String,
}

/// Columns plus rows ready to serialize.
#[derive(Debug, Clone)]
pub struct ExportTable<'a> {
    pub columns: Vec<ExportColumn>,
    pub rows: &'a [Record],
}

impl ExportTable<'_> {
    /// Serializes the table to CSV with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Export`] if the CSV writer fails.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.columns.iter().map(|c| c.header.as_str()))
            .map_err(|e| ViewerError::Export(e.to_string()))?;

        for row in self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|c| row.text(&c.field).unwrap_or_default())
                .collect();
            writer
                .write_record(&cells)
                .map_err(|e| ViewerError::Export(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ViewerError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ViewerError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_quotes_and_blanks_missing_cells() {
        let rows = vec![
            Record::new().with("title", "Dune, Part One").with("year", 1965),
            Record::new().with("title", "Untitled"),
        ];
        let table = ExportTable {
            columns: vec![
                ExportColumn { field: "title".into(), header: "Title".into() },
                ExportColumn { field: "year".into(), header: "Year".into() },
            ],
            rows: &rows,
        };
        assert_eq!(table.to_csv().unwrap(), "Title,Year\n\"Dune, Part One\",1965\nUntitled,\n");
    }
}
