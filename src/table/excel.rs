//! Spreadsheet import (calamine) and .xlsx export (rust_xlsxwriter)

use crate::error::{ParserResult, QueryParserError};
use crate::types::{Cell, OutputTable, RawTable};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Worksheet name used for exported tables
pub const OUTPUT_SHEET_NAME: &str = "parsed_output";

/// Importer for .xlsx/.xlsm/.xls/.ods workbooks
pub struct SpreadsheetImporter {
    path: std::path::PathBuf,
    sheet: Option<String>,
}

impl SpreadsheetImporter {
    /// Create an importer reading the first worksheet
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet: None,
        }
    }

    /// Read the named worksheet instead of the first one
    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Import the selected worksheet as a raw table
    pub fn import(&self) -> ParserResult<RawTable> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            QueryParserError::SourceReadFailure(format!("Failed to open workbook: {}", e))
        })?;

        let sheet_names = workbook.sheet_names().to_vec();
        let sheet_name = match &self.sheet {
            Some(name) => sheet_names
                .iter()
                .find(|s| s.eq_ignore_ascii_case(name))
                .cloned()
                .ok_or_else(|| {
                    QueryParserError::SourceReadFailure(format!(
                        "Worksheet '{}' not found. Available: {:?}",
                        name, sheet_names
                    ))
                })?,
            None => sheet_names.first().cloned().ok_or_else(|| {
                QueryParserError::SourceReadFailure("Workbook has no worksheets".to_string())
            })?,
        };

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            QueryParserError::SourceReadFailure(format!(
                "Failed to read worksheet '{}': {}",
                sheet_name, e
            ))
        })?;

        if range.is_empty() {
            return Err(QueryParserError::SourceReadFailure(format!(
                "Worksheet '{}' is empty",
                sheet_name
            )));
        }

        // The range starts at the first used cell; pad so column letters
        // keep their spreadsheet meaning.
        let leading = range.start().map_or(0, |(_, col)| col as usize);

        let rows = range
            .rows()
            .map(|row| {
                std::iter::repeat(Cell::Empty)
                    .take(leading)
                    .chain(row.iter().map(data_to_cell))
                    .collect()
            })
            .collect();

        Ok(RawTable::new(rows))
    }
}

/// Convert a calamine cell into a raw cell
fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Int(*i),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Empty => Cell::Empty,
        Data::Error(e) => Cell::Error(e.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

/// Write the output table to a single-sheet .xlsx workbook
pub fn export_xlsx(table: &OutputTable, path: &Path) -> ParserResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(OUTPUT_SHEET_NAME)
        .map_err(|e| QueryParserError::Output(format!("Failed to name worksheet: {}", e)))?;

    if !table.header.is_empty() {
        for (row_idx, row) in std::iter::once(&table.header)
            .chain(table.rows.iter())
            .enumerate()
        {
            let row_num = u32::try_from(row_idx).map_err(|_| {
                QueryParserError::Output("Too many rows for a worksheet".to_string())
            })?;
            for (col_idx, value) in row.iter().enumerate() {
                let col_num = u16::try_from(col_idx).map_err(|_| {
                    QueryParserError::Output("Too many columns for a worksheet".to_string())
                })?;
                worksheet
                    .write_string(row_num, col_num, value.as_str())
                    .map_err(|e| {
                        QueryParserError::Output(format!(
                            "Failed to write cell ({}, {}): {}",
                            row_num, col_num, e
                        ))
                    })?;
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| QueryParserError::Output(format!("Failed to save workbook: {}", e)))?;

    Ok(())
}
