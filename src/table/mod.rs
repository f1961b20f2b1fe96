//! Table input/output
//!
//! Reading turns a CSV file or a spreadsheet into a [`RawTable`]; writing
//! serializes an [`OutputTable`] as CSV (file or stdout) or .xlsx. The
//! format is picked from the file extension.

mod delimited;
mod excel;

pub use delimited::{read_csv, write_csv};
pub use excel::{export_xlsx, SpreadsheetImporter, OUTPUT_SHEET_NAME};

use crate::error::{ParserResult, QueryParserError};
use crate::types::{OutputTable, RawTable};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, warn};

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "parsed_output.csv";

/// Path value meaning "write CSV to stdout"
pub const STDOUT_PATH: &str = "-";

/// Input formats, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Spreadsheet,
}

impl InputFormat {
    /// `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and `.ods` are spreadsheets; anything
    /// else is read as CSV
    pub fn from_path(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => InputFormat::Spreadsheet,
            _ => InputFormat::Csv,
        }
    }
}

/// Output formats, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> ParserResult<Self> {
        match extension(path).as_deref() {
            Some("xlsx") => Ok(OutputFormat::Xlsx),
            Some("xlsm" | "xlsb" | "xls" | "ods") => Err(QueryParserError::Output(format!(
                "cannot write {}: only .csv and .xlsx output are supported",
                path.display()
            ))),
            _ => Ok(OutputFormat::Csv),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Read an input file into a raw table
///
/// `sheet` selects a worksheet for spreadsheet input and is ignored for CSV.
pub fn read_table(path: &Path, sheet: Option<&str>) -> ParserResult<RawTable> {
    if !path.exists() {
        return Err(QueryParserError::SourceReadFailure(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let format = InputFormat::from_path(path);
    debug!(path = %path.display(), ?format, "reading input");

    let table = match format {
        InputFormat::Csv => {
            if let Some(name) = sheet {
                warn!(sheet = name, "ignoring worksheet selection for CSV input");
            }
            let file = File::open(path).map_err(|e| {
                QueryParserError::SourceReadFailure(format!(
                    "Failed to open {}: {}",
                    path.display(),
                    e
                ))
            })?;
            read_csv(BufReader::new(file))?
        }
        InputFormat::Spreadsheet => SpreadsheetImporter::new(path)
            .with_sheet(sheet.map(str::to_string))
            .import()?,
    };

    debug!(rows = table.rows.len(), width = table.width(), "input loaded");
    Ok(table)
}

/// Write the output table to `path` (`-` for CSV on stdout)
pub fn write_table(table: &OutputTable, path: &Path) -> ParserResult<()> {
    if path.as_os_str() == STDOUT_PATH {
        return write_csv(table, io::stdout().lock());
    }

    match OutputFormat::from_path(path)? {
        OutputFormat::Csv => {
            let file = File::create(path).map_err(|e| {
                QueryParserError::Output(format!("Failed to create {}: {}", path.display(), e))
            })?;
            write_csv(table, BufWriter::new(file))
        }
        OutputFormat::Xlsx => export_xlsx(table, path),
    }
}
