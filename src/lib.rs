//! Query Parser - normalize URL query-string columns in tabular exports
//!
//! This library reads a table (CSV or spreadsheet), decodes one column of
//! URL query strings per row, and produces a table whose columns are the
//! union of every decoded parameter.
//!
//! # Features
//!
//! - Spreadsheet-style column addressing (A, B, ..., AA)
//! - Case-insensitive parameter names, last value wins
//! - Numbered item groups (`item1`, `amt1`, `qty1`, `dcnt1`, ...) rendered
//!   as one `items` column or as separate item columns
//! - Rows that cannot be decoded are skipped, never half-written
//! - Deterministic, alphabetically sorted output columns
//!
//! # Example
//!
//! ```
//! use query_parser::core::process_rows;
//! use query_parser::types::{ItemMode, RawTable};
//!
//! let table = RawTable::from_strings(vec![
//!     vec!["id", "query"],
//!     vec!["1", "order=7&item1=SKU1&amt1=10&qty1=2"],
//! ]);
//!
//! let output = process_rows(&table, "B", ItemMode::Combined)?;
//! assert_eq!(output.table.header, vec!["items", "order"]);
//! assert_eq!(output.table.rows[0], vec!["SKU1;10;2;", "7"]);
//! # Ok::<(), query_parser::error::QueryParserError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use error::{ParserResult, QueryParserError, RowError};
pub use types::{Cell, ItemMode, OutputTable, RawTable, RunReport};
