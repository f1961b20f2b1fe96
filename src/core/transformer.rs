//! Row transformation: decode, aggregate, merge, unify columns

use crate::core::assembler::assemble;
use crate::core::column::{check_column_bounds, column_index_to_letter, parse_column_letter};
use crate::core::items::{render_items, split_items};
use crate::core::query::decode_query;
use crate::error::{ParserResult, RowError};
use crate::types::{Cell, CombinedRow, ItemMode, OutputTable, RawTable, RunReport, SkippedRow};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Rows accumulated by the first pass, before projection
#[derive(Debug, Clone, Default)]
pub struct Transformation {
    pub rows: Vec<CombinedRow>,
    /// Union of every emitted row's column names
    pub columns: BTreeSet<String>,
    pub skipped: Vec<SkippedRow>,
    pub data_rows: usize,
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub table: OutputTable,
    pub report: RunReport,
}

/// Transforms the query-string column of a table into structured rows
#[derive(Debug, Clone, Copy)]
pub struct RowTransformer {
    column: usize,
    mode: ItemMode,
}

impl RowTransformer {
    /// Create a transformer for a zero-based column index
    pub fn new(column: usize, mode: ItemMode) -> Self {
        Self { column, mode }
    }

    /// Create a transformer from a user-supplied column letter
    pub fn from_letter(letter: &str, mode: ItemMode) -> ParserResult<Self> {
        Ok(Self::new(parse_column_letter(letter)?, mode))
    }

    /// Transform a single data row
    pub fn transform_row(&self, row: &[Cell]) -> Result<CombinedRow, RowError> {
        let cell = row.get(self.column).ok_or_else(|| RowError::MissingCell {
            column: column_index_to_letter(self.column),
        })?;
        let raw = cell.to_text()?;

        let (group, mut combined) = split_items(decode_query(&raw))?;
        render_items(&group, self.mode, &mut combined);
        Ok(combined)
    }

    /// First pass: transform every data row and collect the column union
    ///
    /// Fails before touching any row if the column is outside the header.
    pub fn collect(&self, table: &RawTable) -> ParserResult<Transformation> {
        check_column_bounds(self.column, table.width())?;

        let mut result = Transformation {
            data_rows: table.data_rows().len(),
            ..Default::default()
        };

        for (idx, row) in table.data_rows().iter().enumerate() {
            match self.transform_row(row) {
                Ok(combined) => {
                    result.columns.extend(combined.keys().cloned());
                    result.rows.push(combined);
                }
                Err(e) => {
                    debug!(row = idx + 1, error = %e, "skipping row");
                    result.skipped.push(SkippedRow {
                        row: idx + 1,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(result)
    }

    /// Run both passes and produce the output table with a run report
    pub fn run(&self, table: &RawTable) -> ParserResult<ProcessOutput> {
        let collected = self.collect(table)?;
        let output = assemble(&collected.rows, &collected.columns)?;

        let report = RunReport {
            column: column_index_to_letter(self.column),
            mode: self.mode,
            data_rows: collected.data_rows,
            emitted_rows: output.row_count(),
            skipped_rows: collected.skipped.len(),
            skipped: collected.skipped,
            columns: output.header.clone(),
        };

        info!(
            column = %report.column,
            mode = %report.mode,
            emitted = report.emitted_rows,
            skipped = report.skipped_rows,
            "transformation complete"
        );

        Ok(ProcessOutput {
            table: output,
            report,
        })
    }
}

/// Validate `letter`, then transform `table` in the given mode
pub fn process_rows(table: &RawTable, letter: &str, mode: ItemMode) -> ParserResult<ProcessOutput> {
    RowTransformer::from_letter(letter, mode)?.run(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryParserError;

    #[test]
    fn test_transform_row_merges_plain_and_items() {
        let transformer = RowTransformer::new(1, ItemMode::Combined);
        let row = vec![Cell::from("1"), Cell::from("Order=9&item1=A&qty1=2")];
        let combined = transformer.transform_row(&row).unwrap();
        assert_eq!(combined["order"], "9");
        assert_eq!(combined["items"], "A;;2;");
        assert_eq!(combined.len(), 2);
    }

    #[test]
    fn test_transform_row_missing_cell() {
        let transformer = RowTransformer::new(2, ItemMode::Combined);
        let err = transformer.transform_row(&[Cell::from("x")]).unwrap_err();
        assert_eq!(
            err,
            RowError::MissingCell {
                column: "C".to_string()
            }
        );
    }

    #[test]
    fn test_transform_row_numeric_cell() {
        let transformer = RowTransformer::new(0, ItemMode::Combined);
        let combined = transformer.transform_row(&[Cell::Int(5)]).unwrap();
        assert_eq!(combined["5"], "");
    }

    #[test]
    fn test_collect_skips_failures() {
        let table = RawTable::new(vec![
            vec![Cell::from("qs")],
            vec![Cell::from("a=1")],
            vec![Cell::Error("#VALUE!".to_string())],
            vec![Cell::from("b=2")],
        ]);
        let transformer = RowTransformer::new(0, ItemMode::Combined);
        let collected = transformer.collect(&table).unwrap();
        assert_eq!(collected.rows.len(), 2);
        assert_eq!(collected.data_rows, 3);
        assert_eq!(collected.skipped.len(), 1);
        assert_eq!(collected.skipped[0].row, 2);
        assert!(collected.columns.contains("a"));
        assert!(collected.columns.contains("b"));
    }

    #[test]
    fn test_collect_out_of_bounds() {
        let table = RawTable::from_strings(vec![vec!["a", "b", "c"], vec!["1", "2", "x=1"]]);
        let err = RowTransformer::new(3, ItemMode::Combined)
            .collect(&table)
            .unwrap_err();
        assert!(matches!(err, QueryParserError::InvalidColumnSpec(_)));
    }

    #[test]
    fn test_collect_empty_table() {
        let err = RowTransformer::new(0, ItemMode::Combined)
            .collect(&RawTable::default())
            .unwrap_err();
        assert!(matches!(err, QueryParserError::InvalidColumnSpec(_)));
    }

    #[test]
    fn test_header_only_table() {
        let table = RawTable::from_strings(vec![vec!["qs"]]);
        let output = process_rows(&table, "A", ItemMode::Separate).unwrap();
        assert!(output.table.header.is_empty());
        assert!(output.table.rows.is_empty());
        assert_eq!(output.report.data_rows, 0);
    }

    #[test]
    fn test_run_report() {
        let table = RawTable::new(vec![
            vec![Cell::from("id"), Cell::from("qs")],
            vec![Cell::from("1"), Cell::from("item1=A&dcnt1=5")],
            vec![Cell::from("2")],
        ]);
        let output = process_rows(&table, "b", ItemMode::Separate).unwrap();
        let report = output.report;
        assert_eq!(report.column, "B");
        assert_eq!(report.mode, ItemMode::Separate);
        assert_eq!(report.data_rows, 2);
        assert_eq!(report.emitted_rows, 1);
        assert_eq!(report.skipped_rows, 1);
        assert_eq!(
            report.columns,
            vec!["itemDiscount", "itemQuantity", "itemSku", "itemUnitPrice"]
        );
    }

    #[test]
    fn test_process_rows_rejects_bad_letter() {
        let table = RawTable::from_strings(vec![vec!["qs"]]);
        let err = process_rows(&table, "1", ItemMode::Combined).unwrap_err();
        assert!(matches!(err, QueryParserError::InvalidColumnSpec(_)));
    }
}
