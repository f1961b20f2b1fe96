//! Column ordering and row projection

use crate::error::{ParserResult, QueryParserError};
use crate::types::{CombinedRow, OutputTable};
use icu_collator::{Collator, CollatorOptions};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Column name ordering: root-locale Unicode collation with code point
/// order as the final tie-breaker
pub struct ColumnCollator {
    collator: Collator,
}

impl ColumnCollator {
    /// Root locale, default options (tertiary strength, lowercase first)
    pub fn new() -> ParserResult<Self> {
        let collator = Collator::try_new(&Default::default(), CollatorOptions::new())
            .map_err(|e| QueryParserError::Collation(e.to_string()))?;
        Ok(Self { collator })
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b).then_with(|| a.cmp(b))
    }
}

/// Sort the discovered column names into the output header
pub fn sort_columns(columns: &BTreeSet<String>) -> ParserResult<Vec<String>> {
    let collator = ColumnCollator::new()?;
    let mut header: Vec<String> = columns.iter().cloned().collect();
    header.sort_by(|a, b| collator.compare(a, b));
    Ok(header)
}

/// Project every row onto the sorted header, filling blanks with ""
pub fn assemble(rows: &[CombinedRow], columns: &BTreeSet<String>) -> ParserResult<OutputTable> {
    let header = sort_columns(columns)?;
    let rows = rows
        .iter()
        .map(|row| {
            header
                .iter()
                .map(|name| row.get(name).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(OutputTable { header, rows })
}
