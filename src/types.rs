use crate::error::RowError;
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

//==============================================================================
// Input Model
//==============================================================================

/// A single cell as delivered by the input reader
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Text (every CSV field that is valid UTF-8)
    Text(String),
    /// Floating point number (spreadsheets)
    Number(f64),
    /// Integer (spreadsheets)
    Int(i64),
    /// Boolean (spreadsheets)
    Bool(bool),
    /// Blank cell
    Empty,
    /// Spreadsheet error value such as `#DIV/0!`
    Error(String),
    /// CSV field whose bytes are not valid UTF-8
    Invalid(Vec<u8>),
}

impl Cell {
    /// Stringify the cell for query decoding.
    ///
    /// Fails for error values and undecodable bytes; callers treat that as a
    /// row-level failure.
    pub fn to_text(&self) -> Result<Cow<'_, str>, RowError> {
        match self {
            Cell::Text(s) => Ok(Cow::Borrowed(s.as_str())),
            Cell::Number(n) => Ok(Cow::Owned(n.to_string())),
            Cell::Int(i) => Ok(Cow::Owned(i.to_string())),
            Cell::Bool(b) => Ok(Cow::Owned(b.to_string())),
            Cell::Empty => Ok(Cow::Borrowed("")),
            Cell::Error(e) => Err(RowError::CellError(e.clone())),
            Cell::Invalid(_) => Err(RowError::InvalidUtf8),
        }
    }

    /// Best-effort rendering for display (headers, listings)
    pub fn display_lossy(&self) -> String {
        match self {
            Cell::Error(e) => e.clone(),
            Cell::Invalid(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            other => other.to_text().map(Cow::into_owned).unwrap_or_default(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// Rows of cells; row 0 is the header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a table of text cells (handy for tests and in-memory callers)
    pub fn from_strings<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|s| Cell::Text(s.into())).collect())
                .collect(),
        }
    }

    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Number of columns in the header row (0 for an empty table)
    pub fn width(&self) -> usize {
        self.header().map_or(0, <[Cell]>::len)
    }

    /// Data rows, header excluded
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

//==============================================================================
// Decoding Model
//==============================================================================

/// Lower-cased parameter name → decoded value
///
/// Iterates in order of first appearance; a repeated name keeps its first
/// position and takes the later value.
pub type ParsedParams = IndexMap<String, String>;

/// Output column name → value for one processed row
pub type CombinedRow = BTreeMap<String, String>;

/// How item groups are rendered into output columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemMode {
    /// One `items` column: item;amt;qty;dcnt per index
    #[default]
    Combined,
    /// `itemSku`, `itemUnitPrice`, `itemQuantity` and optional `itemDiscount`
    Separate,
}

impl ItemMode {
    pub fn from_flag(separate_items: bool) -> Self {
        if separate_items {
            ItemMode::Separate
        } else {
            ItemMode::Combined
        }
    }
}

impl fmt::Display for ItemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemMode::Combined => write!(f, "combined"),
            ItemMode::Separate => write!(f, "separate"),
        }
    }
}

/// The four recognized indexed-key prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    Item,
    Amt,
    Qty,
    Dcnt,
}

impl ItemField {
    /// Fixed order used by classification and combined rendering
    pub const ALL: [ItemField; 4] = [ItemField::Item, ItemField::Amt, ItemField::Qty, ItemField::Dcnt];

    pub fn prefix(self) -> &'static str {
        match self {
            ItemField::Item => "item",
            ItemField::Amt => "amt",
            ItemField::Qty => "qty",
            ItemField::Dcnt => "dcnt",
        }
    }
}

/// The fields seen for one item index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRecord {
    pub item: Option<String>,
    pub amt: Option<String>,
    pub qty: Option<String>,
    pub dcnt: Option<String>,
}

impl ItemRecord {
    pub fn get(&self, field: ItemField) -> Option<&str> {
        match field {
            ItemField::Item => self.item.as_deref(),
            ItemField::Amt => self.amt.as_deref(),
            ItemField::Qty => self.qty.as_deref(),
            ItemField::Dcnt => self.dcnt.as_deref(),
        }
    }

    pub fn set(&mut self, field: ItemField, value: String) {
        let slot = match field {
            ItemField::Item => &mut self.item,
            ItemField::Amt => &mut self.amt,
            ItemField::Qty => &mut self.qty,
            ItemField::Dcnt => &mut self.dcnt,
        };
        *slot = Some(value);
    }
}

/// Item records of one row keyed by numeric suffix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemGroup {
    pub records: BTreeMap<u32, ItemRecord>,
    /// Largest suffix observed (0 when no indexed keys were present)
    pub max_index: u32,
}

impl ItemGroup {
    pub fn insert(&mut self, index: u32, field: ItemField, value: String) {
        self.max_index = self.max_index.max(index);
        self.records.entry(index).or_default().set(field, value);
    }

    /// Value for an index/field pair, empty when absent
    pub fn value(&self, index: u32, field: ItemField) -> &str {
        self.records
            .get(&index)
            .and_then(|record| record.get(field))
            .unwrap_or("")
    }
}

//==============================================================================
// Output Model
//==============================================================================

/// Final table: sorted header plus rows projected onto it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OutputTable {
    /// Look up a value by data row index and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.header.iter().position(|h| h == column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A data row dropped during transformation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub reason: String,
}

/// Summary of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub column: String,
    pub mode: ItemMode,
    pub data_rows: usize,
    pub emitted_rows: usize,
    pub skipped_rows: usize,
    pub skipped: Vec<SkippedRow>,
    pub columns: Vec<String>,
}
