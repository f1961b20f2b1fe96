//! Spreadsheet column letters ↔ zero-based indices

use crate::error::{ParserResult, QueryParserError};

/// Convert a column letter to a zero-based index
///
/// Examples:
/// - A → 0
/// - Z → 25
/// - AA → 26
/// - ab → 27 (case-insensitive)
///
/// Callers must validate the input first (see [`parse_column_letter`]).
/// Arithmetic saturates, so an absurdly long letter yields an index that no
/// header can satisfy rather than wrapping around.
pub fn column_letter_to_index(letter: &str) -> usize {
    let sum = letter
        .bytes()
        .map(|b| b.to_ascii_uppercase().saturating_sub(b'A') as usize + 1)
        .fold(0usize, |acc, ordinal| {
            acc.saturating_mul(26).saturating_add(ordinal)
        });
    sum.saturating_sub(1)
}

/// Convert a zero-based index to a column letter
///
/// Examples:
/// - 0 → A
/// - 25 → Z
/// - 26 → AA
pub fn column_index_to_letter(index: usize) -> String {
    let mut result = String::new();
    let mut idx = index;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// Validate user input as `[A-Za-z]+` (surrounding whitespace ignored) and
/// resolve it to an index
pub fn parse_column_letter(input: &str) -> ParserResult<usize> {
    let letter = input.trim();
    if letter.is_empty() || !letter.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(QueryParserError::InvalidColumnSpec(format!(
            "'{}' is not a column letter (expected e.g. A, B, AA)",
            input
        )));
    }
    Ok(column_letter_to_index(letter))
}

/// Fail unless `index` addresses a column of a header `width` cells wide
pub fn check_column_bounds(index: usize, width: usize) -> ParserResult<()> {
    if index < width {
        return Ok(());
    }
    let message = if width == 0 {
        format!(
            "column {} is out of range: the header row is empty",
            column_index_to_letter(index)
        )
    } else {
        format!(
            "column {} is out of range: the header has {} column(s) (A..{})",
            column_index_to_letter(index),
            width,
            column_index_to_letter(width - 1)
        )
    };
    Err(QueryParserError::InvalidColumnSpec(message))
}
