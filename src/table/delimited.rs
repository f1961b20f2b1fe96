//! CSV reader/writer

use crate::error::{ParserResult, QueryParserError};
use crate::types::{Cell, OutputTable, RawTable};
use std::io::{Read, Write};

const UTF8_BOM: char = '\u{feff}';

/// Read every record of a CSV stream as a raw table
///
/// No header handling is applied: the first record becomes row 0. Rows may
/// have different widths. Fields that are not valid UTF-8 are kept as
/// [`Cell::Invalid`] so only their own row fails later.
pub fn read_csv<R: Read>(reader: R) -> ParserResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in rdr.byte_records() {
        let record = result.map_err(|e| {
            QueryParserError::SourceReadFailure(format!("CSV parse error: {}", e))
        })?;

        let row = record
            .iter()
            .map(|field| match std::str::from_utf8(field) {
                Ok(s) => Cell::Text(s.to_string()),
                Err(_) => Cell::Invalid(field.to_vec()),
            })
            .collect();
        rows.push(row);
    }

    if let Some(Cell::Text(first)) = rows.first_mut().and_then(|row| row.first_mut()) {
        if let Some(stripped) = first.strip_prefix(UTF8_BOM) {
            *first = stripped.to_string();
        }
    }

    if rows.is_empty() {
        return Err(QueryParserError::SourceReadFailure(
            "file contains no rows".to_string(),
        ));
    }

    Ok(RawTable::new(rows))
}

/// Write the header and rows as comma-separated text
///
/// Values containing commas, quotes or line breaks are quoted. An empty
/// table writes nothing.
pub fn write_csv<W: Write>(table: &OutputTable, writer: W) -> ParserResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    if !table.header.is_empty() {
        for row in std::iter::once(&table.header).chain(table.rows.iter()) {
            wtr.write_record(row)
                .map_err(|e| QueryParserError::Output(format!("CSV write error: {}", e)))?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_basic() {
        let data = "id,qs\n1,a=1&b=2\n2,\"c=3,4\"\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows[1][1], Cell::from("a=1&b=2"));
        assert_eq!(table.rows[2][1], Cell::from("c=3,4"));
    }

    #[test]
    fn test_read_csv_ragged_rows() {
        let data = "a,b,c\n1\n1,2,3,4\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.rows[1].len(), 1);
        assert_eq!(table.rows[2].len(), 4);
    }

    #[test]
    fn test_read_csv_invalid_utf8_field() {
        let mut data = b"qs\nok=1\n".to_vec();
        data.extend_from_slice(b"bad=\xff\xfe\n");
        let table = read_csv(&data[..]).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert!(matches!(table.rows[2][0], Cell::Invalid(_)));
    }

    #[test]
    fn test_read_csv_strips_bom() {
        let data = "\u{feff}qs,other\nx=1,2\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0][0], Cell::from("qs"));
    }

    #[test]
    fn test_read_csv_empty() {
        let err = read_csv("".as_bytes()).unwrap_err();
        assert!(matches!(err, QueryParserError::SourceReadFailure(_)));
    }

    #[test]
    fn test_write_csv_quotes_when_needed() {
        let table = OutputTable {
            header: vec!["a".to_string(), "b".to_string()],
            rows: vec![
                vec!["x,y".to_string(), "say \"hi\"".to_string()],
                vec!["line\nbreak".to_string(), "".to_string()],
            ],
        };
        let mut out = Vec::new();
        write_csv(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "a,b\n\"x,y\",\"say \"\"hi\"\"\"\n\"line\nbreak\",\n"
        );
    }

    #[test]
    fn test_write_csv_empty_table() {
        let mut out = Vec::new();
        write_csv(&OutputTable::default(), &mut out).unwrap();
        assert!(out.is_empty());
    }
}
