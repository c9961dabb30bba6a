//! Row/table adapter
//!
//! Maps an uploaded CSV's columns onto the front/back roles with a small
//! fixed alias vocabulary, falling back to physical column order, and
//! yields rows as a finite single-pass sequence.

use std::io::Cursor;

use thiserror::Error;

const FRONT_ALIASES: &[&str] = &["part1", "first", "front", "english", "english_text"];
const BACK_ALIASES: &[&str] = &[
    "part2",
    "second",
    "back",
    "latin",
    "1 pp",
    "principal",
    "principal parts",
    "principal_parts",
];

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Table has no columns")]
    NoColumns,

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Which column index feeds each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub front: usize,
    pub back: usize,
}

/// Resolve the front/back columns from trimmed header names.
///
/// Alias matching is case-insensitive; with no alias hit the first and
/// second physical columns are used. A single-column table reuses the
/// front column as back (deliberate, matching the service this replaces).
pub fn map_columns(headers: &[String]) -> Result<ColumnMap, TableError> {
    if headers.is_empty() {
        return Err(TableError::NoColumns);
    }

    let find = |aliases: &[&str]| {
        headers
            .iter()
            .position(|h| aliases.contains(&h.trim().to_lowercase().as_str()))
    };

    let front = find(FRONT_ALIASES).unwrap_or(0);
    let back = match find(BACK_ALIASES) {
        Some(idx) => idx,
        None if headers.len() >= 2 => 1,
        None => front,
    };
    Ok(ColumnMap { front, back })
}

/// One table row's raw cell text, pre-trim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub front_text: String,
    pub back_text: String,
}

/// Finite, single-pass row sequence over a parsed CSV.
pub struct TableRows {
    records: csv::StringRecordsIntoIter<Cursor<Vec<u8>>>,
    columns: ColumnMap,
}

impl TableRows {
    pub fn columns(&self) -> ColumnMap {
        self.columns
    }
}

/// Parse an uploaded CSV into a row sequence.
pub fn parse_table(bytes: Vec<u8>) -> Result<TableRows, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(Cursor::new(bytes));
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let columns = map_columns(&headers)?;
    Ok(TableRows {
        records: reader.into_records(),
        columns,
    })
}

impl Iterator for TableRows {
    type Item = Result<TableRow, TableError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|r| TableRow {
                    front_text: r.get(self.columns.front).unwrap_or("").trim().to_string(),
                    back_text: r.get(self.columns.back).unwrap_or("").trim().to_string(),
                })
                .map_err(Into::into),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn alias_headers_map_by_name() {
        let map = map_columns(&headers(&["English", "Latin"])).unwrap();
        assert_eq!(map, ColumnMap { front: 0, back: 1 });

        // Aliases win even out of physical order.
        let map = map_columns(&headers(&["Latin", "English"])).unwrap();
        assert_eq!(map, ColumnMap { front: 1, back: 0 });
    }

    #[test]
    fn multi_word_alias_matches() {
        let map = map_columns(&headers(&["front", "Principal Parts"])).unwrap();
        assert_eq!(map, ColumnMap { front: 0, back: 1 });
    }

    #[test]
    fn unlabeled_headers_fall_back_to_position() {
        let map = map_columns(&headers(&["a", "b"])).unwrap();
        assert_eq!(map, ColumnMap { front: 0, back: 1 });
    }

    #[test]
    fn single_column_reuses_front_as_back() {
        let map = map_columns(&headers(&["words"])).unwrap();
        assert_eq!(map, ColumnMap { front: 0, back: 0 });
    }

    #[test]
    fn empty_header_row_is_an_error() {
        assert!(matches!(map_columns(&[]), Err(TableError::NoColumns)));
    }

    #[test]
    fn rows_iterate_in_input_order() {
        let csv = b"English,Latin\nlove,amare\nsee,videre\n".to_vec();
        let rows: Vec<TableRow> = parse_table(csv).unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(
            rows,
            vec![
                TableRow {
                    front_text: "love".to_string(),
                    back_text: "amare".to_string()
                },
                TableRow {
                    front_text: "see".to_string(),
                    back_text: "videre".to_string()
                },
            ]
        );
    }

    #[test]
    fn short_records_yield_empty_cells() {
        let csv = b"English,Latin\nlove\n".to_vec();
        let rows: Vec<TableRow> = parse_table(csv).unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(rows[0].back_text, "");
    }

    #[test]
    fn single_column_rows_duplicate_the_cell() {
        let csv = b"words\namare\n".to_vec();
        let rows: Vec<TableRow> = parse_table(csv).unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(rows[0].front_text, "amare");
        assert_eq!(rows[0].back_text, "amare");
    }
}
