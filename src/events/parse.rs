//! Tabular source readers: CSV text and XLSX sheets into [`RawRow`]s.
//!
//! Both readers are deliberately forgiving: the inputs are survey-form
//! exports, so headers carry free text (sometimes embedded newlines) and data
//! rows may be ragged. Short rows are padded with empty strings so every row
//! exposes every header.

use super::models::RawRow;
use crate::error::ImportError;
use calamine::{Data, Reader, open_workbook_auto};

/// Parses CSV text. The first record supplies the header labels; blank lines
/// are skipped and ragged records are padded (or truncated) to the header
/// width. Quoted fields, including embedded commas and newlines, are handled
/// by the `csv` reader.
pub fn parse_csv(text: &str) -> Vec<RawRow> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match rdr.headers() {
        Ok(h) => h.iter().map(|s| s.to_string()).collect(),
        Err(_) => return Vec::new(),
    };

    let mut rows = Vec::new();
    for record in rdr.records() {
        let Ok(record) = record else {
            // Malformed record; row-level problems never abort the batch.
            continue;
        };
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }
    rows
}

/// Converts pre-extracted sheet cells to rows. The first row supplies header
/// labels by column position; rows where every cell is empty are skipped.
pub fn parse_sheet(cells: &[Vec<String>]) -> Vec<RawRow> {
    let Some((headers, data)) = cells.split_first() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for cells in data {
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                (
                    h.clone(),
                    cells.get(i).map(|c| c.to_string()).unwrap_or_default(),
                )
            })
            .collect();
        rows.push(row);
    }
    rows
}

pub fn read_csv_file(path: &str) -> Result<Vec<RawRow>, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|e| ImportError::source(path, e))?;
    Ok(parse_csv(&text))
}

/// Reads the first worksheet of an XLSX/XLS workbook, coercing every cell to
/// text.
pub fn read_xlsx_file(path: &str) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ImportError::source(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::source(path, "workbook has no sheets"))?
        .map_err(|e| ImportError::source(path, e))?;

    let cells: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(parse_sheet(&cells))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_zips_headers_with_values() {
        let rows = parse_csv("Event Name,Venue\nRobo Race,Main Hall\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Event Name"], "Robo Race");
        assert_eq!(rows[0]["Venue"], "Main Hall");
    }

    #[test]
    fn csv_short_rows_pad_with_empty() {
        let rows = parse_csv("Event Name,Venue,Fee\nRobo Race\n");
        assert_eq!(rows[0]["Event Name"], "Robo Race");
        assert_eq!(rows[0]["Venue"], "");
        assert_eq!(rows[0]["Fee"], "");
    }

    #[test]
    fn csv_quoted_commas_stay_in_one_field() {
        let rows = parse_csv("Event Name,Coordinators\nRobo Race,\"Asha, Ravi\"\n");
        assert_eq!(rows[0]["Coordinators"], "Asha, Ravi");
    }

    #[test]
    fn csv_blank_lines_are_skipped() {
        let rows = parse_csv("Event Name\nRobo Race\n\nCircuit Hunt\n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn sheet_skips_all_empty_rows() {
        let cells = vec![
            vec!["Event Name".to_string(), "Venue".to_string()],
            vec!["".to_string(), "  ".to_string()],
            vec!["Robo Race".to_string()],
        ];
        let rows = parse_sheet(&cells);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Event Name"], "Robo Race");
        assert_eq!(rows[0]["Venue"], "");
    }

    #[test]
    fn sheet_without_rows_is_empty() {
        assert!(parse_sheet(&[]).is_empty());
    }
}
