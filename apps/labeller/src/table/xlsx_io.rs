//! Spreadsheet reader (first worksheet, via calamine) and `.xlsx` writer.

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

use crate::table::{Cell, Table, TableError};

pub fn read_spreadsheet(path: &Path) -> Result<Table, TableError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::NoWorksheet(path.to_path_buf()))??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| to_cell(cell).unwrap_or_else(|| format!("Unnamed: {i}")))
            .collect(),
        None => Vec::new(),
    };
    let rows = rows.map(|row| row.iter().map(to_cell).collect()).collect();

    Ok(Table::new(headers, rows))
}

/// Only `.xlsx` can be written; the other spreadsheet formats are read-only.
pub fn is_writable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"))
}

pub fn write_xlsx(table: &Table, path: &Path) -> Result<(), TableError> {
    let too_large = || TableError::TooLarge {
        rows: table.len(),
        columns: table.headers().len(),
    };

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, header) in table.headers().iter().enumerate() {
        let col = ColNum::try_from(col).map_err(|_| too_large())?;
        worksheet.write_string_with_format(0, col, header, &header_format)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let row_num = RowNum::try_from(r + 1).map_err(|_| too_large())?;
        for (col, cell) in row.iter().enumerate() {
            if let Some(value) = cell {
                let col = ColNum::try_from(col).map_err(|_| too_large())?;
                worksheet.write_string(row_num, col, value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Text layout for date-formatted cells.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::DateTime(_) => match data.as_datetime() {
            Some(dt) => Some(dt.format(DATETIME_FORMAT).to_string()),
            None => Some(data.to_string()),
        },
        other => Some(other.to_string()),
    }
}
