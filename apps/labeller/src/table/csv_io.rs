//! Delimited-text reader/writer. Also the fallback format for every save.

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::table::{Cell, Table, TableError};

pub fn read_csv(path: &Path) -> Result<Table, TableError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(TableError::WideRow {
                line: record.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(to_cell).collect());
    }

    Ok(Table::new(headers, rows))
}

pub fn write_csv(table: &Table, path: &Path) -> Result<(), TableError> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }
    writer.flush().map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn to_cell(field: &str) -> Cell {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}
