//! Z-table reader — coefficient tables in comma or whitespace layout.
//!
//! Purpose
//! -------
//! Turn a coefficient table as exported by Interact (`Z`-labelled rows
//! followed by one coefficient per equation) into a parsed [`ZTable`].
//!
//! Key behaviors
//! -------------
//! - Comma-separated input is decoded with `csv` (no header row; surrounding
//!   whitespace trimmed).
//! - Whitespace-separated input splits each non-blank line on runs of
//!   whitespace, which covers Interact's double-space column alignment.
//! - Coefficient columns are named by [`EQUATION_KEYS`] in order, so a
//!   table with 9 columns covers `Ae … Oa` and 12 columns add `Se Sp Sa`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every row has the same number of cells; the first row fixes it.
//! - Label and coefficient validation is delegated to [`parse_ztable`].
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use tracing::debug;

use crate::{
    impression::core::{
        coefficients::EQUATION_KEYS,
        matrices::{ZTable, parse_ztable},
    },
    io::errors::{IoError, IoResult},
};

/// Supported coefficient-column counts (ABO and ABOS equations).
pub const VALID_COLUMNS: &[usize] = &[9, 12];

/// Field separator of a Z-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    /// One or more spaces or tabs.
    Whitespace,
}

/// Read and parse a Z-table from any byte stream.
///
/// # Errors
/// - [`IoError::Io`] / [`IoError::Csv`] on transport or decoding failures.
/// - [`IoError::EmptyTable`] when the input has no rows.
/// - [`IoError::UnsupportedColumns`] when the coefficient count is not 9 or 12.
/// - [`IoError::Act`] wrapping `InvalidTableRow` for malformed rows.
pub fn read_ztable<R: Read>(reader: R, delimiter: Delimiter) -> IoResult<ZTable> {
    let rows = match delimiter {
        Delimiter::Comma => comma_rows(reader)?,
        Delimiter::Whitespace => whitespace_rows(reader)?,
    };
    let first = rows.first().ok_or(IoError::EmptyTable)?;
    let columns = first.len().saturating_sub(1);
    if !VALID_COLUMNS.contains(&columns) {
        return Err(IoError::UnsupportedColumns { found: columns, valid: VALID_COLUMNS });
    }
    let table = parse_ztable(&rows, &EQUATION_KEYS[..columns])?;
    debug!(rows = rows.len(), columns, "parsed Z-table");
    Ok(table)
}

/// [`read_ztable`] over a file on disk.
pub fn read_ztable_path<P: AsRef<Path>>(path: P, delimiter: Delimiter) -> IoResult<ZTable> {
    read_ztable(File::open(path)?, delimiter)
}

fn comma_rows<R: Read>(reader: R) -> IoResult<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn whitespace_rows<R: Read>(reader: R) -> IoResult<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let cells: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if !cells.is_empty() {
            rows.push(cells);
        }
    }
    Ok(rows)
}
