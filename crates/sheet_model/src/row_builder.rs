//! Row markup for insertion
//!
//! A row is supplied either as ordered values, written cell by cell, or as a
//! header-keyed mapping that is reconciled against the sheet's header layout.

use crate::{CellValue, Result, SheetError};
use address_resolver::resolve_column;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Highest column a header-keyed value may land on, the xlsx column limit
pub const MAX_COLUMNS: usize = 16_384;

/// Markup for one row holding `values` in order
pub fn row_html(values: &[CellValue]) -> String {
    let cells: String = values
        .iter()
        .map(|value| format!("<td>{}</td>", value.to_html()))
        .collect();
    format!("<tr>{}</tr>", cells)
}

/// Markup for several rows, concatenated
pub fn rows_html<R: AsRef<[CellValue]>>(rows: &[R]) -> String {
    rows.iter().map(|row| row_html(row.as_ref())).collect()
}

/// Place header-keyed values into column order.
///
/// `headers` excludes the index column. Keys resolve with no default; a key
/// that does not resolve, or lands on an already used column, is queued.
/// Columns `0..=max` take their resolved value, else the next queued value,
/// else an empty value; leftover queued values follow. No value is dropped.
///
/// Numeric keys are taken as column numbers, so a key past [`MAX_COLUMNS`]
/// is refused rather than padded out with empty cells.
pub fn reconcile_row<S: AsRef<str>>(
    headers: &[S],
    values: &IndexMap<String, CellValue>,
) -> Result<Vec<CellValue>> {
    let mut indexed: BTreeMap<usize, CellValue> = BTreeMap::new();
    let mut extra: Vec<CellValue> = Vec::new();

    for (key, value) in values {
        match resolve_column(headers, key, None) {
            Some(index) if index > MAX_COLUMNS => {
                return Err(SheetError::ColumnOutOfRange(key.clone()));
            }
            Some(index) if !indexed.contains_key(&index) => {
                indexed.insert(index, value.clone());
            }
            _ => {
                tracing::debug!("Queueing value for unplaced column {}", key);
                extra.push(value.clone());
            }
        }
    }

    let mut extra = extra.into_iter();
    let mut cells = Vec::with_capacity(values.len());
    if let Some(&max) = indexed.keys().next_back() {
        for i in 0..=max {
            let cell = indexed
                .remove(&i)
                .or_else(|| extra.next())
                .unwrap_or_default();
            cells.push(cell);
        }
    }
    cells.extend(extra);
    Ok(cells)
}

/// Markup for a header-keyed row against the full header row of a sheet
pub fn mapped_row_html<S: AsRef<str>>(
    headers: &[S],
    values: &IndexMap<String, CellValue>,
) -> Result<String> {
    let columns = headers.get(1..).unwrap_or_default();
    Ok(row_html(&reconcile_row(columns, values)?))
}
