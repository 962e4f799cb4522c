//! Sheet export to JSON-ready maps and `.xlsx` workbooks

use crate::{Result, SheetError, SheetModel};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One exported cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellExport {
    pub anchor: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Row anchor → header → cell
pub type SheetExport = IndexMap<String, IndexMap<String, CellExport>>;

impl SheetModel {
    /// Ordered export of every row.
    ///
    /// Rows are keyed by their anchor; a row without one is keyed by its
    /// 1-based position.
    pub fn to_export(&self) -> SheetExport {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let key = row
                    .anchor
                    .as_ref()
                    .map(|anchor| anchor.to_string())
                    .unwrap_or_else(|| (i + 1).to_string());
                let cells = row
                    .cells
                    .iter()
                    .map(|(header, cell)| {
                        let export = CellExport {
                            anchor: cell
                                .anchor
                                .as_ref()
                                .map(|a| a.to_string())
                                .unwrap_or_default(),
                            content: cell.content.as_str().to_string(),
                            color: cell.color.clone(),
                        };
                        (header.clone(), export)
                    })
                    .collect();
                (key, cells)
            })
            .collect()
    }

    /// Export serialized as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_export())?)
    }
}

/// File name of an exported sheet
pub fn export_file_name(title: &str, sheet: &str) -> String {
    format!("{}_{}.xlsx", title, sheet)
}

/// Write `sheet` as `{title}_{sheet}.xlsx` under `dir`.
///
/// Row 1 holds the headers without the index column; every data row follows
/// with its cell contents under the matching header.
pub fn export_xlsx(sheet: &SheetModel, title: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(export_file_name(title, sheet.name()));

    let mut book = umya_spreadsheet::new_file();
    let worksheet = book
        .get_sheet_by_name_mut("Sheet1")
        .ok_or_else(|| SheetError::Xlsx("new workbook has no default sheet".to_string()))?;

    let headers = sheet.column_headers();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .get_cell_mut((col as u32 + 1, 1))
            .set_value(header.clone());
    }

    for (r, row) in sheet.data_rows().iter().enumerate() {
        let row_number = r as u32 + 2;
        for (col, header) in headers.iter().enumerate() {
            if let Some(cell) = row.cell(header) {
                worksheet
                    .get_cell_mut((col as u32 + 1, row_number))
                    .set_value(cell.content.as_str().to_string());
            }
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, &path)
        .map_err(|e| SheetError::Xlsx(e.to_string()))?;
    tracing::info!("Exported sheet {} to {}", sheet.name(), path.display());
    Ok(path)
}
