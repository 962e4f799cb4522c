//! Sheet, row and cell model derived from a table

use crate::{CellRef, Result, SheetError};
use address_resolver::{find_table, header_texts, resolve_column, sheet_tables, table_rows};
use content_tree::{AnchorId, ContentTree, NodeIndex};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const ZERO_WIDTH_SPACE: char = '\u{200b}';

/// What a cell displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellContent {
    Text(String),
    /// Source of the first image in the cell
    Image { src: String },
}

impl CellContent {
    /// Text, or the image source
    pub fn as_str(&self) -> &str {
        match self {
            CellContent::Text(text) => text,
            CellContent::Image { src } => src,
        }
    }
}

/// A single data cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub anchor: Option<AnchorId>,
    pub content: CellContent,
    /// Six hex digits of the cell's background colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Cell {
    fn from_node(tree: &ContentTree, cell: NodeIndex) -> Self {
        let image = tree
            .descendants_by_tag(cell, "img")
            .first()
            .map(|&img| tree.attribute(img, "src").unwrap_or_default().to_string());

        let content = match image {
            Some(src) => CellContent::Image { src },
            None => CellContent::Text(
                tree.first_text(cell)
                    .unwrap_or_default()
                    .replace(ZERO_WIDTH_SPACE, ""),
            ),
        };

        Self {
            anchor: tree.anchor(cell).cloned(),
            content,
            color: tree.attribute(cell, "style").and_then(background_color),
        }
    }
}

/// The six characters after the first `#` of a style carrying a
/// `background-color:#` declaration
fn background_color(style: &str) -> Option<String> {
    if !style.contains("background-color:#") {
        return None;
    }
    let sharp = style.find('#')?;
    Some(style[sharp + 1..].chars().take(6).collect())
}

/// A row with its cells keyed by header text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowModel {
    pub anchor: Option<AnchorId>,
    pub cells: IndexMap<String, Cell>,
}

impl RowModel {
    /// Cell under the given header text
    pub fn cell(&self, header: &str) -> Option<&Cell> {
        self.cells.get(header)
    }
}

/// Headers and rows of one sheet table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetModel {
    pub anchor: Option<AnchorId>,
    pub title: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<RowModel>,
}

impl SheetModel {
    /// Derive the model of `table`.
    ///
    /// Every `tr` below the table contributes a row, the header row included.
    /// A child at position `i` that is a `td` becomes the cell keyed by
    /// `headers[i]`; rows without any cell are dropped.
    pub fn from_table(tree: &ContentTree, table: NodeIndex) -> Self {
        let headers = header_texts(tree, table);
        let mut rows = Vec::new();

        for row in table_rows(tree, table) {
            let mut cells = IndexMap::new();
            for (i, child) in tree.element_children(row).into_iter().enumerate() {
                if tree.tag(child) != "td" {
                    continue;
                }
                let Some(header) = headers.get(i) else {
                    tracing::debug!("Skipping cell {} beyond the {} headers", i, headers.len());
                    continue;
                };
                cells.insert(header.clone(), Cell::from_node(tree, child));
            }
            if !cells.is_empty() {
                rows.push(RowModel {
                    anchor: tree.anchor(row).cloned(),
                    cells,
                });
            }
        }

        Self {
            anchor: tree.anchor(table).cloned(),
            title: tree.attribute(table, "title").map(str::to_string),
            headers,
            rows,
        }
    }

    /// Model of the named sheet, or of the first table
    pub fn find(tree: &ContentTree, name: Option<&str>) -> Result<Self> {
        let table = find_table(tree, name)
            .ok_or_else(|| SheetError::SheetNotFound(name.unwrap_or_default().to_string()))?;
        Ok(Self::from_table(tree, table))
    }

    /// Sheet name, empty for untitled tables
    pub fn name(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Headers without the implicit index column
    pub fn column_headers(&self) -> &[String] {
        self.headers.get(1..).unwrap_or_default()
    }

    /// Row by 1-based position
    pub fn row(&self, position: usize) -> Option<&RowModel> {
        position.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    /// Rows after the header row
    pub fn data_rows(&self) -> &[RowModel] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// Cell addressed by a literal `Column:row` reference
    pub fn cell_at(&self, reference: &CellRef) -> Option<&Cell> {
        let row = self.row(reference.row)?;
        let index = resolve_column(&self.headers, &reference.column, None)?;
        row.cell(self.headers.get(index)?)
    }
}

/// Models of every titled table, keyed by sheet name in document order
pub fn extract_sheets(tree: &ContentTree) -> IndexMap<String, SheetModel> {
    let mut sheets = IndexMap::new();
    for (name, table) in sheet_tables(tree) {
        // A repeated title keeps its first table, as name lookups do
        sheets
            .entry(name)
            .or_insert_with(|| SheetModel::from_table(tree, table));
    }
    sheets
}

/// Names of every titled table in document order
pub fn sheet_names(tree: &ContentTree) -> Vec<String> {
    sheet_tables(tree).into_iter().map(|(name, _)| name).collect()
}
