//! Spreadsheet threads: sheets, rows and cells
//!
//! Reads go through the sheet models derived from the current tree. Every
//! write is a positional edit against a row or cell anchor, after which the
//! models are discarded along with the tree they came from.

use crate::{EditError, EditRequest, Format, Result, Thread};
use address_resolver::{
    find_row, find_table, header_texts, nth_row, nth_row_anchor, resolve_column, row_cell_anchors,
    row_values, Relation, ResolvedTarget,
};
use content_tree::{AnchorId, ContentTree, NodeIndex};
use indexmap::IndexMap;
use remote_client::{RemoteClient, ThreadResponse};
use sheet_model::{
    export_xlsx, extract_sheets, mapped_row_html, row_html, rows_html, CellRef, CellValue,
    SheetError, SheetExport, SheetModel,
};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A row to insert
#[derive(Debug, Clone, PartialEq)]
pub enum RowInput {
    /// Cells in column order, index column excluded
    Values(Vec<CellValue>),
    /// Cells keyed by header, placed by column resolution
    Mapping(IndexMap<String, CellValue>),
}

impl From<Vec<CellValue>> for RowInput {
    fn from(values: Vec<CellValue>) -> Self {
        RowInput::Values(values)
    }
}

impl From<IndexMap<String, CellValue>> for RowInput {
    fn from(mapping: IndexMap<String, CellValue>) -> Self {
        RowInput::Mapping(mapping)
    }
}

impl RowInput {
    fn to_html(&self, headers: &[String]) -> Result<String> {
        Ok(match self {
            RowInput::Values(values) => row_html(values),
            RowInput::Mapping(mapping) => mapped_row_html(headers, mapping)?,
        })
    }
}

fn table(tree: &ContentTree, sheet: Option<&str>) -> Result<NodeIndex> {
    find_table(tree, sheet)
        .ok_or_else(|| SheetError::SheetNotFound(sheet.unwrap_or_default().to_string()).into())
}

/// A spreadsheet thread
#[derive(Debug)]
pub struct Spreadsheet {
    thread: Thread,
    sheets: OnceCell<IndexMap<String, SheetModel>>,
    /// Model of the first table, titled or not
    first: OnceCell<SheetModel>,
}

impl From<Thread> for Spreadsheet {
    fn from(thread: Thread) -> Self {
        Self {
            thread,
            sheets: OnceCell::new(),
            first: OnceCell::new(),
        }
    }
}

impl Spreadsheet {
    pub fn open(client: Arc<RemoteClient>, thread_id: &str) -> Result<Self> {
        Thread::open(client, thread_id).map(Self::from)
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    /// Mutable access to the thread; derived sheet models are dropped
    pub fn thread_mut(&mut self) -> &mut Thread {
        self.sheets.take();
        self.first.take();
        &mut self.thread
    }

    pub fn into_thread(self) -> Thread {
        self.thread
    }

    /// Re-fetch the content and drop the derived models
    pub fn reload(&mut self) -> Result<()> {
        self.thread_mut().reload()
    }

    fn apply(&mut self, request: &EditRequest) -> Result<ThreadResponse> {
        self.thread_mut().apply(request)
    }

    /// Models of every titled table, keyed by sheet name
    pub fn sheets(&self) -> Result<&IndexMap<String, SheetModel>> {
        if let Some(sheets) = self.sheets.get() {
            return Ok(sheets);
        }
        let extracted = extract_sheets(self.thread.tree()?);
        tracing::debug!("Derived {} sheet model(s) for {}", extracted.len(), self.thread.id());
        Ok(self.sheets.get_or_init(|| extracted))
    }

    pub fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.sheets()?.keys().cloned().collect())
    }

    /// The named sheet, or the first table when `name` is `None`.
    ///
    /// The unnamed lookup is the same table row edits address, so an untitled
    /// leading table wins over later titled ones.
    pub fn sheet(&self, name: Option<&str>) -> Result<&SheetModel> {
        match name {
            Some(name) => self
                .sheets()?
                .get(name)
                .ok_or_else(|| SheetError::SheetNotFound(name.to_string()).into()),
            None => {
                if let Some(first) = self.first.get() {
                    return Ok(first);
                }
                let first = SheetModel::find(self.thread.tree()?, None)?;
                Ok(self.first.get_or_init(|| first))
            }
        }
    }

    /// Header texts without the index column
    pub fn column_names(&self, sheet: Option<&str>) -> Result<Vec<String>> {
        Ok(self.sheet(sheet)?.column_headers().to_vec())
    }

    /// First text of each cell of the row at `index` (header row included,
    /// negative counts from the end); `None` when there is no such row
    pub fn row_values(&self, sheet: Option<&str>, index: isize) -> Result<Option<Vec<Option<String>>>> {
        let tree = self.thread.tree()?;
        let table = table(tree, sheet)?;
        Ok(nth_row(tree, table, index).map(|row| row_values(tree, row)))
    }

    /// Add a row after the last row
    pub fn append_row(&mut self, sheet: Option<&str>, row: impl Into<RowInput>) -> Result<ThreadResponse> {
        self.insert_row(sheet, -1, Relation::After, &row.into())
    }

    /// Add a row before the first data row
    pub fn prepend_row(&mut self, sheet: Option<&str>, row: impl Into<RowInput>) -> Result<ThreadResponse> {
        self.insert_row(sheet, 1, Relation::Before, &row.into())
    }

    pub fn insert_row_before(
        &mut self,
        sheet: Option<&str>,
        index: isize,
        row: impl Into<RowInput>,
    ) -> Result<ThreadResponse> {
        self.insert_row(sheet, index, Relation::Before, &row.into())
    }

    pub fn insert_row_after(
        &mut self,
        sheet: Option<&str>,
        index: isize,
        row: impl Into<RowInput>,
    ) -> Result<ThreadResponse> {
        self.insert_row(sheet, index, Relation::After, &row.into())
    }

    fn insert_row(
        &mut self,
        sheet: Option<&str>,
        index: isize,
        relation: Relation,
        row: &RowInput,
    ) -> Result<ThreadResponse> {
        let (html, anchor) = {
            let tree = self.thread.tree()?;
            let table = table(tree, sheet)?;
            let html = row.to_html(&header_texts(tree, table))?;
            let anchor = nth_row_anchor(tree, table, index)
                .ok_or_else(|| EditError::AddressNotFound(format!("row {} of sheet {:?}", index, sheet)))?;
            (html, anchor)
        };
        let request = EditRequest::new(html, ResolvedTarget::anchor(anchor, relation), Format::Html)?;
        self.apply(&request)
    }

    /// Update the row where `search.0` equals `search.1`.
    ///
    /// Each update whose key resolves to a data column with an anchored cell
    /// becomes one replace edit, all against the anchors read before the
    /// first edit. Keys resolving to the index column are skipped. When no
    /// row matches, the updates plus the search pair are added as a new row.
    /// Returns the last response, `None` when nothing was sent.
    pub fn search_update_cells(
        &mut self,
        sheet: Option<&str>,
        search: (&str, &str),
        updates: &IndexMap<String, CellValue>,
    ) -> Result<Option<ThreadResponse>> {
        let (key, value) = search;
        let edits = {
            let tree = self.thread.tree()?;
            let table = table(tree, sheet)?;
            find_row(tree, table, key, value).map(|row| cell_edits(tree, table, row, updates))
        };

        let Some(edits) = edits else {
            tracing::info!("No row with {} = {}, adding one", key, value);
            // The searched value wins over an update of the same key
            let mut row = updates.clone();
            row.insert(key.to_string(), CellValue::from(value));
            return self.append_row(sheet, row).map(Some);
        };

        let mut last = None;
        for (anchor, content) in edits {
            let request = EditRequest::new(
                content,
                ResolvedTarget::anchor(anchor, Relation::Replace),
                Format::Markdown,
            )?;
            last = Some(self.apply(&request)?);
        }
        Ok(last)
    }

    /// Replace the cell at a literal `Column:row` reference, rows counted
    /// from 1 with the header row first
    pub fn update_cell(
        &mut self,
        sheet: Option<&str>,
        reference: &str,
        value: impl Into<CellValue>,
    ) -> Result<ThreadResponse> {
        let reference: CellRef = reference
            .parse()
            .map_err(|e: SheetError| EditError::AddressNotFound(e.to_string()))?;
        let anchor = self
            .sheet(sheet)?
            .cell_at(&reference)
            .and_then(|cell| cell.anchor.clone())
            .ok_or_else(|| EditError::AddressNotFound(format!("cell {}", reference)))?;
        let request = EditRequest::new(
            value.into().to_string(),
            ResolvedTarget::anchor(anchor, Relation::Replace),
            Format::Markdown,
        )?;
        self.apply(&request)
    }

    /// Insert a header row followed by `rows` before the first data row,
    /// as one edit
    pub fn upload_rows<S: AsRef<str>, R: AsRef<[CellValue]>>(
        &mut self,
        sheet: Option<&str>,
        header: &[S],
        rows: &[R],
    ) -> Result<ThreadResponse> {
        let header: Vec<CellValue> = header.iter().map(|h| CellValue::from(h.as_ref())).collect();
        let html = format!("{}{}", row_html(&header), rows_html(rows));
        let anchor = {
            let tree = self.thread.tree()?;
            let table = table(tree, sheet)?;
            nth_row_anchor(tree, table, 1)
                .ok_or_else(|| EditError::AddressNotFound(format!("first data row of sheet {:?}", sheet)))?
        };
        tracing::info!("Uploading {} row(s) to {}", rows.len(), self.thread.id());
        let request = EditRequest::new(html, ResolvedTarget::anchor(anchor, Relation::Before), Format::Html)?;
        self.apply(&request)
    }

    pub fn export(&self, sheet: Option<&str>) -> Result<SheetExport> {
        Ok(self.sheet(sheet)?.to_export())
    }

    pub fn export_json(&self, sheet: Option<&str>) -> Result<String> {
        Ok(self.sheet(sheet)?.to_json()?)
    }

    /// Write the sheet as `{title}_{sheet}.xlsx` under `dir`
    pub fn export_xlsx(&self, sheet: Option<&str>, dir: &Path) -> Result<PathBuf> {
        Ok(export_xlsx(self.sheet(sheet)?, self.thread.title(), dir)?)
    }
}

/// Anchors and contents of the replace edits for `updates` against `row`
fn cell_edits(
    tree: &ContentTree,
    table: NodeIndex,
    row: NodeIndex,
    updates: &IndexMap<String, CellValue>,
) -> Vec<(AnchorId, String)> {
    let headers = header_texts(tree, table);
    let anchors = row_cell_anchors(tree, row);
    updates
        .iter()
        .filter_map(|(key, value)| {
            let index = resolve_column(&headers, key, Some(0)).filter(|&i| i != 0)?;
            let anchor = anchors.get(index).cloned().flatten();
            if anchor.is_none() {
                tracing::debug!("Skipping update of {}: no anchored cell at column {}", key, index);
            }
            Some((anchor?, value.to_string()))
        })
        .collect()
}
