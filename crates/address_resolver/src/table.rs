//! Table lookups: sheets, rows, headers and row search

use crate::{resolve_column, signed_index};
use content_tree::{AnchorId, ContentTree, NodeIndex};

/// The table named `name`, or the first table when no name is given.
///
/// A named lookup takes the first element of any tag whose `title` attribute
/// equals `name`.
pub fn find_table(tree: &ContentTree, name: Option<&str>) -> Option<NodeIndex> {
    match name {
        Some(name) => tree.find_first_matching_attribute("title", name),
        None => tree.find_all_by_tag("table").into_iter().next(),
    }
}

/// Every titled table as `(title, table)` in document order
pub fn sheet_tables(tree: &ContentTree) -> Vec<(String, NodeIndex)> {
    tree.find_all_by_tag("table")
        .into_iter()
        .filter_map(|table| {
            tree.attribute(table, "title")
                .map(|title| (title.to_string(), table))
        })
        .collect()
}

/// Every `tr` below `table` in document order
pub fn table_rows(tree: &ContentTree, table: NodeIndex) -> Vec<NodeIndex> {
    tree.descendants_by_tag(table, "tr")
        .into_iter()
        .filter(|&row| row != table)
        .collect()
}

/// First text of each element child of `row`, `None` where a cell has none
pub fn row_values(tree: &ContentTree, row: NodeIndex) -> Vec<Option<String>> {
    tree.element_children(row)
        .into_iter()
        .map(|cell| tree.first_text(cell).map(str::to_string))
        .collect()
}

/// Header texts of `table`: the values of its first row, empty where absent
pub fn header_texts(tree: &ContentTree, table: NodeIndex) -> Vec<String> {
    table_rows(tree, table)
        .first()
        .map(|&row| {
            row_values(tree, row)
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect()
        })
        .unwrap_or_default()
}

/// Row at a signed index over every row of `table`, header row included
pub fn nth_row(tree: &ContentTree, table: NodeIndex, index: isize) -> Option<NodeIndex> {
    let rows = table_rows(tree, table);
    signed_index(index, rows.len()).map(|i| rows[i])
}

/// Anchor of the row at a signed index
pub fn nth_row_anchor(tree: &ContentTree, table: NodeIndex, index: isize) -> Option<AnchorId> {
    nth_row(tree, table, index).and_then(|row| tree.anchor(row).cloned())
}

/// Anchor of each element child of `row`; `None` where a child has no id
pub fn row_cell_anchors(tree: &ContentTree, row: NodeIndex) -> Vec<Option<AnchorId>> {
    tree.element_children(row)
        .into_iter()
        .map(|cell| tree.anchor(cell).cloned())
        .collect()
}

/// First row of `table` whose cell under column `key` equals `value`,
/// ignoring case.
///
/// The column resolves against the full header row with default 0, so an
/// unknown key searches the index column.
pub fn find_row(tree: &ContentTree, table: NodeIndex, key: &str, value: &str) -> Option<NodeIndex> {
    let headers = header_texts(tree, table);
    let index = resolve_column(&headers, key, Some(0)).unwrap_or(0);
    let needle = value.to_lowercase();

    let found = table_rows(tree, table).into_iter().find(|&row| {
        let cells = tree.element_children(row);
        let Some(&cell) = cells.get(index) else {
            return false;
        };
        if tree.tag(cell) != "td" {
            return false;
        }
        tree.first_text(cell)
            .is_some_and(|text| text.to_lowercase() == needle)
    });

    tracing::debug!("Row search {} = {} matched {:?}", key, value, found);
    found
}
