//! Literal `Column:row` cell references

use crate::SheetError;
use std::fmt;
use std::str::FromStr;

/// A cell named by column key and 1-based row position, e.g. `Billed:8`
/// or `B:8`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub column: String,
    pub row: usize,
}

impl CellRef {
    pub fn new(column: impl Into<String>, row: usize) -> Self {
        Self {
            column: column.into(),
            row,
        }
    }
}

impl FromStr for CellRef {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SheetError::InvalidCellRef(s.to_string());
        let (column, row) = s.rsplit_once(':').ok_or_else(invalid)?;
        if column.is_empty() {
            return Err(invalid());
        }
        let row: usize = row.trim().parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        Ok(Self::new(column, row))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.column, self.row)
    }
}
