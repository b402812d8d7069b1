use serde::{Deserialize, Serialize};

use crate::cell::CellEntry;

/// Rows and columns reported for a sheet that has never been saved
pub const DEFAULT_GRID_SIZE: u32 = 5;

/// Full grid snapshot of one sheet
///
/// Saving a snapshot replaces whatever was stored before; there is no merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub rows: u32,
    pub columns: u32,
    #[serde(default)]
    pub cells: Vec<CellEntry>,
}

impl TableSnapshot {
    pub fn new(rows: u32, columns: u32, cells: Vec<CellEntry>) -> Self {
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Empty 5x5 grid
    pub fn blank() -> Self {
        Self::new(DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE, Vec::new())
    }

    /// Number of cells outside the declared dimensions
    pub fn out_of_bounds(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| !cell.fits(self.rows, self.columns))
            .count()
    }
}

impl Default for TableSnapshot {
    fn default() -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_grid() {
        let table = TableSnapshot::default();
        assert_eq!(table.rows, 5);
        assert_eq!(table.columns, 5);
        assert!(table.cells.is_empty());
    }

    #[test]
    fn test_out_of_bounds_cells_are_counted_not_dropped() {
        let table = TableSnapshot::new(
            2,
            2,
            vec![
                CellEntry::new(0, 0, "in"),
                CellEntry::new(2, 0, "below"),
                CellEntry::new(0, 9, "right"),
            ],
        );
        assert_eq!(table.out_of_bounds(), 2);
        assert_eq!(table.cells.len(), 3);
    }
}
