//! Single-sheet grid storage and the `SheetStore` access trait.

use serde::{Deserialize, Serialize};

/// Cell-grid access used by the assignment engine and submission router.
///
/// Rows and columns are 1-based. Reads outside the stored extent return
/// empty cells; writes grow the sheet as needed.
pub trait SheetStore {
    /// Read one cell. Empty string means the cell is unset.
    fn get_cell(&self, row: u32, col: u32) -> String;

    /// Write one cell, growing the sheet if needed.
    fn set_cell(&mut self, row: u32, col: u32, value: &str);

    /// Read a rectangular block, padded with empty cells beyond the extent.
    fn get_range(&self, row: u32, col: u32, height: u32, width: u32) -> Vec<Vec<String>>;

    /// Write a rectangular block starting at (row, col).
    fn set_range(&mut self, row: u32, col: u32, values: &[Vec<String>]);

    /// Reset one cell to empty.
    fn clear_cell(&mut self, row: u32, col: u32);

    /// Append a row immediately after the last row with content.
    fn append_row(&mut self, values: &[String]);

    /// Last row holding any value, or 0 for an empty sheet.
    fn last_row(&self) -> u32;

    /// Last column holding any value, or 0 for an empty sheet.
    fn last_column(&self) -> u32;
}

/// One named sheet: a growable grid of string cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    name: String,
    cells: Vec<Vec<String>>,
}

impl Sheet {
    /// Create an empty sheet with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: Vec::new(),
        }
    }

    /// The sheet name (e.g., "Round 2 Phase 1").
    pub fn name(&self) -> &str {
        &self.name
    }

    fn ensure_cell(&mut self, row: u32, col: u32) -> &mut String {
        let (r, c) = (row as usize - 1, col as usize - 1);
        if self.cells.len() <= r {
            self.cells.resize_with(r + 1, Vec::new);
        }
        let row_cells = &mut self.cells[r];
        if row_cells.len() <= c {
            row_cells.resize(c + 1, String::new());
        }
        &mut row_cells[c]
    }
}

impl SheetStore for Sheet {
    fn get_cell(&self, row: u32, col: u32) -> String {
        debug_assert!(row >= 1 && col >= 1, "sheet addressing is 1-based");
        self.cells
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .cloned()
            .unwrap_or_default()
    }

    fn set_cell(&mut self, row: u32, col: u32, value: &str) {
        debug_assert!(row >= 1 && col >= 1, "sheet addressing is 1-based");
        *self.ensure_cell(row, col) = value.to_string();
    }

    fn get_range(&self, row: u32, col: u32, height: u32, width: u32) -> Vec<Vec<String>> {
        (row..row + height)
            .map(|r| (col..col + width).map(|c| self.get_cell(r, c)).collect())
            .collect()
    }

    fn set_range(&mut self, row: u32, col: u32, values: &[Vec<String>]) {
        for (dr, row_values) in values.iter().enumerate() {
            for (dc, value) in row_values.iter().enumerate() {
                self.set_cell(row + dr as u32, col + dc as u32, value);
            }
        }
    }

    fn clear_cell(&mut self, row: u32, col: u32) {
        if let Some(cell) = self
            .cells
            .get_mut(row as usize - 1)
            .and_then(|r| r.get_mut(col as usize - 1))
        {
            cell.clear();
        }
    }

    fn append_row(&mut self, values: &[String]) {
        let target = self.last_row() + 1;
        for (dc, value) in values.iter().enumerate() {
            self.set_cell(target, 1 + dc as u32, value);
        }
    }

    fn last_row(&self) -> u32 {
        self.cells
            .iter()
            .rposition(|row| row.iter().any(|cell| !cell.is_empty()))
            .map(|idx| idx as u32 + 1)
            .unwrap_or(0)
    }

    fn last_column(&self) -> u32 {
        self.cells
            .iter()
            .filter_map(|row| row.iter().rposition(|cell| !cell.is_empty()))
            .map(|idx| idx as u32 + 1)
            .max()
            .unwrap_or(0)
    }
}
