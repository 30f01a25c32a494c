//! Tabular grid model for cipherdesk.
//!
//! The desk's shared state is a workbook of named sheets, each a 2D grid of
//! string cells addressed by 1-based (row, column), the same addressing the
//! relay sheets use. An empty string is an empty cell; there is no separate
//! null. Sheets grow on write and report extent by content, so `last_row` /
//! `last_column` track the last row/column that actually holds a value.
//!
//! `SheetStore` is the seam the assignment and routing code is written
//! against; `Sheet` is the in-memory implementation.

mod sheet;
mod workbook;

#[cfg(test)]
mod tests;

pub use sheet::{Sheet, SheetStore};
pub use workbook::Workbook;
