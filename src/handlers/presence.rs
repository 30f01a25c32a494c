//! Presence marking handlers.
//!
//! Two small, unrelated conveniences for the proctors' check-in column:
//! any edit in the presence column is normalized to the present token, and
//! editing the sweep trigger cell fills every blank presence cell with the
//! absent token (then clears the trigger). Neither takes the assignment
//! lock.

use crate::assign::CellEdit;
use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::grid::SheetStore;
use crate::store::WorkbookStore;

/// Result of a presence-handler pass over one edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceOutcome {
    /// The edited presence cell was re-marked with the present token.
    Marked { row: u32 },

    /// Blank presence cells were swept to the absent token.
    Swept { filled: u32 },
}

/// Handle one cell edit; returns `None` when no presence rule applies.
pub fn on_edit(
    store: &dyn WorkbookStore,
    config: &Config,
    edit: &CellEdit,
) -> Result<Option<PresenceOutcome>> {
    if edit.col == config.presence_col && edit.row >= 2 && !edit.value.is_empty() {
        return mark_present(store, config, edit).map(Some);
    }
    if edit.row == config.sweep_row && edit.col == config.sweep_col {
        return sweep_absent(store, config, edit).map(Some);
    }
    Ok(None)
}

fn mark_present(
    store: &dyn WorkbookStore,
    config: &Config,
    edit: &CellEdit,
) -> Result<PresenceOutcome> {
    let mut book = store.load()?;
    let sheet = book
        .sheet_mut(&edit.sheet)
        .ok_or_else(|| missing_sheet(&edit.sheet))?;

    sheet.set_cell(edit.row, config.presence_col, &config.present_token);
    store.save(&book)?;

    Ok(PresenceOutcome::Marked { row: edit.row })
}

fn sweep_absent(
    store: &dyn WorkbookStore,
    config: &Config,
    edit: &CellEdit,
) -> Result<PresenceOutcome> {
    let mut book = store.load()?;
    let sheet = book
        .sheet_mut(&edit.sheet)
        .ok_or_else(|| missing_sheet(&edit.sheet))?;

    sheet.clear_cell(config.sweep_row, config.sweep_col);

    let last_row = sheet.last_row();
    let mut filled = 0;
    if last_row >= 2 {
        let mut column = sheet.get_range(2, config.presence_col, last_row - 1, 1);
        for row in column.iter_mut() {
            if row[0].is_empty() {
                row[0] = config.absent_token.clone();
                filled += 1;
            }
        }
        sheet.set_range(2, config.presence_col, &column);
    }

    store.save(&book)?;
    Ok(PresenceOutcome::Swept { filled })
}

fn missing_sheet(name: &str) -> DeskError {
    DeskError::StoreError(format!("sheet '{}' missing from workbook", name))
}
