//! The assignment critical section.

use super::scanner::{self, TeamSlots};
use super::selector;
use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::grid::SheetStore;
use crate::locks::LockProvider;
use crate::notify::Notifier;
use crate::store::WorkbookStore;
use rand::Rng;
use std::time::Duration;

/// One inbound cell edit, as delivered by the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    /// Name of the edited sheet.
    pub sheet: String,

    /// 1-based row of the edited cell.
    pub row: u32,

    /// 1-based column of the edited cell.
    pub col: u32,

    /// The newly entered value.
    pub value: String,
}

/// Why an edit was ignored by the assignment engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The sheet is not one of the configured assignment sheets.
    UntrackedSheet,
    /// The row is outside the encoding-team band.
    OutsideEncodingBand,
    /// The column is not a cipher marker column.
    NotMarkerColumn,
    /// The value is not the marker token.
    NotMarkerToken,
    /// The pass-to cell is already filled: a duplicate trigger.
    AlreadyLinked,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::UntrackedSheet => "sheet is not an assignment sheet",
            SkipReason::OutsideEncodingBand => "row is outside the encoding band",
            SkipReason::NotMarkerColumn => "column is not a cipher marker column",
            SkipReason::NotMarkerToken => "value is not the marker token",
            SkipReason::AlreadyLinked => "cipher is already assigned",
        };
        write!(f, "{}", text)
    }
}

/// Result of one assignment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The edit did not arm an assignment; nothing changed.
    Skipped(SkipReason),

    /// The lock wait timed out; nothing changed. The proctor re-triggers.
    Busy,

    /// Every decoding row is saturated. The marker cell keeps the generated
    /// id with no partner link; operators resolve it by hand.
    Exhausted { unique_id: String },

    /// Cipher assigned: both sides of the link are committed.
    Assigned {
        unique_id: String,
        source_team: String,
        target_team: String,
        target_row: u32,
        target_col: u32,
    },
}

/// Orchestrates assignment attempts triggered by marker edits.
///
/// Both the lock and the random source are injected: the lock so the
/// critical section is testable against a throwaway desk, the randomness so
/// tie-break tests can seed it. The workload snapshot is loaded *after* the
/// lock is acquired, so the second of two racing triggers scans the first
/// one's committed state.
pub struct AssignmentCoordinator<L, N, R> {
    config: Config,
    locks: L,
    notifier: N,
    rng: R,
}

impl<L, N, R> AssignmentCoordinator<L, N, R>
where
    L: LockProvider,
    N: Notifier,
    R: Rng,
{
    pub fn new(config: Config, locks: L, notifier: N, rng: R) -> Self {
        Self {
            config,
            locks,
            notifier,
            rng,
        }
    }

    /// Handle one cell edit.
    ///
    /// Edits that fail the trigger filters return `Outcome::Skipped` without
    /// acquiring the lock. A lock-wait timeout returns `Outcome::Busy` after
    /// alerting the operator; there is no automatic retry.
    pub fn on_edit(&mut self, store: &dyn WorkbookStore, edit: &CellEdit) -> Result<Outcome> {
        if let Some(reason) = self.trigger_filter(edit) {
            return Ok(Outcome::Skipped(reason));
        }

        // Idempotency guard: a marker whose pass-to cell is already filled
        // was consumed by an earlier trigger. Checked before the lock so
        // duplicate deliveries cost nothing.
        {
            let book = store.load()?;
            let sheet = require_sheet(&book, &edit.sheet)?;
            if !sheet.get_cell(edit.row, edit.col + 1).is_empty() {
                return Ok(Outcome::Skipped(SkipReason::AlreadyLinked));
            }
        }

        let wait = Duration::from_millis(self.config.lock_wait_ms);
        let _guard = match self.locks.acquire("assign", wait) {
            Ok(guard) => guard,
            Err(DeskError::LockTimeout(_)) => {
                self.notifier.alert(&format!(
                    "Desk is busy. Try entering \"{}\" again.",
                    self.config.marker_token
                ));
                return Ok(Outcome::Busy);
            }
            Err(e) => return Err(e),
        };

        // Fresh snapshot inside the critical section.
        let mut book = store.load()?;
        let sheet = require_sheet_mut(&mut book, &edit.sheet)?;

        let source_id = sheet.get_cell(edit.row, 1);
        let source_name = sheet.get_cell(edit.row, 2);
        let cipher_index = self.config.cipher_index(edit.col);
        let unique_id = format!("{}{}", source_id, cipher_index);

        // Consume the marker immediately so the slot cannot re-trigger.
        sheet.set_cell(edit.row, edit.col, &unique_id);

        let target = {
            let rows = sheet.get_range(
                self.config.decoding_start_row,
                1,
                self.config.decoding_band_height(),
                sheet.last_column(),
            );
            let eligible = scanner::scan(
                &rows,
                self.config.decoding_start_row,
                self.config.first_cipher_col,
                self.config.cipher_col_step,
            );
            selector::pick(&eligible, &mut self.rng).cloned()
        };

        let Some(TeamSlots {
            sheet_row: target_row,
            team_id: target_team,
            first_empty_col: target_col,
            ..
        }) = target
        else {
            // The consumed marker is deliberately not rolled back; the
            // dangling id is the operator's signal to intervene.
            store.save(&book)?;
            self.notifier
                .alert("No decoding team has a free slot. The cipher was not assigned.");
            return Ok(Outcome::Exhausted { unique_id });
        };

        let sheet = require_sheet_mut(&mut book, &edit.sheet)?;
        sheet.set_cell(edit.row, edit.col + 1, &target_team);
        sheet.set_cell(target_row, target_col, &unique_id);
        sheet.set_cell(target_row, target_col + 1, &source_name);

        store.save(&book)?;

        Ok(Outcome::Assigned {
            unique_id,
            source_team: source_name,
            target_team,
            target_row,
            target_col,
        })
        // _guard drops here, releasing the lock on this and every earlier
        // return path after acquisition.
    }

    /// Apply the trigger filters that need no sheet data.
    fn trigger_filter(&self, edit: &CellEdit) -> Option<SkipReason> {
        if !self.config.assignment_sheets.contains(&edit.sheet) {
            return Some(SkipReason::UntrackedSheet);
        }
        if !self.config.in_encoding_band(edit.row) {
            return Some(SkipReason::OutsideEncodingBand);
        }
        if !self.config.is_marker_column(edit.col) {
            return Some(SkipReason::NotMarkerColumn);
        }
        if !edit.value.eq_ignore_ascii_case(&self.config.marker_token) {
            return Some(SkipReason::NotMarkerToken);
        }
        None
    }
}

fn require_sheet<'a>(
    book: &'a crate::grid::Workbook,
    name: &str,
) -> Result<&'a crate::grid::Sheet> {
    book.sheet(name).ok_or_else(|| {
        DeskError::StoreError(format!("assignment sheet '{}' missing from workbook", name))
    })
}

fn require_sheet_mut<'a>(
    book: &'a mut crate::grid::Workbook,
    name: &str,
) -> Result<&'a mut crate::grid::Sheet> {
    book.sheet_mut(name).ok_or_else(|| {
        DeskError::StoreError(format!("assignment sheet '{}' missing from workbook", name))
    })
}
