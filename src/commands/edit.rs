//! Implementation of the `cipherdesk edit` command.
//!
//! Mirrors what the grid UI does around an edit trigger: the raw value is
//! written into the cell first, then the edit handlers run over the edit
//! event. The assignment engine may immediately overwrite the cell (marker
//! consumption), and the presence handlers may normalize it.

use crate::assign::{AssignmentCoordinator, CellEdit, Outcome};
use crate::cli::EditArgs;
use crate::config::Config;
use crate::context::require_initialized_desk;
use crate::error::{DeskError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::grid::SheetStore;
use crate::handlers::{self, PresenceOutcome};
use crate::locks::DeskLockProvider;
use crate::notify::ConsoleNotifier;
use crate::store::{FileWorkbookStore, WorkbookStore};
use serde_json::json;

/// Execute the `cipherdesk edit` command.
pub fn cmd_edit(args: EditArgs) -> Result<()> {
    let ctx = require_initialized_desk()?;
    let config = Config::load(ctx.config_path()).unwrap_or_default();

    if args.row == 0 || args.col == 0 {
        return Err(DeskError::UserError(
            "rows and columns are 1-based; 0 is not a valid address".to_string(),
        ));
    }

    let store = FileWorkbookStore::new(ctx.workbook_path());

    // Apply the raw edit, as the grid would have before the trigger fires.
    {
        let mut book = store.load()?;
        let sheet = match book.sheet_mut(&args.sheet) {
            Some(sheet) => sheet,
            None => {
                return Err(DeskError::UserError(format!(
                    "unknown sheet '{}'.\n\nSheets in this workbook: {}",
                    args.sheet,
                    book.sheet_names().join(", ")
                )));
            }
        };
        sheet.set_cell(args.row, args.col, &args.value);
        store.save(&book)?;
    }

    let edit = CellEdit {
        sheet: args.sheet,
        row: args.row,
        col: args.col,
        value: args.value,
    };

    let mut coordinator = AssignmentCoordinator::new(
        config.clone(),
        DeskLockProvider::new(ctx.clone()),
        ConsoleNotifier,
        rand::rng(),
    );
    let outcomes = handlers::route_edit(&mut coordinator, &store, &config, &edit)?;

    match &outcomes.assignment {
        Outcome::Assigned {
            unique_id,
            source_team,
            target_team,
            target_row,
            target_col,
        } => {
            append_event(
                &ctx,
                &Event::new(EventAction::Assign).with_details(json!({
                    "sheet": edit.sheet,
                    "unique_id": unique_id,
                    "source_team": source_team,
                    "target_team": target_team,
                    "target_row": target_row,
                    "target_col": target_col,
                })),
            )?;
            println!(
                "Assigned cipher {} to team {} (row {}, column {})",
                unique_id, target_team, target_row, target_col
            );
        }
        Outcome::Exhausted { unique_id } => {
            append_event(
                &ctx,
                &Event::new(EventAction::Exhausted).with_details(json!({
                    "sheet": edit.sheet,
                    "unique_id": unique_id,
                })),
            )?;
            println!(
                "Cipher {} was not assigned: every decoding team is full.",
                unique_id
            );
            println!("The marker cell keeps the cipher id; resolve it manually.");
        }
        Outcome::Busy => {
            append_event(
                &ctx,
                &Event::new(EventAction::Busy).with_details(json!({
                    "sheet": edit.sheet,
                    "row": edit.row,
                    "col": edit.col,
                })),
            )?;
        }
        Outcome::Skipped(reason) => {
            println!("Edit recorded; no assignment triggered ({}).", reason);
        }
    }

    match &outcomes.presence {
        Some(PresenceOutcome::Marked { row }) => {
            append_event(
                &ctx,
                &Event::new(EventAction::PresenceMark).with_details(json!({
                    "sheet": edit.sheet,
                    "row": row,
                })),
            )?;
            println!("Marked row {} present.", row);
        }
        Some(PresenceOutcome::Swept { filled }) => {
            append_event(
                &ctx,
                &Event::new(EventAction::PresenceSweep).with_details(json!({
                    "sheet": edit.sheet,
                    "filled": filled,
                })),
            )?;
            println!("Swept {} blank presence cell(s) to absent.", filled);
        }
        None => {}
    }

    Ok(())
}
