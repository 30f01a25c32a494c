//! Implementation of the `cipherdesk poll` command.

use crate::config::Config;
use crate::context::require_initialized_desk;
use crate::error::Result;
use crate::events::{Event, EventAction, append_event};
use crate::store::FileWorkbookStore;
use crate::submissions::{self, FileInbox, RouteOutcome};
use serde_json::json;

/// Execute the `cipherdesk poll` command.
///
/// Routes every unread submission message from the inbox into the workbook,
/// then reports what happened to each.
pub fn cmd_poll() -> Result<()> {
    let ctx = require_initialized_desk()?;
    let config = Config::load(ctx.config_path()).unwrap_or_default();
    let store = FileWorkbookStore::new(ctx.workbook_path());
    let mut inbox = FileInbox::new(ctx.inbox_dir());

    let report = submissions::poll(&mut inbox, &store, &config)?;

    if report.entries.is_empty() {
        println!("No unread submissions.");
        return Ok(());
    }

    for (message_id, outcome) in &report.entries {
        match outcome {
            RouteOutcome::Placed { sheet, row } => {
                append_event(
                    &ctx,
                    &Event::new(EventAction::SubmissionPlaced).with_details(json!({
                        "message": message_id,
                        "sheet": sheet,
                        "row": row,
                    })),
                )?;
                println!("  {} -> {} row {}", message_id, sheet, row);
            }
            RouteOutcome::Logged {
                roll,
                team,
                round,
                reason,
            } => {
                append_event(
                    &ctx,
                    &Event::new(EventAction::SubmissionLogged).with_details(json!({
                        "message": message_id,
                        "roll": roll,
                        "team": team,
                        "round": round,
                        "reason": format!("{:?}", reason),
                    })),
                )?;
                println!("  {} -> {} ({:?})", message_id, config.error_sheet, reason);
            }
        }
    }

    println!(
        "Processed {} message(s): {} placed, {} logged.",
        report.entries.len(),
        report.placed(),
        report.logged()
    );

    Ok(())
}
