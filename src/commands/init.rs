//! Implementation of the `cipherdesk init` command.

use crate::config::Config;
use crate::context::DeskContext;
use crate::error::{DeskError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::fs::atomic_write_file;
use crate::grid::Workbook;
use crate::store::{FileWorkbookStore, WorkbookStore};
use serde_json::json;

/// Execute the `cipherdesk init` command.
///
/// Creates the desk state directory with a default config, an empty
/// workbook holding the assignment and error sheets, and the locks, events,
/// and inbox directories.
pub fn cmd_init() -> Result<()> {
    let ctx = DeskContext::resolve()?;

    if ctx.desk_exists() {
        return Err(DeskError::UserError(format!(
            "desk already initialized at: {}",
            ctx.desk_dir.display()
        )));
    }

    for dir in [
        &ctx.desk_dir,
        &ctx.locks_dir,
        &ctx.events_dir(),
        &ctx.inbox_dir(),
    ] {
        std::fs::create_dir_all(dir).map_err(|e| {
            DeskError::UserError(format!(
                "failed to create directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }

    let config = Config::default();
    atomic_write_file(ctx.config_path(), &config.to_yaml()?)?;

    let mut book = Workbook::new();
    for name in &config.assignment_sheets {
        book.add_sheet(name)?;
    }
    book.add_sheet(&config.error_sheet)?;
    FileWorkbookStore::new(ctx.workbook_path()).save(&book)?;

    append_event(
        &ctx,
        &Event::new(EventAction::Init).with_details(json!({
            "sheets": book.sheet_names(),
        })),
    )?;

    println!("Initialized cipherdesk desk at {}", ctx.desk_dir.display());
    println!();
    println!("Sheets created:");
    for name in book.sheet_names() {
        println!("  {}", name);
    }
    println!();
    println!("Next steps:");
    println!("  1. Fill team rows into the workbook (or import them)");
    println!("  2. Record marker edits with `cipherdesk edit <sheet> <row> <col> Y`");
    println!("  3. Route submissions with `cipherdesk poll`");

    Ok(())
}
