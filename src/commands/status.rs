//! Implementation of the `cipherdesk status` command.

use crate::assign::scan;
use crate::config::Config;
use crate::context::require_initialized_desk;
use crate::error::Result;
use crate::grid::SheetStore;
use crate::locks;
use crate::store::{FileWorkbookStore, WorkbookStore};

/// Execute the `cipherdesk status` command.
///
/// Shows per-sheet decoding workloads, the error-sheet backlog, and any
/// active locks.
pub fn cmd_status() -> Result<()> {
    let ctx = require_initialized_desk()?;
    let config = Config::load(ctx.config_path()).unwrap_or_default();
    let book = FileWorkbookStore::new(ctx.workbook_path()).load()?;

    for sheet_name in &config.assignment_sheets {
        let Some(sheet) = book.sheet(sheet_name) else {
            println!("{}: missing from workbook", sheet_name);
            continue;
        };

        println!("{}:", sheet_name);

        let rows = sheet.get_range(
            config.decoding_start_row,
            1,
            config.decoding_band_height(),
            sheet.last_column(),
        );
        let eligible = scan(
            &rows,
            config.decoding_start_row,
            config.first_cipher_col,
            config.cipher_col_step,
        );

        let mut shown = 0;
        for (i, row) in rows.iter().enumerate() {
            let team_id = row.first().map(String::as_str).unwrap_or("");
            if team_id.is_empty() {
                continue;
            }
            shown += 1;

            let sheet_row = config.decoding_start_row + i as u32;
            match eligible.iter().find(|t| t.sheet_row == sheet_row) {
                Some(team) => println!(
                    "  {:<10} workload {:<3} next slot col {}",
                    team.team_id, team.workload, team.first_empty_col
                ),
                None => {
                    // Identity present but no empty slot: saturated.
                    let filled = row
                        .iter()
                        .skip(config.first_cipher_col as usize - 1)
                        .step_by(config.cipher_col_step as usize)
                        .filter(|c| !c.is_empty())
                        .count();
                    println!("  {:<10} workload {:<3} FULL", team_id, filled);
                }
            }
        }
        if shown == 0 {
            println!("  (no decoding teams)");
        }
    }

    if let Some(errors) = book.sheet(&config.error_sheet) {
        println!();
        println!("Unrouted submissions logged: {}", errors.last_row());
    }

    let active = locks::list_locks(&ctx, &config)?;
    if !active.is_empty() {
        println!();
        println!("Active locks:");
        for lock in &active {
            println!("  {}", lock);
        }
    }

    Ok(())
}
