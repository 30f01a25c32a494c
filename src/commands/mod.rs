//! Command implementations for cipherdesk.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the small lock subcommands.

mod edit;
mod init;
mod poll;
mod status;

#[cfg(test)]
mod tests;

use crate::cli::{Command, LockAction, LockClearArgs, LockCommand};
use crate::config::Config;
use crate::context::require_initialized_desk;
use crate::error::{DeskError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::locks;
use serde_json::json;

pub use edit::cmd_edit;
pub use init::cmd_init;
pub use poll::cmd_poll;
pub use status::cmd_status;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init => cmd_init(),
        Command::Edit(args) => cmd_edit(args),
        Command::Poll => cmd_poll(),
        Command::Status => cmd_status(),
        Command::Lock(lock_cmd) => dispatch_lock(lock_cmd),
    }
}

/// Dispatch lock subcommands.
fn dispatch_lock(lock_cmd: LockCommand) -> Result<()> {
    match lock_cmd.action {
        LockAction::List => cmd_lock_list(),
        LockAction::Clear(args) => cmd_lock_clear(args),
    }
}

fn cmd_lock_list() -> Result<()> {
    let ctx = require_initialized_desk()?;
    let config = Config::load(ctx.config_path()).unwrap_or_default();

    let locks = locks::list_locks(&ctx, &config)?;

    if locks.is_empty() {
        println!("No active locks.");
        return Ok(());
    }

    println!("Active locks ({}):", locks.len());
    for lock in &locks {
        println!("  {}", lock);
    }

    let stale_count = locks.iter().filter(|l| l.is_stale).count();
    if stale_count > 0 {
        println!();
        println!(
            "Note: {} lock(s) are stale. Use `cipherdesk lock clear <lock-id> --force` to clear.",
            stale_count
        );
    }

    Ok(())
}

fn cmd_lock_clear(args: LockClearArgs) -> Result<()> {
    if !args.force {
        return Err(DeskError::UserError(format!(
            "refusing to clear lock without --force flag.\n\n\
             Clearing a live lock lets two assignments interleave and corrupt\n\
             the workbook. Only clear locks whose holder has crashed.\n\n\
             To clear the lock, run:\n  cipherdesk lock clear {} --force",
            args.lock_id
        )));
    }

    let ctx = require_initialized_desk()?;
    let config = Config::load(ctx.config_path()).unwrap_or_default();

    let cleared = locks::clear_lock(&ctx, &args.lock_id, &config)?;

    let event = Event::new(EventAction::LockClear).with_details(json!({
        "lock_id": cleared.name,
        "age_minutes": cleared.metadata.age().num_minutes(),
        "was_stale": cleared.is_stale,
        "owner": cleared.metadata.owner,
        "original_action": cleared.metadata.action
    }));

    // Best-effort logging: the cleared lock might have been what guarded the
    // desk, so a logging failure must not fail the clear.
    if let Err(e) = append_event(&ctx, &event) {
        eprintln!("Warning: failed to log lock_clear event: {}", e);
    }

    println!("Cleared lock: {}", cleared.name);
    println!("  Owner:   {}", cleared.metadata.owner);
    println!("  Age:     {}", cleared.metadata.age_string());
    println!("  Action:  {}", cleared.metadata.action);
    if cleared.is_stale {
        println!("  Status:  was STALE");
    }

    Ok(())
}
