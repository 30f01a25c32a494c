//! CLI argument parsing for cipherdesk.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};

/// Cipherdesk: race-safe cipher assignment desk for encode/decode relay events.
///
/// Desk state lives in a `.cipherdesk/` directory: a JSON workbook of round
/// sheets, a YAML config describing the sheet layout, lock files guarding
/// the assignment critical section, an NDJSON event log, and a file-drop
/// inbox for submission messages.
#[derive(Parser, Debug)]
#[command(name = "cipherdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for cipherdesk.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a desk in the current directory.
    ///
    /// Creates `.cipherdesk/` with a default config, an empty workbook
    /// holding the assignment and error sheets, and the locks, events, and
    /// inbox directories.
    Init,

    /// Record a cell edit and run the edit handlers over it.
    ///
    /// Writes the value into the cell, then dispatches to the assignment
    /// engine (marker edits) and the presence handlers (check-in edits).
    Edit(EditArgs),

    /// Route unread submission messages from the inbox.
    ///
    /// Matches each message against its round sheet and places the thread
    /// link, logging unroutable messages to the error sheet.
    Poll,

    /// Show decoding-team workloads and desk health.
    Status,

    /// Lock management commands.
    ///
    /// List or clear desk locks.
    Lock(LockCommand),
}

/// Arguments for the `edit` command.
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Name of the sheet being edited (e.g., "Round 2 Phase 1").
    pub sheet: String,

    /// 1-based row of the edited cell.
    pub row: u32,

    /// 1-based column of the edited cell.
    pub col: u32,

    /// The newly entered value.
    pub value: String,
}

/// Lock subcommands.
#[derive(Parser, Debug)]
pub struct LockCommand {
    #[command(subcommand)]
    pub action: LockAction,
}

/// Available lock actions.
#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// List all active locks with their age and owner.
    List,

    /// Clear a specific lock.
    ///
    /// Requires --force to prevent accidental clearing.
    Clear(LockClearArgs),
}

/// Arguments for the `lock clear` command.
#[derive(Parser, Debug)]
pub struct LockClearArgs {
    /// Lock to clear (e.g., "assign").
    pub lock_id: String,

    /// Force clearing the lock (required for safety).
    #[arg(long)]
    pub force: bool,
}
