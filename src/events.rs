//! Event logging subsystem for cipherdesk.
//!
//! Append-only NDJSON audit log (one JSON object per line) in
//! `.cipherdesk/events/events.ndjson`. Every state-changing command appends
//! events so assignments and routed submissions can be audited after the
//! round.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: the action performed (assign, submission_placed, ...)
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `details`: freeform object with action-specific details

use crate::context::DeskContext;
use crate::error::{DeskError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Desk initialization.
    Init,
    /// Cipher assigned to a decoding team.
    Assign,
    /// Assignment attempt found no free decoding slot.
    Exhausted,
    /// Assignment attempt timed out waiting for the lock.
    Busy,
    /// Presence cell re-marked.
    PresenceMark,
    /// Blank presence cells swept to absent.
    PresenceSweep,
    /// Submission link placed in a round sheet.
    SubmissionPlaced,
    /// Submission logged to the error sheet.
    SubmissionLogged,
    /// Lock cleared manually.
    LockClear,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventAction::Init => "init",
            EventAction::Assign => "assign",
            EventAction::Exhausted => "exhausted",
            EventAction::Busy => "busy",
            EventAction::PresenceMark => "presence_mark",
            EventAction::PresenceSweep => "presence_sweep",
            EventAction::SubmissionPlaced => "submission_placed",
            EventAction::SubmissionLogged => "submission_logged",
            EventAction::LockClear => "lock_clear",
        };
        write!(f, "{}", name)
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action.
    ///
    /// The timestamp is the current time; the actor comes from the
    /// environment (USER@HOSTNAME).
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| DeskError::StoreError(format!("failed to serialize event: {}", e)))
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event to the events log, creating file and directory as needed.
///
/// Best-effort callers (e.g., after clearing the very lock that guards
/// logging) may downgrade a failure here to a warning; state-changing
/// commands should propagate it.
pub fn append_event(ctx: &DeskContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_file();
    let json_line = event.to_ndjson_line()?;

    let events_dir = ctx.events_dir();
    if !events_dir.exists() {
        fs::create_dir_all(&events_dir).map_err(|e| {
            DeskError::StoreError(format!(
                "failed to create events directory '{}': {}",
                events_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            DeskError::StoreError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            DeskError::StoreError(format!(
                "failed to write event to '{}': {}",
                events_file.display(),
                e
            ))
        })
}
