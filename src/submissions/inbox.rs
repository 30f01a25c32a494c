//! Message source seam and the file-drop inbox.
//!
//! Production messages arrive as JSON files dropped into
//! `.cipherdesk/inbox/` by the mail bridge: `{"subject": ..., "link": ...,
//! "read": false}`. Reading never consumes a message; `mark_read` rewrites
//! the file with `read: true` so a crashed poll re-sees unconsumed mail.

use crate::error::{DeskError, Result};
use crate::fs::atomic_write_file;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

/// Inbox query: only subjects mentioning "submission" are fetched, the rest
/// stay unread for whoever else reads this mailbox.
static SUBJECT_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsubmission\b").expect("invalid subject query regex"));

/// One unread message, flattened to what routing needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Stable message id (the inbox file stem).
    pub id: String,

    /// The message subject line.
    pub subject: String,

    /// Permalink to the message thread.
    pub link: String,
}

/// Source of inbound submission messages.
pub trait MessageSource {
    /// Fetch unread messages matching the submission query, oldest id first.
    fn unread(&mut self) -> Result<Vec<InboundMessage>>;

    /// Mark one message read so no later poll processes it again.
    fn mark_read(&mut self, id: &str) -> Result<()>;
}

/// On-disk representation of one inbox message.
#[derive(Debug, Serialize, Deserialize)]
struct MessageFile {
    subject: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    read: bool,
}

/// Message source backed by a directory of JSON message files.
#[derive(Debug)]
pub struct FileInbox {
    dir: PathBuf,
}

impl FileInbox {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Drop a new unread message into the inbox (used by the mail bridge
    /// and by tests).
    pub fn deposit(&self, id: &str, subject: &str, link: &str) -> Result<()> {
        let message = MessageFile {
            subject: subject.to_string(),
            link: link.to_string(),
            read: false,
        };
        self.write_message(id, &message)
    }

    fn message_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn write_message(&self, id: &str, message: &MessageFile) -> Result<()> {
        let json = serde_json::to_string_pretty(message)
            .map_err(|e| DeskError::MailError(format!("failed to serialize message: {}", e)))?;
        atomic_write_file(self.message_path(id), &json)
            .map_err(|e| DeskError::MailError(e.to_string()))
    }

    fn read_message(&self, id: &str) -> Result<MessageFile> {
        let path = self.message_path(id);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            DeskError::MailError(format!("failed to read message '{}': {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            DeskError::MailError(format!(
                "failed to parse message '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

impl MessageSource for FileInbox {
    fn unread(&mut self) -> Result<Vec<InboundMessage>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            DeskError::MailError(format!(
                "failed to read inbox directory '{}': {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut messages = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| DeskError::MailError(format!("failed to read inbox entry: {}", e)))?;
            let path = entry.path();

            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            // A corrupt message file must not block the rest of the mailbox.
            let message = match self.read_message(id) {
                Ok(message) => message,
                Err(e) => {
                    eprintln!("Warning: skipping unreadable inbox message: {}", e);
                    continue;
                }
            };

            if message.read || !SUBJECT_QUERY.is_match(&message.subject) {
                continue;
            }

            messages.push(InboundMessage {
                id: id.to_string(),
                subject: message.subject,
                link: message.link,
            });
        }

        messages.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(messages)
    }

    fn mark_read(&mut self, id: &str) -> Result<()> {
        let mut message = self.read_message(id)?;
        message.read = true;
        self.write_message(id, &message)
    }
}
