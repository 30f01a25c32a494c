//! Submission routing.
//!
//! Teams mail in their answers; each message subject is expected to read
//! `submission <roll> <team> <round>`. The router matches (roll, team) by
//! exact string equality against rows of the `Round <round>` sheet and
//! writes the message's thread link into the result column. Anything that
//! cannot be routed (wrong token count, unknown round sheet, no matching
//! row) lands as a best-effort row in the error sheet instead; routing is
//! never fatal and never blocks later messages.
//!
//! Routing runs on its own schedule and takes no lock: it only appends rows
//! or fills a previously empty result cell.

mod inbox;


pub use inbox::{FileInbox, InboundMessage, MessageSource};

use crate::config::Config;
use crate::error::Result;
use crate::grid::{SheetStore, Workbook};
use crate::store::WorkbookStore;

/// Sentinel recorded for subject fields that could not be extracted.
const UNKNOWN_FIELD: &str = "Unknown";

/// Leading subject token that marks a submission.
const SUBMISSION_KEYWORD: &str = "submission";

/// Where one routed message ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Link written into the matched row of a round sheet.
    Placed { sheet: String, row: u32 },

    /// Message recorded in the error sheet.
    Logged {
        roll: String,
        team: String,
        round: String,
        reason: LogReason,
    },
}

/// Why a message went to the error sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogReason {
    /// Subject did not parse as `submission <roll> <team> <round>`.
    Malformed,
    /// The round sheet named by the subject does not exist.
    MissingSheet,
    /// No row matched (roll, team).
    NoMatch,
}

/// Summary of one poll pass.
#[derive(Debug, Clone, Default)]
pub struct PollReport {
    /// Per-message outcomes in processing order.
    pub entries: Vec<(String, RouteOutcome)>,
}

impl PollReport {
    /// Count of messages whose link was placed in a round sheet.
    pub fn placed(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, o)| matches!(o, RouteOutcome::Placed { .. }))
            .count()
    }

    /// Count of messages logged to the error sheet.
    pub fn logged(&self) -> usize {
        self.entries.len() - self.placed()
    }
}

/// Route one message into the workbook.
///
/// Infallible by design: every failure mode becomes an error-sheet row. The
/// error sheet is created on first use if missing.
pub fn route(book: &mut Workbook, config: &Config, subject: &str, link: &str) -> RouteOutcome {
    let fields = match parse_subject(subject) {
        Ok(fields) => fields,
        Err((roll, team, round)) => {
            return log_error(book, config, roll, team, round, link, LogReason::Malformed);
        }
    };

    let sheet_name = config.round_sheet_name(&fields.round);

    // Row 1 is the header; identity lives in columns 1 and 2. Outer None
    // means the round sheet itself is missing.
    let matched = book.sheet(&sheet_name).map(|sheet| {
        (2..=sheet.last_row()).find(|&row| {
            sheet.get_cell(row, 1) == fields.roll && sheet.get_cell(row, 2) == fields.team
        })
    });

    match matched {
        Some(Some(row)) => {
            book.sheet_mut_or_insert(&sheet_name)
                .set_cell(row, config.result_col, link);
            RouteOutcome::Placed {
                sheet: sheet_name,
                row,
            }
        }
        Some(None) => log_error(
            book,
            config,
            fields.roll,
            fields.team,
            fields.round,
            link,
            LogReason::NoMatch,
        ),
        None => log_error(
            book,
            config,
            fields.roll,
            fields.team,
            fields.round,
            link,
            LogReason::MissingSheet,
        ),
    }
}

/// Poll the message source: route every unread message, persist the
/// workbook, then mark each message read exactly once.
///
/// The workbook is saved before messages are consumed, so a failed save
/// leaves everything unread for the next poll.
pub fn poll(
    source: &mut dyn MessageSource,
    store: &dyn WorkbookStore,
    config: &Config,
) -> Result<PollReport> {
    let messages = source.unread()?;
    if messages.is_empty() {
        return Ok(PollReport::default());
    }

    let mut book = store.load()?;
    let mut report = PollReport::default();
    for message in &messages {
        let outcome = route(&mut book, config, &message.subject, &message.link);
        report.entries.push((message.id.clone(), outcome));
    }
    store.save(&book)?;

    for message in &messages {
        source.mark_read(&message.id)?;
    }

    Ok(report)
}

struct SubjectFields {
    roll: String,
    team: String,
    round: String,
}

/// Parse `submission <roll> <team> <round>`.
///
/// On failure, returns whatever fields could be extracted with "Unknown"
/// filling the gaps, ready for the error sheet.
fn parse_subject(subject: &str) -> std::result::Result<SubjectFields, (String, String, String)> {
    let tokens: Vec<&str> = subject.split_whitespace().collect();

    if tokens.len() == 4 && tokens[0].eq_ignore_ascii_case(SUBMISSION_KEYWORD) {
        return Ok(SubjectFields {
            roll: tokens[1].to_string(),
            team: tokens[2].to_string(),
            round: tokens[3].to_string(),
        });
    }

    let field = |i: usize| {
        tokens
            .get(i)
            .map(|t| t.to_string())
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
    };
    Err((field(1), field(2), field(3)))
}

fn log_error(
    book: &mut Workbook,
    config: &Config,
    roll: String,
    team: String,
    round: String,
    link: &str,
    reason: LogReason,
) -> RouteOutcome {
    let errors = book.sheet_mut_or_insert(&config.error_sheet);
    errors.append_row(&[
        roll.clone(),
        team.clone(),
        round.clone(),
        link.to_string(),
    ]);

    RouteOutcome::Logged {
        roll,
        team,
        round,
        reason,
    }
}
