//! Inbound edit dispatch.
//!
//! One cell edit can concern more than one handler: a marker edit feeds the
//! assignment coordinator, while presence-column edits feed the presence
//! handler. Each handler applies its own filters and ignores edits that are
//! not for it, so they stay independently testable; this module just runs
//! them in a fixed order over the same edit.

mod presence;

use crate::assign::{AssignmentCoordinator, CellEdit, Outcome};
use crate::config::Config;
use crate::error::Result;
use crate::locks::LockProvider;
use crate::notify::Notifier;
use crate::store::WorkbookStore;
use rand::Rng;

pub use presence::PresenceOutcome;

/// What each handler did with one edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcomes {
    /// Assignment engine outcome (always present; `Skipped` when the edit
    /// was not a marker trigger).
    pub assignment: Outcome,

    /// Presence handler outcome, when the edit touched presence cells.
    pub presence: Option<PresenceOutcome>,
}

/// Route one cell edit through every handler that applies.
pub fn route_edit<L, N, R>(
    coordinator: &mut AssignmentCoordinator<L, N, R>,
    store: &dyn WorkbookStore,
    config: &Config,
    edit: &CellEdit,
) -> Result<EditOutcomes>
where
    L: LockProvider,
    N: Notifier,
    R: Rng,
{
    let assignment = coordinator.on_edit(store, edit)?;
    let presence = presence::on_edit(store, config, edit)?;

    Ok(EditOutcomes {
        assignment,
        presence,
    })
}
