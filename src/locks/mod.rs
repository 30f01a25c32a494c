//! Locking subsystem for cipherdesk.
//!
//! Concurrent proctors can trigger assignments at the same moment, so the
//! scan-select-commit read-modify-write runs under one process-wide
//! exclusive lock: a lock file created with **create_new** semantics
//! (exclusive create) in `.cipherdesk/locks/`.
//!
//! Unlike a fail-fast lock, acquisition here waits: callers poll for the
//! lock until a bounded deadline (`lock_wait_ms`, default 10 s) and get a
//! distinct timeout error when it passes, which the coordinator surfaces as
//! a transient "busy" condition rather than a failure.
//!
//! # Lock Metadata
//!
//! Each lock file contains JSON metadata:
//! - `owner`: the lock holder (e.g., `user@HOST`)
//! - `pid`: the process ID (optional)
//! - `created_at`: RFC3339 timestamp
//! - `action`: the action being performed
//!
//! # RAII Guards
//!
//! Locks release through RAII guards when dropped, including on every
//! early-return path out of the critical section. If deletion fails during
//! drop, a warning is printed but the program does not crash.

mod guard;
mod metadata;
mod operations;
mod provider;
mod types;

#[cfg(test)]
mod tests;

pub use guard::LockGuard;
pub use metadata::LockMetadata;
pub use operations::{acquire_assignment_lock, clear_lock, list_locks};
pub use provider::{DeskLockProvider, LockProvider};
pub use types::LockInfo;
