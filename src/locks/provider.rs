//! Injectable lock acquisition capability.
//!
//! The assignment coordinator is written against this trait so tests can
//! point it at a throwaway desk while production uses the real lock files.

use super::guard::LockGuard;
use super::operations::acquire_assignment_lock;
use crate::context::DeskContext;
use crate::error::Result;
use std::time::Duration;

/// Grants exclusive desk-wide locks with a bounded wait.
pub trait LockProvider {
    /// The RAII guard type; dropping it releases the lock.
    type Guard;

    /// Acquire the lock, waiting up to `wait`.
    ///
    /// Fails with `DeskError::LockTimeout` when the wait expires.
    fn acquire(&self, action: &str, wait: Duration) -> Result<Self::Guard>;
}

/// Lock provider backed by the desk's lock files.
#[derive(Debug, Clone)]
pub struct DeskLockProvider {
    ctx: DeskContext,
}

impl DeskLockProvider {
    pub fn new(ctx: DeskContext) -> Self {
        Self { ctx }
    }
}

impl LockProvider for DeskLockProvider {
    type Guard = LockGuard;

    fn acquire(&self, action: &str, wait: Duration) -> Result<LockGuard> {
        acquire_assignment_lock(&self.ctx, action, wait)
    }
}
