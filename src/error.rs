//! Error types for the cipherdesk CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//!
//! Validation skips (an edit outside the tracked bands) and allocation
//! exhaustion are *outcomes*, not errors; see `assign::Outcome`. Only
//! conditions that abort a command land here.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for cipherdesk operations.
///
/// Each variant maps to a specific exit code.
#[derive(Error, Debug)]
pub enum DeskError {
    /// User provided invalid arguments or the desk is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// Workbook or desk state could not be read or written.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Inbox message could not be read or marked.
    #[error("Inbox operation failed: {0}")]
    MailError(String),

    /// Lock could not be acquired within the bounded wait.
    #[error("Lock wait timed out: {0}")]
    LockTimeout(String),

    /// Lock infrastructure failure (unreadable lock file, IO error).
    #[error("Lock operation failed: {0}")]
    LockError(String),
}

impl DeskError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeskError::UserError(_) => exit_codes::USER_ERROR,
            DeskError::StoreError(_) => exit_codes::STORE_FAILURE,
            DeskError::MailError(_) => exit_codes::MAIL_FAILURE,
            DeskError::LockTimeout(_) => exit_codes::LOCK_FAILURE,
            DeskError::LockError(_) => exit_codes::LOCK_FAILURE,
        }
    }
}

/// Result type alias for cipherdesk operations.
pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = DeskError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn store_error_has_correct_exit_code() {
        let err = DeskError::StoreError("workbook unreadable".to_string());
        assert_eq!(err.exit_code(), exit_codes::STORE_FAILURE);
    }

    #[test]
    fn mail_error_has_correct_exit_code() {
        let err = DeskError::MailError("message unreadable".to_string());
        assert_eq!(err.exit_code(), exit_codes::MAIL_FAILURE);
    }

    #[test]
    fn lock_errors_share_lock_exit_code() {
        let timeout = DeskError::LockTimeout("assign held".to_string());
        let other = DeskError::LockError("cannot create lock file".to_string());
        assert_eq!(timeout.exit_code(), exit_codes::LOCK_FAILURE);
        assert_eq!(other.exit_code(), exit_codes::LOCK_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = DeskError::StoreError("missing sheet".to_string());
        assert_eq!(err.to_string(), "Store operation failed: missing sheet");

        let err = DeskError::LockTimeout("assign lock busy".to_string());
        assert_eq!(err.to_string(), "Lock wait timed out: assign lock busy");
    }
}
