//! Exit code constants for the cipherdesk CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid state)
//! - 2: Store failure (workbook read/write)
//! - 3: Mail failure (inbox read/mark)
//! - 4: Lock acquisition failure or timeout

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or uninitialized desk.
pub const USER_ERROR: i32 = 1;

/// Store failure: workbook load/save or missing sheet.
pub const STORE_FAILURE: i32 = 2;

/// Mail failure: inbox directory or message file errors.
pub const MAIL_FAILURE: i32 = 3;

/// Lock failure: assignment lock could not be acquired or timed out.
pub const LOCK_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, STORE_FAILURE, MAIL_FAILURE, LOCK_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }
}
