//! Lock acquisition, listing, and clearing operations.

use super::guard::LockGuard;
use super::metadata::LockMetadata;
use super::types::LockInfo;
use crate::config::Config;
use crate::context::DeskContext;
use crate::error::{DeskError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// Interval between acquisition attempts while waiting for the lock.
const ACQUIRE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Try to create the lock file exclusively.
///
/// Returns `Ok(None)` when the lock is currently held by someone else,
/// `Ok(Some(guard))` on success, and `Err` for infrastructure failures.
fn try_acquire(lock_path: &Path, metadata: &LockMetadata) -> Result<Option<LockGuard>> {
    if let Some(parent) = lock_path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            DeskError::LockError(format!(
                "failed to create locks directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(lock_path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(DeskError::LockError(format!(
                "failed to acquire lock '{}': {}",
                lock_path.display(),
                e
            )));
        }
    };

    let json = metadata.to_json()?;
    file.write_all(json.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            // Don't leave a content-less lock file behind.
            let _ = fs::remove_file(lock_path);
            DeskError::LockError(format!("failed to write lock metadata: {}", e))
        })?;

    Ok(Some(LockGuard::new(lock_path.to_path_buf())))
}

/// Acquire the desk-wide assignment lock, waiting up to `wait`.
///
/// The lock serializes the assignment critical section (snapshot, scan,
/// select, commit). Acquisition polls until the deadline passes, then fails
/// with `DeskError::LockTimeout` carrying the current holder's metadata for
/// the operator.
pub fn acquire_assignment_lock(
    ctx: &DeskContext,
    action: &str,
    wait: Duration,
) -> Result<LockGuard> {
    let lock_path = ctx.assignment_lock_path();
    let metadata = LockMetadata::new(action);
    let deadline = Instant::now() + wait;

    loop {
        if let Some(guard) = try_acquire(&lock_path, &metadata)? {
            return Ok(guard);
        }

        let now = Instant::now();
        if now >= deadline {
            let holder = match LockMetadata::from_file(&lock_path) {
                Ok(meta) => format!(
                    "held by {} for {} (action: {})",
                    meta.owner,
                    meta.age_string(),
                    meta.action
                ),
                // Holder may have released between the attempt and this read.
                Err(_) => "holder unknown".to_string(),
            };
            return Err(DeskError::LockTimeout(format!(
                "assignment lock still {} after {} ms",
                holder,
                wait.as_millis()
            )));
        }

        let remaining = deadline - now;
        std::thread::sleep(remaining.min(ACQUIRE_POLL_INTERVAL));
    }
}

/// List all active locks in the desk.
pub fn list_locks(ctx: &DeskContext, config: &Config) -> Result<Vec<LockInfo>> {
    let mut locks = Vec::new();

    if !ctx.locks_dir.exists() {
        return Ok(locks);
    }

    let entries = fs::read_dir(&ctx.locks_dir).map_err(|e| {
        DeskError::LockError(format!(
            "failed to read locks directory '{}': {}",
            ctx.locks_dir.display(),
            e
        ))
    })?;

    for entry in entries {
        let entry = entry
            .map_err(|e| DeskError::LockError(format!("failed to read locks entry: {}", e)))?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("lock") {
            continue;
        }

        // Skip lock files we cannot parse; clear still works on them by name.
        let metadata = match LockMetadata::from_file(&path) {
            Ok(meta) => meta,
            Err(_) => continue,
        };

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let is_stale = metadata.is_stale(config.lock_stale_minutes);

        locks.push(LockInfo {
            path,
            name,
            metadata,
            is_stale,
        });
    }

    locks.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(locks)
}

/// Clear a lock file by name.
///
/// The caller is responsible for verifying that clearing is appropriate
/// (e.g., checking `--force`). Returns the cleared lock's info for audit.
pub fn clear_lock(ctx: &DeskContext, lock_id: &str, config: &Config) -> Result<LockInfo> {
    let lock_path = ctx.locks_dir.join(format!("{}.lock", lock_id));

    if !lock_path.exists() {
        return Err(DeskError::UserError(format!(
            "lock '{}' does not exist at: {}",
            lock_id,
            lock_path.display()
        )));
    }

    let metadata = LockMetadata::from_file(&lock_path)?;
    let is_stale = metadata.is_stale(config.lock_stale_minutes);
    let lock_info = LockInfo {
        path: lock_path.clone(),
        name: lock_id.to_string(),
        metadata,
        is_stale,
    };

    fs::remove_file(&lock_path).map_err(|e| {
        DeskError::LockError(format!(
            "failed to clear lock '{}': {}",
            lock_path.display(),
            e
        ))
    })?;

    Ok(lock_info)
}
