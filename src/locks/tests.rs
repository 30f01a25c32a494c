//! Tests for the locking subsystem.

use super::*;
use crate::config::Config;
use crate::context::DeskContext;
use crate::error::DeskError;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn test_ctx() -> (TempDir, DeskContext) {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join(".cipherdesk")).unwrap();
    let ctx = DeskContext::resolve_from(temp_dir.path());
    (temp_dir, ctx)
}

#[test]
fn acquire_creates_lock_file_with_metadata() {
    let (_temp_dir, ctx) = test_ctx();

    let guard = acquire_assignment_lock(&ctx, "assign", Duration::from_millis(10)).unwrap();

    assert!(guard.path().exists());
    let meta = LockMetadata::from_file(guard.path()).unwrap();
    assert_eq!(meta.action, "assign");
    assert!(meta.owner.contains('@'));
    assert!(meta.pid.is_some());
}

#[test]
fn guard_drop_releases_lock() {
    let (_temp_dir, ctx) = test_ctx();
    let lock_path = ctx.assignment_lock_path();

    {
        let _guard = acquire_assignment_lock(&ctx, "assign", Duration::from_millis(10)).unwrap();
        assert!(lock_path.exists());
    }

    assert!(!lock_path.exists());
}

#[test]
fn explicit_release_removes_lock() {
    let (_temp_dir, ctx) = test_ctx();
    let guard = acquire_assignment_lock(&ctx, "assign", Duration::from_millis(10)).unwrap();
    let lock_path = guard.path().to_path_buf();

    guard.release().unwrap();

    assert!(!lock_path.exists());
}

#[test]
fn held_lock_times_out_with_holder_info() {
    let (_temp_dir, ctx) = test_ctx();
    let _guard = acquire_assignment_lock(&ctx, "assign", Duration::from_millis(10)).unwrap();

    let start = Instant::now();
    let result = acquire_assignment_lock(&ctx, "assign", Duration::from_millis(150));
    let waited = start.elapsed();

    assert!(waited >= Duration::from_millis(150), "should wait the bound");
    match result {
        Err(DeskError::LockTimeout(msg)) => {
            assert!(msg.contains("assign"), "message names the action: {}", msg);
        }
        other => panic!("expected LockTimeout, got {:?}", other.map(|g| g.path().to_path_buf())),
    }
}

#[test]
fn waiter_acquires_after_holder_releases() {
    let (_temp_dir, ctx) = test_ctx();
    let guard = acquire_assignment_lock(&ctx, "assign", Duration::from_millis(10)).unwrap();

    let ctx_clone = ctx.clone();
    let waiter = std::thread::spawn(move || {
        acquire_assignment_lock(&ctx_clone, "assign", Duration::from_secs(5))
    });

    std::thread::sleep(Duration::from_millis(100));
    drop(guard);

    let acquired = waiter.join().unwrap();
    assert!(acquired.is_ok(), "waiter should win once the lock frees");
}

#[test]
fn metadata_json_round_trip() {
    let meta = LockMetadata::new("assign");
    let json = meta.to_json().unwrap();
    let parsed: LockMetadata = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.owner, meta.owner);
    assert_eq!(parsed.action, "assign");
    assert_eq!(parsed.pid, meta.pid);
}

#[test]
fn fresh_lock_is_not_stale() {
    let meta = LockMetadata::new("assign");
    assert!(!meta.is_stale(30));
}

#[test]
fn old_lock_is_stale() {
    let mut meta = LockMetadata::new("assign");
    meta.created_at = chrono::Utc::now() - chrono::Duration::minutes(45);

    assert!(meta.is_stale(30));
    assert!(!meta.is_stale(60));
}

#[test]
fn list_locks_empty_without_locks_dir() {
    let (_temp_dir, ctx) = test_ctx();
    let locks = list_locks(&ctx, &Config::default()).unwrap();
    assert!(locks.is_empty());
}

#[test]
fn list_locks_reports_active_lock() {
    let (_temp_dir, ctx) = test_ctx();
    let _guard = acquire_assignment_lock(&ctx, "assign", Duration::from_millis(10)).unwrap();

    let locks = list_locks(&ctx, &Config::default()).unwrap();

    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].name, "assign");
    assert!(!locks[0].is_stale);
}

#[test]
fn clear_lock_removes_file_and_reports_info() {
    let (_temp_dir, ctx) = test_ctx();
    let guard = acquire_assignment_lock(&ctx, "assign", Duration::from_millis(10)).unwrap();
    let lock_path = guard.path().to_path_buf();
    // Simulate a crashed holder: forget the guard so drop never fires.
    std::mem::forget(guard);

    let cleared = clear_lock(&ctx, "assign", &Config::default()).unwrap();

    assert_eq!(cleared.name, "assign");
    assert!(!lock_path.exists());
}

#[test]
fn clear_missing_lock_fails() {
    let (_temp_dir, ctx) = test_ctx();
    let result = clear_lock(&ctx, "assign", &Config::default());

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("does not exist"));
}

#[test]
fn lock_info_display_includes_owner_and_action() {
    let (_temp_dir, ctx) = test_ctx();
    let _guard = acquire_assignment_lock(&ctx, "assign", Duration::from_millis(10)).unwrap();

    let locks = list_locks(&ctx, &Config::default()).unwrap();
    let display = locks[0].to_string();

    assert!(display.contains("assign"));
    assert!(display.contains("owner:"));
}
