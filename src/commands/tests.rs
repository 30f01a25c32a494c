//! Integration tests for the desk commands.

use crate::cli::{EditArgs, LockClearArgs};
use crate::commands::{cmd_edit, cmd_init, cmd_poll, cmd_status};
use crate::config::Config;
use crate::context::DeskContext;
use crate::events::Event;
use crate::exit_codes;
use crate::grid::SheetStore;
use crate::store::{FileWorkbookStore, WorkbookStore};
use crate::submissions::FileInbox;
use crate::test_support::{DirGuard, empty_workdir};
use serial_test::serial;

/// Seed team rows into the default assignment sheet of an initialized desk.
fn seed_relay_teams(ctx: &DeskContext) {
    let store = FileWorkbookStore::new(ctx.workbook_path());
    let mut book = store.load().unwrap();
    let sheet = book.sheet_mut("Round 2 Phase 1").unwrap();
    sheet.set_cell(1, 9, "Slot 3 From"); // sheet width: three slot pairs
    sheet.set_cell(2, 1, "7");
    sheet.set_cell(2, 2, "Sigma");
    sheet.set_cell(32, 1, "D1");
    sheet.set_cell(33, 1, "D2");
    store.save(&book).unwrap();
}

#[test]
#[serial]
fn init_scaffolds_the_desk() {
    let temp_dir = empty_workdir();
    let _guard = DirGuard::new(temp_dir.path());

    cmd_init().unwrap();

    let ctx = DeskContext::resolve_from(temp_dir.path());
    assert!(ctx.desk_exists());
    assert!(ctx.workbook_path().exists());
    assert!(ctx.config_path().exists());
    assert!(ctx.inbox_dir().is_dir());
    assert!(ctx.locks_dir.is_dir());

    let config = Config::load(ctx.config_path()).unwrap();
    assert_eq!(config.marker_token, "Y");

    let book = FileWorkbookStore::new(ctx.workbook_path()).load().unwrap();
    assert!(book.sheet("Round 2 Phase 1").is_some());
    assert!(book.sheet("Round 2 Phase 2").is_some());
    assert!(book.sheet("Errors").is_some());
}

#[test]
#[serial]
fn init_refuses_a_second_run() {
    let temp_dir = empty_workdir();
    let _guard = DirGuard::new(temp_dir.path());

    cmd_init().unwrap();
    let result = cmd_init();

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    assert!(err.to_string().contains("already initialized"));
}

#[test]
#[serial]
fn commands_fail_without_initialized_desk() {
    let temp_dir = empty_workdir();
    let _guard = DirGuard::new(temp_dir.path());

    let result = cmd_status();

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("cipherdesk init"));
}

#[test]
#[serial]
fn marker_edit_commits_an_assignment() {
    let temp_dir = empty_workdir();
    let _guard = DirGuard::new(temp_dir.path());
    cmd_init().unwrap();
    let ctx = DeskContext::resolve_from(temp_dir.path());
    seed_relay_teams(&ctx);

    cmd_edit(EditArgs {
        sheet: "Round 2 Phase 1".to_string(),
        row: 2,
        col: 4,
        value: "Y".to_string(),
    })
    .unwrap();

    let book = FileWorkbookStore::new(ctx.workbook_path()).load().unwrap();
    let sheet = book.sheet("Round 2 Phase 1").unwrap();
    assert_eq!(sheet.get_cell(2, 4), "71", "marker consumed");
    let target_team = sheet.get_cell(2, 5);
    assert!(
        target_team == "D1" || target_team == "D2",
        "pass-to filled: {}",
        target_team
    );
    let target_row = if target_team == "D1" { 32 } else { 33 };
    assert_eq!(sheet.get_cell(target_row, 4), "71");
    assert_eq!(sheet.get_cell(target_row, 5), "Sigma");

    // The assignment is in the event log.
    let events = std::fs::read_to_string(ctx.events_file()).unwrap();
    let assigned = events.lines().any(|line| {
        serde_json::from_str::<Event>(line)
            .map(|e| e.details["unique_id"] == "71")
            .unwrap_or(false)
    });
    assert!(assigned, "assign event logged:\n{}", events);
}

#[test]
#[serial]
fn non_trigger_edit_just_records_the_value() {
    let temp_dir = empty_workdir();
    let _guard = DirGuard::new(temp_dir.path());
    cmd_init().unwrap();
    let ctx = DeskContext::resolve_from(temp_dir.path());
    seed_relay_teams(&ctx);

    cmd_edit(EditArgs {
        sheet: "Round 2 Phase 1".to_string(),
        row: 2,
        col: 6,
        value: "N".to_string(),
    })
    .unwrap();

    let book = FileWorkbookStore::new(ctx.workbook_path()).load().unwrap();
    let sheet = book.sheet("Round 2 Phase 1").unwrap();
    assert_eq!(sheet.get_cell(2, 6), "N", "raw value stays in the cell");
    assert_eq!(sheet.get_cell(2, 7), "", "no assignment happened");
}

#[test]
#[serial]
fn edit_rejects_unknown_sheet() {
    let temp_dir = empty_workdir();
    let _guard = DirGuard::new(temp_dir.path());
    cmd_init().unwrap();

    let result = cmd_edit(EditArgs {
        sheet: "Scratch".to_string(),
        row: 2,
        col: 4,
        value: "Y".to_string(),
    });

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("unknown sheet"));
}

#[test]
#[serial]
fn poll_places_and_logs_submissions() {
    let temp_dir = empty_workdir();
    let _guard = DirGuard::new(temp_dir.path());
    cmd_init().unwrap();
    let ctx = DeskContext::resolve_from(temp_dir.path());

    // Round sheets are provisioned by the round organizers; add one here.
    let store = FileWorkbookStore::new(ctx.workbook_path());
    let mut book = store.load().unwrap();
    let sheet = book.add_sheet("Round 2").unwrap();
    sheet.set_cell(1, 1, "Roll");
    sheet.set_cell(5, 1, "101");
    sheet.set_cell(5, 2, "TeamX");
    store.save(&book).unwrap();

    let inbox = FileInbox::new(ctx.inbox_dir());
    inbox
        .deposit("m1", "submission 101 TeamX 2", "https://mail/1")
        .unwrap();
    inbox.deposit("m2", "submission garbled", "https://mail/2").unwrap();

    cmd_poll().unwrap();

    let book = store.load().unwrap();
    assert_eq!(book.sheet("Round 2").unwrap().get_cell(5, 13), "https://mail/1");
    assert_eq!(book.sheet("Errors").unwrap().last_row(), 1);

    // Second poll is a no-op.
    cmd_poll().unwrap();
    assert_eq!(store.load().unwrap().sheet("Errors").unwrap().last_row(), 1);
}

#[test]
#[serial]
fn status_runs_on_a_seeded_desk() {
    let temp_dir = empty_workdir();
    let _guard = DirGuard::new(temp_dir.path());
    cmd_init().unwrap();
    let ctx = DeskContext::resolve_from(temp_dir.path());
    seed_relay_teams(&ctx);

    cmd_status().unwrap();
}

#[test]
#[serial]
fn lock_clear_refuses_without_force() {
    let temp_dir = empty_workdir();
    let _guard = DirGuard::new(temp_dir.path());
    cmd_init().unwrap();

    let result = super::cmd_lock_clear(LockClearArgs {
        lock_id: "assign".to_string(),
        force: false,
    });

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    assert!(err.to_string().contains("--force"));
}

#[test]
#[serial]
fn lock_list_reports_no_locks_on_fresh_desk() {
    let temp_dir = empty_workdir();
    let _guard = DirGuard::new(temp_dir.path());
    cmd_init().unwrap();

    super::cmd_lock_list().unwrap();
}
