//! Tests for the grid model.

use super::*;

#[test]
fn empty_sheet_reads_empty_cells() {
    let sheet = Sheet::new("Round 2 Phase 1");
    assert_eq!(sheet.get_cell(1, 1), "");
    assert_eq!(sheet.get_cell(62, 13), "");
    assert_eq!(sheet.last_row(), 0);
    assert_eq!(sheet.last_column(), 0);
}

#[test]
fn set_cell_grows_sheet() {
    let mut sheet = Sheet::new("test");
    sheet.set_cell(32, 4, "71");

    assert_eq!(sheet.get_cell(32, 4), "71");
    assert_eq!(sheet.last_row(), 32);
    assert_eq!(sheet.last_column(), 4);
}

#[test]
fn last_extent_tracks_content_not_allocation() {
    let mut sheet = Sheet::new("test");
    sheet.set_cell(5, 3, "x");
    sheet.set_cell(9, 7, "y");
    sheet.clear_cell(9, 7);

    assert_eq!(sheet.last_row(), 5);
    assert_eq!(sheet.last_column(), 3);
}

#[test]
fn clear_cell_empties_without_shifting() {
    let mut sheet = Sheet::new("test");
    sheet.set_cell(2, 4, "Y");
    sheet.set_cell(2, 6, "Y");
    sheet.clear_cell(2, 4);

    assert_eq!(sheet.get_cell(2, 4), "");
    assert_eq!(sheet.get_cell(2, 6), "Y");
}

#[test]
fn clear_cell_outside_extent_is_noop() {
    let mut sheet = Sheet::new("test");
    sheet.clear_cell(100, 100);
    assert_eq!(sheet.last_row(), 0);
}

#[test]
fn get_range_pads_beyond_extent() {
    let mut sheet = Sheet::new("test");
    sheet.set_cell(32, 1, "D1");
    sheet.set_cell(32, 4, "71");

    let rows = sheet.get_range(32, 1, 2, 6);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec!["D1", "", "", "71", "", ""]);
    assert_eq!(rows[1], vec![""; 6]);
}

#[test]
fn set_range_writes_block() {
    let mut sheet = Sheet::new("test");
    let block = vec![
        vec!["P".to_string()],
        vec!["A".to_string()],
        vec!["P".to_string()],
    ];
    sheet.set_range(2, 3, &block);

    assert_eq!(sheet.get_cell(2, 3), "P");
    assert_eq!(sheet.get_cell(3, 3), "A");
    assert_eq!(sheet.get_cell(4, 3), "P");
}

#[test]
fn append_row_lands_after_last_content_row() {
    let mut sheet = Sheet::new("Errors");
    sheet.append_row(&[
        "101".to_string(),
        "TeamX".to_string(),
        "2".to_string(),
        "link-1".to_string(),
    ]);
    sheet.append_row(&["102".to_string(), "TeamY".to_string()]);

    assert_eq!(sheet.get_cell(1, 1), "101");
    assert_eq!(sheet.get_cell(1, 4), "link-1");
    assert_eq!(sheet.get_cell(2, 1), "102");
    assert_eq!(sheet.last_row(), 2);
}

#[test]
fn workbook_lookup_is_exact() {
    let mut book = Workbook::new();
    book.add_sheet("Round 2").unwrap();

    assert!(book.sheet("Round 2").is_some());
    assert!(book.sheet("round 2").is_none());
    assert!(book.sheet("Round 2 ").is_none());
}

#[test]
fn workbook_rejects_duplicate_sheet() {
    let mut book = Workbook::new();
    book.add_sheet("Errors").unwrap();

    let result = book.add_sheet("Errors");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("already exists"));
}

#[test]
fn sheet_mut_or_insert_creates_once() {
    let mut book = Workbook::new();
    book.sheet_mut_or_insert("Errors").set_cell(1, 1, "x");
    book.sheet_mut_or_insert("Errors").set_cell(2, 1, "y");

    assert_eq!(book.sheet_names(), vec!["Errors"]);
    assert_eq!(book.sheet("Errors").unwrap().get_cell(2, 1), "y");
}

#[test]
fn workbook_serde_round_trip() {
    let mut book = Workbook::new();
    book.add_sheet("Round 2 Phase 1")
        .unwrap()
        .set_cell(2, 4, "Y");

    let json = serde_json::to_string(&book).unwrap();
    let parsed: Workbook = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.sheet("Round 2 Phase 1").unwrap().get_cell(2, 4), "Y");
}
