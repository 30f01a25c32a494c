//! Workbook persistence seam.
//!
//! The assignment coordinator must read its workload snapshot *inside* the
//! critical section, so it is written against `WorkbookStore`, a load/save
//! seam, rather than against an already-loaded workbook. `FileWorkbookStore`
//! is the production implementation (JSON on disk, atomic replace).
//! `MemoryWorkbookStore` holds the workbook behind a mutex so threaded tests
//! can share one live store the way concurrent editors share one sheet.

use crate::error::{DeskError, Result};
use crate::fs::atomic_write_file;
use crate::grid::Workbook;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Load/save access to the shared workbook.
pub trait WorkbookStore {
    /// Read the current committed workbook state.
    fn load(&self) -> Result<Workbook>;

    /// Replace the committed workbook state.
    fn save(&self, book: &Workbook) -> Result<()>;
}

/// Workbook stored as a JSON document on disk.
#[derive(Debug)]
pub struct FileWorkbookStore {
    path: PathBuf,
}

impl FileWorkbookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkbookStore for FileWorkbookStore {
    fn load(&self) -> Result<Workbook> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            DeskError::StoreError(format!(
                "failed to read workbook '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            DeskError::StoreError(format!(
                "failed to parse workbook '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    fn save(&self, book: &Workbook) -> Result<()> {
        let json = serde_json::to_string_pretty(book)
            .map_err(|e| DeskError::StoreError(format!("failed to serialize workbook: {}", e)))?;
        atomic_write_file(&self.path, &json)
    }
}

/// Workbook held in memory behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryWorkbookStore {
    inner: Mutex<Workbook>,
}

impl MemoryWorkbookStore {
    pub fn new(book: Workbook) -> Self {
        Self {
            inner: Mutex::new(book),
        }
    }

    /// Take a snapshot of the current state without going through `load`.
    pub fn snapshot(&self) -> Workbook {
        self.inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }
}

impl WorkbookStore for MemoryWorkbookStore {
    fn load(&self) -> Result<Workbook> {
        Ok(self.snapshot())
    }

    fn save(&self, book: &Workbook) -> Result<()> {
        *self
            .inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner()) = book.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SheetStore;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileWorkbookStore::new(temp_dir.path().join("workbook.json"));

        let mut book = Workbook::new();
        book.add_sheet("Round 2").unwrap().set_cell(2, 1, "101");
        store.save(&book).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.sheet("Round 2").unwrap().get_cell(2, 1), "101");
    }

    #[test]
    fn file_store_load_fails_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileWorkbookStore::new(temp_dir.path().join("absent.json"));

        let result = store.load();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("failed to read"));
    }

    #[test]
    fn file_store_load_fails_on_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("workbook.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileWorkbookStore::new(&path);

        let result = store.load();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }

    #[test]
    fn memory_store_save_replaces_state() {
        let store = MemoryWorkbookStore::default();

        let mut book = store.load().unwrap();
        book.sheet_mut_or_insert("Errors").set_cell(1, 1, "x");
        store.save(&book).unwrap();

        assert_eq!(store.load().unwrap().sheet("Errors").unwrap().get_cell(1, 1), "x");
    }
}
