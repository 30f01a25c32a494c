//! Workbook: the collection of named sheets persisted as one JSON document.

use super::sheet::Sheet;
use crate::error::{DeskError, Result};
use serde::{Deserialize, Serialize};

/// A workbook of named sheets.
///
/// Sheet names are unique; lookups are by exact name, matching how the relay
/// sheets are addressed ("Round 2 Phase 1", "Round 3", "Errors", ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// Look up a sheet mutably by exact name.
    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name() == name)
    }

    /// Get a sheet mutably, creating an empty one if absent.
    pub fn sheet_mut_or_insert(&mut self, name: &str) -> &mut Sheet {
        let idx = match self.sheets.iter().position(|s| s.name() == name) {
            Some(idx) => idx,
            None => {
                self.sheets.push(Sheet::new(name));
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[idx]
    }

    /// Add an empty sheet, failing on a duplicate name.
    pub fn add_sheet(&mut self, name: &str) -> Result<&mut Sheet> {
        if self.sheet(name).is_some() {
            return Err(DeskError::StoreError(format!(
                "sheet '{}' already exists",
                name
            )));
        }
        self.sheets.push(Sheet::new(name));
        let idx = self.sheets.len() - 1;
        Ok(&mut self.sheets[idx])
    }

    /// Names of all sheets in insertion order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name()).collect()
    }
}
