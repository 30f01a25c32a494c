//! Desk configuration.
//!
//! This struct represents the contents of `.cipherdesk/config.yaml`.
//! Defaults match the relay sheet layout the desk was built for: encoding
//! teams in rows 2-30, decoding teams in rows 32-62, cipher slot pairs from
//! column 4 stepping by 2, a 10 second assignment-lock wait, and submission
//! links in column 13 of "Round <n>" sheets. Unknown fields in the YAML are
//! ignored for forward compatibility.

use crate::error::{DeskError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the cipherdesk state directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Assignment sheet layout
    // =========================================================================
    /// Sheets whose edits feed the assignment engine.
    pub assignment_sheets: Vec<String>,

    /// First row of the encoding-team band (inclusive).
    pub encoding_start_row: u32,

    /// Last row of the encoding-team band (inclusive).
    pub encoding_end_row: u32,

    /// First row of the decoding-team band (inclusive).
    pub decoding_start_row: u32,

    /// Last row of the decoding-team band (inclusive).
    pub decoding_end_row: u32,

    /// Column of the first cipher marker; markers repeat every `cipher_col_step`.
    pub first_cipher_col: u32,

    /// Distance between cipher marker columns (marker + partner cell).
    pub cipher_col_step: u32,

    /// Token that arms an assignment when typed into a marker cell.
    pub marker_token: String,

    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Bounded wait for the assignment lock, in milliseconds.
    pub lock_wait_ms: u64,

    /// Minutes after which a lock is considered stale.
    pub lock_stale_minutes: u32,

    // =========================================================================
    // Submission routing
    // =========================================================================
    /// Column that receives the submission link in a round sheet.
    pub result_col: u32,

    /// Round sheets are named `"{round_sheet_prefix}{round}"`.
    pub round_sheet_prefix: String,

    /// Sheet receiving unroutable submissions.
    pub error_sheet: String,

    // =========================================================================
    // Presence marking
    // =========================================================================
    /// Column holding presence marks.
    pub presence_col: u32,

    /// Token written when a presence cell is edited.
    pub present_token: String,

    /// Token swept into blank presence cells.
    pub absent_token: String,

    /// Row of the cell that triggers the absent sweep when edited.
    pub sweep_row: u32,

    /// Column of the sweep trigger cell.
    pub sweep_col: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assignment_sheets: vec![
                "Round 2 Phase 1".to_string(),
                "Round 2 Phase 2".to_string(),
            ],
            encoding_start_row: 2,
            encoding_end_row: 30,
            decoding_start_row: 32,
            decoding_end_row: 62,
            first_cipher_col: 4,
            cipher_col_step: 2,
            marker_token: "Y".to_string(),
            lock_wait_ms: 10_000,
            lock_stale_minutes: 30,
            result_col: 13,
            round_sheet_prefix: "Round ".to_string(),
            error_sheet: "Errors".to_string(),
            presence_col: 3,
            present_token: "P".to_string(),
            absent_token: "A".to_string(),
            sweep_row: 2,
            sweep_col: 9,
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DeskError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| DeskError::UserError(format!("failed to parse config YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DeskError::UserError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values.
    pub fn validate(&self) -> Result<()> {
        if self.assignment_sheets.is_empty() {
            return Err(DeskError::UserError(
                "config validation failed: assignment_sheets must not be empty".to_string(),
            ));
        }
        if self.encoding_start_row > self.encoding_end_row {
            return Err(DeskError::UserError(
                "config validation failed: encoding band start exceeds its end".to_string(),
            ));
        }
        if self.decoding_start_row > self.decoding_end_row {
            return Err(DeskError::UserError(
                "config validation failed: decoding band start exceeds its end".to_string(),
            ));
        }
        if self.encoding_end_row >= self.decoding_start_row {
            return Err(DeskError::UserError(
                "config validation failed: encoding and decoding bands overlap".to_string(),
            ));
        }
        // Columns 1 and 2 hold team identity; cipher slots must start past them.
        if self.first_cipher_col < 3 {
            return Err(DeskError::UserError(
                "config validation failed: first_cipher_col must be at least 3".to_string(),
            ));
        }
        if self.cipher_col_step < 2 {
            return Err(DeskError::UserError(
                "config validation failed: cipher_col_step must be at least 2 \
                 (each slot is a marker/partner column pair)"
                    .to_string(),
            ));
        }
        if self.marker_token.is_empty() {
            return Err(DeskError::UserError(
                "config validation failed: marker_token must not be empty".to_string(),
            ));
        }
        if self.lock_wait_ms == 0 {
            return Err(DeskError::UserError(
                "config validation failed: lock_wait_ms must be greater than 0".to_string(),
            ));
        }
        if self.lock_stale_minutes == 0 {
            return Err(DeskError::UserError(
                "config validation failed: lock_stale_minutes must be greater than 0".to_string(),
            ));
        }
        if self.result_col == 0 {
            return Err(DeskError::UserError(
                "config validation failed: result_col must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `row` falls inside the encoding-team band.
    pub fn in_encoding_band(&self, row: u32) -> bool {
        row >= self.encoding_start_row && row <= self.encoding_end_row
    }

    /// Whether `col` is one of the cipher marker columns.
    pub fn is_marker_column(&self, col: u32) -> bool {
        col >= self.first_cipher_col && (col - self.first_cipher_col) % self.cipher_col_step == 0
    }

    /// 1-based cipher sequence index for a marker column.
    ///
    /// With the default layout, column 4 is cipher 1 and column 6 is cipher 2:
    /// (col - 2) / 2.
    pub fn cipher_index(&self, col: u32) -> u32 {
        (col - (self.first_cipher_col - self.cipher_col_step)) / self.cipher_col_step
    }

    /// Number of rows in the decoding band.
    pub fn decoding_band_height(&self) -> u32 {
        self.decoding_end_row - self.decoding_start_row + 1
    }

    /// Sheet name for a round number (e.g., "2" → "Round 2").
    pub fn round_sheet_name(&self, round: &str) -> String {
        format!("{}{}", self.round_sheet_prefix, round)
    }
}
