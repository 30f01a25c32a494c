//! Workload scanning over the decoding-team band.

/// Per-row stats produced by a scan: how loaded a decoding team is and
/// where its next cipher would land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSlots {
    /// 1-based sheet row of the decoding team.
    pub sheet_row: u32,

    /// Team identity from the row's first column.
    pub team_id: String,

    /// Count of filled cipher slots at scan time.
    pub workload: u32,

    /// 1-based column of the leftmost empty cipher slot.
    pub first_empty_col: u32,
}

/// Scan raw decoding-band rows into per-team slot stats.
///
/// `rows` are the band's row tuples padded to the sheet width, `band_start_row`
/// the sheet row of `rows[0]`. Cipher slots sit at `first_cipher_col` and
/// every `step` columns after it; a slot is filled when its cell is
/// non-empty. Rows with an empty identity cell are skipped, and rows with no
/// empty slot are excluded from the result entirely: a saturated team is not
/// a candidate at any priority.
///
/// Only the leftmost empty slot matters, but the walk still covers the whole
/// row because workload counts filled slots to the right of a gap too.
pub fn scan(
    rows: &[Vec<String>],
    band_start_row: u32,
    first_cipher_col: u32,
    step: u32,
) -> Vec<TeamSlots> {
    let mut eligible = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let team_id = row.first().map(String::as_str).unwrap_or("");
        if team_id.is_empty() {
            continue;
        }

        let mut workload = 0;
        let mut first_empty_col = None;
        let mut k = first_cipher_col as usize - 1;
        while k < row.len() {
            if !row[k].is_empty() {
                workload += 1;
            } else if first_empty_col.is_none() {
                first_empty_col = Some(k as u32 + 1);
            }
            k += step as usize;
        }

        if let Some(col) = first_empty_col {
            eligible.push(TeamSlots {
                sheet_row: band_start_row + i as u32,
                team_id: team_id.to_string(),
                workload,
                first_empty_col: col,
            });
        }
    }

    eligible
}
