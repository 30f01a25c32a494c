//! Least-loaded candidate selection with random tie-break.

use super::scanner::TeamSlots;
use rand::Rng;

/// Pick the assignment target among eligible decoding rows.
///
/// Filters to the rows carrying the minimum workload, then picks uniformly
/// at random among that subset so long runs do not drift toward
/// low-numbered rows. Returns `None` when `eligible` is empty, which the
/// coordinator reports as allocation exhaustion.
///
/// The random source is injected so tests can seed it.
pub fn pick<'a, R: Rng + ?Sized>(eligible: &'a [TeamSlots], rng: &mut R) -> Option<&'a TeamSlots> {
    let min_workload = eligible.iter().map(|t| t.workload).min()?;
    let tied: Vec<&TeamSlots> = eligible
        .iter()
        .filter(|t| t.workload == min_workload)
        .collect();

    Some(tied[rng.random_range(0..tied.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn team(row: u32, workload: u32) -> TeamSlots {
        TeamSlots {
            sheet_row: row,
            team_id: format!("D{}", row),
            workload,
            first_empty_col: 4,
        }
    }

    #[test]
    fn empty_input_selects_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(pick(&[], &mut rng).is_none());
    }

    #[test]
    fn unique_minimum_always_wins() {
        let eligible = vec![team(32, 3), team(33, 1), team(34, 2)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for _ in 0..50 {
            assert_eq!(pick(&eligible, &mut rng).unwrap().sheet_row, 33);
        }
    }

    #[test]
    fn only_minimum_rows_are_ever_picked() {
        let eligible = vec![team(32, 1), team(33, 0), team(34, 0), team(35, 2)];
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..200 {
            let picked = pick(&eligible, &mut rng).unwrap();
            assert!(picked.sheet_row == 33 || picked.sheet_row == 34);
        }
    }
}
